//! Integration tests for descriptor load / set_version cycles on real files.

use std::fs;

use relbump::descriptor::{DescriptorError, HelmChart, MavenProject};
use relbump::version;
use tempfile::TempDir;

const POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!--
    Hand-maintained build descriptor.
    Only the project version below is ever rewritten by tooling.
-->
<project xmlns="http://maven.apache.org/POM/4.0.0">
    <modelVersion>4.0.0</modelVersion>
    <groupId>org.demo</groupId>
    <artifactId>demo-service</artifactId>
    <version>1.2.0-SNAPSHOT</version>
    <!-- unrelated subtree below -->
    <properties>
        <maven.compiler.source>17</maven.compiler.source>
    </properties>
    <dependencies>
        <dependency>
            <groupId>org.other</groupId>
            <artifactId>other-lib</artifactId>
            <version>9.9.9</version>
        </dependency>
    </dependencies>
</project>
"#;

const CHART: &str = "# demo chart\napiVersion: v2\nname: demo-service\ndescription: A demo\nversion: 1.2.0-SNAPSHOT\nappVersion: \"1.0\"\n";

/// Write a workspace with both descriptors.
fn setup() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("pom.xml"), POM).unwrap();
    fs::write(dir.path().join("Chart.yaml"), CHART).unwrap();
    dir
}

#[test]
fn test_project_load_and_read() {
    let dir = setup();
    let project = MavenProject::load(dir.path().join("pom.xml")).unwrap();

    assert_eq!(project.group_id(), "org.demo");
    assert_eq!(project.artifact_id(), "demo-service");
    assert_eq!(project.version_value(), "1.2.0-SNAPSHOT");
    assert_eq!(project.version().unwrap().to_string(), "1.2.0-SNAPSHOT");
}

#[test]
fn test_project_set_version_touches_only_the_version() {
    let dir = setup();
    let path = dir.path().join("pom.xml");
    let project = MavenProject::load(&path).unwrap();

    project.set_version("1.2.0").unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(written, POM.replace("1.2.0-SNAPSHOT", "1.2.0"));
    // Comments and the dependency version are untouched
    assert!(written.contains("Hand-maintained build descriptor."));
    assert!(written.contains("<version>9.9.9</version>"));
}

#[test]
fn test_project_repeated_writes_relocate() {
    let dir = setup();
    let path = dir.path().join("pom.xml");
    let project = MavenProject::load(&path).unwrap();

    // The span captured at load is stale after the first write; the second
    // write must still land correctly because set_version re-locates.
    project.set_version("1.2.0").unwrap();
    project.set_version("10.20.30-SNAPSHOT").unwrap();

    let reloaded = MavenProject::load(&path).unwrap();
    assert_eq!(reloaded.version_value(), "10.20.30-SNAPSHOT");
}

#[test]
fn test_project_identity_write_is_idempotent() {
    let dir = setup();
    let path = dir.path().join("pom.xml");
    let project = MavenProject::load(&path).unwrap();

    // Writing the current value back changes nothing, once or twice
    project.set_version("1.2.0-SNAPSHOT").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), POM);
    project.set_version("1.2.0-SNAPSHOT").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), POM);
}

#[test]
fn test_project_release_then_next_dev_workflow() {
    let dir = setup();
    let path = dir.path().join("pom.xml");

    let project = MavenProject::load(&path).unwrap();
    let current = project.version().unwrap();
    let release = version::release_version(&current);
    assert_eq!(release.to_string(), "1.2.0");

    let next = version::next_dev_version(&current).unwrap();
    project.set_version(&next.to_string()).unwrap();

    let reloaded = MavenProject::load(&path).unwrap();
    assert_eq!(reloaded.version_value(), "1.3.0-SNAPSHOT");
}

#[test]
fn test_project_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = MavenProject::load(dir.path().join("pom.xml"));
    assert!(matches!(result, Err(DescriptorError::FileNotFound(_))));
}

#[test]
fn test_project_path_is_a_directory() {
    let dir = TempDir::new().unwrap();
    let result = MavenProject::load(dir.path());
    assert!(matches!(result, Err(DescriptorError::FileNotFound(_))));
}

#[test]
fn test_project_without_version_element() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pom.xml");
    fs::write(
        &path,
        "<project><groupId>g</groupId><artifactId>a</artifactId></project>",
    )
    .unwrap();

    let result = MavenProject::load(&path);
    assert!(matches!(result, Err(DescriptorError::NotADescriptor { .. })));
}

#[test]
fn test_project_malformed_xml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pom.xml");
    fs::write(&path, "<project><groupId>g</artifactId></project>").unwrap();

    let result = MavenProject::load(&path);
    assert!(matches!(result, Err(DescriptorError::Malformed(_))));
}

#[test]
fn test_chart_load_and_read() {
    let dir = setup();
    let chart = HelmChart::load(dir.path().join("Chart.yaml")).unwrap();

    assert_eq!(chart.name(), "demo-service");
    assert_eq!(chart.version_value(), "1.2.0-SNAPSHOT");
}

#[test]
fn test_chart_set_version_preserves_everything_else() {
    let dir = setup();
    let path = dir.path().join("Chart.yaml");
    let chart = HelmChart::load(&path).unwrap();

    chart.set_version("1.2.0").unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(written, CHART.replace("1.2.0-SNAPSHOT", "1.2.0"));
    assert!(written.starts_with("# demo chart\n"));
    assert!(written.contains("appVersion: \"1.0\""));
}

#[test]
fn test_chart_longer_replacement_shifts_nothing_before_it() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Chart.yaml");
    fs::write(&path, "name: demo\nversion: 9.9.9\n# trailer\n").unwrap();

    let chart = HelmChart::load(&path).unwrap();
    chart.set_version("10.0.0").unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "name: demo\nversion: 10.0.0\n# trailer\n"
    );
}

#[test]
fn test_chart_without_version_key() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Chart.yaml");
    fs::write(&path, "name: demo\n").unwrap();

    let result = HelmChart::load(&path);
    assert!(matches!(result, Err(DescriptorError::NotADescriptor { .. })));
}

#[test]
fn test_chart_release_cycle() {
    let dir = setup();
    let path = dir.path().join("Chart.yaml");

    let chart = HelmChart::load(&path).unwrap();
    let release = version::release_version(&chart.version().unwrap());
    chart.set_version(&release.to_string()).unwrap();

    let reloaded = HelmChart::load(&path).unwrap();
    assert_eq!(reloaded.version_value(), "1.2.0");
}
