//! Docker image tagging driven by the project version.

use crate::exec::{ExecError, Shell};

/// Image naming configuration; `image` defaults to the project artifact id
/// at the command layer.
#[derive(Debug, Clone)]
pub struct ImageRef {
    pub repository: String,
    pub image: String,
}

impl ImageRef {
    pub fn new(repository: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            image: image.into(),
        }
    }

    /// `repository/image[:tag]`
    pub fn name(&self, tag: Option<&str>) -> String {
        match tag {
            Some(tag) => format!("{}/{}:{}", self.repository, self.image, tag),
            None => format!("{}/{}", self.repository, self.image),
        }
    }
}

/// Tags to stamp on a build besides the project version.
#[derive(Debug, Clone)]
pub struct BuildTags {
    pub branch: Option<String>,
    pub latest: bool,
}

/// Build the image, tagged with the project version plus the requested
/// branch/latest tags. Returns the tag list for reporting.
pub fn build(
    shell: &Shell,
    image: &ImageRef,
    project_version: &str,
    tags: &BuildTags,
    dockerfile: Option<&str>,
    context: &str,
) -> Result<Vec<String>, ExecError> {
    let mut names = vec![image.name(Some(project_version))];
    if let Some(branch) = &tags.branch {
        names.push(image.name(Some(branch)));
    }
    if tags.latest {
        names.push(image.name(Some("latest")));
    }

    let mut args = vec!["build"];
    for name in &names {
        args.push("-t");
        args.push(name);
    }
    if let Some(dockerfile) = dockerfile {
        args.push("-f");
        args.push(dockerfile);
    }
    args.push(context);

    shell.run("docker", &args)?;
    Ok(names)
}

pub fn push(shell: &Shell, name: &str) -> Result<(), ExecError> {
    shell.run("docker", &["push", name]).map(drop)
}

/// Release the image built for the current commit: pull the hash-prerelease
/// tag, re-tag it as the release version, push the release tag.
pub fn release(
    shell: &Shell,
    image: &ImageRef,
    pull_tag: &str,
    release_tag: &str,
) -> Result<String, ExecError> {
    let pull_name = image.name(Some(pull_tag));
    let release_name = image.name(Some(release_tag));

    shell.run("docker", &["pull", &pull_name])?;
    shell.run("docker", &["tag", &pull_name, &release_name])?;
    shell.run("docker", &["push", &release_name])?;
    Ok(release_name)
}
