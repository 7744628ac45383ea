//! Helm chart packaging and repository commands.

use std::path::Path;

use thiserror::Error;

use crate::exec::{ExecError, Shell};
use crate::locate::{yaml, LocateError};

#[derive(Error, Debug)]
pub enum HelmError {
    #[error(transparent)]
    Exec(#[from] ExecError),

    #[error("cannot parse helm repository list: {0}")]
    RepoList(#[from] LocateError),

    #[error("helm chart repository URL is not defined (repository '{name}' unknown)")]
    NoRepositoryUrl { name: String },
}

/// Chart repository access: name plus optional URL and credentials. When the
/// URL is missing it is resolved from the repositories helm already knows.
#[derive(Debug, Clone)]
pub struct ChartRepo {
    pub name: String,
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

pub fn add_repo(shell: &Shell, repo: &ChartRepo) -> Result<(), HelmError> {
    let url = repo
        .url
        .as_deref()
        .ok_or_else(|| HelmError::NoRepositoryUrl {
            name: repo.name.clone(),
        })?;

    let mut args = vec!["repo", "add", repo.name.as_str(), url];
    if let (Some(username), Some(password)) = (&repo.username, &repo.password) {
        args.extend(["--username", username, "--password", password]);
    }
    shell.run("helm", &args)?;
    Ok(())
}

pub fn update_repos(shell: &Shell) -> Result<(), HelmError> {
    shell.run("helm", &["repo", "update"])?;
    Ok(())
}

/// Package the chart under `chart_dir`, stamping `version` as both the chart
/// version and the application version.
pub fn package(shell: &Shell, chart_dir: &Path, version: &str) -> Result<(), HelmError> {
    let dir = chart_dir.to_string_lossy();
    shell.run(
        "helm",
        &[
            "package",
            dir.as_ref(),
            "-u",
            "--app-version",
            version,
            "--version",
            version,
        ],
    )?;
    Ok(())
}

/// Pull `chart` at `chart_version` from `repo_name` and untar it into `dir`.
pub fn pull(
    shell: &Shell,
    repo_name: &str,
    chart: &str,
    chart_version: &str,
    dir: &Path,
) -> Result<(), HelmError> {
    let reference = format!("{repo_name}/{chart}");
    let untar_dir = dir.to_string_lossy();
    shell.run(
        "helm",
        &[
            "pull",
            &reference,
            "--version",
            chart_version,
            "--untar",
            "--untardir",
            untar_dir.as_ref(),
        ],
    )?;
    Ok(())
}

/// URL of a repository helm already knows, from `helm repo list -o yaml`.
///
/// The listing is a sequence of `{name, url}` mappings; read through the
/// same YAML graph the chart descriptor uses.
pub fn repository_url(shell: &Shell, name: &str) -> Result<Option<String>, HelmError> {
    let listing = shell.run("helm", &["repo", "list", "-o", "yaml"])?;
    let Some(root) = yaml::compose(&listing)? else {
        return Ok(None);
    };

    for entry in root.items() {
        let entry_name = entry.get("name").and_then(yaml::Node::as_scalar);
        if entry_name.is_some_and(|scalar| scalar.value == name) {
            return Ok(entry
                .get("url")
                .and_then(yaml::Node::as_scalar)
                .map(|scalar| scalar.value.clone()));
        }
    }
    Ok(None)
}

/// Upload the packaged chart archive `archive` to the repository.
///
/// Chart museums take a plain HTTP upload, so this shells out to `curl`
/// rather than a helm plugin.
pub fn push(shell: &Shell, repo: &ChartRepo, archive: &str) -> Result<(), HelmError> {
    let url = match &repo.url {
        Some(url) => url.clone(),
        None => {
            repository_url(shell, &repo.name)?.ok_or_else(|| HelmError::NoRepositoryUrl {
                name: repo.name.clone(),
            })?
        }
    };

    let credentials = match (&repo.username, &repo.password) {
        (Some(username), Some(password)) => Some(format!("{username}:{password}")),
        _ => None,
    };

    let mut args = vec!["-is"];
    if let Some(credentials) = &credentials {
        args.extend(["-u", credentials.as_str()]);
    }
    args.extend([url.as_str(), "--upload-file", archive]);

    shell.run("curl", &args)?;
    Ok(())
}
