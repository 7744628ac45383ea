//! Git queries and release bookkeeping commands.

use std::env;

use crate::exec::{ExecError, Shell};

/// The current branch name.
///
/// CI pipelines check out detached heads, so the branch comes from the
/// pipeline environment when one is detected: `GITHUB_REF` under GitHub
/// Actions, `CI_COMMIT_REF_NAME` under GitLab CI. Everywhere else plain
/// `git rev-parse` answers.
pub fn branch(shell: &Shell) -> Result<String, ExecError> {
    if env_flag("GITHUB_ACTIONS") {
        if let Some(reference) = env_value("GITHUB_REF") {
            return Ok(strip_ref(&reference).to_string());
        }
    }
    if env_flag("GITLAB_CI") {
        if let Some(name) = env_value("CI_COMMIT_REF_NAME") {
            return Ok(name);
        }
    }
    shell.run("git", &["rev-parse", "--abbrev-ref", "HEAD"])
}

/// Short hash of HEAD, `length` hex digits.
pub fn hash(shell: &Shell, length: u32) -> Result<String, ExecError> {
    let short = format!("--short={length}");
    shell.run("git", &["rev-parse", &short, "HEAD"])
}

pub fn tag(shell: &Shell, name: &str) -> Result<(), ExecError> {
    shell.run("git", &["tag", name]).map(drop)
}

pub fn add_all(shell: &Shell) -> Result<(), ExecError> {
    shell.run("git", &["add", "."]).map(drop)
}

pub fn commit(shell: &Shell, message: &str) -> Result<(), ExecError> {
    shell.run("git", &["commit", "-m", message]).map(drop)
}

/// Push all branches and tags in one go, as the release workflow leaves
/// both a new tag and a new development commit behind.
pub fn push_heads_and_tags(shell: &Shell) -> Result<(), ExecError> {
    shell
        .run(
            "git",
            &[
                "push",
                "origin",
                "refs/heads/*:refs/heads/*",
                "refs/tags/*:refs/tags/*",
            ],
        )
        .map(drop)
}

/// Create `branch` starting at `start_point` and check it out.
pub fn checkout_new(shell: &Shell, branch: &str, start_point: &str) -> Result<(), ExecError> {
    shell
        .run("git", &["checkout", "-b", branch, start_point])
        .map(drop)
}

/// Push `branch` and set its upstream.
pub fn push_upstream(shell: &Shell, branch: &str) -> Result<(), ExecError> {
    shell.run("git", &["push", "-u", "origin", branch]).map(drop)
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|v| v == "true").unwrap_or(false)
}

fn env_value(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

/// `refs/heads/main` -> `main`; anything else passes through.
fn strip_ref(reference: &str) -> &str {
    reference.strip_prefix("refs/heads/").unwrap_or(reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ref_heads() {
        assert_eq!(strip_ref("refs/heads/main"), "main");
        assert_eq!(strip_ref("refs/heads/release/1.3"), "release/1.3");
    }

    #[test]
    fn test_strip_ref_passthrough() {
        assert_eq!(strip_ref("main"), "main");
        assert_eq!(strip_ref("refs/tags/1.0.0"), "refs/tags/1.0.0");
    }
}
