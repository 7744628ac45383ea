//! The XML project descriptor (Maven `pom.xml`).

use std::path::{Path, PathBuf};

use semver::Version;

use crate::descriptor::{atomic_write, read_descriptor, DescriptorError};
use crate::locate::{xml, TargetPath};
use crate::span::{splice, Span};
use crate::version;

const GROUP_ID: &str = "/project/groupId";
const ARTIFACT_ID: &str = "/project/artifactId";
const VERSION: &str = "/project/version";

/// The identity spans of a project descriptor, captured at load time.
#[derive(Debug, Clone)]
pub struct ProjectId {
    pub group_id: Span,
    pub artifact_id: Span,
    pub version: Span,
}

/// A loaded project descriptor.
///
/// The identity spans are valid for the file content seen at load time and
/// are used for reading; [`MavenProject::set_version`] re-locates against the
/// file's current content before patching.
#[derive(Debug)]
pub struct MavenProject {
    file: PathBuf,
    pub id: ProjectId,
}

impl MavenProject {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DescriptorError> {
        let path = path.as_ref();
        let text = read_descriptor(path)?;

        let targets = [
            TargetPath::from_slash(GROUP_ID),
            TargetPath::from_slash(ARTIFACT_ID),
            TargetPath::from_slash(VERSION),
        ];
        let mut located = xml::locate(&text, &targets)?;

        let mut take = |target: &TargetPath| {
            located
                .take(target)
                .ok_or_else(|| DescriptorError::NotADescriptor {
                    path: path.to_path_buf(),
                    kind: "maven project",
                    reason: format!("no {target} element"),
                })
        };

        Ok(Self {
            file: path.to_path_buf(),
            id: ProjectId {
                group_id: take(&targets[0])?,
                artifact_id: take(&targets[1])?,
                version: take(&targets[2])?,
            },
        })
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn group_id(&self) -> &str {
        &self.id.group_id.value
    }

    pub fn artifact_id(&self) -> &str {
        &self.id.artifact_id.value
    }

    /// The raw version text as written in the descriptor.
    pub fn version_value(&self) -> &str {
        &self.id.version.value
    }

    /// The descriptor version parsed as a semantic version.
    pub fn version(&self) -> Result<Version, DescriptorError> {
        Ok(version::parse(self.version_value())?)
    }

    /// Rewrite the project version to `new_version`, leaving every other
    /// byte of the file untouched.
    ///
    /// Re-reads the file and re-locates the version span first, so earlier
    /// writes through this descriptor (or anyone else's edits) cannot turn
    /// into a corrupting stale-span splice.
    pub fn set_version(&self, new_version: &str) -> Result<(), DescriptorError> {
        let text = read_descriptor(&self.file)?;
        let target = TargetPath::from_slash(VERSION);
        let located = xml::locate(&text, std::slice::from_ref(&target))?;
        let span = located
            .get(&target)
            .ok_or_else(|| DescriptorError::NotADescriptor {
                path: self.file.clone(),
                kind: "maven project",
                reason: format!("no {target} element"),
            })?;

        let patched = splice(&text, span, new_version)?;
        atomic_write(&self.file, &patched)
    }
}
