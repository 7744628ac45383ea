//! The YAML chart descriptor (Helm `Chart.yaml`).

use std::path::{Path, PathBuf};

use semver::Version;

use crate::descriptor::{atomic_write, read_descriptor, DescriptorError};
use crate::locate::{yaml, TargetPath};
use crate::span::{splice, Span};
use crate::version;

const NAME: &str = "/name";
const VERSION: &str = "/version";

/// A loaded chart descriptor: the root mapping's `name` and `version`
/// scalars, located against the content seen at load time.
#[derive(Debug)]
pub struct HelmChart {
    file: PathBuf,
    pub name: Span,
    pub version: Span,
}

impl HelmChart {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DescriptorError> {
        let path = path.as_ref();
        let text = read_descriptor(path)?;

        let targets = [
            TargetPath::from_slash(NAME),
            TargetPath::from_slash(VERSION),
        ];
        let mut located = yaml::locate(&text, &targets)?;

        let mut take = |target: &TargetPath| {
            located
                .take(target)
                .ok_or_else(|| DescriptorError::NotADescriptor {
                    path: path.to_path_buf(),
                    kind: "helm chart",
                    reason: format!("no {target} entry"),
                })
        };

        Ok(Self {
            file: path.to_path_buf(),
            name: take(&targets[0])?,
            version: take(&targets[1])?,
        })
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn name(&self) -> &str {
        &self.name.value
    }

    /// The raw version text as written in the descriptor.
    pub fn version_value(&self) -> &str {
        &self.version.value
    }

    /// The descriptor version parsed as a semantic version.
    pub fn version(&self) -> Result<Version, DescriptorError> {
        Ok(version::parse(self.version_value())?)
    }

    /// Rewrite the chart version, re-reading and re-locating first; see
    /// [`crate::descriptor::project::MavenProject::set_version`].
    pub fn set_version(&self, new_version: &str) -> Result<(), DescriptorError> {
        let text = read_descriptor(&self.file)?;
        let target = TargetPath::from_slash(VERSION);
        let located = yaml::locate(&text, std::slice::from_ref(&target))?;
        let span = located
            .get(&target)
            .ok_or_else(|| DescriptorError::NotADescriptor {
                path: self.file.clone(),
                kind: "helm chart",
                reason: format!("no {target} entry"),
            })?;

        let patched = splice(&text, span, new_version)?;
        atomic_write(&self.file, &patched)
    }
}
