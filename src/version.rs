//! Semantic-version transformations for the release workflow.
//!
//! Thin layer over the `semver` crate: parsing with the offending text kept
//! in the error, and pure transformations that always return a fresh
//! [`Version`]. Ordering and syntax rules are SemVer 2.0 as implemented by
//! `semver`.

use semver::{BuildMetadata, Prerelease, Version};
use thiserror::Error;

/// Prerelease tag used for development versions between releases.
pub const SNAPSHOT: &str = "SNAPSHOT";

#[derive(Error, Debug)]
pub enum VersionError {
    #[error("'{value}' is not a valid semantic version: {source}")]
    InvalidVersion {
        value: String,
        source: semver::Error,
    },

    #[error("'{tag}' is not a valid prerelease tag: {source}")]
    InvalidPrerelease { tag: String, source: semver::Error },

    #[error("'{version}' cannot seed a patch branch: patch must be 0 and prerelease empty")]
    InvalidPatchBase { version: Version },
}

/// Parse `major.minor.patch[-prerelease][+build]`.
pub fn parse(value: &str) -> Result<Version, VersionError> {
    Version::parse(value).map_err(|source| VersionError::InvalidVersion {
        value: value.to_string(),
        source,
    })
}

/// The release form of a version: prerelease and build metadata dropped.
pub fn release_version(version: &Version) -> Version {
    Version::new(version.major, version.minor, version.patch)
}

/// Same triple, prerelease replaced by `tag`, build metadata dropped.
pub fn with_prerelease(version: &Version, tag: &str) -> Result<Version, VersionError> {
    let prerelease = Prerelease::new(tag).map_err(|source| VersionError::InvalidPrerelease {
        tag: tag.to_string(),
        source,
    })?;
    Ok(Version {
        major: version.major,
        minor: version.minor,
        patch: version.patch,
        pre: prerelease,
        build: BuildMetadata::EMPTY,
    })
}

/// Patch + 1, major/minor unchanged, prerelease set to `tag` if given.
pub fn bump_patch(version: &Version, tag: Option<&str>) -> Result<Version, VersionError> {
    let next = Version::new(version.major, version.minor, version.patch + 1);
    match tag {
        Some(tag) => with_prerelease(&next, tag),
        None => Ok(next),
    }
}

/// Minor + 1, patch reset to 0, prerelease set to `tag` if given.
pub fn bump_minor(version: &Version, tag: Option<&str>) -> Result<Version, VersionError> {
    let next = Version::new(version.major, version.minor + 1, 0);
    match tag {
        Some(tag) => with_prerelease(&next, tag),
        None => Ok(next),
    }
}

/// The development version following a release of `version`.
///
/// A `x.y.0` release opens a feature line, so the next development version
/// bumps minor; a `x.y.z` patch release (z > 0) stays on its line and bumps
/// patch. Either way the result carries the SNAPSHOT tag.
pub fn next_dev_version(version: &Version) -> Result<Version, VersionError> {
    if version.patch == 0 {
        bump_minor(version, Some(SNAPSHOT))
    } else {
        bump_patch(version, Some(SNAPSHOT))
    }
}

/// Validate `tag` as the base of a patch branch.
///
/// Only a finished `x.y.0` release qualifies: the version must equal its own
/// release form and have patch 0.
pub fn patch_base(tag: &Version) -> Result<(), VersionError> {
    if tag.patch != 0 || *tag != release_version(tag) {
        return Err(VersionError::InvalidPatchBase {
            version: tag.clone(),
        });
    }
    Ok(())
}

/// Branch label for the patch line of a release: `major.minor`.
pub fn patch_branch(version: &Version) -> String {
    format!("{}.{}", version.major, version.minor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        parse(s).unwrap()
    }

    #[test]
    fn test_parse_rejects_invalid() {
        for input in ["", "1", "1.2", "a.b.c", "1.2.3-", "1.2.3+ +"] {
            assert!(
                matches!(parse(input), Err(VersionError::InvalidVersion { .. })),
                "accepted {input:?}"
            );
        }
    }

    #[test]
    fn test_parse_round_trip() {
        for input in ["1.2.3", "0.1.0-SNAPSHOT", "2.0.0-rc.1+build.5"] {
            assert_eq!(v(input).to_string(), input);
        }
    }

    #[test]
    fn test_release_version_drops_suffixes() {
        assert_eq!(release_version(&v("1.2.0-SNAPSHOT")), v("1.2.0"));
        assert_eq!(release_version(&v("1.2.0")), v("1.2.0"));
        assert_eq!(release_version(&v("1.2.3-rc.1+abc")), v("1.2.3"));
    }

    #[test]
    fn test_release_of_feature_version_then_next_dev() {
        let version = v("1.2.0");
        assert_eq!(release_version(&version).to_string(), "1.2.0");
        assert_eq!(next_dev_version(&version).unwrap().to_string(), "1.3.0-SNAPSHOT");
    }

    #[test]
    fn test_next_dev_after_patch_release() {
        assert_eq!(next_dev_version(&v("1.2.3")).unwrap().to_string(), "1.2.4-SNAPSHOT");
    }

    #[test]
    fn test_with_prerelease_hash_tag() {
        let version = with_prerelease(&v("2.0.0"), "a1b2c3d").unwrap();
        assert_eq!(version.to_string(), "2.0.0-a1b2c3d");
    }

    #[test]
    fn test_with_prerelease_replaces_existing() {
        let version = with_prerelease(&v("1.0.0-SNAPSHOT"), "fe12ab3").unwrap();
        assert_eq!(version.to_string(), "1.0.0-fe12ab3");
    }

    #[test]
    fn test_with_prerelease_rejects_garbage() {
        let result = with_prerelease(&v("1.0.0"), "not valid!");
        assert!(matches!(result, Err(VersionError::InvalidPrerelease { .. })));
    }

    #[test]
    fn test_bump_minor_resets_patch() {
        assert_eq!(bump_minor(&v("1.2.3"), None).unwrap().to_string(), "1.3.0");
    }

    #[test]
    fn test_patch_base_rules() {
        assert!(patch_base(&v("1.3.0")).is_ok());
        assert!(matches!(
            patch_base(&v("1.3.1")),
            Err(VersionError::InvalidPatchBase { .. })
        ));
        assert!(matches!(
            patch_base(&v("1.3.0-SNAPSHOT")),
            Err(VersionError::InvalidPatchBase { .. })
        ));
    }

    #[test]
    fn test_patch_branch_label() {
        assert_eq!(patch_branch(&v("1.3.0")), "1.3");
    }

    #[test]
    fn test_prerelease_orders_below_release() {
        assert!(v("1.2.0-SNAPSHOT") < v("1.2.0"));
        assert!(v("1.2.0") < v("1.2.1-SNAPSHOT"));
    }
}
