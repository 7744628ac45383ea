//! Relbump: release automation with surgical descriptor patching
//!
//! A release tool that bumps version numbers in structured project
//! descriptors — an XML project descriptor (`pom.xml`) and a YAML chart
//! descriptor (`Chart.yaml`) — and drives git, docker and helm around those
//! bumps.
//!
//! # Architecture
//!
//! Version rewrites compile down to a single primitive: a [`Span`] splice.
//! A streaming parse of the descriptor locates the exact byte span of the
//! version scalar ([`locate`]), the new value is computed by pure
//! semantic-version transformations ([`version`]), and [`span::splice`]
//! rewrites only those bytes. The document is never re-serialized, so
//! comments, key order and formatting survive every bump untouched.
//!
//! # Safety
//!
//! - A splice verifies the span's expected text before applying; a stale
//!   span is an error, never a silent corruption
//! - Descriptors re-read and re-locate before every write, so at most one
//!   patch is ever applied per location pass
//! - Atomic file writes (tempfile + fsync + rename)
//!
//! # Example
//!
//! ```no_run
//! use relbump::descriptor::MavenProject;
//! use relbump::version;
//!
//! let project = MavenProject::load("pom.xml")?;
//! let current = project.version()?;
//! let release = version::release_version(&current);
//! project.set_version(&release.to_string())?;
//! # Ok::<(), relbump::descriptor::DescriptorError>(())
//! ```

pub mod descriptor;
pub mod docker;
pub mod exec;
pub mod git;
pub mod helm;
pub mod locate;
pub mod span;
pub mod version;

// Re-exports
pub use descriptor::{DescriptorError, HelmChart, MavenProject, ProjectId};
pub use exec::{ExecError, Shell};
pub use locate::{LocateError, LocatedDocument, TargetPath};
pub use span::{splice, Span, SpanError};
pub use version::VersionError;
