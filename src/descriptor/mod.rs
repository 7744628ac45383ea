//! Project and chart descriptors: the coupling between a file on disk and
//! the located spans of its identity and version values.
//!
//! A descriptor is created by loading and locating a file once. Writing a
//! new version never reuses the spans captured at load time: the file is
//! re-read and the version span re-located immediately before the splice, so
//! a descriptor stays safe to write through repeatedly even though each
//! write invalidates all earlier spans.

pub mod chart;
pub mod project;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::locate::LocateError;
use crate::span::SpanError;
use crate::version::VersionError;

pub use chart::HelmChart;
pub use project::{MavenProject, ProjectId};

#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("descriptor file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("{path} is not a {kind} descriptor: {reason}")]
    NotADescriptor {
        path: PathBuf,
        kind: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Malformed(#[from] LocateError),

    #[error(transparent)]
    Span(#[from] SpanError),

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read a descriptor file, mapping a missing file or a directory to
/// [`DescriptorError::FileNotFound`].
fn read_descriptor(path: &Path) -> Result<String, DescriptorError> {
    if !path.is_file() {
        return Err(DescriptorError::FileNotFound(path.to_path_buf()));
    }
    Ok(fs::read_to_string(path)?)
}

/// Atomic file write: tempfile in the same directory + fsync + rename.
///
/// Either the full new content lands or the file keeps its old content; a
/// partially written descriptor is never observable.
fn atomic_write(path: &Path, content: &str) -> Result<(), DescriptorError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content.as_bytes())?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| DescriptorError::Io(e.error))?;
    Ok(())
}
