//! Structural span location for descriptor documents.
//!
//! Both dialects share one contract: a single streaming pass over the raw
//! document text returns, for every requested [`TargetPath`] that exists, the
//! exact byte span of its scalar value. Nothing is re-serialized, so a later
//! splice of one span leaves comments, ordering and formatting untouched.

pub mod xml;
pub mod yaml;

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::span::Span;

#[derive(Error, Debug)]
pub enum LocateError {
    #[error("malformed XML document: {message}")]
    MalformedXml { message: String },

    #[error("malformed YAML document: {message}")]
    MalformedYaml { message: String },
}

/// An ordered sequence of structural keys identifying one scalar node from
/// the document root: element names for XML, mapping keys and sequence
/// indices for YAML.
///
/// Equality is structural (segment-sequence equality), not textual.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetPath(Vec<String>);

impl TargetPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Parse a `/`-separated path such as `/project/version`.
    pub fn from_slash(path: &str) -> Self {
        Self(
            path.split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for TargetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.0 {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

/// The result of one location pass: the text that was scanned and a span per
/// found target.
///
/// Every span was captured from exactly this text. A requested path with no
/// match is simply absent; callers decide whether absence is fatal. After any
/// splice of the text all spans here are stale and must be re-located.
#[derive(Debug)]
pub struct LocatedDocument {
    text: String,
    spans: HashMap<TargetPath, Span>,
}

impl LocatedDocument {
    pub(crate) fn new(text: &str, spans: HashMap<TargetPath, Span>) -> Self {
        Self {
            text: text.to_string(),
            spans,
        }
    }

    /// The raw text the spans were located against.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn get(&self, path: &TargetPath) -> Option<&Span> {
        self.spans.get(path)
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Remove and return the span for `path`.
    pub fn take(&mut self, path: &TargetPath) -> Option<Span> {
        self.spans.remove(path)
    }
}
