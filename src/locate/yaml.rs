//! Key-path span location for YAML documents.
//!
//! Composes the document into a node graph from `yaml-rust2` parser events,
//! keeping the source marker of every scalar. Mapping nodes contribute
//! `key -> value` edges to the path, sequence nodes contribute positional
//! indices, scalar nodes are the leaves whose markers become spans. Aliases
//! are kept as placeholder nodes and never followed.

use std::collections::HashMap;

use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::{Marker, TScalarStyle};

use crate::locate::{LocateError, LocatedDocument, TargetPath};
use crate::span::Span;

/// One node of a composed YAML document.
///
/// A closed variant set walked with exhaustive matches; scalar leaves carry
/// the span of their source text when it could be pinned down exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Scalar(ScalarNode),
    Sequence(Vec<Node>),
    Mapping(Vec<(String, Node)>),
    /// Placeholder for an alias reference; target paths never traverse these.
    Alias,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarNode {
    pub value: String,
    /// Absent when the scalar's source rendering cannot be reproduced from
    /// the parsed value (escape sequences, block scalars): such a scalar is
    /// readable but not patchable.
    pub span: Option<Span>,
}

impl Node {
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Mapping(entries) => entries
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, node)| node),
            _ => None,
        }
    }

    pub fn at(&self, index: usize) -> Option<&Node> {
        match self {
            Node::Sequence(items) => items.get(index),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&ScalarNode> {
        match self {
            Node::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Children of a sequence node, empty for every other kind.
    pub fn items(&self) -> &[Node] {
        match self {
            Node::Sequence(items) => items,
            _ => &[],
        }
    }
}

/// Compose `text` into a node graph, or `None` for an empty document.
pub fn compose(text: &str) -> Result<Option<Node>, LocateError> {
    let mut composer = Composer::new(text);
    let mut parser = Parser::new(text.chars());
    parser
        .load(&mut composer, false)
        .map_err(|e| LocateError::MalformedYaml {
            message: e.to_string(),
        })?;
    Ok(composer.root)
}

/// Locate the scalar spans of `targets` in `text`.
///
/// Walks the composed graph depth-first in document order; the first scalar
/// reached by a target path wins. Scalars without a pinned span count as not
/// found.
pub fn locate(text: &str, targets: &[TargetPath]) -> Result<LocatedDocument, LocateError> {
    let mut spans = HashMap::new();
    if let Some(root) = compose(text)? {
        let mut pending: Vec<TargetPath> = targets.to_vec();
        let mut path: Vec<String> = Vec::new();
        walk(&root, &mut path, &mut pending, &mut spans);
    }
    Ok(LocatedDocument::new(text, spans))
}

fn walk(
    node: &Node,
    path: &mut Vec<String>,
    pending: &mut Vec<TargetPath>,
    spans: &mut HashMap<TargetPath, Span>,
) {
    if pending.is_empty() {
        return;
    }
    match node {
        Node::Scalar(scalar) => {
            let Some(index) = pending.iter().position(|t| t.segments() == path.as_slice()) else {
                return;
            };
            if let Some(span) = &scalar.span {
                let target = pending.swap_remove(index);
                spans.insert(target, span.clone());
            }
        }
        Node::Mapping(entries) => {
            for (key, value) in entries {
                path.push(key.clone());
                walk(value, path, pending, spans);
                path.pop();
            }
        }
        Node::Sequence(items) => {
            for (index, item) in items.iter().enumerate() {
                path.push(index.to_string());
                walk(item, path, pending, spans);
                path.pop();
            }
        }
        Node::Alias => {}
    }
}

/// Key slot of a mapping under construction.
enum KeySlot {
    /// A usable scalar key
    Scalar(String),
    /// A non-scalar key; the entry is dropped once its value completes
    Unsupported,
}

enum Frame {
    Sequence(Vec<Node>),
    Mapping {
        entries: Vec<(String, Node)>,
        key: Option<KeySlot>,
    },
}

/// Event receiver building the node graph while converting scalar markers
/// into byte spans against the original text.
struct Composer<'a> {
    text: &'a str,
    stack: Vec<Frame>,
    root: Option<Node>,
}

impl<'a> Composer<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            stack: Vec::new(),
            root: None,
        }
    }

    fn place(&mut self, node: Node) {
        match self.stack.last_mut() {
            None => {
                if self.root.is_none() {
                    self.root = Some(node);
                }
            }
            Some(Frame::Sequence(items)) => items.push(node),
            Some(Frame::Mapping { entries, key }) => match key.take() {
                None => {
                    // This node is the key of the next entry
                    *key = Some(match node {
                        Node::Scalar(scalar) => KeySlot::Scalar(scalar.value),
                        _ => KeySlot::Unsupported,
                    });
                }
                Some(KeySlot::Scalar(name)) => entries.push((name, node)),
                Some(KeySlot::Unsupported) => {}
            },
        }
    }

    fn scalar_span(&self, value: &str, style: TScalarStyle, mark: Marker) -> Option<Span> {
        let mut begin = byte_offset(self.text, mark.index())?;
        if matches!(style, TScalarStyle::SingleQuoted | TScalarStyle::DoubleQuoted) {
            // The marker sits on the opening quote; the value starts after it
            begin += 1;
        }
        let end = begin + value.len();
        let span = Span::new(begin, end, value);
        span.matches(self.text).then_some(span)
    }
}

impl MarkedEventReceiver for Composer<'_> {
    fn on_event(&mut self, event: Event, mark: Marker) {
        match event {
            Event::Scalar(value, style, _, _) => {
                let span = self.scalar_span(&value, style, mark);
                self.place(Node::Scalar(ScalarNode { value, span }));
            }
            Event::SequenceStart(_, _) => self.stack.push(Frame::Sequence(Vec::new())),
            Event::MappingStart(_, _) => self.stack.push(Frame::Mapping {
                entries: Vec::new(),
                key: None,
            }),
            Event::SequenceEnd => {
                if let Some(Frame::Sequence(items)) = self.stack.pop() {
                    self.place(Node::Sequence(items));
                }
            }
            Event::MappingEnd => {
                if let Some(Frame::Mapping { entries, .. }) = self.stack.pop() {
                    self.place(Node::Mapping(entries));
                }
            }
            Event::Alias(_) => self.place(Node::Alias),
            _ => {}
        }
    }
}

/// Byte offset of the character at `char_index`, or the document length when
/// the index points one past the final character. The scanner counts
/// characters, spans count bytes.
fn byte_offset(text: &str, char_index: usize) -> Option<usize> {
    if char_index == 0 {
        return Some(0);
    }
    let mut count = 0;
    for (byte, _) in text.char_indices() {
        if count == char_index {
            return Some(byte);
        }
        count += 1;
    }
    count += 1;
    (count > char_index).then_some(text.len())
}
