//! Tag-path span location for XML documents.
//!
//! Streams the document as start-tag/end-tag/character-data events with
//! `quick-xml`, maintaining the current element path as a stack. The reader
//! reports its byte position after every event, so the span of a text node is
//! `[position - raw_len, position)` with no re-serialization involved.

use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::locate::{LocateError, LocatedDocument, TargetPath};
use crate::span::Span;

/// Locate the character-data spans of `targets` in `text`.
///
/// Only the first character-data event under a matching path is captured;
/// later text under the same path (mixed content) is ignored. Scanning stops
/// as soon as every target has been found, so large unrelated subtrees after
/// the last target (dependency lists and the like) are never tokenized.
pub fn locate(text: &str, targets: &[TargetPath]) -> Result<LocatedDocument, LocateError> {
    let mut reader = Reader::from_str(text);
    let mut pending: Vec<TargetPath> = targets.to_vec();
    let mut spans = HashMap::new();
    let mut stack: Vec<String> = Vec::new();

    loop {
        if pending.is_empty() {
            break;
        }
        match reader.read_event() {
            Err(e) => {
                return Err(LocateError::MalformedXml {
                    message: e.to_string(),
                })
            }
            Ok(Event::Eof) => {
                if !stack.is_empty() {
                    return Err(LocateError::MalformedXml {
                        message: format!("unclosed element <{}>", stack.join("/")),
                    });
                }
                break;
            }
            Ok(Event::Start(start)) => {
                stack.push(String::from_utf8_lossy(start.local_name().as_ref()).into_owned());
            }
            Ok(Event::End(_)) => {
                // Balanced by the reader's end-name check
                stack.pop();
            }
            Ok(Event::Text(data)) => {
                let Some(index) = pending.iter().position(|t| t.segments() == stack) else {
                    continue;
                };
                let end = reader.buffer_position() as usize;
                let raw: &[u8] = &data;
                let begin = end - raw.len();
                let span = Span::new(begin, end, String::from_utf8_lossy(raw).into_owned());
                // The reader's position arithmetic and the document must
                // agree before anyone splices with this span.
                if span.matches(text) {
                    let target = pending.swap_remove(index);
                    spans.insert(target, span);
                }
            }
            Ok(_) => {}
        }
    }

    Ok(LocatedDocument::new(text, spans))
}
