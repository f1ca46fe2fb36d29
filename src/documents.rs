//! =============================================================================
//! Open Document Store
//! =============================================================================
//!
//! Tracks the latest text for each open buffer so the formatter can run on the
//! client's view of the file and hand back a minimal LSP edit instead of a
//! whole-document replacement.

use std::cmp;
use std::collections::HashMap;

use lsp_types::{Position, Range, TextDocumentContentChangeEvent, TextEdit, Uri};
use thiserror::Error;

use crate::types::LineEnding;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("document {0} is not open")]
    NotOpen(String),
    #[error("change {start}..{end} is outside a document of {len} bytes")]
    OutOfBounds { start: usize, end: usize, len: usize },
}

/// Captures the current snapshot for every open text document.
#[derive(Default)]
pub struct DocumentStore {
    docs: HashMap<String, DocumentState>,
}

impl DocumentStore {
    /// Inserts or replaces the document snapshot on textDocument/didOpen.
    pub fn open(&mut self, uri: &Uri, language_id: &str, text: &str, version: i32) {
        let state = DocumentState::new(language_id, text, version);
        self.docs.insert(uri.to_string(), state);
    }

    /// Applies full or incremental text changes in the order LSP specifies.
    pub fn apply_changes(
        &mut self,
        uri: &Uri,
        changes: &[TextDocumentContentChangeEvent],
        version: i32,
    ) -> Result<(), DocumentError> {
        let state = self
            .docs
            .get_mut(uri.as_str())
            .ok_or_else(|| DocumentError::NotOpen(uri.to_string()))?;
        for change in changes {
            state.apply_change(change)?;
        }
        state.version = version;
        Ok(())
    }

    /// Drops the cached snapshot as soon as the client closes the buffer.
    pub fn close(&mut self, uri: &Uri) {
        self.docs.remove(uri.as_str());
    }

    pub fn get(&self, uri: &str) -> Option<&DocumentState> {
        self.docs.get(uri)
    }
}

pub struct DocumentState {
    text: String,
    language_id: String,
    line_metrics: Vec<LineMetrics>,
    version: i32,
}

impl DocumentState {
    fn new(language_id: &str, text: &str, version: i32) -> Self {
        let mut state = Self {
            text: text.to_string(),
            language_id: language_id.to_string(),
            line_metrics: Vec::new(),
            version,
        };
        state.recompute_metrics();
        state
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn line_ending(&self) -> LineEnding {
        LineEnding::detect(&self.text)
    }

    /// Smallest single edit that turns the stored text into `new_text`, or
    /// `None` when they are identical.  Edit boundaries never split a
    /// character or a `\r\n` pair.
    pub fn edit_to(&self, new_text: &str) -> Option<TextEdit> {
        let old = self.text.as_str();
        if old == new_text {
            return None;
        }
        let (old_bytes, new_bytes) = (old.as_bytes(), new_text.as_bytes());

        let mut prefix = old_bytes
            .iter()
            .zip(new_bytes)
            .take_while(|(a, b)| a == b)
            .count();
        while prefix > 0
            && (!old.is_char_boundary(prefix)
                || !new_text.is_char_boundary(prefix)
                || old_bytes[prefix - 1] == b'\r')
        {
            prefix -= 1;
        }

        let max_suffix = cmp::min(old.len(), new_text.len()) - prefix;
        let mut suffix = old_bytes
            .iter()
            .rev()
            .zip(new_bytes.iter().rev())
            .take(max_suffix)
            .take_while(|(a, b)| a == b)
            .count();
        while suffix > 0
            && (!old.is_char_boundary(old.len() - suffix)
                || !new_text.is_char_boundary(new_text.len() - suffix)
                || splits_crlf(old_bytes, old.len() - suffix))
        {
            suffix -= 1;
        }

        let end = old.len() - suffix;
        Some(TextEdit {
            range: Range {
                start: self.position_at(prefix),
                end: self.position_at(end),
            },
            new_text: new_text[prefix..new_text.len() - suffix].to_string(),
        })
    }

    /// Converts a byte offset into an LSP position measured in UTF-16 units.
    pub fn position_at(&self, byte: usize) -> Position {
        let byte = cmp::min(byte, self.text.len());
        let line_idx = self
            .line_metrics
            .partition_point(|line| line.start_byte <= byte)
            .saturating_sub(1);
        let line = &self.line_metrics[line_idx];
        let within = cmp::min(byte - line.start_byte, line.content_bytes);
        let character = self.text[line.start_byte..line.start_byte + within]
            .encode_utf16()
            .count() as u32;
        Position {
            line: line_idx as u32,
            character,
        }
    }

    fn apply_change(
        &mut self,
        change: &TextDocumentContentChangeEvent,
    ) -> Result<(), DocumentError> {
        if let Some(range) = &change.range {
            let start = self.byte_index(&range.start);
            let end = self.byte_index(&range.end);
            if start > end || end > self.text.len() {
                return Err(DocumentError::OutOfBounds {
                    start,
                    end,
                    len: self.text.len(),
                });
            }
            self.text.replace_range(start..end, &change.text);
        } else {
            self.text = change.text.clone();
        }
        self.recompute_metrics();
        Ok(())
    }

    fn byte_index(&self, position: &Position) -> usize {
        let line_idx = self.clamp_line_idx(position.line);
        let line = &self.line_metrics[line_idx];
        let mut byte_index = line.start_byte;
        let mut remaining = cmp::min(position.character, line.content_utf16);
        let line_text = &self.text[line.start_byte..line.start_byte + line.content_bytes];
        for ch in line_text.chars() {
            if remaining == 0 {
                break;
            }
            let units = ch.len_utf16() as u32;
            if remaining < units {
                break;
            }
            remaining -= units;
            byte_index += ch.len_utf8();
        }
        byte_index
    }

    fn clamp_line_idx(&self, line: u32) -> usize {
        if self.line_metrics.is_empty() {
            return 0;
        }
        cmp::min(line as usize, self.line_metrics.len() - 1)
    }

    fn recompute_metrics(&mut self) {
        let mut metrics = Vec::new();
        let mut cursor = 0;
        let bytes = self.text.as_bytes();

        while cursor < bytes.len() {
            let line_start = cursor;
            while cursor < bytes.len() && bytes[cursor] != b'\n' && bytes[cursor] != b'\r' {
                cursor += 1;
            }
            let content_end = cursor;
            let content_utf16 = self.text[line_start..content_end].encode_utf16().count() as u32;

            if cursor < bytes.len() {
                if bytes[cursor] == b'\r' {
                    cursor += 1;
                    if cursor < bytes.len() && bytes[cursor] == b'\n' {
                        cursor += 1;
                    }
                } else {
                    cursor += 1;
                }
            }

            metrics.push(LineMetrics {
                start_byte: line_start,
                content_bytes: content_end - line_start,
                content_utf16,
            });
        }

        if metrics.is_empty() {
            metrics.push(LineMetrics::empty());
        } else if self.text.ends_with('\n') || self.text.ends_with('\r') {
            metrics.push(LineMetrics {
                start_byte: self.text.len(),
                content_bytes: 0,
                content_utf16: 0,
            });
        }

        self.line_metrics = metrics;
    }
}

fn splits_crlf(bytes: &[u8], at: usize) -> bool {
    at > 0 && at < bytes.len() && bytes[at - 1] == b'\r' && bytes[at] == b'\n'
}

#[derive(Debug, Clone)]
struct LineMetrics {
    start_byte: usize,
    content_bytes: usize,
    content_utf16: u32,
}

impl LineMetrics {
    fn empty() -> Self {
        Self {
            start_byte: 0,
            content_bytes: 0,
            content_utf16: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn uri() -> Uri {
        Uri::from_str("file:///workspace/App.cs").expect("uri")
    }

    fn pos(line: u32, character: u32) -> Position {
        Position { line, character }
    }

    fn store_with(text: &str) -> DocumentStore {
        let mut store = DocumentStore::default();
        store.open(&uri(), "csharp", text, 1);
        store
    }

    fn apply(old: &str, edit: &TextEdit) -> String {
        let state = DocumentState::new("csharp", old, 0);
        let start = state.byte_index(&edit.range.start);
        let end = state.byte_index(&edit.range.end);
        let mut text = old.to_string();
        text.replace_range(start..end, &edit.new_text);
        text
    }

    #[test]
    fn incremental_changes_update_text_and_version() {
        let mut store = store_with("using B;\nusing A;\n");
        let change = TextDocumentContentChangeEvent {
            range: Some(Range {
                start: pos(1, 6),
                end: pos(1, 7),
            }),
            range_length: None,
            text: "Z".to_string(),
        };
        store.apply_changes(&uri(), &[change], 2).expect("change applies");
        let doc = store.get(uri().as_str()).expect("open");
        assert_eq!(doc.text(), "using B;\nusing Z;\n");
        assert_eq!(doc.version(), 2);
    }

    #[test]
    fn changes_to_unknown_documents_fail() {
        let mut store = DocumentStore::default();
        let err = store.apply_changes(&uri(), &[], 1).expect_err("not open");
        assert!(matches!(err, DocumentError::NotOpen(_)));
    }

    #[test]
    fn position_at_counts_utf16_units() {
        let doc = DocumentState::new("csharp", "// é😀\nusing A;\n", 0);
        assert_eq!(doc.position_at(0), pos(0, 0));
        assert_eq!(doc.position_at("// é😀".len()), pos(0, 6));
        assert_eq!(doc.position_at("// é😀\n".len()), pos(1, 0));
        assert_eq!(doc.position_at(doc.text().len()), pos(2, 0));
    }

    #[test]
    fn edit_to_returns_minimal_range() {
        let old = "// h\nusing B;\nusing A;\nclass C {}\n";
        let new = "// h\nusing A;\nusing B;\n\nclass C {}\n";
        let doc = DocumentState::new("csharp", old, 0);
        let edit = doc.edit_to(new).expect("edit");
        assert_eq!(edit.range.start, pos(1, 6));
        assert_eq!(apply(old, &edit), new);
        assert!(doc.edit_to(old).is_none());
    }

    #[test]
    fn edit_to_keeps_crlf_pairs_together() {
        let old = "using A;\r\nclass C {}\r\n";
        let new = "using A;\r\n\r\nclass C {}\r\n";
        let doc = DocumentState::new("csharp", old, 0);
        let edit = doc.edit_to(new).expect("edit");
        assert_eq!(apply(old, &edit), new);
        assert!(!edit.new_text.starts_with('\n'));
    }
}
