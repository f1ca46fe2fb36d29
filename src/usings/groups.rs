//! Blank separators between runs of the same root namespace.

use super::entry::UsingEntry;

/// Emits the entry texts with an empty line wherever the root token of two
/// neighbours differs.
pub fn split_groups(entries: &[UsingEntry]) -> Vec<String> {
    let mut lines = Vec::with_capacity(entries.len() * 2);
    let mut previous: Option<&str> = None;
    for entry in entries {
        let root = entry.root_namespace();
        if previous.is_some_and(|last| last != root) {
            lines.push(String::new());
        }
        lines.push(entry.text().to_string());
        previous = Some(root);
    }
    lines
}
