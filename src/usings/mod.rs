//! =============================================================================
//! Using Block Pipeline
//! =============================================================================
//!
//! Locate → split → drop unnecessary → sort → group → pad, then optionally
//! relocate into the namespace.  Every stage is a pure function over the
//! document snapshot; hosts choose how to apply the resulting text.

pub mod entry;
pub mod groups;
pub mod locator;
pub mod namespace;
pub mod padding;
pub mod sort;
pub mod unused;

use std::ops::Range;

use crate::config::FormatOptions;
use crate::types::{DiagnosticSource, Document};

pub use entry::UsingEntry;
pub use locator::UsingBlock;

/// Replacement text for the located block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedBlock {
    /// Byte range of the original block in the document.
    pub range: Range<usize>,
    pub text: String,
    /// Directives left after unused removal.
    pub entries: usize,
}

/// Runs the block pipeline without touching the rest of the document.
/// Returns `None` when the document has no using block.
pub fn format_block<D>(
    document: &Document<'_>,
    options: &FormatOptions,
    diagnostics: &D,
) -> Option<FormattedBlock>
where
    D: DiagnosticSource + ?Sized,
{
    let eol = document.eol();
    let block = locator::locate(document.text, eol)?;
    let entry::SplitBlock { lines, mut entries } = entry::split_entries(&block, eol);

    if options.remove_unnecessary_usings {
        let records = diagnostics.diagnostics(document.uri);
        entries = unused::remove_unused(entries, &records, block.first_directive_line);
    }

    sort::sort_usings(&mut entries, &options.sort_order);

    let count = entries.len();
    let body = if options.split_groups {
        groups::split_groups(&entries)
    } else {
        entries.into_iter().map(UsingEntry::into_text).collect()
    };

    let has_leading_content = document.text[..block.first_directive]
        .chars()
        .any(|ch| !ch.is_whitespace());
    let mut padded = padding::pad_block(
        body,
        &lines,
        has_leading_content,
        options.num_empty_lines_before_usings,
        options.num_empty_lines_after_usings,
    );

    if let Some(indent) = entry::trailing_indent(&block, eol) {
        match padded.last_mut() {
            Some(last) => last.push_str(indent),
            None => padded.push(indent.to_string()),
        }
    }

    Some(FormattedBlock {
        range: block.range(),
        text: padded.join(eol),
        entries: count,
    })
}

/// Formats the whole document. Returns `None` when there is nothing to do.
pub fn process<D>(
    document: &Document<'_>,
    options: &FormatOptions,
    diagnostics: &D,
) -> Option<String>
where
    D: DiagnosticSource + ?Sized,
{
    let formatted = format_block(document, options, diagnostics)?;
    let text = document.text;
    let mut content = String::with_capacity(text.len() + formatted.text.len());
    content.push_str(&text[..formatted.range.start]);
    content.push_str(&formatted.text);
    content.push_str(&text[formatted.range.end..]);

    if options.usings_within_namespace && formatted.entries > 0 {
        let start = formatted.range.start;
        content = namespace::relocate_into_namespace(
            &content,
            start..start + formatted.text.len(),
            document.eol(),
        );
    }

    Some(content)
}
