//! Removal of directives the C# service flagged as unnecessary (CS8019).

use std::collections::HashSet;

use super::entry::UsingEntry;
use crate::types::DiagnosticRecord;

/// Line offsets, relative to the first directive line, of every unnecessary
/// using reported in `records`.
pub fn unused_offsets(records: &[DiagnosticRecord], first_directive_line: usize) -> HashSet<i64> {
    records
        .iter()
        .filter(|record| record.is_unnecessary_using())
        .map(|record| i64::from(record.line) - first_directive_line as i64)
        .collect()
}

/// Returns `entries` without the ones sitting on a flagged line.
pub fn remove_unused(
    entries: Vec<UsingEntry>,
    records: &[DiagnosticRecord],
    first_directive_line: usize,
) -> Vec<UsingEntry> {
    let offsets = unused_offsets(records, first_directive_line);
    if offsets.is_empty() {
        return entries;
    }

    let before = entries.len();
    let kept: Vec<UsingEntry> = entries
        .into_iter()
        .filter(|entry| !offsets.contains(&(entry.line() as i64)))
        .collect();
    log::debug!("removed {} unnecessary using(s)", before - kept.len());
    kept
}
