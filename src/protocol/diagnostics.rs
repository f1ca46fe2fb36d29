//! Converts client diagnostics into [`DiagnosticRecord`]s and keeps the last
//! unnecessary-using snapshot per document.
//!
//! The server never computes diagnostics itself; it only sees what the client
//! forwards in `codeAction` contexts or command arguments.  Cached records are
//! dropped whenever the document changes because their line numbers go stale.

use std::collections::HashMap;

use lsp_types::{Diagnostic, NumberOrString};

use crate::types::{DiagnosticRecord, DiagnosticSource};

pub fn record_from_lsp(diagnostic: &Diagnostic) -> DiagnosticRecord {
    let code = match &diagnostic.code {
        Some(NumberOrString::String(code)) => code.clone(),
        Some(NumberOrString::Number(code)) => code.to_string(),
        None => String::new(),
    };
    DiagnosticRecord {
        source: diagnostic.source.clone().unwrap_or_default(),
        code,
        line: diagnostic.range.start.line,
    }
}

pub fn records_from_lsp(diagnostics: &[Diagnostic]) -> Vec<DiagnosticRecord> {
    diagnostics.iter().map(record_from_lsp).collect()
}

/// Client diagnostics that mark an unnecessary using directive.
pub fn unnecessary_usings(diagnostics: &[Diagnostic]) -> Vec<Diagnostic> {
    diagnostics
        .iter()
        .filter(|diagnostic| record_from_lsp(diagnostic).is_unnecessary_using())
        .cloned()
        .collect()
}

#[derive(Debug, Default)]
pub struct DiagnosticsCache {
    latest: HashMap<String, Vec<DiagnosticRecord>>,
}

impl DiagnosticsCache {
    /// Remembers the unnecessary-using records of `records` for `uri`.  An
    /// update without any such record leaves the previous snapshot in place.
    pub fn update(&mut self, uri: &str, records: &[DiagnosticRecord]) {
        let unused: Vec<DiagnosticRecord> = records
            .iter()
            .filter(|record| record.is_unnecessary_using())
            .cloned()
            .collect();
        if unused.is_empty() {
            return;
        }
        log::trace!("caching {} unnecessary using(s) for {uri}", unused.len());
        self.latest.insert(uri.to_string(), unused);
    }

    pub fn clear(&mut self, uri: &str) {
        self.latest.remove(uri);
    }
}

impl DiagnosticSource for DiagnosticsCache {
    fn diagnostics(&self, uri: &str) -> Vec<DiagnosticRecord> {
        self.latest.get(uri).cloned().unwrap_or_default()
    }
}
