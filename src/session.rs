//! =============================================================================
//! Formatting Session
//! =============================================================================
//!
//! Per-server facade that owns configuration, open documents and the cached
//! diagnostics, and runs the using pipeline for one document at a time.

use anyhow::Result;
use lsp_types::{TextEdit, Uri};

use crate::config::Config;
use crate::documents::{DocumentError, DocumentStore};
use crate::protocol::diagnostics::DiagnosticsCache;
use crate::types::{DiagnosticRecord, Document};
use crate::usings;

#[derive(Default)]
pub struct Session {
    config: Config,
    documents: DocumentStore,
    diagnostics: DiagnosticsCache,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            documents: DocumentStore::default(),
            diagnostics: DiagnosticsCache::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    pub fn documents_mut(&mut self) -> &mut DocumentStore {
        &mut self.documents
    }

    pub fn diagnostics(&self) -> &DiagnosticsCache {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut DiagnosticsCache {
        &mut self.diagnostics
    }

    /// Formats the stored text of `uri` and returns the edit that applies the
    /// result, or `None` when the document is already formatted or has no
    /// using block.  `explicit` diagnostics take precedence over the cache.
    pub fn format_edit(
        &self,
        uri: &Uri,
        explicit: Option<&[DiagnosticRecord]>,
    ) -> Result<Option<TextEdit>> {
        let state = self
            .documents
            .get(uri.as_str())
            .ok_or_else(|| DocumentError::NotOpen(uri.to_string()))?;
        let options = self.config.snapshot();
        let document = Document::new(uri.as_str(), state.text(), state.line_ending());

        let formatted = match explicit {
            Some(records) => usings::process(&document, &options, records),
            None => usings::process(&document, &options, &self.diagnostics),
        };
        let Some(formatted) = formatted else {
            log::debug!("no using block in {}", uri.as_str());
            return Ok(None);
        };
        Ok(state.edit_to(&formatted))
    }
}
