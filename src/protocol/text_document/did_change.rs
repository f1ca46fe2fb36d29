use anyhow::Result;
use lsp_types::DidChangeTextDocumentParams;

use crate::session::Session;

/// Applies the client's edits.  Cached diagnostics are dropped because their
/// line numbers no longer describe the new text.
pub fn handle(session: &mut Session, params: DidChangeTextDocumentParams) -> Result<()> {
    let uri = params.text_document.uri;
    session.documents_mut().apply_changes(
        &uri,
        &params.content_changes,
        params.text_document.version,
    )?;
    session.diagnostics_mut().clear(uri.as_str());
    Ok(())
}
