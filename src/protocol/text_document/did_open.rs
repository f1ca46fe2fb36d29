use lsp_types::DidOpenTextDocumentParams;

use crate::session::Session;

pub fn handle(session: &mut Session, params: DidOpenTextDocumentParams) {
    let item = params.text_document;
    log::trace!(
        "opened {} ({}, v{})",
        item.uri.as_str(),
        item.language_id,
        item.version
    );
    session
        .documents_mut()
        .open(&item.uri, &item.language_id, &item.text, item.version);
    session.diagnostics_mut().clear(item.uri.as_str());
}
