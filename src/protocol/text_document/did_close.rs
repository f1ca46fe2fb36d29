use lsp_types::DidCloseTextDocumentParams;

use crate::session::Session;

pub fn handle(session: &mut Session, params: DidCloseTextDocumentParams) {
    let uri = params.text_document.uri;
    session.documents_mut().close(&uri);
    session.diagnostics_mut().clear(uri.as_str());
}
