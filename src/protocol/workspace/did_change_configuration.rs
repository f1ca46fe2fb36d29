use lsp_types::DidChangeConfigurationParams;

use crate::session::Session;

pub fn handle(session: &mut Session, params: DidChangeConfigurationParams) {
    if session.config_mut().apply_workspace_settings(&params.settings) {
        log::info!("format options updated: {:?}", session.config().options());
    } else {
        log::debug!("didChangeConfiguration carried no format options");
    }
}
