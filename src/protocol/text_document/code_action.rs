//! =============================================================================
//! textDocument/codeAction
//! =============================================================================
//!
//! Offers a single `source.organizeImports` action that rewrites the using
//! block of a C# buffer.  Diagnostics in the request context are remembered so
//! unnecessary directives reported by the C# extension are dropped as part of
//! the edit.

use std::collections::HashMap;

use anyhow::Context;
use lsp_types::{
    CodeAction, CodeActionKind, CodeActionOrCommand, CodeActionParams, CodeActionResponse,
    TextEdit, Uri, WorkspaceEdit,
};
use serde_json::Value;

use crate::protocol::diagnostics::{records_from_lsp, unnecessary_usings};
use crate::protocol::{Effect, HandlerOutput, HandlerResult};
use crate::session::Session;
use crate::utils::is_csharp_document;

pub const FORMAT_USINGS_TITLE: &str = "Format Usings";

pub fn handle(session: &mut Session, params: CodeActionParams) -> HandlerResult {
    let CodeActionParams {
        text_document,
        range: _,
        context,
        work_done_progress_params: _,
        partial_result_params: _,
    } = params;
    let uri = text_document.uri;
    let kind = CodeActionKind::SOURCE_ORGANIZE_IMPORTS;

    if !kind_requested(context.only.as_deref(), &kind) {
        return Ok(no_actions());
    }
    let is_csharp = match session.documents().get(uri.as_str()) {
        Some(state) => is_csharp_document(uri.as_str(), state.language_id()),
        None => {
            log::debug!("codeAction for unopened document {}", uri.as_str());
            return Ok(no_actions());
        }
    };
    if !is_csharp {
        return Ok(no_actions());
    }

    session
        .diagnostics_mut()
        .update(uri.as_str(), &records_from_lsp(&context.diagnostics));

    let edit = match session.format_edit(&uri, None) {
        Ok(Some(edit)) => edit,
        Ok(None) => return Ok(no_actions()),
        Err(err) => {
            log::warn!("format usings failed for {}: {err:#}", uri.as_str());
            return Ok(no_actions().with_effect(Effect::ShowWarning(format!(
                "{FORMAT_USINGS_TITLE} failed: {err:#}"
            ))));
        }
    };

    let fixed = unnecessary_usings(&context.diagnostics);
    let action = CodeAction {
        title: FORMAT_USINGS_TITLE.to_string(),
        kind: Some(kind),
        diagnostics: (!fixed.is_empty()).then_some(fixed),
        edit: Some(workspace_edit(&uri, edit)),
        ..CodeAction::default()
    };
    let response: CodeActionResponse = vec![CodeActionOrCommand::CodeAction(action)];
    let result = serde_json::to_value(response).context("failed to encode code actions")?;
    Ok(HandlerOutput::reply(result))
}

pub(crate) fn workspace_edit(uri: &Uri, edit: TextEdit) -> WorkspaceEdit {
    WorkspaceEdit {
        changes: Some(HashMap::from([(uri.clone(), vec![edit])])),
        ..WorkspaceEdit::default()
    }
}

/// Whether `ours` passes the client's `only` filter.  A requested kind also
/// admits its sub-kinds, so `source` covers `source.organizeImports`.
fn kind_requested(only: Option<&[CodeActionKind]>, ours: &CodeActionKind) -> bool {
    let Some(only) = only else {
        return true;
    };
    if only.is_empty() {
        return true;
    }
    only.iter().any(|kind| {
        let requested = kind.as_str();
        ours.as_str() == requested || ours.as_str().starts_with(&format!("{requested}."))
    })
}

fn no_actions() -> HandlerOutput {
    HandlerOutput::reply(Value::Array(Vec::new()))
}
