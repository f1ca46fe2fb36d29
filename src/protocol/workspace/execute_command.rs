//! =============================================================================
//! workspace/executeCommand
//! =============================================================================
//!
//! Exposes the formatter as a user command so editors can bind it without a
//! code-action menu.  The edit is pushed to the client with
//! `workspace/applyEdit`; the command itself always answers `null`.
//!
//! Arguments: `[target, options?]` where `target` is a URI string, `{ uri }`
//! or `{ textDocument: { uri } }`, and either object may carry a
//! `diagnostics` array of LSP diagnostics that replaces the cached set.

use anyhow::Result;
use lsp_types::{Diagnostic, ExecuteCommandParams, TextDocumentIdentifier, Uri, WorkspaceEdit};
use serde_json::Value;
use thiserror::Error;

use crate::documents::DocumentError;
use crate::protocol::diagnostics::records_from_lsp;
use crate::protocol::text_document::code_action::{FORMAT_USINGS_TITLE, workspace_edit};
use crate::protocol::{Effect, HandlerOutput, HandlerResult, RequestError};
use crate::session::Session;
use crate::types::DiagnosticRecord;
use crate::utils::{friendly_file_name, is_csharp_document};

pub const FORMAT_USINGS_COMMAND: &str = "csharpFormatUsings.formatUsings";

pub const USER_COMMANDS: &[&str] = &[FORMAT_USINGS_COMMAND];

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0} expects a document URI as its first argument")]
    MissingTarget(&'static str),
    #[error("diagnostics argument is not a list of LSP diagnostics: {0}")]
    InvalidDiagnostics(#[source] serde_json::Error),
    #[error("{0} is not a C# document")]
    NotCsharp(String),
}

pub fn handle(session: &mut Session, params: ExecuteCommandParams) -> HandlerResult {
    if params.command != FORMAT_USINGS_COMMAND {
        return Err(RequestError::UnknownCommand(params.command));
    }

    match format_usings(session, &params.arguments) {
        Ok(Some(edit)) => Ok(HandlerOutput::reply(Value::Null).with_effect(Effect::ApplyEdit {
            label: FORMAT_USINGS_TITLE.to_string(),
            edit,
        })),
        Ok(None) => Ok(HandlerOutput::reply(Value::Null)),
        Err(err) => {
            log::warn!("{FORMAT_USINGS_COMMAND} failed: {err:#}");
            Ok(HandlerOutput::reply(Value::Null).with_effect(Effect::ShowWarning(format!(
                "{FORMAT_USINGS_TITLE} failed: {err:#}"
            ))))
        }
    }
}

fn format_usings(session: &mut Session, args: &[Value]) -> Result<Option<WorkspaceEdit>> {
    let uri = args
        .first()
        .and_then(extract_uri)
        .ok_or(CommandError::MissingTarget(FORMAT_USINGS_COMMAND))?;
    let explicit = parse_diagnostics(args)?;

    let state = session
        .documents()
        .get(uri.as_str())
        .ok_or_else(|| DocumentError::NotOpen(uri.to_string()))?;
    if !is_csharp_document(uri.as_str(), state.language_id()) {
        return Err(CommandError::NotCsharp(friendly_file_name(uri.as_str())).into());
    }

    if let Some(records) = &explicit {
        session.diagnostics_mut().update(uri.as_str(), records);
    }
    let edit = session.format_edit(&uri, explicit.as_deref())?;
    Ok(edit.map(|edit| workspace_edit(&uri, edit)))
}

fn extract_uri(value: &Value) -> Option<Uri> {
    if let Some(obj) = value.as_object() {
        if let Some(text_document) = obj.get("textDocument") {
            if let Ok(id) = serde_json::from_value::<TextDocumentIdentifier>(text_document.clone())
            {
                return Some(id.uri);
            }
        }
        if let Some(uri_value) = obj.get("uri").and_then(|v| v.as_str()) {
            return uri_value.parse().ok();
        }
    }
    if let Some(uri_str) = value.as_str() {
        return uri_str.parse().ok();
    }
    None
}

fn parse_diagnostics(args: &[Value]) -> Result<Option<Vec<DiagnosticRecord>>, CommandError> {
    let Some(value) = args.iter().find_map(|arg| arg.get("diagnostics")) else {
        return Ok(None);
    };
    let diagnostics: Vec<Diagnostic> =
        serde_json::from_value(value.clone()).map_err(CommandError::InvalidDiagnostics)?;
    Ok(Some(records_from_lsp(&diagnostics)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extract_uri_accepts_every_target_shape() {
        let expected = "file:///src/App.cs";
        for value in [
            json!(expected),
            json!({ "uri": expected }),
            json!({ "textDocument": { "uri": expected } }),
        ] {
            let uri = extract_uri(&value).expect("uri");
            assert_eq!(uri.as_str(), expected);
        }
        assert!(extract_uri(&json!(42)).is_none());
    }

    #[test]
    fn diagnostics_argument_is_optional_but_validated() {
        assert!(parse_diagnostics(&[json!("file:///a.cs")]).expect("ok").is_none());

        let args = [
            json!("file:///a.cs"),
            json!({ "diagnostics": [{
                "range": {
                    "start": { "line": 4, "character": 0 },
                    "end": { "line": 4, "character": 12 }
                },
                "source": "csharp",
                "code": "CS8019",
                "message": "Unnecessary using directive."
            }] }),
        ];
        let records = parse_diagnostics(&args).expect("ok").expect("present");
        assert_eq!(records, vec![DiagnosticRecord::unnecessary_using(4)]);

        let bad = [json!({ "uri": "file:///a.cs", "diagnostics": "nope" })];
        assert!(matches!(
            parse_diagnostics(&bad),
            Err(CommandError::InvalidDiagnostics(_))
        ));
    }

    #[test]
    fn unknown_commands_are_rejected() {
        let mut session = Session::default();
        let params = ExecuteCommandParams {
            command: "csharpFormatUsings.sortUsings".to_string(),
            arguments: Vec::new(),
            work_done_progress_params: Default::default(),
        };
        assert!(matches!(
            handle(&mut session, params),
            Err(RequestError::UnknownCommand(_))
        ));
    }

    #[test]
    fn missing_documents_surface_a_warning() {
        let mut session = Session::default();
        let params = ExecuteCommandParams {
            command: FORMAT_USINGS_COMMAND.to_string(),
            arguments: vec![json!("file:///closed.cs")],
            work_done_progress_params: Default::default(),
        };
        let output = handle(&mut session, params).expect("handled");
        assert_eq!(output.result, Value::Null);
        assert!(matches!(
            output.effects.as_slice(),
            [Effect::ShowWarning(message)] if message.contains("not open")
        ));
    }
}
