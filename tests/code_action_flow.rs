use lsp_types::{
    CodeActionOrCommand, CodeActionResponse, TextEdit,
    notification::{DidChangeConfiguration, DidChangeTextDocument, DidOpenTextDocument, Notification},
    request::{CodeActionRequest, ExecuteCommand, Request},
};
use serde_json::{Value, json};

use csharp_format_usings::protocol::{self, Effect};
use csharp_format_usings::session::Session;

const URI: &str = "file:///workspace/src/Program.cs";

fn open(session: &mut Session, text: &str) {
    protocol::route_notification(
        session,
        DidOpenTextDocument::METHOD,
        json!({
            "textDocument": {
                "uri": URI,
                "languageId": "csharp",
                "version": 1,
                "text": text
            }
        }),
    )
    .expect("didOpen routes")
    .expect("didOpen applies");
}

fn code_actions(session: &mut Session, diagnostics: Value, only: Value) -> CodeActionResponse {
    let output = protocol::route_request(
        session,
        CodeActionRequest::METHOD,
        json!({
            "textDocument": { "uri": URI },
            "range": {
                "start": { "line": 0, "character": 0 },
                "end": { "line": 0, "character": 0 }
            },
            "context": { "diagnostics": diagnostics, "only": only }
        }),
    )
    .expect("codeAction routes")
    .expect("codeAction succeeds");
    assert!(output.effects.is_empty());
    serde_json::from_value(output.result).expect("valid code action response")
}

fn single_edit(actions: &CodeActionResponse) -> TextEdit {
    let [CodeActionOrCommand::CodeAction(action)] = actions.as_slice() else {
        panic!("expected exactly one code action, got {actions:?}");
    };
    assert_eq!(action.title, "Format Usings");
    let changes = action
        .edit
        .as_ref()
        .and_then(|edit| edit.changes.as_ref())
        .expect("workspace edit changes");
    let (uri, edits) = changes.iter().next().expect("one document");
    assert_eq!(uri.as_str(), URI);
    assert_eq!(edits.len(), 1);
    edits[0].clone()
}

fn unused_at(line: u32) -> Value {
    json!({
        "range": {
            "start": { "line": line, "character": 0 },
            "end": { "line": line, "character": 20 }
        },
        "severity": 4,
        "code": "CS8019",
        "source": "csharp",
        "message": "Unnecessary using directive."
    })
}

#[test]
fn organize_imports_action_sorts_and_drops_unused() {
    let mut session = Session::default();
    open(
        &mut session,
        "using Newtonsoft.Json;\nusing System.IO;\nusing System;\n\nclass Program {}\n",
    );

    let actions = code_actions(
        &mut session,
        json!([unused_at(1)]),
        json!(["source.organizeImports"]),
    );
    let [CodeActionOrCommand::CodeAction(action)] = actions.as_slice() else {
        panic!("expected one action");
    };
    assert_eq!(action.diagnostics.as_ref().map(Vec::len), Some(1));

    let edit = single_edit(&actions);
    assert_eq!(edit.range.start.line, 0);
    assert_eq!(edit.new_text, "System;\n\nusing Newtonsoft.Json");
}

#[test]
fn other_kinds_and_formatted_buffers_produce_no_actions() {
    let mut session = Session::default();
    open(&mut session, "using System;\n\nclass Program {}\n");

    assert!(code_actions(&mut session, json!([]), json!(["quickfix"])).is_empty());
    assert!(code_actions(&mut session, json!([]), json!(["source"])).is_empty());
}

#[test]
fn configuration_changes_apply_to_the_next_action() {
    let mut session = Session::default();
    open(&mut session, "using B.Y;\nusing A.X;\nclass Program {}\n");

    protocol::route_notification(
        &mut session,
        DidChangeConfiguration::METHOD,
        json!({ "settings": { "csharpFormatUsings": { "splitGroups": false } } }),
    )
    .expect("routes")
    .expect("applies");
    assert!(!session.config().options().split_groups);

    let edit = single_edit(&code_actions(&mut session, json!([]), Value::Null));
    assert_eq!(edit.new_text, "A.X;\nusing B.Y;\n");
}

#[test]
fn execute_command_emits_apply_edit_and_honours_explicit_diagnostics() {
    let mut session = Session::default();
    open(&mut session, "using Zeta;\nusing Alpha;\nclass Program {}\n");

    let output = protocol::route_request(
        &mut session,
        ExecuteCommand::METHOD,
        json!({
            "command": "csharpFormatUsings.formatUsings",
            "arguments": [{ "textDocument": { "uri": URI } }, { "diagnostics": [unused_at(0)] }]
        }),
    )
    .expect("executeCommand routes")
    .expect("executeCommand succeeds");

    assert_eq!(output.result, Value::Null);
    let [Effect::ApplyEdit { label, edit }] = output.effects.as_slice() else {
        panic!("expected one applyEdit, got {:?}", output.effects);
    };
    assert_eq!(label, "Format Usings");
    let changes = edit.changes.as_ref().expect("changes");
    let edits = changes.values().next().expect("document edits");
    assert_eq!(edits[0].range.start.line, 0);
    assert_eq!(edits[0].new_text, "Alpha;\n");
}

#[test]
fn edits_track_incremental_changes() {
    let mut session = Session::default();
    open(&mut session, "using A;\nclass Program {}\n");

    protocol::route_notification(
        &mut session,
        DidChangeTextDocument::METHOD,
        json!({
            "textDocument": { "uri": URI, "version": 2 },
            "contentChanges": [{
                "range": {
                    "start": { "line": 0, "character": 0 },
                    "end": { "line": 0, "character": 0 }
                },
                "text": "using C;\n"
            }]
        }),
    )
    .expect("didChange routes")
    .expect("didChange applies");

    let state = session.documents().get(URI).expect("document open");
    assert_eq!(state.version(), 2);
    assert_eq!(state.text(), "using C;\nusing A;\nclass Program {}\n");

    let edit = single_edit(&code_actions(&mut session, json!([]), Value::Null));
    assert_eq!(edit.new_text, "A;\n\nusing C;\n");
}
