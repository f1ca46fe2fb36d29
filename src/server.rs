use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Context;
use lsp_server::{
    Connection, ErrorCode, Message, Notification as ServerNotification, Request, RequestId,
    Response,
};
use lsp_types::{
    ApplyWorkspaceEditParams, CodeActionKind, CodeActionOptions, CodeActionProviderCapability,
    ExecuteCommandOptions, InitializeParams, InitializeResult, MessageType, PositionEncodingKind,
    ServerCapabilities, ShowMessageParams, TextDocumentSyncCapability, TextDocumentSyncKind,
    TextDocumentSyncOptions,
    notification::{Notification as LspNotification, ShowMessage},
    request::{ApplyWorkspaceEdit, Request as LspRequest},
};
use serde_json::{self, Value};

use crate::config::Config;
use crate::protocol::workspace::execute_command::USER_COMMANDS;
use crate::protocol::{self, Effect};
use crate::session::Session;

/// Runs the LSP server over stdio. This is the entry-point an editor (or any
/// LSP client) will execute.
pub fn run_stdio_server() -> anyhow::Result<()> {
    env_logger::init();

    let (connection, io_threads) = Connection::stdio();
    let (init_id, init_params) = connection
        .initialize_start()
        .context("waiting for initialize")?;
    let params: InitializeParams =
        serde_json::from_value(init_params).context("invalid initialize params")?;

    let mut config = Config::default();
    if let Some(options) = &params.initialization_options {
        config.apply_workspace_settings(options);
    }
    log::info!("starting with {:?}", config.options());
    let session = Session::new(config);

    let capabilities = advertised_capabilities();
    let init_result = InitializeResult {
        server_info: Some(lsp_types::ServerInfo {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }),
        capabilities,
    };
    connection
        .initialize_finish(init_id, serde_json::to_value(init_result)?)
        .context("failed to send initialize result")?;

    main_loop(&connection, session)?;
    drop(connection);
    io_threads.join()?;

    Ok(())
}

pub fn advertised_capabilities() -> ServerCapabilities {
    let text_sync = TextDocumentSyncOptions {
        open_close: Some(true),
        change: Some(TextDocumentSyncKind::INCREMENTAL),
        will_save: Some(false),
        will_save_wait_until: Some(false),
        save: None,
    };
    let code_actions = CodeActionOptions {
        code_action_kinds: Some(vec![CodeActionKind::SOURCE_ORGANIZE_IMPORTS]),
        resolve_provider: Some(false),
        ..CodeActionOptions::default()
    };
    let commands = ExecuteCommandOptions {
        commands: USER_COMMANDS.iter().map(|cmd| cmd.to_string()).collect(),
        ..ExecuteCommandOptions::default()
    };
    ServerCapabilities {
        position_encoding: Some(PositionEncodingKind::UTF16),
        text_document_sync: Some(TextDocumentSyncCapability::Options(text_sync)),
        code_action_provider: Some(CodeActionProviderCapability::Options(code_actions)),
        execute_command_provider: Some(commands),
        ..Default::default()
    }
}

fn main_loop(connection: &Connection, mut session: Session) -> anyhow::Result<()> {
    for message in &connection.receiver {
        match message {
            Message::Request(req) => {
                if handle_request(connection, &mut session, req)? {
                    break;
                }
            }
            Message::Response(resp) => match resp.error {
                Some(err) => log::warn!("client rejected request {}: {}", resp.id, err.message),
                None => log::debug!("client answered {}: {:?}", resp.id, resp.result),
            },
            Message::Notification(notif) => {
                if notif.method == "exit" {
                    break;
                }
                match protocol::route_notification(&mut session, &notif.method, notif.params) {
                    Some(Ok(())) => {}
                    Some(Err(err)) => {
                        log::warn!("notification {} failed: {err:#}", notif.method);
                    }
                    None => log::debug!("notification {} ignored", notif.method),
                }
            }
        }
    }

    Ok(())
}

fn handle_request(
    connection: &Connection,
    session: &mut Session,
    req: Request,
) -> anyhow::Result<bool> {
    let lsp_server::Request { id, method, params } = req;

    if method == "shutdown" {
        let response = Response::new_ok(id, Value::Null);
        connection.sender.send(response.into())?;
        return Ok(true);
    }

    if method == "initialize" {
        // Already handled via initialize_start, but the client might resend; respond with error.
        let response = Response::new_err(
            id,
            ErrorCode::InvalidRequest as i32,
            "initialize already completed".to_string(),
        );
        connection.sender.send(response.into())?;
        return Ok(false);
    }

    let response = match protocol::route_request(session, &method, params) {
        Some(Ok(output)) => {
            for effect in output.effects {
                send_effect(connection, effect)?;
            }
            Response::new_ok(id, output.result)
        }
        Some(Err(err)) => {
            log::warn!("request {method} failed: {err:#}");
            Response::new_err(id, err.code() as i32, err.to_string())
        }
        None => Response::new_err(
            id,
            ErrorCode::MethodNotFound as i32,
            format!("method {method} is not supported"),
        ),
    };
    connection.sender.send(response.into())?;

    Ok(false)
}

fn send_effect(connection: &Connection, effect: Effect) -> anyhow::Result<()> {
    match effect {
        Effect::ApplyEdit { label, edit } => {
            let params = ApplyWorkspaceEditParams {
                label: Some(label),
                edit,
            };
            let request = Request::new(
                next_request_id(),
                ApplyWorkspaceEdit::METHOD.to_string(),
                params,
            );
            connection.sender.send(Message::Request(request))?;
        }
        Effect::ShowWarning(message) => {
            let params = ShowMessageParams {
                typ: MessageType::WARNING,
                message,
            };
            let notif = ServerNotification::new(ShowMessage::METHOD.to_string(), params);
            connection.sender.send(Message::Notification(notif))?;
        }
    }
    Ok(())
}

static SERVER_REQUEST_IDS: AtomicU64 = AtomicU64::new(1);

fn next_request_id() -> RequestId {
    let seq = SERVER_REQUEST_IDS.fetch_add(1, Ordering::Relaxed);
    RequestId::from(format!("csharp-format-usings-request-{seq}"))
}
