//! =============================================================================
//! Protocol Handlers
//! =============================================================================
//!
//! Every LSP method the server understands maps to a module inside this tree.
//! Handlers are synchronous: they read or update the [`Session`] and describe
//! what the server loop should send back, including follow-up messages such as
//! `workspace/applyEdit`, without touching the connection themselves.

pub mod diagnostics;
pub mod text_document;
pub mod workspace;

use lsp_server::ErrorCode;
use lsp_types::{
    WorkspaceEdit,
    notification::{
        DidChangeConfiguration, DidChangeTextDocument, DidCloseTextDocument, DidOpenTextDocument,
        Notification as LspNotification,
    },
    request::{CodeActionRequest, ExecuteCommand, Request as LspRequest},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::session::Session;

/// Message the server sends to the client after answering a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Ask the client to apply `edit` via `workspace/applyEdit`.
    ApplyEdit { label: String, edit: WorkspaceEdit },
    /// Surface a warning through `window/showMessage`.
    ShowWarning(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HandlerOutput {
    pub result: Value,
    pub effects: Vec<Effect>,
}

impl HandlerOutput {
    pub fn reply(result: Value) -> Self {
        Self {
            result,
            effects: Vec::new(),
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("invalid params for {method}: {source}")]
    InvalidParams {
        method: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown command {0}")]
    UnknownCommand(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl RequestError {
    pub fn code(&self) -> ErrorCode {
        match self {
            RequestError::InvalidParams { .. } | RequestError::UnknownCommand(_) => {
                ErrorCode::InvalidParams
            }
            RequestError::Internal(_) => ErrorCode::InternalError,
        }
    }
}

pub type HandlerResult = Result<HandlerOutput, RequestError>;

/// Dispatches a client request.  `None` means the method is not supported.
pub fn route_request(session: &mut Session, method: &str, params: Value) -> Option<HandlerResult> {
    let result = match method {
        CodeActionRequest::METHOD => parse_params(method, params)
            .and_then(|params| text_document::code_action::handle(session, params)),
        ExecuteCommand::METHOD => parse_params(method, params)
            .and_then(|params| workspace::execute_command::handle(session, params)),
        _ => return None,
    };
    Some(result)
}

/// Dispatches a client notification.  `None` means the method is ignored.
pub fn route_notification(
    session: &mut Session,
    method: &str,
    params: Value,
) -> Option<anyhow::Result<()>> {
    let result = match method {
        DidOpenTextDocument::METHOD => parse_params(method, params)
            .map(|params| text_document::did_open::handle(session, params))
            .map_err(anyhow::Error::from),
        DidChangeTextDocument::METHOD => parse_params(method, params)
            .map_err(anyhow::Error::from)
            .and_then(|params| text_document::did_change::handle(session, params)),
        DidCloseTextDocument::METHOD => parse_params(method, params)
            .map(|params| text_document::did_close::handle(session, params))
            .map_err(anyhow::Error::from),
        DidChangeConfiguration::METHOD => parse_params(method, params)
            .map(|params| workspace::did_change_configuration::handle(session, params))
            .map_err(anyhow::Error::from),
        _ => return None,
    };
    Some(result)
}

fn parse_params<P: DeserializeOwned>(method: &str, params: Value) -> Result<P, RequestError> {
    serde_json::from_value(params).map_err(|source| RequestError::InvalidParams {
        method: method.to_string(),
        source,
    })
}
