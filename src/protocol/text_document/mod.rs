//! =============================================================================
//! textDocument/* Handlers
//! =============================================================================
//!
//! Buffer synchronisation plus the organize-imports code action.

pub mod code_action;
pub mod did_change;
pub mod did_close;
pub mod did_open;
