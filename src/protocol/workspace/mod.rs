//! =============================================================================
//! workspace/* Handlers
//! =============================================================================

pub mod did_change_configuration;
pub mod execute_command;
