//! =============================================================================
//! Crate Entry Points
//! =============================================================================
//!
//! Formats the `using` directive block of C# sources.  The pipeline lives in
//! [`usings`] and is shared by two front ends: a stdio language server that
//! answers `source.organizeImports` code actions and a `format` subcommand
//! that rewrites a file or stdin.

pub mod cli;
pub mod config;
pub mod documents;
pub mod protocol;
pub mod server;
pub mod session;
pub mod types;
pub mod usings;
pub mod utils;

pub use cli::{FormatCommand, run_format};
pub use server::run_stdio_server;
