//! =============================================================================
//! Command-Line Formatter
//! =============================================================================
//!
//! `csharp-format-usings format` runs the same pipeline as the language server
//! on a file or stdin and writes the result to stdout.  Settings come from an
//! optional JSON file (same shape as `workspace/didChangeConfiguration`) and
//! are then overridden by individual flags.

use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::config::Config;
use crate::types::{DiagnosticRecord, Document, LineEnding};
use crate::usings;
use crate::utils::file_path_to_uri;

const STDIN_URI: &str = "stdin";

#[derive(Debug, Clone, Default)]
pub struct FormatCommand {
    /// File to format; stdin when absent.
    pub input: Option<PathBuf>,
    /// JSON settings file applied before the flag overrides.
    pub settings: Option<PathBuf>,
    /// Option overrides keyed like the workspace settings (`sortOrder`, ...).
    pub overrides: Map<String, Value>,
    /// Forces the line ending instead of detecting it from the input.
    pub line_ending: Option<LineEnding>,
    /// Zero-based lines reported as unnecessary usings.
    pub unused_lines: Vec<u32>,
}

impl FormatCommand {
    pub fn set_option(&mut self, key: &str, value: Value) {
        self.overrides.insert(key.to_string(), value);
    }

    /// Settings file first, flags second.
    pub fn config(&self) -> Result<Config> {
        let mut config = Config::default();
        if let Some(path) = &self.settings {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read settings {}", path.display()))?;
            let settings: Value = serde_json::from_str(&raw)
                .with_context(|| format!("invalid JSON in {}", path.display()))?;
            config.apply_workspace_settings(&settings);
        }
        if !self.overrides.is_empty() {
            config.apply_workspace_settings(&Value::Object(self.overrides.clone()));
        }
        Ok(config)
    }

    /// Formats `text`; input without a using block comes back unchanged.
    pub fn format_text(&self, text: &str) -> Result<String> {
        let config = self.config()?;
        let uri = self
            .input
            .as_deref()
            .and_then(file_path_to_uri)
            .map(|uri| uri.to_string())
            .unwrap_or_else(|| STDIN_URI.to_string());
        let line_ending = self
            .line_ending
            .unwrap_or_else(|| LineEnding::detect(text));
        let document = Document::new(&uri, text, line_ending);
        let diagnostics: Vec<DiagnosticRecord> = self
            .unused_lines
            .iter()
            .map(|line| DiagnosticRecord::unnecessary_using(*line))
            .collect();

        match usings::process(&document, config.options(), &diagnostics) {
            Some(formatted) => Ok(formatted),
            None => {
                log::debug!("no using block in {uri}");
                Ok(text.to_string())
            }
        }
    }
}

pub fn run_format(command: &FormatCommand) -> Result<()> {
    let text = match &command.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            buffer
        }
    };
    let formatted = command.format_text(&text)?;
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(formatted.as_bytes())
        .context("failed to write stdout")?;
    stdout.flush().context("failed to flush stdout")?;
    Ok(())
}
