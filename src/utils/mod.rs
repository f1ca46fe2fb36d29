//! =============================================================================
//! Utility Helpers
//! =============================================================================
//!
//! URI/path conversions and document classification shared by the protocol
//! handlers and the command-line formatter.

use std::path::Path;
use std::str::FromStr;

use lsp_types::Uri;
use url::Url;

pub const CSHARP_LANGUAGE_ID: &str = "csharp";
const CSHARP_EXTENSION: &str = "cs";

pub fn uri_to_file_path(uri: &str) -> Option<String> {
    let parsed = Url::parse(uri).ok()?;
    parsed
        .to_file_path()
        .ok()
        .map(|p| p.to_string_lossy().into_owned())
}

pub fn file_path_to_uri(path: &Path) -> Option<Uri> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().ok()?.join(path)
    };
    let url = Url::from_file_path(absolute).ok()?;
    Uri::from_str(url.as_str()).ok()
}

/// True for buffers the client tags as C#, or for `.cs` URIs when the client
/// sent a generic language id.
pub fn is_csharp_document(uri: &str, language_id: &str) -> bool {
    if language_id.eq_ignore_ascii_case(CSHARP_LANGUAGE_ID) {
        return true;
    }
    let path = Url::parse(uri)
        .map(|url| url.path().to_string())
        .unwrap_or_else(|_| uri.to_string());
    Path::new(&path)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(CSHARP_EXTENSION))
}

pub fn friendly_file_name(uri: &str) -> String {
    let path = uri_to_file_path(uri).unwrap_or_else(|| uri.to_string());
    Path::new(&path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(uri)
        .to_string()
}
