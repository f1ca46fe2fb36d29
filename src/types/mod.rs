//! =============================================================================
//! Shared Types
//! =============================================================================
//!
//! Plain data shared by the formatting pipeline and its hosts (the language
//! server and the CLI).  Nothing in here knows about LSP framing; protocol
//! handlers convert into these shapes before calling into `usings`.

/// Diagnostic source tag the C# language service attaches to compiler findings.
pub const CSHARP_DIAGNOSTIC_SOURCE: &str = "csharp";

/// Compiler code for "Unnecessary using directive".
pub const UNNECESSARY_USING_CODE: &str = "CS8019";

/// Line terminator style of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }

    /// Picks the style of the first line break in `text`, falling back to LF.
    pub fn detect(text: &str) -> Self {
        match text.find('\n') {
            Some(idx) if idx > 0 && text.as_bytes()[idx - 1] == b'\r' => Self::CrLf,
            _ => Self::Lf,
        }
    }

    /// Parses CLI/settings spellings (`lf`, `crlf`, `\n`, `\r\n`).
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "\n" => return Some(Self::Lf),
            "\r\n" => return Some(Self::CrLf),
            _ => {}
        }
        match value.trim().to_ascii_lowercase().as_str() {
            "lf" | "unix" => Some(Self::Lf),
            "crlf" | "windows" => Some(Self::CrLf),
            _ => None,
        }
    }
}

/// A document snapshot handed to the pipeline.
#[derive(Debug, Clone, Copy)]
pub struct Document<'a> {
    /// Identity used to look up diagnostics (an LSP URI or a CLI path).
    pub uri: &'a str,
    pub text: &'a str,
    pub line_ending: LineEnding,
}

impl<'a> Document<'a> {
    pub fn new(uri: &'a str, text: &'a str, line_ending: LineEnding) -> Self {
        Self {
            uri,
            text,
            line_ending,
        }
    }

    pub fn eol(&self) -> &'static str {
        self.line_ending.as_str()
    }
}

/// Host-supplied static-analysis finding, reduced to what the unused filter reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRecord {
    pub source: String,
    pub code: String,
    /// Zero-based line of the diagnostic's start position.
    pub line: u32,
}

impl DiagnosticRecord {
    pub fn new(source: impl Into<String>, code: impl Into<String>, line: u32) -> Self {
        Self {
            source: source.into(),
            code: code.into(),
            line,
        }
    }

    /// Shorthand for the CS8019 record the C# service reports on a dead import.
    pub fn unnecessary_using(line: u32) -> Self {
        Self::new(CSHARP_DIAGNOSTIC_SOURCE, UNNECESSARY_USING_CODE, line)
    }

    pub fn is_unnecessary_using(&self) -> bool {
        self.source == CSHARP_DIAGNOSTIC_SOURCE && self.code == UNNECESSARY_USING_CODE
    }
}

/// Read accessor for the host's current diagnostics, keyed by document identity.
pub trait DiagnosticSource {
    fn diagnostics(&self, uri: &str) -> Vec<DiagnosticRecord>;
}

/// A plain snapshot ignores the identity: it already belongs to one document.
impl DiagnosticSource for [DiagnosticRecord] {
    fn diagnostics(&self, _uri: &str) -> Vec<DiagnosticRecord> {
        self.to_vec()
    }
}

impl DiagnosticSource for Vec<DiagnosticRecord> {
    fn diagnostics(&self, uri: &str) -> Vec<DiagnosticRecord> {
        self.as_slice().diagnostics(uri)
    }
}

/// Source used when unused-import removal has nothing to go on.
pub struct NoDiagnostics;

impl DiagnosticSource for NoDiagnostics {
    fn diagnostics(&self, _uri: &str) -> Vec<DiagnosticRecord> {
        Vec::new()
    }
}
