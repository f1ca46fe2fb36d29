//! Using entries and the line splitter that produces them.

use once_cell::sync::Lazy;
use regex::Regex;

use super::locator::UsingBlock;

const KEYWORD: &str = "using";

static ROOT_NAMESPACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"using\s+([A-Za-z0-9_]+)").expect("root namespace pattern must compile")
});

/// One trimmed directive line, e.g. `using System.Text;`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsingEntry {
    text: String,
    /// Line offset from the first directive of the block.
    line: usize,
}

impl UsingEntry {
    pub fn new(text: impl Into<String>) -> Self {
        Self::at_line(text, 0)
    }

    pub fn at_line(text: impl Into<String>, line: usize) -> Self {
        Self {
            text: text.into(),
            line,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn root_namespace(&self) -> &str {
        root_namespace(&self.text)
    }
}

/// Drops leading whitespace and the trailing `;` (plus whitespace after it).
pub fn strip_terminator(text: &str) -> &str {
    let text = text.trim_start();
    match text.trim_end().strip_suffix(';') {
        Some(stripped) => stripped,
        None => text,
    }
}

/// Namespace path of a stripped directive: `using System.IO` -> `System.IO`.
pub fn namespace_path(stripped: &str) -> &str {
    match stripped.strip_prefix(KEYWORD) {
        Some(rest) if rest.starts_with(char::is_whitespace) => rest.trim_start(),
        _ => stripped,
    }
}

/// First word after the keyword; the whole text when it is not a directive.
pub fn root_namespace(text: &str) -> &str {
    ROOT_NAMESPACE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|root| root.as_str())
        .unwrap_or(text)
}

/// Result of splitting a located block.
#[derive(Debug, Clone, Default)]
pub struct SplitBlock {
    /// Every line of the block, trimmed, blanks included.
    pub lines: Vec<String>,
    /// Non-blank lines in input order.
    pub entries: Vec<UsingEntry>,
}

pub fn split_entries(block: &UsingBlock<'_>, eol: &str) -> SplitBlock {
    // Lines of the leading whitespace that sit before the first directive line.
    let lead = block.text[..block.leading_len()].matches(eol).count();
    let lines: Vec<String> = block
        .text
        .split(eol)
        .map(|line| line.trim().to_string())
        .collect();
    let entries = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| !line.is_empty())
        .map(|(idx, line)| UsingEntry::at_line(line.clone(), idx.saturating_sub(lead)))
        .collect();
    SplitBlock { lines, entries }
}

/// Indentation between the block's last line break and the code after it.
pub fn trailing_indent<'a>(block: &UsingBlock<'a>, eol: &str) -> Option<&'a str> {
    let (_, tail) = block.text.rsplit_once(eol)?;
    if !tail.is_empty() && tail.chars().all(|ch| ch == ' ' || ch == '\t') {
        Some(tail)
    } else {
        None
    }
}
