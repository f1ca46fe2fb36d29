//! Finds the using block (and the first `namespace` keyword) in raw source.
//!
//! Both searches run a single regex whose leading alternatives match string,
//! char and comment literals.  A post-match guard then throws away every match
//! that starts with `"`, `'`, `//` or `/*`, so a directive-shaped snippet that
//! sits inside a literal is consumed as part of that literal and never reported.
//! The guard only classifies a match by its first characters; it is not a
//! lexer.  Multi-line verbatim (`@"..."`) and raw strings are matched as plain
//! single-line strings, so a directive on a later line of such a string is
//! still visible to the locator.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

const LITERAL_ALTERNATIVES: &str = r#""(?:[^"\\\n]|\\.)*"|'(?:[^'\\\n]|\\.)*'|//[^\n]*|/\*(?s:.*?)\*/"#;

/// One directive: `using` + whitespace + dotted path + `;`.
const DIRECTIVE: &str = r"\busing\s+[A-Za-z0-9_.]+;";

static BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"{LITERAL_ALTERNATIVES}|\s*(?:{DIRECTIVE}\s*)+"))
        .expect("using block pattern must compile")
});

static NAMESPACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"{LITERAL_ALTERNATIVES}|\bnamespace\b"))
        .expect("namespace pattern must compile")
});

/// The contiguous run of directives, including the whitespace around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsingBlock<'a> {
    /// Matched text: leading whitespace, directives and interior/trailing
    /// whitespace up to the next non-blank character.
    pub text: &'a str,
    /// Byte offset of `text` in the document.
    pub start: usize,
    /// Byte offset of the first `using` keyword.
    pub first_directive: usize,
    /// Zero-based line of the first `using` keyword.
    pub first_directive_line: usize,
}

impl UsingBlock<'_> {
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.text.len()
    }

    /// Length of the whitespace in front of the first directive.
    pub fn leading_len(&self) -> usize {
        self.first_directive - self.start
    }
}

fn is_literal(matched: &str) -> bool {
    matched.starts_with('"')
        || matched.starts_with('\'')
        || matched.starts_with("//")
        || matched.starts_with("/*")
}

fn first_code_match<'t>(pattern: &Regex, text: &'t str) -> Option<regex::Match<'t>> {
    pattern
        .find_iter(text)
        .find(|candidate| !is_literal(candidate.as_str()))
}

/// Locates the first using block outside of literals. Returns `None` when the
/// document has no directive at all.
pub fn locate<'a>(text: &'a str, eol: &str) -> Option<UsingBlock<'a>> {
    let matched = first_code_match(&BLOCK, text)?;
    let block = matched.as_str();
    let leading = block.len() - block.trim_start().len();
    let first_directive = matched.start() + leading;
    Some(UsingBlock {
        text: block,
        start: matched.start(),
        first_directive,
        first_directive_line: text[..first_directive].matches(eol).count(),
    })
}

/// Byte offset of the first `namespace` keyword outside of literals.
pub fn find_namespace(text: &str) -> Option<usize> {
    first_code_match(&NAMESPACE, text).map(|found| found.start())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locate_spans_blank_lines_and_trailing_whitespace() {
        let text = "// header\n\nusing B;\n\nusing A;\n\nnamespace X {}\n";
        let block = locate(text, "\n").expect("block");
        assert_eq!(block.text, "\n\nusing B;\n\nusing A;\n\n");
        assert_eq!(block.start, "// header".len());
        assert_eq!(&text[block.first_directive..block.first_directive + 5], "using");
        assert_eq!(block.first_directive_line, 2);
        assert_eq!(block.leading_len(), 2);
    }

    #[test]
    fn locate_skips_directives_inside_literals() {
        let text = concat!(
            "// using Commented;\n",
            "/* using Blocked;\n   using AlsoBlocked; */\n",
            "using Real;\n",
            "class C { string s = \"using Quoted;\"; }\n",
        );
        let block = locate(text, "\n").expect("block");
        assert_eq!(block.text.trim(), "using Real;");
        assert_eq!(block.first_directive_line, 3);
    }

    #[test]
    fn locate_returns_none_without_directives() {
        assert!(locate("namespace X { }", "\n").is_none());
        assert!(locate("var s = \"using A;\";", "\n").is_none());
        assert!(locate("// using A;", "\n").is_none());
    }

    #[test]
    fn locate_ignores_using_statements_and_identifier_suffixes() {
        let text = "class C { void M() { using var f = Open(); Xusing A; } }";
        assert!(locate(text, "\n").is_none());
    }

    #[test]
    fn locate_counts_crlf_lines() {
        let text = "// a\r\n// b\r\nusing A;\r\nusing B;\r\n";
        let block = locate(text, "\r\n").expect("block");
        assert_eq!(block.first_directive_line, 2);
        assert_eq!(block.range().end, text.len());
    }

    #[test]
    fn find_namespace_skips_comments() {
        let text = "// namespace Fake\nnamespace Real\n{\n}";
        assert_eq!(find_namespace(text), Some("// namespace Fake\n".len()));
        assert_eq!(find_namespace("class C {}"), None);
    }
}
