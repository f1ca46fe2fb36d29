//! Moves the finished using block to just inside the first namespace.
//!
//! Only the first `namespace` keyword is considered.  A file-scoped
//! declaration (`namespace N;`) or a same-line brace gets the block on the
//! next line; a brace alone on the following line gets it after that brace.
//! Nested and multiple namespace declarations are not handled, and the moved
//! block is not re-indented.

use std::ops::Range;

use super::locator::find_namespace;

/// Returns `content` with the block at `block` spliced in after the namespace
/// declaration, or `content` unchanged when there is no namespace or the block
/// already follows it.
pub fn relocate_into_namespace(content: &str, block: Range<usize>, eol: &str) -> String {
    let finished = &content[block.clone()];
    let first_directive = block.start + (finished.len() - finished.trim_start().len());
    let Some(namespace) = find_namespace(content) else {
        return content.to_string();
    };
    if first_directive > namespace {
        return content.to_string();
    }

    let prefix = &content[..block.start];
    let suffix = &content[block.end..];
    let moved = finished.trim_start().trim_end_matches([' ', '\t']);
    let indent = &finished[finished.trim_end_matches([' ', '\t']).len()..];
    let joint = if prefix.is_empty() || prefix.ends_with(eol) || suffix.is_empty() {
        ""
    } else {
        eol
    };
    let remaining = format!("{prefix}{joint}{indent}{suffix}");

    let Some(namespace) = find_namespace(&remaining) else {
        return content.to_string();
    };
    let Some(line_end) = remaining[namespace..]
        .find(eol)
        .map(|rel| namespace + rel + eol.len())
    else {
        log::debug!("namespace declaration is the last line; appending usings");
        return format!("{remaining}{eol}{moved}");
    };

    let insert_at = brace_line_end(&remaining, namespace, line_end, eol).unwrap_or(line_end);
    format!(
        "{}{}{}",
        &remaining[..insert_at],
        moved,
        &remaining[insert_at..]
    )
}

/// End of the `{` line that opens a block-scoped namespace whose declaration
/// line carries no brace of its own.
fn brace_line_end(text: &str, namespace: usize, line_end: usize, eol: &str) -> Option<usize> {
    let declaration = &text[namespace..line_end - eol.len()];
    if declaration.contains('{') || declaration.trim_end().ends_with(';') {
        return None;
    }
    let rest = &text[line_end..];
    let next_len = rest.find(eol)?;
    (rest[..next_len].trim() == "{").then(|| line_end + next_len + eol.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relocate(content: &str, block: &str) -> String {
        let start = content.find(block).expect("block present");
        relocate_into_namespace(content, start..start + block.len(), "\n")
    }

    #[test]
    fn moves_block_after_allman_brace() {
        let content = "using A;\n\nnamespace N\n{\n    class C {}\n}\n";
        assert_eq!(
            relocate(content, "using A;\n\n"),
            "namespace N\n{\nusing A;\n\n    class C {}\n}\n"
        );
    }

    #[test]
    fn moves_block_after_same_line_brace_and_file_scoped_declarations() {
        let braced = "using A;\n\nnamespace N {\n}\n";
        assert_eq!(relocate(braced, "using A;\n\n"), "namespace N {\nusing A;\n\n}\n");

        let scoped = "using A;\n\nnamespace N;\nclass C {}\n";
        assert_eq!(
            relocate(scoped, "using A;\n\n"),
            "namespace N;\nusing A;\n\nclass C {}\n"
        );
    }

    #[test]
    fn keeps_header_line_break_when_removing_block() {
        let content = "// h\nusing A;\n\nnamespace N\n{\n}\n";
        assert_eq!(
            relocate(content, "\nusing A;\n\n"),
            "// h\nnamespace N\n{\nusing A;\n\n}\n"
        );
    }

    #[test]
    fn no_namespace_or_already_inside_is_a_no_op() {
        let plain = "using A;\n\nclass C {}\n";
        assert_eq!(relocate(plain, "using A;\n\n"), plain);

        let inside = "namespace N\n{\nusing A;\n\n}\n";
        assert_eq!(relocate(inside, "\nusing A;\n\n"), inside);
    }

    #[test]
    fn appends_when_namespace_is_the_last_line() {
        let content = "using A;\n\nnamespace N;";
        assert_eq!(relocate(content, "using A;\n\n"), "namespace N;\nusing A;\n\n");
    }

    #[test]
    fn namespace_in_comment_is_not_a_target() {
        let content = "// namespace Fake\nusing A;\n\nclass C {}\n";
        assert_eq!(relocate(content, "\nusing A;\n\n"), content);
    }
}
