//! Blank-line padding around the rebuilt block.

/// Wraps `body` (sorted entries and group separators) in padding.
///
/// Leading blanks are only restored when the document has content before the
/// block: the first `min(before, lines.len() - 1) + 1` original trimmed
/// `lines` are scanned and the blank ones in front of the first directive are
/// kept.  The count is therefore capped by `before` but never exceeds what the
/// source already had.  Trailing padding is `after + 1` blank entries: the last one
/// is the line the following code starts on.  Nothing trails an empty `body`
/// (every using was removed), even when leading blanks were kept.
pub fn pad_block(
    body: Vec<String>,
    lines: &[String],
    has_leading_content: bool,
    before: usize,
    after: usize,
) -> Vec<String> {
    let leading = if has_leading_content && !lines.is_empty() {
        let upper = before.min(lines.len() - 1);
        lines[..=upper]
            .iter()
            .take_while(|line| line.is_empty())
            .count()
    } else {
        0
    };

    let trailing = if body.is_empty() {
        0
    } else {
        after.saturating_add(1)
    };
    let capacity = leading.saturating_add(body.len()).saturating_add(trailing);
    let mut padded = Vec::with_capacity(capacity);
    padded.extend(std::iter::repeat_n(String::new(), leading));
    padded.extend(body);
    padded.extend(std::iter::repeat_n(String::new(), trailing));
    padded
}
