//! Ordering of using entries.
//!
//! Entries are ranked first by the configured priority table and then by a
//! case-insensitive ordinal scan in which case only breaks ties.  The scan has
//! one unusual rule that callers rely on: while two strings are equal ignoring
//! case, the first position where exactly one side is not lowercase decides,
//! and the lowercase side sorts first (`system.A` < `System.A`).

use std::cmp::Ordering;

use super::entry::{UsingEntry, namespace_path, strip_terminator};

/// Stable sort; fully equal entries keep their input order.
pub fn sort_usings(entries: &mut [UsingEntry], priorities: &[String]) {
    entries.sort_by(|a, b| compare_usings(a.text(), b.text(), priorities));
}

pub fn compare_usings(a: &str, b: &str, priorities: &[String]) -> Ordering {
    let a = strip_terminator(a);
    let b = strip_terminator(b);

    if !priorities.is_empty() {
        let lhs = namespace_rank(namespace_path(a), priorities);
        let rhs = namespace_rank(namespace_path(b), priorities);
        // Higher rank sorts earlier.
        match rhs.cmp(&lhs) {
            Ordering::Equal => {}
            decided => return decided,
        }
    }

    compare_ordinal(a, b)
}

/// `priorities.len() - index` of the first entry that is a literal prefix of
/// `path`, or 0. Matching is not segment aware: `Sys` ranks `System.IO`.
pub fn namespace_rank(path: &str, priorities: &[String]) -> usize {
    priorities
        .iter()
        .position(|prefix| path.starts_with(prefix.as_str()))
        .map(|idx| priorities.len() - idx)
        .unwrap_or(0)
}

fn compare_ordinal(a: &str, b: &str) -> Ordering {
    let mut rhs_chars = b.chars();
    let mut tally: i32 = 0;

    for left in a.chars() {
        let Some(right) = rhs_chars.next() else {
            // `b` is a strict prefix of `a`.
            return Ordering::Greater;
        };

        let lhs = left.to_lowercase();
        let rhs = right.to_lowercase();
        match Iterator::cmp(lhs.clone(), rhs.clone()) {
            Ordering::Equal => {}
            decided => return decided,
        }

        if !Iterator::eq(lhs, std::iter::once(left)) {
            tally += 1;
        }
        if !Iterator::eq(rhs, std::iter::once(right)) {
            tally -= 1;
        }
        if tally != 0 {
            return tally.cmp(&0);
        }
    }

    if rhs_chars.next().is_some() {
        Ordering::Less
    } else {
        Ordering::Equal
    }
}
