use similar::{ChangeTag, TextDiff};

/// Unified diff of `old` against `new` with three lines of context, headed
/// `a/<path>` and `b/<path>`.
pub fn unified_diff(path: &str, old: &str, new: &str) -> String {
    let diff = TextDiff::from_lines(old, new);
    diff.unified_diff()
        .context_radius(3)
        .header(&format!("a/{path}"), &format!("b/{path}"))
        .to_string()
}

/// Number of inserted and deleted lines between `old` and `new`.
pub fn line_changes(old: &str, new: &str) -> (usize, usize) {
    let diff = TextDiff::from_lines(old, new);
    diff.iter_all_changes()
        .fold((0, 0), |(inserted, deleted), change| match change.tag() {
            ChangeTag::Insert => (inserted + 1, deleted),
            ChangeTag::Delete => (inserted, deleted + 1),
            ChangeTag::Equal => (inserted, deleted),
        })
}
