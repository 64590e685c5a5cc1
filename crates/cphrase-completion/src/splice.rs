//! Splicing of resolved completion text into the current line
//!
//! The host replaces the word under the cursor with the insert text, so the
//! part of the line prefix that belongs to that word has to be carried over.

/// Part of the line prefix after its last `.`, trimmed; the whole prefix when
/// there is no `.`
fn after_last_dot(line_prefix: &str) -> &str {
    match line_prefix.rfind('.') {
        Some(idx) => line_prefix[idx + 1..].trim(),
        None => line_prefix,
    }
}

/// Insert text for an entry on the plain completion path.
///
/// When the line prefix ends in a space the generator body stands alone;
/// otherwise the word being typed (after the last `.`) is kept in front of it.
/// A missing body inserts nothing beyond that word.
pub fn plain_insert_text(line_prefix: &str, body: Option<&str>) -> String {
    let body = body.unwrap_or_default();

    let text = if line_prefix.ends_with(' ') {
        body.to_string()
    } else {
        format!("{}{}", after_last_dot(line_prefix), body)
    };

    text.trim().to_string()
}

/// Reduce the line prefix to the fragment a prompt-path entry continues from.
///
/// Takes the segment after the last `.`; drops everything when that segment
/// opens a call; keeps only the right-hand side of an assignment.
pub fn reduce_line_prefix(line_prefix: &str) -> String {
    let mut reduced = after_last_dot(line_prefix).to_string();

    if reduced.contains('(') {
        reduced.clear();
    }

    if reduced.contains('=') {
        reduced = reduced
            .split('=')
            .nth(1)
            .unwrap_or_default()
            .trim()
            .to_string();
    }

    reduced
}

/// Insert text for a resolved prompt-path entry whose display label is `label`
pub fn prompt_insert_text(line_prefix: &str, label: &str) -> String {
    let reduced = reduce_line_prefix(line_prefix);

    if reduced.ends_with(' ') {
        label.to_string()
    } else {
        format!("{}{}", reduced, label)
    }
}
