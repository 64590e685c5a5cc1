// Cursor context extraction and offset conversion

use crate::types::{CompletionError, CompletionResult, Context, Prefixes};

/// Convert a character offset into a byte offset, `None` past the end
pub fn char_to_byte_offset(document: &str, offset: usize) -> Option<usize> {
    if offset == 0 {
        return Some(0);
    }

    match document.char_indices().nth(offset) {
        Some((byte, _)) => Some(byte),
        None if document.chars().count() == offset => Some(document.len()),
        None => None,
    }
}

fn split_at_cursor(document: &str, cursor: usize) -> CompletionResult<(&str, &str)> {
    let byte = char_to_byte_offset(document, cursor).ok_or_else(|| {
        CompletionError::OffsetOutOfRange {
            offset: cursor,
            len: document.chars().count(),
        }
    })?;
    Ok(document.split_at(byte))
}

/// Split the document at the cursor and tag it with its length.
///
/// `cursor` is a character offset. The length tag is the document's character
/// count, a space, and `marker`.
pub fn extract_context(document: &str, cursor: usize, marker: &str) -> CompletionResult<Context> {
    let (before, after) = split_at_cursor(document, cursor)?;

    Ok(Context {
        before_cursor: before.to_string(),
        after_cursor: after.to_string(),
        length_tag: format!("{} {}", document.chars().count(), marker),
    })
}

/// Text of the current line up to the cursor
pub fn line_prefix(document: &str, cursor: usize) -> CompletionResult<String> {
    let (before, _) = split_at_cursor(document, cursor)?;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    Ok(before[line_start..].to_string())
}

/// Both reconciliation prefixes at the cursor
pub fn prefixes_at(document: &str, cursor: usize) -> CompletionResult<Prefixes> {
    let (before, _) = split_at_cursor(document, cursor)?;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);

    Ok(Prefixes {
        resolved: before.to_string(),
        line: before[line_start..].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_context_splits_at_cursor() {
        let context = extract_context("int x = 10;", 8, "True").unwrap();
        assert_eq!(context.before_cursor, "int x = ");
        assert_eq!(context.after_cursor, "10;");
        assert_eq!(context.length_tag, "11 True");
    }

    #[test]
    fn test_extract_context_offset_zero() {
        let context = extract_context("abc", 0, "True").unwrap();
        assert_eq!(context.before_cursor, "");
        assert_eq!(context.after_cursor, "abc");
    }

    #[test]
    fn test_extract_context_offset_at_end() {
        let context = extract_context("abc", 3, "True").unwrap();
        assert_eq!(context.before_cursor, "abc");
        assert_eq!(context.after_cursor, "");
    }

    #[test]
    fn test_extract_context_empty_document() {
        let context = extract_context("", 0, "True").unwrap();
        assert_eq!(context.before_cursor, "");
        assert_eq!(context.after_cursor, "");
        assert_eq!(context.length_tag, "0 True");
    }

    #[test]
    fn test_extract_context_counts_characters_not_bytes() {
        let context = extract_context("é = 1;", 1, "True").unwrap();
        assert_eq!(context.before_cursor, "é");
        assert_eq!(context.length_tag, "6 True");
    }

    #[test]
    fn test_extract_context_out_of_range() {
        let result = extract_context("abc", 4, "True");
        assert!(matches!(
            result,
            Err(CompletionError::OffsetOutOfRange { offset: 4, len: 3 })
        ));
    }

    #[test]
    fn test_line_prefix() {
        let doc = "int main() {\n    int x = 1";
        assert_eq!(line_prefix(doc, doc.chars().count()).unwrap(), "    int x = 1");
        assert_eq!(line_prefix(doc, 3).unwrap(), "int");
        assert_eq!(line_prefix(doc, 13).unwrap(), "");
    }

    #[test]
    fn test_prefixes_at() {
        let doc = "a;\nb = ";
        let prefixes = prefixes_at(doc, 7).unwrap();
        assert_eq!(prefixes.resolved, "a;\nb = ");
        assert_eq!(prefixes.line, "b = ");
    }
}
