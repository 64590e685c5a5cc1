/// Spacing canonicalization used as the comparison key for overlap detection
///
/// [`normalize`] is only ever used for matching. [`respace_operators`] puts
/// readable spacing back before text reaches the editor.
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PARENS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*([()])\s*").expect("valid regex"));
static COMPARISON: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*([=<>])\s*").expect("valid regex"));
static OPERATOR_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*(->|[-+*/%&|^!]=|[=<>]+)\s*").expect("valid regex"));

/// Canonicalize punctuation spacing so fragments compare equal modulo spacing.
///
/// Whitespace around `(` and `)` is removed, then whitespace around `=`, `>`
/// and `<`, then the result is trimmed. Applying it twice changes nothing.
pub fn normalize(text: &str) -> String {
    let text = PARENS.replace_all(text, "$1");
    let text = COMPARISON.replace_all(&text, "$1");
    text.trim().to_string()
}

/// Put exactly one space on each side of `=`, `<` and `>` operators.
///
/// Runs such as `==`, `<=` and `<<` and compound assignments such as `+=` and
/// `!=` stay together as one operator. `->` is member access and is left bare.
pub fn respace_operators(text: &str) -> String {
    OPERATOR_RUN
        .replace_all(text, |caps: &Captures| {
            let op = &caps[1];
            if op == "->" {
                op.to_string()
            } else {
                format!(" {} ", op)
            }
        })
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_assignment_spacing() {
        assert_eq!(normalize("a = 10"), "a=10");
        assert_eq!(normalize("a=10"), "a=10");
        assert_eq!(normalize("a  =  10"), "a=10");
    }

    #[test]
    fn test_normalize_parens() {
        assert_eq!(normalize("printf ( \"hi\" ) ;"), "printf(\"hi\");");
        assert_eq!(normalize("if ( a < b )"), "if(a<b)");
    }

    #[test]
    fn test_normalize_trims() {
        assert_eq!(normalize("  x  "), "x");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "int x = ( a > b ) ;",
            "  TextWindow.Show ( )",
            "\tfor (i = 0; i < n; i++)\n",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn test_normalize_multiline() {
        assert_eq!(normalize("x =\n  1;"), "x=1;");
    }

    #[test]
    fn test_respace_single_operators() {
        assert_eq!(respace_operators("x=10;"), "x = 10;");
        assert_eq!(respace_operators("a<b"), "a < b");
        assert_eq!(respace_operators("a>b"), "a > b");
    }

    #[test]
    fn test_respace_keeps_runs_together() {
        assert_eq!(respace_operators("a==b"), "a == b");
        assert_eq!(respace_operators("a<=b"), "a <= b");
        assert_eq!(respace_operators("a!=b"), "a != b");
        assert_eq!(respace_operators("x+=1"), "x += 1");
        assert_eq!(respace_operators("x<<2"), "x << 2");
    }

    #[test]
    fn test_respace_leaves_member_access() {
        assert_eq!(respace_operators("p->next=0;"), "p->next = 0;");
    }

    #[test]
    fn test_respace_after_normalize_round_trip() {
        assert_eq!(respace_operators(&normalize("int x =   10;")), "int x = 10;");
    }

    #[test]
    fn test_respace_trims_edges() {
        assert_eq!(respace_operators("=10;"), "= 10;");
    }
}
