/// Property-based tests for spacing normalization and reconciliation
///
/// Properties:
/// - normalizing twice equals normalizing once
/// - spacing around `=`, `<`, `>`, `(` and `)` never changes the normalized form
/// - a reconciled insertion holds at most one statement terminator
/// - selection is a prefix of the input, capped and in order

use cphrase_completion::{
    normalize, Candidate, CandidateSelector, Cap, PrefixSelector, Prefixes, Reconciler,
};
use proptest::prelude::*;

/// Strategy for C-ish fragments with arbitrary spacing
fn fragment_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_ ;=<>()\t\n.]{0,40}".prop_map(|s| s.to_string())
}

/// Strategy for a token sequence joined by operators
fn tokens_strategy() -> impl Strategy<Value = Vec<(String, char)>> {
    prop::collection::vec(
        (
            "[a-z][a-z0-9]{0,5}",
            prop_oneof![Just('='), Just('<'), Just('>'), Just('('), Just(')')],
        ),
        1..6,
    )
}

/// Strategy for runs of spaces
fn spacing_strategy() -> impl Strategy<Value = String> {
    "[ \t]{0,3}".prop_map(|s| s.to_string())
}

proptest! {
    /// Property: normalize is idempotent
    #[test]
    fn prop_normalize_idempotent(text in fragment_strategy()) {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once);
    }

    /// Property: spacing around normalized punctuation does not matter
    #[test]
    fn prop_normalize_spacing_congruence(
        tokens in tokens_strategy(),
        left in spacing_strategy(),
        right in spacing_strategy(),
    ) {
        let tight: String = tokens.iter().map(|(t, op)| format!("{}{}", t, op)).collect();
        let loose: String = tokens
            .iter()
            .map(|(t, op)| format!("{}{}{}{}", t, left, op, right))
            .collect();

        prop_assert_eq!(normalize(&tight), normalize(&loose));
    }

    /// Property: reconciliation never yields more than one statement
    #[test]
    fn prop_reconcile_single_statement(
        label in "[a-zA-Z.]{0,10}",
        raw in fragment_strategy(),
        resolved in fragment_strategy(),
        line in fragment_strategy(),
    ) {
        let reconciled = Reconciler::default()
            .reconcile(&label, Some(&raw), &Prefixes::new(resolved, line))
            .unwrap();

        prop_assert!(reconciled.insert_text.matches(';').count() <= 1);
        if reconciled.insert_text.contains(';') {
            prop_assert!(reconciled.insert_text.ends_with(';'));
        }
    }

    /// Property: a capped selection is the first min(cap, len) candidates
    #[test]
    fn prop_selector_is_capped_prefix(len in 0usize..20, cap in 1usize..8) {
        let candidates: Vec<Candidate> = (0..len)
            .map(|i| Candidate::new(format!("c{}", i), i as f64, i.to_string()))
            .collect();

        let selected = PrefixSelector::new().select(&candidates, Cap::Limited(cap));

        prop_assert_eq!(selected.len(), cap.min(len));
        for (i, candidate) in selected.iter().enumerate() {
            prop_assert_eq!(&candidate.key, &candidates[i].key);
        }

        let all = PrefixSelector::new().select(&candidates, Cap::Unbounded);
        prop_assert_eq!(all.len(), len);
    }
}

#[test]
fn test_spacing_examples_normalize_equal() {
    assert_eq!(normalize("a = 10"), normalize("a=10"));
    assert_eq!(normalize("a=10"), normalize("a  =  10"));
}

#[test]
fn test_resolved_prefix_removed_exactly_once() {
    let reconciled = Reconciler::default()
        .reconcile("value", Some("int x = 10;"), &Prefixes::new("int x = ", "int x = "))
        .unwrap();
    assert_eq!(reconciled.insert_text, "10;");
}
