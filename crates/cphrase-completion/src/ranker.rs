/// Candidate selection and suggestion assembly
///
/// Sort order belongs to the suggestion source; selection only caps the list
/// and never reorders it.
use crate::types::{Candidate, ReconciledSuggestion};

/// How many candidates a completion path keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cap {
    /// Keep at most this many
    Limited(usize),
    /// Keep everything
    Unbounded,
}

impl Cap {
    /// Number of candidates kept out of `available`
    pub fn apply(self, available: usize) -> usize {
        match self {
            Cap::Limited(n) => n.min(available),
            Cap::Unbounded => available,
        }
    }
}

/// Candidate selector trait
///
/// Implementations pick which candidates go on to reconciliation. Callers only
/// reconcile what a selector returns, so discarded candidates never reach the
/// generator.
pub trait CandidateSelector: Send + Sync {
    /// Select candidates for a completion path
    fn select<'a>(&self, candidates: &'a [Candidate], cap: Cap) -> Vec<&'a Candidate>;
}

/// Keeps a strict prefix of the source's ranking
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixSelector;

impl PrefixSelector {
    pub fn new() -> Self {
        Self
    }
}

impl CandidateSelector for PrefixSelector {
    fn select<'a>(&self, candidates: &'a [Candidate], cap: Cap) -> Vec<&'a Candidate> {
        candidates.iter().take(cap.apply(candidates.len())).collect()
    }
}

/// Entry for the plain completion path; insert text is filled in on resolve
pub fn plain_suggestion(candidate: &Candidate, line_prefix: &str) -> ReconciledSuggestion {
    ReconciledSuggestion {
        display_label: candidate.label().to_string(),
        insert_text: String::new(),
        sort_text: candidate.sort_text.clone(),
        documentation: format!("Frequency : {}", candidate.value),
        filter_text: line_prefix.to_string(),
    }
}

/// Entry for the prompt completion path.
///
/// The reconciled text is both what the list shows and what gets inserted;
/// the documentation keeps the canonical phrase that produced it.
pub fn prompt_suggestion(
    candidate: &Candidate,
    insert_text: String,
    line_prefix: &str,
) -> ReconciledSuggestion {
    ReconciledSuggestion {
        display_label: insert_text.clone(),
        insert_text,
        sort_text: candidate.sort_text.clone(),
        documentation: candidate.label().to_string(),
        filter_text: line_prefix.to_string(),
    }
}
