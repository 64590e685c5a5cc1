/// Overlap removal between a generated body and the code already typed
///
/// The generator tends to echo the candidate label and sometimes the whole
/// program typed so far. Reconciliation strips that echo so only the novel
/// continuation is inserted, then cuts the result down to one statement.
///
/// Rules run in a fixed order and each one edits the output of the previous:
///
/// 1. **Sentinel marker**: the resolved prefix is exactly the object-scope
///    marker (optionally followed by `.`); strip it.
/// 2. **Label echo**: strip the candidate label and left-trim.
/// 3. **Full prefix**: strip the resolved prefix.
/// 4. **Line prefix**: only when rule 3 did not match, strip the line prefix.
///
/// Matching happens on [`normalize`]d text; operator spacing is restored with
/// [`respace_operators`] before truncating at the first `;`.
use crate::normalize::{normalize, respace_operators};
use crate::types::{CompletionError, CompletionResult, Prefixes};
use tracing::debug;

/// Which overlap rule edited the response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapRule {
    SentinelMarker,
    LabelEcho,
    FullPrefix,
    LinePrefix,
}

/// Reconciliation output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// Text ready to insert
    pub insert_text: String,
    /// Rules that matched, in the order they ran
    pub rules: Vec<OverlapRule>,
    /// Whether text after the first `;` was discarded
    pub truncated: bool,
}

impl Reconciled {
    /// True when no overlap rule matched and the response went through as-is
    pub fn is_unmodified(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Strip the first occurrence of `needle`; `None` when it does not occur
fn strip_first(haystack: &str, needle: &str) -> Option<String> {
    if needle.is_empty() || !haystack.contains(needle) {
        return None;
    }
    Some(haystack.replacen(needle, "", 1))
}

/// Cut after the first statement terminator, keeping the terminator
fn truncate_statement(text: &str) -> (&str, bool) {
    match text.find(';') {
        Some(idx) => {
            let end = idx + 1;
            (&text[..end], end < text.len())
        }
        None => (text, false),
    }
}

/// Overlap-removal engine
#[derive(Debug, Clone)]
pub struct Reconciler {
    sentinel_marker: String,
}

impl Reconciler {
    pub fn new(sentinel_marker: impl Into<String>) -> Self {
        Self {
            sentinel_marker: sentinel_marker.into(),
        }
    }

    fn is_sentinel(&self, normalized_resolved: &str) -> bool {
        if self.sentinel_marker.is_empty() {
            return false;
        }
        normalized_resolved == self.sentinel_marker
            || normalized_resolved
                .strip_suffix('.')
                .is_some_and(|rest| rest == self.sentinel_marker)
    }

    /// Reconcile one candidate's generated body against the typed prefixes.
    ///
    /// # Errors
    ///
    /// [`CompletionError::NoUsableResponse`] when `raw_response` is `None`.
    pub fn reconcile(
        &self,
        label: &str,
        raw_response: Option<&str>,
        prefixes: &Prefixes,
    ) -> CompletionResult<Reconciled> {
        let raw = raw_response.ok_or_else(|| CompletionError::NoUsableResponse {
            label: label.to_string(),
        })?;

        let resolved = normalize(&prefixes.resolved);
        let line = normalize(&prefixes.line);
        let mut text = normalize(raw);
        let mut rules = Vec::new();

        debug!(
            resolved = %resolved,
            line = %line,
            response = %text,
            "Reconciling candidate '{}'",
            label
        );

        if self.is_sentinel(&resolved) {
            if let Some(stripped) = strip_first(&text, &resolved) {
                text = stripped;
                rules.push(OverlapRule::SentinelMarker);
            }
        }

        if let Some(stripped) = strip_first(&text, &normalize(label)) {
            text = stripped.trim_start().to_string();
            rules.push(OverlapRule::LabelEcho);
        }

        if let Some(stripped) = strip_first(&text, &resolved) {
            text = stripped;
            rules.push(OverlapRule::FullPrefix);
        } else if let Some(stripped) = strip_first(&text, &line) {
            text = stripped;
            rules.push(OverlapRule::LinePrefix);
        }

        let spaced = respace_operators(&text);
        let (statement, truncated) = truncate_statement(&spaced);

        debug!(?rules, truncated, "Reconciled '{}' into '{}'", label, statement);

        Ok(Reconciled {
            insert_text: statement.to_string(),
            rules,
            truncated,
        })
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new("TextWindow")
    }
}
