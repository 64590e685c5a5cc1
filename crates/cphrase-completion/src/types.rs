//! Core types shared by the completion pipeline
//!
//! Candidates arrive from the external suggestion source, get reconciled against
//! the text already typed, and leave as [`ReconciledSuggestion`]s.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result type for completion operations
pub type CompletionResult<T> = Result<T, CompletionError>;

/// Completion-specific error type
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// The suggestion source returned zero candidates
    #[error("Suggestion source returned no candidates")]
    EmptySuggestionResult,

    /// The insert-text generator had nothing for this candidate
    #[error("No usable response for candidate '{label}'")]
    NoUsableResponse { label: String },

    /// Cursor offset past the end of the document
    #[error("Cursor offset {offset} is out of range for a document of {len} characters")]
    OffsetOutOfRange { offset: usize, len: usize },

    /// Candidate payload did not have the expected shape
    #[error("Invalid candidate: {0}")]
    InvalidCandidate(String),

    /// Suggestion source failure
    #[error("Suggestion source error: {0}")]
    SourceError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// YAML (de)serialization error
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// A phrase candidate produced by the suggestion source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// The canonical phrase
    pub key: String,
    /// Frequency score, never negative
    pub value: f64,
    /// Sort key assigned by the source
    #[serde(rename = "sortText")]
    pub sort_text: String,
}

/// Wire shape of a candidate before validation
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCandidate {
    key: String,
    value: f64,
    #[serde(rename = "sortText", default)]
    sort_text: Option<String>,
}

impl Candidate {
    pub fn new(key: impl Into<String>, value: f64, sort_text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value,
            sort_text: sort_text.into(),
        }
    }

    /// Label shown for this candidate
    pub fn label(&self) -> &str {
        self.key.trim()
    }

    /// Validate one loosely typed candidate delivered by the source.
    ///
    /// `index` is the candidate's position in the delivered list; it seeds the
    /// sort key when the source did not send one.
    pub fn from_json(value: Value, index: usize) -> CompletionResult<Self> {
        let raw: RawCandidate = serde_json::from_value(value)
            .map_err(|e| CompletionError::InvalidCandidate(format!("#{}: {}", index, e)))?;

        if !raw.value.is_finite() || raw.value < 0.0 {
            return Err(CompletionError::InvalidCandidate(format!(
                "#{}: frequency must be a non-negative number, got {}",
                index, raw.value
            )));
        }

        Ok(Self {
            key: raw.key,
            value: raw.value,
            sort_text: raw.sort_text.unwrap_or_else(|| sort_key(index)),
        })
    }
}

/// Stable sort key for the candidate at `index`
pub fn sort_key(index: usize) -> String {
    format!("{:05}", index)
}

/// Validate a whole candidate list delivered by the source.
///
/// `null` counts as an empty delivery; anything other than an array is rejected.
pub fn parse_candidates(value: Value) -> CompletionResult<Vec<Candidate>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| Candidate::from_json(item, index))
            .collect(),
        other => Err(CompletionError::InvalidCandidate(format!(
            "expected a list of candidates, got {}",
            other
        ))),
    }
}

/// Cursor context sent to the suggestion source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// Document text before the cursor
    pub before_cursor: String,
    /// Document text after the cursor
    pub after_cursor: String,
    /// Document length followed by the length-tag marker
    pub length_tag: String,
}

/// The two prefixes reconciliation matches against
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prefixes {
    /// Whole document up to the cursor
    pub resolved: String,
    /// Current line up to the cursor
    pub line: String,
}

impl Prefixes {
    pub fn new(resolved: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            resolved: resolved.into(),
            line: line.into(),
        }
    }
}

/// A candidate turned into an editor-ready completion entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledSuggestion {
    /// Text shown in the completion list
    pub display_label: String,
    /// Text inserted on accept
    pub insert_text: String,
    /// Sort key copied from the candidate
    pub sort_text: String,
    /// Extra information shown next to the entry
    pub documentation: String,
    /// Text the host filters against; the line prefix so nothing gets filtered out
    pub filter_text: String,
}

/// Ghost text styling information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GhostTextStyle {
    /// Lighter color
    Faded,
    /// Italicized and greyed out
    #[default]
    Italic,
    /// Dimmed
    Dimmed,
}
