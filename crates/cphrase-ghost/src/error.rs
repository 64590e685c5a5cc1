//! Error types for the ghost-text lifecycle

use cphrase_completion::CompletionError;

/// Result type for ghost-text operations
pub type GhostResult<T> = Result<T, GhostError>;

/// Errors surfaced by ghost-text commands
///
/// None of these are fatal; each one leaves the session in a usable state.
#[derive(Debug, thiserror::Error)]
pub enum GhostError {
    /// No open editor to act on
    #[error("No active editor found")]
    NoActiveTarget,

    /// A command ran while no ghost text was showing
    #[error("No ghost text to {0}")]
    NothingToAct(&'static str),

    /// The generative service produced no usable text
    #[error("Generative service unavailable: {0}")]
    GeneratorUnavailable(String),

    /// Completion pipeline error
    #[error(transparent)]
    Completion(#[from] CompletionError),

    /// The host editor rejected an edit
    #[error("Editor error: {0}")]
    Editor(String),

    /// The session's event loop is no longer running
    #[error("Ghost text session stopped")]
    Stopped,
}
