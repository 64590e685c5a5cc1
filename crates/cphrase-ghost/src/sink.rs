//! Host editor boundary
//!
//! The session never touches an editor directly. It reads the document and
//! cursor, draws and removes inline decorations, inserts text, and shows
//! notices through [`EditorSink`].

use crate::ghost_text::{DecorationSpec, GhostText};
use serde::{Deserialize, Serialize};

/// Opaque handle to a decoration created by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecorationHandle(pub u64);

/// Severity of a user-visible notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Document text and cursor of the active editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSnapshot {
    pub document: String,
    /// Cursor as a character offset into `document`
    pub cursor: usize,
}

impl EditorSnapshot {
    pub fn new(document: impl Into<String>, cursor: usize) -> Self {
        Self {
            document: document.into(),
            cursor,
        }
    }
}

/// Operations the ghost-text session needs from the host editor
pub trait EditorSink: Send + Sync {
    /// Current document and cursor, or `None` when no editor is active
    fn snapshot(&self) -> Option<EditorSnapshot>;

    /// Draw an inline decoration and return its handle
    fn create_decoration(&self, ghost: &GhostText, spec: &DecorationSpec) -> DecorationHandle;

    /// Remove a decoration previously returned by [`EditorSink::create_decoration`]
    fn dispose_decoration(&self, handle: DecorationHandle);

    /// Insert `text` at a character offset
    fn insert_text(&self, offset: usize, text: &str) -> Result<(), String>;

    /// Show a one-line notice
    fn notify(&self, level: NoticeLevel, message: &str);
}
