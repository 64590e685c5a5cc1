/// Ghost text state: the items on offer and which one is showing
use cphrase_completion::Candidate;
use serde::{Deserialize, Serialize};

/// Lifecycle phase of a ghost-text session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GhostPhase {
    /// Nothing scheduled, nothing showing
    #[default]
    Idle,
    /// Waiting for input to settle
    Debouncing,
    /// A suggestion request is in flight
    Fetching,
    /// The item at this index is displayed
    Showing(usize),
}

/// One item the user can cycle through
#[derive(Debug, Clone, PartialEq)]
pub enum GhostItem {
    /// Candidate from the suggestion source
    Candidate(Candidate),
    /// Code returned by the generative service
    Escalated(String),
}

impl GhostItem {
    /// Text previewed for this item
    pub fn text(&self) -> &str {
        match self {
            GhostItem::Candidate(candidate) => &candidate.key,
            GhostItem::Escalated(text) => text,
        }
    }

    /// Frequency score; escalated items count as 1
    pub fn value(&self) -> f64 {
        match self {
            GhostItem::Candidate(candidate) => candidate.value,
            GhostItem::Escalated(_) => 1.0,
        }
    }

    /// Sort key; escalated items sort first
    pub fn sort_text(&self) -> &str {
        match self {
            GhostItem::Candidate(candidate) => &candidate.sort_text,
            GhostItem::Escalated(_) => "0",
        }
    }
}

/// Items on offer and the one currently shown
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GhostTextState {
    items: Vec<GhostItem>,
    current_index: usize,
    active_text: Option<String>,
}

impl GhostTextState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the items and show the first one
    pub fn replace(&mut self, items: Vec<GhostItem>) {
        self.items = items;
        self.current_index = 0;
        self.refresh_active();
    }

    /// Advance to the next item, wrapping around; `None` when empty
    pub fn advance(&mut self) -> Option<usize> {
        if self.items.is_empty() {
            return None;
        }
        self.current_index = (self.current_index + 1) % self.items.len();
        self.refresh_active();
        Some(self.current_index)
    }

    /// Drop all items
    pub fn clear(&mut self) {
        self.items.clear();
        self.current_index = 0;
        self.active_text = None;
    }

    fn refresh_active(&mut self) {
        self.active_text = self
            .items
            .get(self.current_index)
            .map(|item| item.text().to_string())
            .filter(|text| !text.is_empty());
    }

    pub fn items(&self) -> &[GhostItem] {
        &self.items
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Text currently previewed, if any
    pub fn active_text(&self) -> Option<&str> {
        self.active_text.as_deref()
    }

    pub fn is_showing(&self) -> bool {
        self.active_text.is_some()
    }
}
