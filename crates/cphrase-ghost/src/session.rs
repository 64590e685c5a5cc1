//! Per-session ghost-text lifecycle
//!
//! [`GhostSession`] owns everything one editor session needs: the items on
//! offer, the single decoration handle, the request generation and the
//! single-slot fetch queue. It performs no I/O of its own. The caller feeds it
//! events and runs the fetches and generations it asks for, handing the
//! results back with the ticket or request it was given.
//!
//! Every edit or cursor move bumps the generation. A result whose generation no
//! longer matches is discarded, so a slow fetch can never overwrite a newer
//! state. At most one fetch is in flight; a timer firing meanwhile is parked in
//! a one-entry queue and started once the in-flight fetch resolves.

use crate::error::{GhostError, GhostResult};
use crate::escalate::{build_prompt, request_generation, GenerativeService};
use crate::ghost_text::{decoration_for, GhostText};
use crate::ghost_text_state::{GhostItem, GhostPhase, GhostTextState};
use crate::sink::{DecorationHandle, EditorSink, NoticeLevel};
use chrono::{DateTime, Utc};
use cphrase_completion::{
    extract_context, Candidate, CompletionConfig, CompletionError, CompletionResult, Context,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Identifies one issued suggestion fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    /// Cursor offset the fetch was issued at
    pub anchor: usize,
}

/// A fetch the caller should run against the suggestion source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub ticket: FetchTicket,
    pub context: Context,
}

/// What a resolved fetch did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Items are showing; the count is attached
    Shown(usize),
    /// The source had nothing
    Empty,
    /// The source failed
    Failed,
    /// The session moved on before the result arrived
    Stale,
}

/// A generation the caller should run against the generative service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscalationRequest {
    pub generation: u64,
    pub prompt: String,
}

/// What a finished escalation did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscalationOutcome {
    /// The generated text replaced the items
    Applied,
    /// The session moved on before the text arrived
    Stale,
}

/// Lifecycle counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GhostStats {
    /// Suggestion fetches issued
    pub fetches: u64,
    /// Results dropped because the session had moved on
    pub stale_discarded: u64,
    /// Timer fires that arrived while a fetch was in flight
    pub suppressed_fires: u64,
    pub last_fetch_at: Option<DateTime<Utc>>,
}

/// One item as published in a [`GhostSnapshot`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotItem {
    pub text: String,
    pub value: f64,
    pub sort_text: String,
    pub escalated: bool,
}

impl From<&GhostItem> for SnapshotItem {
    fn from(item: &GhostItem) -> Self {
        Self {
            text: item.text().to_string(),
            value: item.value(),
            sort_text: item.sort_text().to_string(),
            escalated: matches!(item, GhostItem::Escalated(_)),
        }
    }
}

/// Point-in-time view of a session
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GhostSnapshot {
    pub phase: GhostPhase,
    pub active_text: Option<String>,
    pub items: Vec<SnapshotItem>,
    pub stats: GhostStats,
}

impl GhostSnapshot {
    /// Texts of the items on offer, in order
    pub fn item_texts(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.text.as_str()).collect()
    }
}

/// Ghost-text state machine for one editor session
pub struct GhostSession {
    sink: Arc<dyn EditorSink>,
    config: CompletionConfig,
    state: GhostTextState,
    generation: u64,
    debouncing: bool,
    in_flight: Option<FetchTicket>,
    pending: Option<u64>,
    anchor: usize,
    decoration: Option<DecorationHandle>,
    stats: GhostStats,
}

impl GhostSession {
    pub fn new(sink: Arc<dyn EditorSink>, config: CompletionConfig) -> Self {
        Self {
            sink,
            config,
            state: GhostTextState::new(),
            generation: 0,
            debouncing: false,
            in_flight: None,
            pending: None,
            anchor: 0,
            decoration: None,
            stats: GhostStats::default(),
        }
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    /// Current request generation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The document changed. Returns the generation to schedule a timer for.
    pub fn on_document_changed(&mut self) -> u64 {
        self.restart_debounce()
    }

    /// The cursor moved. Returns the generation to schedule a timer for.
    pub fn on_cursor_moved(&mut self) -> u64 {
        self.restart_debounce()
    }

    fn restart_debounce(&mut self) -> u64 {
        self.hide();
        self.generation += 1;
        self.pending = None;
        self.debouncing = true;
        self.generation
    }

    /// The debounce timer for `generation` fired.
    ///
    /// Returns the fetch to run, or `None` when the fire is outdated, parked
    /// behind an in-flight fetch, or there is no editor to read from.
    pub fn on_timer_fired(&mut self, generation: u64) -> Option<FetchRequest> {
        if generation != self.generation {
            debug!("Ignoring timer for generation {} (now {})", generation, self.generation);
            return None;
        }
        self.debouncing = false;

        if let Some(in_flight) = self.in_flight {
            debug!(
                "Fetch for generation {} still in flight, parking generation {}",
                in_flight.generation, generation
            );
            self.stats.suppressed_fires += 1;
            self.pending = Some(generation);
            return None;
        }

        self.start_fetch(generation)
    }

    fn start_fetch(&mut self, generation: u64) -> Option<FetchRequest> {
        let snapshot = match self.sink.snapshot() {
            Some(snapshot) => snapshot,
            None => {
                debug!("No active editor, skipping fetch");
                return None;
            }
        };

        let context = match extract_context(
            &snapshot.document,
            snapshot.cursor,
            &self.config.length_tag_marker,
        ) {
            Ok(context) => context,
            Err(e) => {
                warn!("Cannot build suggestion context: {}", e);
                return None;
            }
        };

        let ticket = FetchTicket {
            generation,
            anchor: snapshot.cursor,
        };
        self.in_flight = Some(ticket);
        self.stats.fetches += 1;
        self.stats.last_fetch_at = Some(Utc::now());

        Some(FetchRequest { ticket, context })
    }

    /// A fetch issued with `ticket` came back
    pub fn on_fetch_resolved(
        &mut self,
        ticket: FetchTicket,
        result: CompletionResult<Vec<Candidate>>,
    ) -> FetchOutcome {
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
        }

        if ticket.generation != self.generation {
            debug!("Discarding result for generation {}", ticket.generation);
            self.stats.stale_discarded += 1;
            return FetchOutcome::Stale;
        }

        match result {
            Ok(candidates) if !candidates.is_empty() => {
                let count = candidates.len();
                self.anchor = ticket.anchor;
                self.state
                    .replace(candidates.into_iter().map(GhostItem::Candidate).collect());
                self.render();
                info!("Showing ghost text, {} items", count);
                FetchOutcome::Shown(count)
            }
            Ok(_) | Err(CompletionError::EmptySuggestionResult) => {
                self.hide();
                FetchOutcome::Empty
            }
            Err(e) => {
                warn!("Suggestion fetch failed: {}", e);
                self.hide();
                FetchOutcome::Failed
            }
        }
    }

    /// Start the parked fetch, if any, once nothing is in flight
    pub fn drain_pending(&mut self) -> Option<FetchRequest> {
        if self.in_flight.is_some() {
            return None;
        }
        let generation = self.pending.take()?;
        if generation != self.generation {
            return None;
        }
        self.start_fetch(generation)
    }

    /// Show the next item. No-op unless items are showing.
    pub fn cycle(&mut self) -> Option<usize> {
        match self.phase() {
            GhostPhase::Showing(_) => {
                let index = self.state.advance()?;
                self.render();
                Some(index)
            }
            GhostPhase::Idle => {
                self.sink.notify(NoticeLevel::Info, "No Ghost Text to cycle.");
                None
            }
            _ => None,
        }
    }

    /// Insert the active text at the cursor and return to idle
    pub fn accept(&mut self) -> GhostResult<String> {
        let snapshot = match self.sink.snapshot() {
            Some(snapshot) => snapshot,
            None => {
                self.sink.notify(NoticeLevel::Error, "No active editor found.");
                return Err(GhostError::NoActiveTarget);
            }
        };

        let text = match self.state.active_text() {
            Some(text) => text.to_string(),
            None => {
                self.sink.notify(NoticeLevel::Warning, "No Ghost Text to accept.");
                return Err(GhostError::NothingToAct("accept"));
            }
        };

        if let Err(e) = self.sink.insert_text(snapshot.cursor, &text) {
            self.sink.notify(NoticeLevel::Error, &format!("Failed to insert Ghost Text: {}", e));
            return Err(GhostError::Editor(e));
        }

        self.clear();
        self.sink.notify(NoticeLevel::Info, "Ghost Text inserted into editor.");
        Ok(text)
    }

    /// Prepare the prompt for escalating the active text
    pub fn begin_escalation(&mut self) -> GhostResult<EscalationRequest> {
        let text = match self.state.active_text() {
            Some(text) => text,
            None => {
                self.sink.notify(NoticeLevel::Warning, "No Ghost Text to escalate.");
                return Err(GhostError::NothingToAct("escalate"));
            }
        };

        Ok(EscalationRequest {
            generation: self.generation,
            prompt: build_prompt(&self.config.prompt_template, text),
        })
    }

    /// Apply the generated text of an escalation started with `request`.
    ///
    /// On failure the items stay as they were and the user gets a notice.
    pub fn finish_escalation(
        &mut self,
        request: EscalationRequest,
        result: GhostResult<String>,
    ) -> GhostResult<EscalationOutcome> {
        if request.generation != self.generation {
            debug!("Discarding escalation for generation {}", request.generation);
            self.stats.stale_discarded += 1;
            return Ok(EscalationOutcome::Stale);
        }

        match result {
            Ok(text) => {
                self.state
                    .replace(vec![GhostItem::Escalated(text.trim().to_string())]);
                self.render();
                Ok(EscalationOutcome::Applied)
            }
            Err(e) => {
                self.sink.notify(NoticeLevel::Warning, &format!("Failed to generate code: {}", e));
                Err(e)
            }
        }
    }

    /// Escalate the active text, waiting for the service in place
    pub async fn escalate(
        &mut self,
        service: &dyn GenerativeService,
    ) -> GhostResult<EscalationOutcome> {
        let request = self.begin_escalation()?;
        let result = request_generation(service, &request.prompt).await;
        self.finish_escalation(request, result)
    }

    /// Drop the ghost text and forget any outstanding work
    pub fn clear(&mut self) {
        self.hide();
        self.generation += 1;
        self.pending = None;
        self.debouncing = false;
    }

    fn hide(&mut self) {
        self.state.clear();
        self.render();
    }

    fn render(&mut self) {
        if let Some(handle) = self.decoration.take() {
            self.sink.dispose_decoration(handle);
        }

        if let Some(text) = self.state.active_text() {
            let ghost = GhostText::new(text.to_string(), self.anchor);
            debug!("Rendering {} line(s) of ghost text at {}", ghost.line_count(), ghost.anchor);
            let spec = decoration_for(&ghost, self.config.ghost_style);
            self.decoration = Some(self.sink.create_decoration(&ghost, &spec));
        }
    }

    pub fn phase(&self) -> GhostPhase {
        if !self.state.items().is_empty() {
            GhostPhase::Showing(self.state.current_index())
        } else if self.debouncing {
            GhostPhase::Debouncing
        } else if self.in_flight.is_some() || self.pending.is_some() {
            GhostPhase::Fetching
        } else {
            GhostPhase::Idle
        }
    }

    pub fn stats(&self) -> &GhostStats {
        &self.stats
    }

    pub fn state(&self) -> &GhostTextState {
        &self.state
    }

    pub fn snapshot(&self) -> GhostSnapshot {
        GhostSnapshot {
            phase: self.phase(),
            active_text: self.state.active_text().map(str::to_string),
            items: self.state.items().iter().map(SnapshotItem::from).collect(),
            stats: self.stats.clone(),
        }
    }

    /// Remove the decoration; the session is unusable for display afterwards
    pub fn dispose(&mut self) {
        self.clear();
    }
}

impl Drop for GhostSession {
    fn drop(&mut self) {
        if let Some(handle) = self.decoration.take() {
            self.sink.dispose_decoration(handle);
        }
    }
}
