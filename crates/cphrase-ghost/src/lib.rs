//! cphrase Ghost Text
//!
//! Inline, cursor-anchored previews of phrase suggestions. Edits and cursor
//! moves are debounced into a single suggestion fetch; the user can cycle
//! through the results, accept one, or escalate it to a generative service
//! for a fuller expansion.
//!
//! [`GhostSession`] is the synchronous state machine. [`GhostDriver`] runs it
//! on a tokio task together with the debounce timer and the external
//! collaborators, and hands the host a [`GhostHandle`].
//!
//! # Example
//!
//! ```ignore
//! use cphrase_ghost::*;
//!
//! let handle = GhostDriver::spawn(config, source, service, sink);
//! handle.document_changed()?;
//! // ... after the debounce delay
//! let text = handle.accept().await?;
//! ```

pub mod driver;
pub mod error;
pub mod escalate;
pub mod ghost_text;
pub mod ghost_text_state;
pub mod logging;
pub mod scheduler;
pub mod session;
pub mod sink;

pub use driver::{GhostDriver, GhostEvent, GhostHandle};
pub use error::{GhostError, GhostResult};
pub use escalate::{
    build_prompt, generate_whole_document, request_generation, GenerativeService,
    WholeDocumentProposal,
};
pub use ghost_text::{decoration_for, DecorationSpec, FontStyle, GhostText};
pub use ghost_text_state::{GhostItem, GhostPhase, GhostTextState};
pub use scheduler::DebounceScheduler;
pub use session::{
    EscalationOutcome, EscalationRequest, FetchOutcome, FetchRequest, FetchTicket, GhostSession,
    GhostSnapshot, GhostStats, SnapshotItem,
};
pub use sink::{DecorationHandle, EditorSink, EditorSnapshot, NoticeLevel};
