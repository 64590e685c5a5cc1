//! External collaborators of the completion pipeline
//!
//! The suggestion source answers a cursor context with phrase candidates; the
//! insert-text generator turns a candidate label into a body of code. Both are
//! external services, so only their boundary lives here.
//!
//! Sources that answer through a registered callback rather than a return value
//! implement [`CallbackSuggestionSource`] and get wrapped in [`CallbackSource`].
//! The reply handle is consumed on delivery, so a source can answer at most once
//! per request, after any delay.

use crate::types::{parse_candidates, Candidate, CompletionError, CompletionResult, Context};
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Source of phrase candidates for a cursor context
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    /// Fetch candidates in the source's ranking order; empty when it has none
    async fn fetch_candidates(&self, context: &Context) -> CompletionResult<Vec<Candidate>>;
}

/// Generator of the code body for a candidate
#[async_trait]
pub trait InsertTextGenerator: Send + Sync {
    /// Body for `label` given `context`, or `None` when there is nothing usable
    async fn insert_text(&self, label: &str, context: &str) -> CompletionResult<Option<String>>;
}

/// One-shot reply slot handed to a callback-style source
#[derive(Debug)]
pub struct CandidateReply {
    tx: oneshot::Sender<CompletionResult<Vec<Candidate>>>,
}

impl CandidateReply {
    /// Deliver already validated candidates
    pub fn deliver(self, candidates: Vec<Candidate>) {
        if self.tx.send(Ok(candidates)).is_err() {
            debug!("Candidate reply dropped: requester is gone");
        }
    }

    /// Deliver a raw payload, validating it on the way in
    pub fn deliver_json(self, payload: Value) {
        let parsed = parse_candidates(payload);
        if let Err(e) = &parsed {
            warn!("Suggestion source sent an invalid payload: {}", e);
        }
        if self.tx.send(parsed).is_err() {
            debug!("Candidate reply dropped: requester is gone");
        }
    }

    /// Report a failure instead of candidates
    pub fn fail(self, message: impl Into<String>) {
        let _ = self.tx.send(Err(CompletionError::SourceError(message.into())));
    }
}

/// A suggestion source that answers through a callback
pub trait CallbackSuggestionSource: Send + Sync {
    /// Start a request; the answer goes to `reply` whenever it is ready
    fn request(&self, context: Context, reply: CandidateReply);
}

/// Adapts a [`CallbackSuggestionSource`] to [`SuggestionSource`]
pub struct CallbackSource<S> {
    inner: S,
}

impl<S> CallbackSource<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: CallbackSuggestionSource> SuggestionSource for CallbackSource<S> {
    async fn fetch_candidates(&self, context: &Context) -> CompletionResult<Vec<Candidate>> {
        let (tx, rx) = oneshot::channel();
        self.inner.request(context.clone(), CandidateReply { tx });

        rx.await.map_err(|_| {
            CompletionError::SourceError("suggestion source dropped the request".to_string())
        })?
    }
}
