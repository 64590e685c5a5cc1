//! Async driver for a ghost-text session
//!
//! One tokio task owns the [`GhostSession`] and the [`DebounceScheduler`] and
//! handles every [`GhostEvent`] in arrival order. Suggestion fetches and
//! generations run in their own tasks and report back through the same
//! channel, so the loop never waits on a collaborator. The host talks to the
//! loop through a [`GhostHandle`] and can watch [`GhostSnapshot`]s as they
//! change.

use crate::error::{GhostError, GhostResult};
use crate::escalate::{request_generation, GenerativeService};
use crate::scheduler::DebounceScheduler;
use crate::session::{
    EscalationOutcome, EscalationRequest, FetchRequest, FetchTicket, GhostSession, GhostSnapshot,
};
use crate::sink::EditorSink;
use cphrase_completion::{Candidate, CompletionConfig, CompletionResult, SuggestionSource};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, info};

/// Events handled by the driver loop
pub enum GhostEvent {
    DocumentChanged,
    CursorMoved,
    TimerFired(u64),
    FetchResolved(FetchTicket, CompletionResult<Vec<Candidate>>),
    Cycle(oneshot::Sender<Option<usize>>),
    Accept(oneshot::Sender<GhostResult<String>>),
    Escalate(oneshot::Sender<GhostResult<EscalationOutcome>>),
    EscalationResolved(
        EscalationRequest,
        GhostResult<String>,
        oneshot::Sender<GhostResult<EscalationOutcome>>,
    ),
    Shutdown,
}

/// Event loop wiring a session to its collaborators
pub struct GhostDriver {
    session: GhostSession,
    scheduler: DebounceScheduler,
    source: Arc<dyn SuggestionSource>,
    service: Arc<dyn GenerativeService>,
    events_tx: mpsc::UnboundedSender<GhostEvent>,
    events_rx: mpsc::UnboundedReceiver<GhostEvent>,
    snapshots: watch::Sender<GhostSnapshot>,
    cancel: CancellationToken,
}

impl GhostDriver {
    /// Start a driver on the current tokio runtime
    pub fn spawn(
        config: CompletionConfig,
        source: Arc<dyn SuggestionSource>,
        service: Arc<dyn GenerativeService>,
        sink: Arc<dyn EditorSink>,
    ) -> GhostHandle {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (snapshots, snapshot_rx) = watch::channel(GhostSnapshot::default());
        let cancel = CancellationToken::new();

        let driver = Self {
            scheduler: DebounceScheduler::new(config.debounce(), events_tx.clone()),
            session: GhostSession::new(sink, config),
            source,
            service,
            events_tx: events_tx.clone(),
            events_rx,
            snapshots,
            cancel: cancel.clone(),
        };
        tokio::spawn(driver.run());

        GhostHandle {
            events: events_tx,
            snapshots: snapshot_rx,
            cancel: cancel.clone(),
            _guard: cancel.drop_guard(),
        }
    }

    async fn run(mut self) {
        info!("Ghost text driver started");

        loop {
            let event = tokio::select! {
                _ = self.cancel.cancelled() => break,
                event = self.events_rx.recv() => event,
            };

            match event {
                None | Some(GhostEvent::Shutdown) => break,
                Some(event) => self.handle(event),
            }

            self.snapshots.send_replace(self.session.snapshot());
        }

        self.scheduler.cancel();
        self.session.dispose();
        self.cancel.cancel();
        self.snapshots.send_replace(self.session.snapshot());
        info!("Ghost text driver stopped");
    }

    fn handle(&mut self, event: GhostEvent) {
        match event {
            GhostEvent::DocumentChanged => {
                let generation = self.session.on_document_changed();
                self.scheduler.schedule(generation);
            }
            GhostEvent::CursorMoved => {
                let generation = self.session.on_cursor_moved();
                self.scheduler.schedule(generation);
            }
            GhostEvent::TimerFired(generation) => {
                if let Some(request) = self.session.on_timer_fired(generation) {
                    self.spawn_fetch(request);
                }
            }
            GhostEvent::FetchResolved(ticket, result) => {
                let outcome = self.session.on_fetch_resolved(ticket, result);
                debug!("Fetch for generation {} resolved: {:?}", ticket.generation, outcome);
                if let Some(request) = self.session.drain_pending() {
                    self.spawn_fetch(request);
                }
            }
            GhostEvent::Cycle(reply) => {
                let _ = reply.send(self.session.cycle());
            }
            GhostEvent::Accept(reply) => {
                let _ = reply.send(self.session.accept());
            }
            GhostEvent::Escalate(reply) => match self.session.begin_escalation() {
                Ok(request) => self.spawn_generation(request, reply),
                Err(e) => {
                    let _ = reply.send(Err(e));
                }
            },
            GhostEvent::EscalationResolved(request, result, reply) => {
                let _ = reply.send(self.session.finish_escalation(request, result));
            }
            GhostEvent::Shutdown => {}
        }
    }

    fn spawn_fetch(&self, request: FetchRequest) {
        let source = Arc::clone(&self.source);
        let events = self.events_tx.clone();
        let cancel = self.cancel.child_token();

        tokio::spawn(async move {
            let result = tokio::select! {
                _ = cancel.cancelled() => return,
                result = source.fetch_candidates(&request.context) => result,
            };
            let _ = events.send(GhostEvent::FetchResolved(request.ticket, result));
        });
    }

    fn spawn_generation(
        &self,
        request: EscalationRequest,
        reply: oneshot::Sender<GhostResult<EscalationOutcome>>,
    ) {
        let service = Arc::clone(&self.service);
        let events = self.events_tx.clone();
        let cancel = self.cancel.child_token();

        tokio::spawn(async move {
            let result = tokio::select! {
                _ = cancel.cancelled() => return,
                result = request_generation(service.as_ref(), &request.prompt) => result,
            };
            let _ = events.send(GhostEvent::EscalationResolved(request, result, reply));
        });
    }
}

/// Host-side handle to a running driver; dropping it stops the driver
pub struct GhostHandle {
    events: mpsc::UnboundedSender<GhostEvent>,
    snapshots: watch::Receiver<GhostSnapshot>,
    cancel: CancellationToken,
    _guard: DropGuard,
}

impl GhostHandle {
    fn send(&self, event: GhostEvent) -> GhostResult<()> {
        self.events.send(event).map_err(|_| GhostError::Stopped)
    }

    pub fn document_changed(&self) -> GhostResult<()> {
        self.send(GhostEvent::DocumentChanged)
    }

    pub fn cursor_moved(&self) -> GhostResult<()> {
        self.send(GhostEvent::CursorMoved)
    }

    /// Show the next item; `None` when nothing is showing
    pub async fn cycle(&self) -> GhostResult<Option<usize>> {
        let (tx, rx) = oneshot::channel();
        self.send(GhostEvent::Cycle(tx))?;
        rx.await.map_err(|_| GhostError::Stopped)
    }

    /// Insert the active ghost text at the cursor
    pub async fn accept(&self) -> GhostResult<String> {
        let (tx, rx) = oneshot::channel();
        self.send(GhostEvent::Accept(tx))?;
        rx.await.map_err(|_| GhostError::Stopped)?
    }

    /// Replace the items with a generated expansion of the active text
    pub async fn escalate(&self) -> GhostResult<EscalationOutcome> {
        let (tx, rx) = oneshot::channel();
        self.send(GhostEvent::Escalate(tx))?;
        rx.await.map_err(|_| GhostError::Stopped)?
    }

    /// Latest published snapshot
    pub fn state(&self) -> GhostSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<GhostSnapshot> {
        self.snapshots.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Stop the driver and remove any decoration
    pub fn shutdown(self) {
        let _ = self.events.send(GhostEvent::Shutdown);
    }
}
