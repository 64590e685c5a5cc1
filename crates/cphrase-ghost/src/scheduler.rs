/// Single-shot debounce timer
///
/// Scheduling aborts the previous timer before spawning the next one, so only
/// the last call in a burst ever fires.
use crate::driver::GhostEvent;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

pub struct DebounceScheduler {
    delay: Duration,
    events: mpsc::UnboundedSender<GhostEvent>,
    timer: Option<JoinHandle<()>>,
}

impl DebounceScheduler {
    pub fn new(delay: Duration, events: mpsc::UnboundedSender<GhostEvent>) -> Self {
        Self {
            delay,
            events,
            timer: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Fire `TimerFired(generation)` after the delay, replacing any armed timer
    pub fn schedule(&mut self, generation: u64) {
        self.cancel();

        let delay = self.delay;
        let events = self.events.clone();
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            trace!("Debounce timer fired for generation {}", generation);
            let _ = events.send(GhostEvent::TimerFired(generation));
        }));
    }

    /// Disarm the timer, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.timer.take() {
            handle.abort();
        }
    }

    /// Whether a timer is armed and has not fired yet
    pub fn is_pending(&self) -> bool {
        self.timer
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for DebounceScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_only_last_schedule_fires() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = DebounceScheduler::new(Duration::from_millis(1000), tx);

        scheduler.schedule(1);
        tokio::time::sleep(Duration::from_millis(400)).await;
        scheduler.schedule(2);
        tokio::time::sleep(Duration::from_millis(400)).await;
        scheduler.schedule(3);
        assert!(scheduler.is_pending());

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(matches!(rx.try_recv(), Ok(GhostEvent::TimerFired(3))));
        assert!(rx.try_recv().is_err());
        assert!(!scheduler.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_disarms() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = DebounceScheduler::new(Duration::from_millis(100), tx);

        scheduler.schedule(1);
        scheduler.cancel();
        assert!(!scheduler.is_pending());

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(rx.try_recv().is_err());
    }
}
