//! Stop coordination for a minimization run.

use std::time::{Duration, Instant};

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;

/// Why the engine stopped early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// [`Shutdown::trigger`] was called (Ctrl-C in the CLI).
    Cancelled,
    /// The configured run deadline passed.
    DeadlineExceeded,
}

/// Coordinator for stopping a run.
///
/// Provides a broadcast channel that running engines subscribe to.
pub struct Shutdown {
    /// Broadcast channel sender.
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the stop signal, optionally bounding the run by `deadline`.
    pub fn listener(&self, deadline: Option<Duration>) -> StopListener {
        StopListener {
            rx: Some(self.tx.subscribe()),
            deadline: deadline.map(|d| Instant::now() + d),
        }
    }

    /// Trigger the stop signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Get the number of active subscribers.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Polled by the engine at every oracle-call boundary.
#[derive(Debug)]
pub struct StopListener {
    rx: Option<broadcast::Receiver<()>>,
    deadline: Option<Instant>,
}

impl StopListener {
    /// A listener bounded only by time.
    pub fn with_deadline(limit: Duration) -> Self {
        Self {
            rx: None,
            deadline: Some(Instant::now() + limit),
        }
    }

    /// Non-blocking check. A dropped coordinator is not a stop request.
    pub fn check(&mut self) -> Option<StopReason> {
        if let Some(rx) = self.rx.as_mut() {
            match rx.try_recv() {
                Ok(()) | Err(TryRecvError::Lagged(_)) => return Some(StopReason::Cancelled),
                Err(TryRecvError::Closed) => self.rx = None,
                Err(TryRecvError::Empty) => {}
            }
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(StopReason::DeadlineExceeded),
            _ => None,
        }
    }
}
