//! In-process adapters for the ports — no IO involved.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::broadcast;

use autosnooze_domain::duration::Duration;
use autosnooze_domain::error::AutoSnoozeError;
use autosnooze_domain::snooze::SnoozeCommand;

use crate::ports::{LastDurationStore, SnoozeSink};

/// Snooze sink that broadcasts every command to in-process subscribers.
///
/// Dispatching succeeds even when there are no active subscribers
/// (the command is simply dropped).
#[derive(Clone)]
pub struct InProcessSnoozeSink {
    sender: broadcast::Sender<SnoozeCommand>,
}

impl InProcessSnoozeSink {
    /// Create a new sink with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to commands dispatched *after* this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SnoozeCommand> {
        self.sender.subscribe()
    }
}

impl SnoozeSink for InProcessSnoozeSink {
    fn dispatch(
        &self,
        command: SnoozeCommand,
    ) -> impl Future<Output = Result<(), AutoSnoozeError>> + Send {
        // send only fails without receivers, which is fine here.
        let _ = self.sender.send(command);
        async { Ok(()) }
    }
}

/// Last-duration store kept in memory for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDurationStore {
    value: Arc<Mutex<Option<Duration>>>,
}

impl InMemoryDurationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `duration` already stored.
    #[must_use]
    pub fn with(duration: Duration) -> Self {
        Self {
            value: Arc::new(Mutex::new(Some(duration))),
        }
    }
}

impl LastDurationStore for InMemoryDurationStore {
    fn load(&self) -> impl Future<Output = Result<Option<Duration>, AutoSnoozeError>> + Send {
        let value = *self.value.lock().unwrap_or_else(PoisonError::into_inner);
        async move { Ok(value) }
    }

    fn save(
        &self,
        duration: Duration,
    ) -> impl Future<Output = Result<(), AutoSnoozeError>> + Send {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = Some(duration);
        async { Ok(()) }
    }
}
