//! Snooze service — use-cases for pausing and waking automations.

use autosnooze_domain::duration::{self, DEFAULT_DURATION, Duration};
use autosnooze_domain::error::AutoSnoozeError;
use autosnooze_domain::id::AutomationId;
use autosnooze_domain::snooze::SnoozeCommand;
use autosnooze_domain::time::{Clock, SystemClock, Timestamp};

use crate::ports::{LastDurationStore, SnoozeSink};

/// Application service turning user intent into [`SnoozeCommand`]s.
///
/// Remembers the last duration used so the next session can offer it again.
pub struct SnoozeService<S, D, C = SystemClock> {
    sink: S,
    store: D,
    clock: C,
    default_duration: Duration,
}

impl<S: SnoozeSink, D: LastDurationStore> SnoozeService<S, D> {
    /// Create a new service on the system clock.
    pub fn new(sink: S, store: D) -> Self {
        Self::with_clock(sink, store, SystemClock)
    }
}

impl<S: SnoozeSink, D: LastDurationStore, C: Clock> SnoozeService<S, D, C> {
    /// Create a new service reading "now" from `clock`.
    pub fn with_clock(sink: S, store: D, clock: C) -> Self {
        Self {
            sink,
            store,
            clock,
            default_duration: DEFAULT_DURATION,
        }
    }

    /// Duration offered when nothing was saved yet.
    #[must_use]
    pub fn with_default_duration(mut self, duration: Duration) -> Self {
        self.default_duration = duration;
        self
    }

    /// Parse `input` and pause `entity_ids` for that long.
    ///
    /// # Errors
    ///
    /// Returns [`AutoSnoozeError::InvalidDuration`] when `input` does not
    /// parse (nothing is dispatched or saved), otherwise see
    /// [`pause_for`](Self::pause_for).
    #[tracing::instrument(skip(self))]
    pub async fn pause(
        &self,
        entity_ids: Vec<AutomationId>,
        input: &str,
    ) -> Result<SnoozeCommand, AutoSnoozeError> {
        let duration = duration::parse(input)?;
        self.pause_for(entity_ids, duration).await
    }

    /// Pause `entity_ids` for `duration` and remember it as the last used.
    ///
    /// Once the sink accepted the command the pause stands: failing to
    /// remember the duration is only logged.
    ///
    /// # Errors
    ///
    /// Returns [`AutoSnoozeError::Validation`] for an empty selection or a
    /// zero duration, or a dispatch error from the sink.
    #[tracing::instrument(skip(self, duration), fields(duration = %duration))]
    pub async fn pause_for(
        &self,
        entity_ids: Vec<AutomationId>,
        duration: Duration,
    ) -> Result<SnoozeCommand, AutoSnoozeError> {
        let command = SnoozeCommand::pause(entity_ids, duration)?;
        self.sink.dispatch(command.clone()).await?;
        if let Err(err) = self.store.save(duration).await {
            tracing::warn!(error = %err, "failed to remember last duration");
        }
        tracing::info!(
            count = command.entity_ids().len(),
            resume_at = ?command.resume_at(self.clock.now()),
            "automations paused"
        );
        Ok(command)
    }

    /// Pause `entity_ids` from `disable_at` (or now) until `resume_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AutoSnoozeError::Validation`] for an empty selection or an
    /// inconsistent schedule, or a dispatch error from the sink.
    #[tracing::instrument(skip(self))]
    pub async fn pause_scheduled(
        &self,
        entity_ids: Vec<AutomationId>,
        disable_at: Option<Timestamp>,
        resume_at: Timestamp,
    ) -> Result<SnoozeCommand, AutoSnoozeError> {
        let command =
            SnoozeCommand::pause_scheduled(entity_ids, disable_at, resume_at, self.clock.now())?;
        self.sink.dispatch(command.clone()).await?;
        tracing::info!(count = command.entity_ids().len(), "automations scheduled");
        Ok(command)
    }

    /// Wake `entity_ids` now.
    ///
    /// # Errors
    ///
    /// Returns [`AutoSnoozeError::Validation`] for an empty selection, or a
    /// dispatch error from the sink.
    #[tracing::instrument(skip(self))]
    pub async fn wake(
        &self,
        entity_ids: Vec<AutomationId>,
    ) -> Result<SnoozeCommand, AutoSnoozeError> {
        let command = SnoozeCommand::wake(entity_ids)?;
        self.sink.dispatch(command.clone()).await?;
        Ok(command)
    }

    /// Wake every snoozed automation.
    ///
    /// # Errors
    ///
    /// Returns a dispatch error from the sink.
    #[tracing::instrument(skip(self))]
    pub async fn wake_all(&self) -> Result<SnoozeCommand, AutoSnoozeError> {
        self.sink.dispatch(SnoozeCommand::WakeAll).await?;
        Ok(SnoozeCommand::WakeAll)
    }

    /// Duration to pre-fill: the last one used, or the configured default.
    ///
    /// # Errors
    ///
    /// Returns a storage error from the store.
    pub async fn last_duration(&self) -> Result<Duration, AutoSnoozeError> {
        let stored = self.store.load().await?;
        Ok(stored
            .filter(|duration| !duration.is_zero())
            .unwrap_or(self.default_duration))
    }
}
