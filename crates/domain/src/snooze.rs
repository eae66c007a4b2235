//! Snooze commands — what the host is asked to do.
//!
//! A command either pauses automations for a [`Duration`], pauses them
//! between explicit timestamps, or wakes them early.

use serde::{Deserialize, Serialize};

use crate::duration::Duration;
use crate::error::ValidationError;
use crate::id::AutomationId;
use crate::time::Timestamp;

/// A command sent to the host's snooze service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "service", rename_all = "snake_case")]
pub enum SnoozeCommand {
    /// Disable now, re-enable after `duration`.
    Pause {
        entity_ids: Vec<AutomationId>,
        #[serde(flatten)]
        duration: Duration,
    },
    /// Disable at `disable_at` (or now when absent), re-enable at `resume_at`.
    PauseScheduled {
        entity_ids: Vec<AutomationId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        disable_at: Option<Timestamp>,
        resume_at: Timestamp,
    },
    /// Re-enable the given automations immediately.
    Wake { entity_ids: Vec<AutomationId> },
    /// Re-enable every snoozed automation.
    WakeAll,
}

impl SnoozeCommand {
    /// Pause `entity_ids` for `duration`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptySelection`] when no id is given, or
    /// [`ValidationError::ZeroDuration`] for a zero duration.
    pub fn pause(
        entity_ids: Vec<AutomationId>,
        duration: Duration,
    ) -> Result<Self, ValidationError> {
        ensure_selection(&entity_ids)?;
        if duration.is_zero() {
            return Err(ValidationError::ZeroDuration);
        }
        Ok(Self::Pause {
            entity_ids,
            duration,
        })
    }

    /// Pause `entity_ids` between two timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptySelection`] when no id is given,
    /// [`ValidationError::ResumeNotInFuture`] when `resume_at` is not after
    /// `now`, or [`ValidationError::ResumeBeforeDisable`] when `resume_at`
    /// is not after `disable_at`.
    pub fn pause_scheduled(
        entity_ids: Vec<AutomationId>,
        disable_at: Option<Timestamp>,
        resume_at: Timestamp,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        ensure_selection(&entity_ids)?;
        if resume_at <= now {
            return Err(ValidationError::ResumeNotInFuture);
        }
        if disable_at.is_some_and(|disable_at| resume_at <= disable_at) {
            return Err(ValidationError::ResumeBeforeDisable);
        }
        Ok(Self::PauseScheduled {
            entity_ids,
            disable_at,
            resume_at,
        })
    }

    /// Wake `entity_ids` now.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptySelection`] when no id is given.
    pub fn wake(entity_ids: Vec<AutomationId>) -> Result<Self, ValidationError> {
        ensure_selection(&entity_ids)?;
        Ok(Self::Wake { entity_ids })
    }

    /// Host service name for this command.
    #[must_use]
    pub fn service(&self) -> &'static str {
        match self {
            Self::Pause { .. } => "pause",
            Self::PauseScheduled { .. } => "pause_scheduled",
            Self::Wake { .. } => "wake",
            Self::WakeAll => "wake_all",
        }
    }

    /// Automations targeted by this command; empty for [`WakeAll`](Self::WakeAll).
    #[must_use]
    pub fn entity_ids(&self) -> &[AutomationId] {
        match self {
            Self::Pause { entity_ids, .. }
            | Self::PauseScheduled { entity_ids, .. }
            | Self::Wake { entity_ids } => entity_ids,
            Self::WakeAll => &[],
        }
    }

    /// When a paused automation resumes, given the time the command is sent.
    #[must_use]
    pub fn resume_at(&self, sent_at: Timestamp) -> Option<Timestamp> {
        match self {
            Self::Pause { duration, .. } => Some(sent_at + duration.to_time_delta()),
            Self::PauseScheduled { resume_at, .. } => Some(*resume_at),
            Self::Wake { .. } | Self::WakeAll => None,
        }
    }
}

fn ensure_selection(entity_ids: &[AutomationId]) -> Result<(), ValidationError> {
    if entity_ids.is_empty() {
        return Err(ValidationError::EmptySelection);
    }
    Ok(())
}
