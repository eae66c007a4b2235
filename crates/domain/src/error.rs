//! Common error types used across the workspace.
//!
//! Each failure family has its own typed error and converts into
//! [`AutoSnoozeError`] via `#[from]`.

use crate::duration::ParseDurationError;

/// Top-level error for snooze operations.
#[derive(Debug, thiserror::Error)]
pub enum AutoSnoozeError {
    #[error("validation error")]
    Validation(#[from] ValidationError),

    #[error("invalid duration")]
    InvalidDuration(#[from] ParseDurationError),

    #[error("not found")]
    NotFound(#[from] NotFoundError),

    #[error("dispatch error")]
    Dispatch(#[from] DispatchError),

    #[error("storage error")]
    Storage(#[from] StorageError),
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("identifier must not be empty")]
    EmptyId,

    #[error("no automation selected")]
    EmptySelection,

    #[error("snooze duration must be greater than zero")]
    ZeroDuration,

    #[error("resume time must be in the future")]
    ResumeNotInFuture,

    #[error("resume time must be after the disable time")]
    ResumeBeforeDisable,
}

/// A lookup by identifier returned nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// The host rejected or failed to receive a snooze command.
#[derive(Debug, thiserror::Error)]
#[error("failed to dispatch {service}")]
pub struct DispatchError {
    pub service: &'static str,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

/// Reading or writing the persisted last-used duration failed.
#[derive(Debug, thiserror::Error)]
#[error("failed to {operation} last used duration")]
pub struct StorageError {
    pub operation: &'static str,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}
