//! Last-duration port — the single value persisted between sessions.

use std::future::Future;

use autosnooze_domain::duration::Duration;
use autosnooze_domain::error::AutoSnoozeError;

/// Remembers the duration of the most recent snooze.
pub trait LastDurationStore {
    /// Load the stored duration, `None` if nothing was saved yet.
    fn load(&self) -> impl Future<Output = Result<Option<Duration>, AutoSnoozeError>> + Send;

    /// Replace the stored duration.
    fn save(&self, duration: Duration)
    -> impl Future<Output = Result<(), AutoSnoozeError>> + Send;
}
