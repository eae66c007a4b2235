//! Snooze sink port — delivery of pause/wake commands to the host.

use std::future::Future;

use autosnooze_domain::error::AutoSnoozeError;
use autosnooze_domain::snooze::SnoozeCommand;

/// Receiver of [`SnoozeCommand`]s.
///
/// The host decides how a command is carried out (service call, message,
/// log line). Implementations report failures as
/// [`AutoSnoozeError::Dispatch`].
pub trait SnoozeSink {
    /// Deliver one command.
    fn dispatch(
        &self,
        command: SnoozeCommand,
    ) -> impl Future<Output = Result<(), AutoSnoozeError>> + Send;
}
