//! JSON-lines command sink — one serialized [`SnoozeCommand`] per line.
//!
//! The host integration reads these lines from the CLI's stdout.

use std::future::Future;
use std::io::Write;
use std::sync::{Mutex, PoisonError};

use autosnooze_app::ports::SnoozeSink;
use autosnooze_domain::error::{AutoSnoozeError, DispatchError};
use autosnooze_domain::snooze::SnoozeCommand;

pub struct JsonLinesSink<W> {
    writer: Mutex<W>,
}

impl JsonLinesSink<std::io::Stdout> {
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_line(&self, command: &SnoozeCommand) -> Result<(), DispatchError> {
        let wrap = |source: Box<dyn std::error::Error + Send + Sync>| DispatchError {
            service: command.service(),
            source,
        };
        let line = serde_json::to_string(command).map_err(|err| wrap(err.into()))?;
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(writer, "{line}")
            .and_then(|()| writer.flush())
            .map_err(|err| wrap(err.into()))
    }
}

impl<W: Write + Send> SnoozeSink for JsonLinesSink<W> {
    fn dispatch(
        &self,
        command: SnoozeCommand,
    ) -> impl Future<Output = Result<(), AutoSnoozeError>> + Send {
        let result = self.write_line(&command);
        match &result {
            Ok(()) => tracing::debug!(service = command.service(), "command dispatched"),
            Err(err) => tracing::warn!(service = command.service(), error = %err, "dispatch failed"),
        }
        async move { result.map_err(AutoSnoozeError::from) }
    }
}

#[cfg(test)]
mod tests {
    use autosnooze_domain::duration::Duration;
    use autosnooze_domain::id::AutomationId;

    use super::*;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn should_write_one_json_line_per_command() {
        let sink = JsonLinesSink::new(Vec::new());
        let pause = SnoozeCommand::pause(
            vec![AutomationId::new("automation.porch")],
            Duration::new(0, 0, 45),
        )
        .unwrap();

        sink.dispatch(pause.clone()).await.unwrap();
        sink.dispatch(SnoozeCommand::WakeAll).await.unwrap();

        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: SnoozeCommand = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed, pause);
        assert_eq!(lines[1], r#"{"service":"wake_all"}"#);
    }

    #[tokio::test]
    async fn should_return_dispatch_error_when_write_fails() {
        let sink = JsonLinesSink::new(BrokenPipe);
        let err = sink.dispatch(SnoozeCommand::WakeAll).await.unwrap_err();
        assert!(matches!(
            err,
            AutoSnoozeError::Dispatch(DispatchError {
                service: "wake_all",
                ..
            })
        ));
    }
}
