//! File-backed last-duration store.

use std::future::Future;
use std::io::ErrorKind;
use std::path::PathBuf;

use autosnooze_app::ports::LastDurationStore;
use autosnooze_domain::duration::Duration;
use autosnooze_domain::error::{AutoSnoozeError, StorageError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    #[serde(default)]
    last_duration: Option<Duration>,
}

/// Keeps the last used duration in a small JSON file.
///
/// A missing file reads as "nothing saved yet".
#[derive(Debug, Clone)]
pub struct FileDurationStore {
    path: PathBuf,
}

impl FileDurationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

fn storage_error(
    operation: &'static str,
    source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> AutoSnoozeError {
    StorageError {
        operation,
        source: source.into(),
    }
    .into()
}

impl LastDurationStore for FileDurationStore {
    fn load(&self) -> impl Future<Output = Result<Option<Duration>, AutoSnoozeError>> + Send {
        let path = self.path.clone();
        async move {
            let content = match tokio::fs::read_to_string(&path).await {
                Ok(content) => content,
                Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
                Err(err) => return Err(storage_error("load", err)),
            };
            let state: StateFile =
                serde_json::from_str(&content).map_err(|err| storage_error("load", err))?;
            Ok(state.last_duration)
        }
    }

    fn save(
        &self,
        duration: Duration,
    ) -> impl Future<Output = Result<(), AutoSnoozeError>> + Send {
        let path = self.path.clone();
        async move {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|err| storage_error("save", err))?;
            }
            let state = StateFile {
                last_duration: Some(duration),
            };
            let content =
                serde_json::to_string_pretty(&state).map_err(|err| storage_error("save", err))?;
            tokio::fs::write(&path, content)
                .await
                .map_err(|err| storage_error("save", err))?;
            tracing::debug!(path = %path.display(), %duration, "last duration saved");
            Ok(())
        }
    }
}
