//! Snapshot loading — the host's automations and registries as a JSON file.

use std::path::{Path, PathBuf};

use autosnooze_domain::automation::AutomationSnapshot;
use autosnooze_domain::error::ValidationError;

/// Why a snapshot file could not be used.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in snapshot {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid automation at index {index} in snapshot")]
    Invalid {
        index: usize,
        #[source]
        source: ValidationError,
    },
}

/// Read and validate a snapshot file.
///
/// # Errors
///
/// Returns [`SnapshotError`] when the file cannot be read, is not valid
/// JSON, or holds an automation with a blank id.
pub fn load(path: &Path) -> Result<AutomationSnapshot, SnapshotError> {
    let content = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot = parse(path, &content)?;
    tracing::debug!(
        path = %path.display(),
        automations = snapshot.automations.len(),
        labels = snapshot.labels.len(),
        "snapshot loaded"
    );
    Ok(snapshot)
}

fn parse(path: &Path, content: &str) -> Result<AutomationSnapshot, SnapshotError> {
    let snapshot: AutomationSnapshot =
        serde_json::from_str(content).map_err(|source| SnapshotError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    for (index, automation) in snapshot.automations.iter().enumerate() {
        automation
            .validate()
            .map_err(|source| SnapshotError::Invalid { index, source })?;
    }
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_snapshot_with_all_registries() {
        let snapshot = parse(
            Path::new("snapshot.json"),
            r#"{
                "automations": [
                    { "id": "automation.porch", "name": "Porch", "area_id": "outside", "label_ids": ["l1"] }
                ],
                "labels": { "l1": "Outdoor" },
                "areas": { "outside": "Outside" },
                "categories": {}
            }"#,
        )
        .unwrap();
        assert_eq!(snapshot.automations.len(), 1);
        assert_eq!(snapshot.areas.resolve("outside"), Some("Outside"));
    }

    #[test]
    fn should_accept_missing_registries() {
        let snapshot = parse(Path::new("snapshot.json"), r#"{ "automations": [] }"#).unwrap();
        assert!(snapshot.labels.is_empty());
    }

    #[test]
    fn should_reject_blank_automation_id() {
        let result = parse(
            Path::new("snapshot.json"),
            r#"{ "automations": [{ "id": "automation.ok" }, { "id": " " }] }"#,
        );
        assert!(matches!(
            result,
            Err(SnapshotError::Invalid {
                index: 1,
                source: ValidationError::EmptyId
            })
        ));
    }

    #[test]
    fn should_report_path_when_file_missing() {
        let err = load(Path::new("/nonexistent/snapshot.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/snapshot.json"));
    }

    #[test]
    fn should_report_invalid_json() {
        let err = parse(Path::new("broken.json"), "{ not json").unwrap_err();
        assert_eq!(err.to_string(), "invalid JSON in snapshot broken.json");
    }
}
