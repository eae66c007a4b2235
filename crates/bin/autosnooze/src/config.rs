//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `autosnooze.toml` in the working directory unless another path
//! is given with `--config` or `AUTOSNOOZE_CONFIG`. Every field has a
//! default so the file is optional. Environment variables take precedence
//! over file values.

use std::path::{Path, PathBuf};

use autosnooze_domain::duration::{self, DEFAULT_PRESETS, Duration};
use autosnooze_domain::eligibility::{EXCLUDE_MARKER, EligibilityPolicy, INCLUDE_MARKER};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "autosnooze.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Reserved label names.
    pub markers: MarkersConfig,
    /// Eligibility filter behaviour.
    pub filter: FilterConfig,
    /// Default and quick-pick durations.
    pub durations: DurationsConfig,
    /// Where the host snapshot is read from.
    pub snapshot: SnapshotConfig,
    /// Where the last used duration is kept.
    pub state: StateConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MarkersConfig {
    /// Label name that whitelists automations.
    pub include: String,
    /// Label name that blacklists automations.
    pub exclude: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Hide everything while the label registry is empty but labels exist.
    pub strict_on_missing_registry: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DurationsConfig {
    /// Duration offered before anything was snoozed (duration text).
    pub default: String,
    /// Quick-pick durations (duration text).
    pub presets: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Path to the JSON snapshot file.
    pub path: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    /// Path to the JSON state file.
    pub path: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `explicit` (or `AUTOSNOOZE_CONFIG`, or
    /// `autosnooze.toml` when present) then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file is missing, if the TOML
    /// file is malformed, or if validation fails.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let env = |key: &str| std::env::var(key).ok();
        let mut config = match explicit
            .map(Path::to_path_buf)
            .or_else(|| env("AUTOSNOOZE_CONFIG").map(PathBuf::from))
        {
            Some(path) => Self::from_file(&path, true)?,
            None => Self::from_file(Path::new(DEFAULT_CONFIG_PATH), false)?,
        };
        config.apply_overrides(env);
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path, required: bool) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if !required && err.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("AUTOSNOOZE_SNAPSHOT") {
            self.snapshot.path = PathBuf::from(val);
        }
        if let Some(val) = var("AUTOSNOOZE_STATE") {
            self.state.path = PathBuf::from(val);
        }
        if let Some(val) = var("AUTOSNOOZE_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let include = self.markers.include.trim();
        let exclude = self.markers.exclude.trim();
        if include.is_empty() || exclude.is_empty() {
            return Err(ConfigError::Validation(
                "marker names must not be empty".to_string(),
            ));
        }
        if include.eq_ignore_ascii_case(exclude) {
            return Err(ConfigError::Validation(
                "include and exclude markers must differ".to_string(),
            ));
        }
        self.default_duration()?;
        self.presets()?;
        Ok(())
    }

    /// The eligibility policy described by `[markers]` and `[filter]`.
    #[must_use]
    pub fn policy(&self) -> EligibilityPolicy {
        EligibilityPolicy::new(
            &self.markers.include,
            &self.markers.exclude,
            self.filter.strict_on_missing_registry,
        )
    }

    /// The parsed `[durations] default`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when the text does not parse.
    pub fn default_duration(&self) -> Result<Duration, ConfigError> {
        parse_setting("durations.default", &self.durations.default)
    }

    /// The parsed `[durations] presets`, in configured order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for the first preset that does
    /// not parse.
    pub fn presets(&self) -> Result<Vec<Duration>, ConfigError> {
        self.durations
            .presets
            .iter()
            .map(|preset| parse_setting("durations.presets", preset))
            .collect()
    }
}

fn parse_setting(field: &str, text: &str) -> Result<Duration, ConfigError> {
    duration::parse(text)
        .map_err(|err| ConfigError::Validation(format!("{field}: {text:?} ({err})")))
}

impl Default for MarkersConfig {
    fn default() -> Self {
        Self {
            include: INCLUDE_MARKER.to_string(),
            exclude: EXCLUDE_MARKER.to_string(),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            strict_on_missing_registry: true,
        }
    }
}

impl Default for DurationsConfig {
    fn default() -> Self {
        Self {
            default: "30m".to_string(),
            presets: DEFAULT_PRESETS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("snapshot.json"),
        }
    }
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("autosnooze-state.json"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "autosnooze=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
