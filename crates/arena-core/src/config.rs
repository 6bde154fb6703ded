//! Configuration loading and typed config structures for the arena.
//!
//! The configuration lives in `arena-config.yaml`. This module defines
//! strongly-typed structs that mirror the YAML structure and a loader that
//! reads and validates the file. Every field has a default, so an empty or
//! missing file yields a working server.
//!
//! Series length and draw handling live under `series`. What happens when
//! a waiting name joins again is `matchmaking.duplicate_join`.

use std::path::Path;
use std::time::Duration;

use chrono::TimeDelta;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is out of range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// Longest accepted queue freshness window (one day).
pub const MAX_QUEUE_TTL_SECONDS: u64 = 86_400;

/// Longest accepted pause between rounds (one hour).
pub const MAX_NEXT_ROUND_DELAY_MS: u64 = 3_600_000;

/// Longest accepted series retention (one week).
pub const MAX_RETENTION_SECONDS: u64 = 604_800;

/// Longest accepted janitor period (one day).
pub const MAX_SWEEP_INTERVAL_SECONDS: u64 = 86_400;

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level arena configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ArenaConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerSettings,

    /// Matchmaking queue policy.
    #[serde(default)]
    pub matchmaking: MatchmakingConfig,

    /// Series length, pacing and retention.
    #[serde(default)]
    pub series: SeriesConfig,

    /// Background sweep settings.
    #[serde(default)]
    pub janitor: JanitorConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ArenaConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `ARENA_HOST` and `ARENA_PORT` override `server.host` and
    /// `server.port` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.server.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot run with.
    ///
    /// Durations must be non-zero (except the round delay) and no longer
    /// than the `MAX_*` bounds, so every timer the engine derives from
    /// them stays representable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.series.max_rounds == 0 {
            return Err(ConfigError::Invalid {
                reason: "series.max_rounds must be at least 1".to_owned(),
            });
        }
        check_range(
            "series.retention_seconds",
            self.series.retention_seconds,
            1,
            MAX_RETENTION_SECONDS,
        )?;
        check_range(
            "series.next_round_delay_ms",
            self.series.next_round_delay_ms,
            0,
            MAX_NEXT_ROUND_DELAY_MS,
        )?;
        check_range(
            "matchmaking.queue_ttl_seconds",
            self.matchmaking.queue_ttl_seconds,
            1,
            MAX_QUEUE_TTL_SECONDS,
        )?;
        check_range(
            "janitor.sweep_interval_seconds",
            self.janitor.sweep_interval_seconds,
            1,
            MAX_SWEEP_INTERVAL_SECONDS,
        )
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSettings {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerSettings {
    /// Override the listener address with environment variables when set.
    ///
    /// An unparseable `ARENA_PORT` is ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("ARENA_HOST") {
            self.host = val;
        }
        if let Some(port) = std::env::var("ARENA_PORT")
            .ok()
            .and_then(|val| val.parse().ok())
        {
            self.port = port;
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// What to do when a display name joins while already waiting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateJoinPolicy {
    /// Refuse the second join with an `AlreadyQueued` error.
    #[default]
    Reject,
    /// Report `waiting` without adding a second queue entry.
    Merge,
}

/// Matchmaking queue policy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MatchmakingConfig {
    /// Seconds a queue entry stays fresh. Older entries are dropped.
    #[serde(default = "default_queue_ttl_seconds")]
    pub queue_ttl_seconds: u64,

    /// Handling of a second join under a name that is still waiting.
    #[serde(default)]
    pub duplicate_join: DuplicateJoinPolicy,
}

impl MatchmakingConfig {
    /// Queue freshness window.
    pub fn queue_ttl(&self) -> TimeDelta {
        seconds(self.queue_ttl_seconds)
    }
}

impl Default for MatchmakingConfig {
    fn default() -> Self {
        Self {
            queue_ttl_seconds: default_queue_ttl_seconds(),
            duplicate_join: DuplicateJoinPolicy::default(),
        }
    }
}

/// Series length, pacing and retention.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeriesConfig {
    /// Maximum number of rounds in one series.
    #[serde(default = "default_max_rounds")]
    pub max_rounds: usize,

    /// Pause between the end of a round and the start of the next.
    #[serde(default = "default_next_round_delay_ms")]
    pub next_round_delay_ms: u64,

    /// Whether a drawn round is followed by another round.
    #[serde(default = "default_true")]
    pub draws_advance: bool,

    /// Seconds after creation when a series is evicted, finished or not.
    #[serde(default = "default_retention_seconds")]
    pub retention_seconds: u64,
}

impl SeriesConfig {
    /// Delay before the next round starts.
    pub const fn next_round_delay(&self) -> Duration {
        Duration::from_millis(self.next_round_delay_ms)
    }

    /// Series retention window.
    pub fn retention(&self) -> TimeDelta {
        seconds(self.retention_seconds)
    }
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            max_rounds: default_max_rounds(),
            next_round_delay_ms: default_next_round_delay_ms(),
            draws_advance: true,
            retention_seconds: default_retention_seconds(),
        }
    }
}

/// Background sweep settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JanitorConfig {
    /// Seconds between periodic registry sweeps.
    #[serde(default = "default_sweep_interval_seconds")]
    pub sweep_interval_seconds: u64,
}

impl JanitorConfig {
    /// Interval between periodic sweeps.
    pub const fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            sweep_interval_seconds: default_sweep_interval_seconds(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn check_range(field: &str, value: u64, min: u64, max: u64) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            reason: format!("{field} must be between {min} and {max}, got {value}"),
        })
    }
}

fn seconds(secs: u64) -> TimeDelta {
    i64::try_from(secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .unwrap_or(TimeDelta::MAX)
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    8000
}

const fn default_queue_ttl_seconds() -> u64 {
    30
}

const fn default_max_rounds() -> usize {
    5
}

const fn default_next_round_delay_ms() -> u64 {
    2_000
}

const fn default_true() -> bool {
    true
}

const fn default_retention_seconds() -> u64 {
    300
}

const fn default_sweep_interval_seconds() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_owned()
}
