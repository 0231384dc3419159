use core_config::{ConfigError, FromEnv, env_or_default, env_parse};
use std::str::FromStr;

/// Whether `POST /events` persists before responding or hands off to the
/// background worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IngestMode {
    #[default]
    Sync,
    Deferred,
}

impl FromStr for IngestMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sync" => Ok(Self::Sync),
            "deferred" => Ok(Self::Deferred),
            other => Err(format!("expected 'sync' or 'deferred', got '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    pub mode: IngestMode,
    /// Events buffered before `submit` waits for room
    pub queue_capacity: usize,
    /// Deferred jobs running at once
    pub max_in_flight: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            mode: IngestMode::Sync,
            queue_capacity: 1024,
            max_in_flight: 8,
        }
    }
}

impl FromEnv for IngestConfig {
    /// - `INGEST_MODE`: `sync` (default) or `deferred`
    /// - `INGEST_QUEUE_CAPACITY`: default 1024
    /// - `INGEST_MAX_IN_FLIGHT`: default 8
    fn from_env() -> Result<Self, ConfigError> {
        let mode = env_or_default("INGEST_MODE", "sync")
            .parse()
            .map_err(|details| ConfigError::ParseError {
                key: "INGEST_MODE".to_string(),
                details,
            })?;

        let queue_capacity: usize = env_parse("INGEST_QUEUE_CAPACITY", "1024")?;
        let max_in_flight: usize = env_parse("INGEST_MAX_IN_FLIGHT", "8")?;

        for (key, value) in [
            ("INGEST_QUEUE_CAPACITY", queue_capacity),
            ("INGEST_MAX_IN_FLIGHT", max_in_flight),
        ] {
            if value == 0 {
                return Err(ConfigError::ParseError {
                    key: key.to_string(),
                    details: "must be greater than zero".to_string(),
                });
            }
        }

        Ok(Self {
            mode,
            queue_capacity,
            max_in_flight,
        })
    }
}
