//! Client configuration.
//!
//! Supports configuration from code, environment variables and JSON
//! configuration files with sensible defaults.

use crate::error::{NlpError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default number of failure-triggered retries per call.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Full client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Candidate NLP server base URLs.
    pub hosts: Vec<String>,

    /// Emit the failover trail (failed host, tested hosts, chosen host).
    #[serde(default)]
    pub debug: bool,

    /// Maximum retries after the first attempt of a call.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Timeout for a single API request.
    #[serde(with = "humantime_serde", default = "default_timeout")]
    pub timeout: Duration,

    /// Timeout for a single liveness probe during failover.
    #[serde(with = "humantime_serde", default = "default_probe_timeout")]
    pub probe_timeout: Duration,
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_probe_timeout() -> Duration {
    Duration::from_secs(10)
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            hosts: vec![],
            debug: false,
            max_retries: default_max_retries(),
            timeout: default_timeout(),
            probe_timeout: default_probe_timeout(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration for the given hosts with default settings.
    pub fn with_hosts<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hosts: hosts.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| NlpError::ConfigFileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Create configuration from `NLP_*` environment variables.
    ///
    /// - `NLP_HOSTS`: comma-separated host list (required)
    /// - `NLP_DEBUG`: `1`/`true` enables the failover trail
    /// - `NLP_MAX_RETRIES`: retry ceiling
    /// - `NLP_TIMEOUT`: request timeout (`30s`, `500ms` or seconds)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let hosts = lookup("NLP_HOSTS")
            .ok_or_else(|| NlpError::InvalidConfig("NLP_HOSTS is not set".to_string()))?;

        let mut config = Self::with_hosts(
            hosts
                .split(',')
                .map(str::trim)
                .filter(|h| !h.is_empty())
                .map(str::to_string),
        );

        if let Some(debug) = lookup("NLP_DEBUG") {
            config.debug = matches!(debug.trim(), "1" | "true" | "yes" | "on");
        }

        if let Some(retries) = lookup("NLP_MAX_RETRIES") {
            config.max_retries = retries.trim().parse().map_err(|_| {
                NlpError::InvalidConfig(format!("NLP_MAX_RETRIES is not a number: '{retries}'"))
            })?;
        }

        if let Some(timeout) = lookup("NLP_TIMEOUT") {
            config.timeout = humantime_serde::parse(&timeout).map_err(|e| {
                NlpError::InvalidConfig(format!("NLP_TIMEOUT is invalid: {e}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.hosts.is_empty() {
            return Err(NlpError::NoHosts);
        }

        if self.hosts.iter().any(|h| h.trim().is_empty()) {
            return Err(NlpError::InvalidConfig(
                "host URL cannot be empty".to_string(),
            ));
        }

        if self.timeout.is_zero() || self.probe_timeout.is_zero() {
            return Err(NlpError::InvalidConfig(
                "timeouts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Serde module for `"30s"` / `"100ms"` / bare-seconds durations.
mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::num::ParseIntError;
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if duration.subsec_millis() == 0 {
            serializer.serialize_str(&format!("{}s", duration.as_secs()))
        } else {
            serializer.serialize_str(&format!("{}ms", duration.as_millis()))
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(serde::de::Error::custom)
    }

    pub fn parse(s: &str) -> Result<Duration, ParseIntError> {
        let s = s.trim();
        // "ms" must be checked before "s"
        if let Some(ms) = s.strip_suffix("ms") {
            ms.parse::<u64>().map(Duration::from_millis)
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.parse::<u64>().map(Duration::from_secs)
        } else {
            s.parse::<u64>().map(Duration::from_secs)
        }
    }
}
