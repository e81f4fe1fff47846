//! Error types for the NLP client.
//!
//! Only construction and configuration can fail with an error. Failed calls
//! against the NLP server are absorbed by failover and surface as `None`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while configuring or building a client.
#[derive(Error, Debug)]
pub enum NlpError {
    /// No hosts configured.
    #[error("no hosts configured - at least one NLP server host is required")]
    NoHosts,

    /// A host is not a usable absolute URL.
    #[error("invalid host '{host}': {reason}")]
    InvalidHost {
        /// The host string as given.
        host: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to read a configuration file.
    #[error("failed to read config file '{path}': {source}")]
    ConfigFileRead {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a configuration file.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// The underlying HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Result type alias for client construction.
pub type Result<T> = std::result::Result<T, NlpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = NlpError::InvalidHost {
            host: "not a url".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid host 'not a url': relative URL without a base"
        );
        assert!(NlpError::NoHosts.to_string().contains("at least one"));
    }
}
