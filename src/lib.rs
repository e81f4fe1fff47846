//! # NLP Client
//!
//! Async client for the NLP Server HTTP API: article extraction, word
//! embeddings, entity/sentiment analysis and language detection.
//!
//! ## Features
//!
//! - **Multi-host failover**: calls go to one randomly selected host; when it
//!   fails, the remaining hosts are probed in random order and the first live
//!   one takes over
//! - **Bounded retries**: a call is attempted at most `max_retries + 1` times
//!   and then yields `None` instead of an error
//! - **Typed responses**: [`Article`], [`Neighbour`] and [`PolyglotResult`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nlp_client::NlpClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), nlp_client::NlpError> {
//!     let client = NlpClient::new(["http://nlp-1:6400/", "http://nlp-2:6400/"])?
//!         .with_debug(true);
//!
//!     if let Some(code) = client.language("Dette er en norsk tekst").await {
//!         println!("language: {code}");
//!     }
//!
//!     let analysis = client.polyglot("Ola Nordmann works at Equinor in Oslo", None).await;
//!     println!("people: {:?}", analysis.persons());
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! Clients can be built from code, `NLP_*` environment variables or a JSON
//! file. See [`ClientConfig`] for all available options.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod nlp;
pub mod response;
pub mod tracker;

// Re-exports for convenience
pub use client::{CallMethod, NlpClient};
pub use config::{ClientConfig, DEFAULT_MAX_RETRIES};
pub use error::{NlpError, Result};
pub use host::HostPool;
pub use logging::init_logging;
pub use nlp::DEFAULT_EMBEDDINGS_LANG;
pub use response::{Article, Neighbour, PolyglotResult};
pub use tracker::{StatsSnapshot, StatsTracker};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
