//! Tracing subscriber setup for applications using the client.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a global subscriber for the client's events.
///
/// `RUST_LOG` takes precedence; otherwise `nlp_client` logs at DEBUG when
/// `verbose` is set and at INFO otherwise. Returns `false` when a global
/// subscriber was already installed.
pub fn init_logging(verbose: bool, json_logs: bool) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose));

    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
            .is_ok()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .compact(),
            )
            .try_init()
            .is_ok()
    }
}

fn default_filter(verbose: bool) -> EnvFilter {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    EnvFilter::new(format!("nlp_client={level}"))
}
