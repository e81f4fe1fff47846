//! NLP server client with bounded retry and host failover.
//!
//! Every call goes through one execution path: send to the selected host,
//! and on failure run a failover and try again, up to the retry ceiling.

use crate::config::ClientConfig;
use crate::error::Result;
use crate::host::HostPool;
use crate::tracker::{StatsSnapshot, StatsTracker};
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// HTTP verb used for an API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallMethod {
    /// Parameters are sent as a query string.
    Get,
    /// Parameters are sent as a form-urlencoded body.
    Post,
}

impl fmt::Display for CallMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
            Self::Post => f.write_str("POST"),
        }
    }
}

/// Why a single attempt was classified as failed.
#[derive(Debug, Error)]
enum AttemptError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(StatusCode),
    #[error("empty response body")]
    EmptyBody,
}

/// Client for the NLP server.
///
/// Cloning is cheap; clones share the host pool, so a failover performed
/// by one clone redirects the others as well.
#[derive(Debug, Clone)]
pub struct NlpClient {
    http: Client,
    pool: Arc<HostPool>,
    config: Arc<ClientConfig>,
    stats: Arc<StatsTracker>,
}

impl NlpClient {
    /// Create a client for one or more hosts with default settings.
    ///
    /// ```rust,no_run
    /// use nlp_client::NlpClient;
    ///
    /// let single = NlpClient::new(["http://localhost:6400/"])?;
    /// let pooled = NlpClient::new(vec!["http://nlp-1:6400", "http://nlp-2:6400"])?;
    /// # Ok::<(), nlp_client::NlpError>(())
    /// ```
    pub fn new<I, S>(hosts: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_config(ClientConfig::with_hosts(hosts))
    }

    /// Create a client from a full configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let pool = HostPool::new(&config.hosts)?;

        let http = Client::builder()
            .timeout(config.timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .gzip(true)
            .brotli(true)
            .build()?;

        debug!(
            hosts = pool.len(),
            selected = pool.selected(),
            "NLP client ready"
        );

        Ok(Self {
            http,
            pool: Arc::new(pool),
            config: Arc::new(config),
            stats: Arc::new(StatsTracker::new()),
        })
    }

    /// Enable or disable the failover trail.
    pub fn with_debug(mut self, debug: bool) -> Self {
        Arc::make_mut(&mut self.config).debug = debug;
        self
    }

    /// The host calls are currently sent to.
    pub fn selected_host(&self) -> &str {
        self.pool.selected()
    }

    /// All known hosts in insertion order.
    pub fn hosts(&self) -> &[String] {
        self.pool.hosts()
    }

    /// The active configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the current stats snapshot.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Send a GET call with `params` as query string.
    pub async fn get(&self, path: &str, params: &[(&str, &str)]) -> Option<Value> {
        self.execute(CallMethod::Get, path, params).await
    }

    /// Send a POST call with `params` as form body.
    pub async fn post(&self, path: &str, params: &[(&str, &str)]) -> Option<Value> {
        self.execute(CallMethod::Post, path, params).await
    }

    /// Run a call against the selected host, failing over between attempts.
    ///
    /// Makes at most `max_retries + 1` attempts. Returns `None` once the
    /// ceiling is hit or when a successful response is not valid JSON.
    pub async fn execute(
        &self,
        method: CallMethod,
        path: &str,
        params: &[(&str, &str)],
    ) -> Option<Value> {
        self.stats.record_call();
        let path = normalize_path(path);
        let max_retries = self.config.max_retries;

        for attempt in 0..=max_retries {
            let host = self.pool.selected().to_string();
            let query: &[(&str, &str)] = match method {
                CallMethod::Get => params,
                CallMethod::Post => &[],
            };

            let url = match compose_url(&host, &path, query) {
                Ok(url) => url,
                Err(reason) => {
                    warn!(host = %host, path = %path, error = %reason, "Cannot build request URL");
                    return None;
                }
            };

            if self.config.debug {
                debug!(method = %method, url = %url, attempt, "NLP API call");
            }

            match self.send_once(method, url, params).await {
                Ok(body) => return self.decode(&path, &body),
                Err(error) => {
                    self.stats.record_failed_attempt();
                    if self.config.debug {
                        debug!(host = %host, path = %path, attempt, error = %error, "Host failed");
                    }
                    self.failover().await;
                }
            }
        }

        self.stats.record_exhausted();
        warn!(
            path = %path,
            attempts = max_retries + 1,
            "All attempts failed, no NLP host available"
        );
        None
    }

    /// Send a single request without retries.
    async fn send_once(
        &self,
        method: CallMethod,
        url: Url,
        params: &[(&str, &str)],
    ) -> std::result::Result<String, AttemptError> {
        let request = match method {
            CallMethod::Get => self.http.get(url),
            CallMethod::Post => self.http.post(url).form(params),
        };

        let response = request.send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(AttemptError::Status(status));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(AttemptError::EmptyBody);
        }

        Ok(body)
    }

    fn decode(&self, path: &str, body: &str) -> Option<Value> {
        match serde_json::from_str(body) {
            Ok(value) => {
                self.stats.record_success();
                Some(value)
            }
            Err(e) => {
                warn!(path = %path, error = %e, "NLP server returned malformed JSON");
                None
            }
        }
    }

    /// Probe the pool in random order and switch to the first live host.
    async fn failover(&self) -> bool {
        let found = self.pool.failover(|host| self.probe(host)).await;
        self.stats.record_failover(found);

        if self.config.debug {
            if found {
                debug!(host = self.pool.selected(), "Working host selected");
            } else {
                debug!(hosts = self.pool.len(), "No working host found");
            }
        }

        found
    }

    /// Liveness probe: bare GET to the host, alive iff 2xx with a body.
    async fn probe(&self, host: String) -> bool {
        if self.config.debug {
            debug!(host = %host, "Testing host");
        }

        let alive = match self
            .http
            .get(&host)
            .timeout(self.config.probe_timeout)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => response
                .text()
                .await
                .map(|body| !body.trim().is_empty())
                .unwrap_or(false),
            Ok(response) => {
                trace!(host = %host, status = response.status().as_u16(), "Probe rejected");
                false
            }
            Err(e) => {
                trace!(host = %host, error = %e, "Probe failed");
                false
            }
        };

        if self.config.debug && !alive {
            debug!(host = %host, "Ignoring failed host");
        }

        alive
    }
}

/// Prefix `path` with `/` when missing.
fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Build `{host}{path}` plus an urlencoded query when `params` is non-empty.
pub fn compose_url(
    host: &str,
    path: &str,
    params: &[(&str, &str)],
) -> std::result::Result<Url, String> {
    let mut url = Url::parse(&format!("{host}{path}")).map_err(|e| e.to_string())?;

    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }

    Ok(url)
}
