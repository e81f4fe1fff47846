//! Host pool with random selection and random-order failover.
//!
//! The pool holds every known NLP server host and the one currently
//! selected. Hosts that fail are never removed, only bypassed until the
//! next failover picks them again.

use crate::error::{NlpError, Result};
use parking_lot::RwLock;
use rand::prelude::*;
use reqwest::Url;
use std::future::Future;

/// The set of candidate hosts and the currently selected one.
#[derive(Debug)]
pub struct HostPool {
    /// Normalized hosts in insertion order.
    hosts: Vec<String>,
    /// Index into `hosts` of the selected host.
    selected: RwLock<usize>,
}

impl HostPool {
    /// Build a pool from one or more hosts and pick one at random.
    pub fn new<I, S>(hosts: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut pool = Self {
            hosts: Vec::new(),
            selected: RwLock::new(0),
        };

        for host in hosts {
            pool.add_host(host.as_ref())?;
        }

        pool.select_random()?;
        Ok(pool)
    }

    /// Strip a single trailing `/` from a host.
    pub fn normalize(host: &str) -> &str {
        host.strip_suffix('/').unwrap_or(host)
    }

    /// Add a host unless an identical normalized host is already known.
    ///
    /// Returns `true` when the host was appended.
    pub fn add_host(&mut self, host: &str) -> Result<bool> {
        let host = Self::normalize(host.trim());
        validate_host(host)?;

        if self.contains(host) {
            return Ok(false);
        }

        self.hosts.push(host.to_string());
        Ok(true)
    }

    /// Pick a uniformly random host as the selected one.
    pub fn select_random(&self) -> Result<()> {
        if self.hosts.is_empty() {
            return Err(NlpError::NoHosts);
        }

        let index = rand::rng().random_range(0..self.hosts.len());
        *self.selected.write() = index;
        Ok(())
    }

    /// The host all calls currently target.
    pub fn selected(&self) -> &str {
        &self.hosts[*self.selected.read()]
    }

    /// All known hosts in insertion order.
    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    /// Number of known hosts.
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    /// Whether the pool has no hosts.
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Whether the (already normalized) host is known.
    pub fn contains(&self, host: &str) -> bool {
        self.hosts.iter().any(|h| h == host)
    }

    /// Probe every host in a fresh random order and select the first live one.
    ///
    /// Stops at the first successful probe. When no probe succeeds the
    /// selection is left untouched and `false` is returned.
    pub async fn failover<F, Fut>(&self, mut probe: F) -> bool
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = bool>,
    {
        let mut order: Vec<usize> = (0..self.hosts.len()).collect();
        order.shuffle(&mut rand::rng());

        for index in order {
            if probe(self.hosts[index].clone()).await {
                *self.selected.write() = index;
                return true;
            }
        }

        false
    }
}

fn validate_host(host: &str) -> Result<()> {
    let invalid = |reason: String| NlpError::InvalidHost {
        host: host.to_string(),
        reason,
    };

    let url = Url::parse(host).map_err(|e| invalid(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host name".to_string()));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("host must not carry a query or fragment".to_string()));
    }

    Ok(())
}
