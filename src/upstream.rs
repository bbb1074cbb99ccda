//! Outbound HTTP plumbing.
//!
//! Every request to YouTube, the Data API or the download mirror goes through
//! [`Outbound`], which caps how many requests are in flight process-wide.
//! The actual transfer is done by a blocking [`Fetcher`] on tokio's blocking
//! pool; tests swap in closures.

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use tokio::sync::Semaphore;
use tracing::debug;

/// Short desktop UA used for channel pages.
pub const CHANNEL_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
/// Full desktop Chrome UA used for playlist pages.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Fully owned description of one outbound request so it can move onto the
/// blocking pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// `Some` turns the request into a URL-encoded form POST.
    pub form: Option<Vec<(String, String)>>,
    pub timeout: Duration,
}

impl OutboundRequest {
    pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            form: None,
            timeout,
        }
    }

    pub fn post_form(url: impl Into<String>, form: &[(&str, &str)], timeout: Duration) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            form: Some(
                form.iter()
                    .map(|(key, value)| (key.to_string(), value.to_string()))
                    .collect(),
            ),
            timeout,
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn form_value(&self, key: &str) -> Option<&str> {
        self.form
            .as_ref()?
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }
}

/// Performs a single request and returns the response body as text.
/// Non-2xx statuses are errors.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, request: &OutboundRequest) -> Result<String>;
}

impl<F> Fetcher for F
where
    F: Fn(&OutboundRequest) -> Result<String> + Send + Sync,
{
    fn fetch(&self, request: &OutboundRequest) -> Result<String> {
        self(request)
    }
}

/// Production fetcher backed by a shared `ureq` agent.
pub struct UreqFetcher {
    agent: ureq::Agent,
}

impl UreqFetcher {
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
        }
    }
}

impl Default for UreqFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher for UreqFetcher {
    fn fetch(&self, request: &OutboundRequest) -> Result<String> {
        let mut call = match request.form {
            Some(_) => self.agent.post(&request.url),
            None => self.agent.get(&request.url),
        }
        .timeout(request.timeout);
        for (name, value) in &request.headers {
            call = call.set(name, value);
        }

        let response = match &request.form {
            Some(form) => {
                let pairs = form
                    .iter()
                    .map(|(key, value)| (key.as_str(), value.as_str()))
                    .collect::<Vec<_>>();
                call.send_form(&pairs)
            }
            None => call.call(),
        }
        .with_context(|| format!("requesting {}", request.url))?;

        response
            .into_string()
            .with_context(|| format!("reading body of {}", request.url))
    }
}

/// Process-wide outbound pool: a fetcher plus a semaphore bounding the number
/// of concurrent upstream requests.
#[derive(Clone)]
pub struct Outbound {
    fetcher: Arc<dyn Fetcher>,
    permits: Arc<Semaphore>,
}

impl Outbound {
    pub fn new(fetcher: Arc<dyn Fetcher>, max_in_flight: usize) -> Self {
        Self {
            fetcher,
            permits: Arc::new(Semaphore::new(max_in_flight.max(1))),
        }
    }

    /// Runs one request on the blocking pool. The permit travels with the
    /// blocking task, so a caller that gives up early does not free a slot
    /// while the transfer is still running.
    pub async fn fetch(&self, request: OutboundRequest) -> Result<String> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .context("outbound pool closed")?;
        debug!(url = %request.url, "outbound request");
        let fetcher = self.fetcher.clone();
        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            fetcher.fetch(&request)
        })
        .await
        .context("outbound request task failed")?
    }
}
