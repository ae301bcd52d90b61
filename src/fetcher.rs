//! HTTP fetcher for downloading rule documents with bounded concurrency.

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::header::{HeaderMap, HeaderValue, REFERER};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

#[cfg(test)]
use mockall::automock;

use crate::config::Config;
use crate::error::RulesError;
use crate::source::RuleSource;

/// Raw response handed back by a [`Transport`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for the network layer, allowing the fetcher to be driven by mocks.
///
/// An `Err` means the request never produced a response (DNS, connect,
/// timeout, oversized body). Non-2xx responses are `Ok` with their status.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<TransportResponse, RulesError>;
}

/// Real transport backed by `reqwest`.
pub struct HttpTransport {
    client: Client,
    max_body_bytes: usize,
}

impl HttpTransport {
    /// Build a client with the configured timeout and request headers.
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(ref referer) = config.referer {
            let value = HeaderValue::from_str(referer)
                .with_context(|| format!("Invalid referer header: {}", referer))?;
            headers.insert(REFERER, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            max_body_bytes: config.max_body_bytes,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse, RulesError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RulesError::Transport(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Ok(TransportResponse {
                status: status.as_u16(),
                body: String::new(),
            });
        }

        if let Some(content_length) = response.content_length() {
            if content_length as usize > self.max_body_bytes {
                return Err(RulesError::Transport(format!(
                    "response from {} too large: {} bytes (max: {} bytes)",
                    url, content_length, self.max_body_bytes
                )));
            }
        }

        let body = response
            .text()
            .await
            .map_err(|e| RulesError::Transport(format!("failed to read body of {}: {}", url, e)))?;

        // Content-Length may be absent (chunked)
        if body.len() > self.max_body_bytes {
            return Err(RulesError::Transport(format!(
                "response from {} too large: {} bytes (max: {} bytes)",
                url,
                body.len(),
                self.max_body_bytes
            )));
        }

        Ok(TransportResponse {
            status: status.as_u16(),
            body,
        })
    }
}

/// Result of one fetch attempt. Consumed once by the payload extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub source: RuleSource,
    pub succeeded: bool,
    /// Response body; empty when the fetch failed.
    pub body: String,
    /// `HTTP <code>` for responses, the transport message otherwise.
    pub status: String,
}

impl FetchOutcome {
    pub fn success(source: RuleSource, status: u16, body: String) -> Self {
        Self {
            source,
            succeeded: true,
            body,
            status: format!("HTTP {}", status),
        }
    }

    pub fn failure(source: RuleSource, status: impl Into<String>) -> Self {
        Self {
            source,
            succeeded: false,
            body: String::new(),
            status: status.into(),
        }
    }

    /// Turn the outcome into the body, or a transport error for callers that
    /// need the single document.
    pub fn into_body(self) -> Result<String, RulesError> {
        if self.succeeded {
            Ok(self.body)
        } else {
            Err(RulesError::Transport(format!(
                "{}: {}",
                self.source, self.status
            )))
        }
    }
}

/// Fetches rule documents with at most `concurrency` requests in flight.
pub struct Fetcher<T: Transport> {
    transport: T,
    concurrency: usize,
}

impl<T: Transport> Fetcher<T> {
    /// Create a fetcher; a cap of zero is treated as one.
    pub fn new(transport: T, concurrency: usize) -> Self {
        Self {
            transport,
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Fetch a single source. Never fails: errors are folded into the outcome.
    pub async fn fetch(&self, source: &RuleSource) -> FetchOutcome {
        debug!(url = %source, "fetching rule document");

        match self.transport.get(source.as_str()).await {
            Ok(response) if response.is_success() => {
                debug!(url = %source, bytes = response.body.len(), "fetched rule document");
                FetchOutcome::success(source.clone(), response.status, response.body)
            }
            Ok(response) => {
                warn!(url = %source, status = response.status, "rule document request rejected");
                FetchOutcome::failure(source.clone(), format!("HTTP {}", response.status))
            }
            Err(e) => {
                warn!(url = %source, error = %e, "rule document request failed");
                let reason = match e {
                    RulesError::Transport(message) => message,
                    other => other.to_string(),
                };
                FetchOutcome::failure(source.clone(), reason)
            }
        }
    }

    /// Fetch all sources, returning outcomes index-aligned with `sources`.
    ///
    /// Runs a sliding window of `concurrency` requests: a new request starts
    /// as soon as a slot frees up, while results are yielded in input order
    /// regardless of completion order. A failing source never cancels its
    /// siblings.
    pub async fn fetch_all(&self, sources: &[RuleSource]) -> Vec<FetchOutcome> {
        stream::iter(sources.iter().map(|source| self.fetch(source)))
            .buffered(self.concurrency)
            .collect()
            .await
    }
}
