//! HTTP page fetcher
//!
//! This module handles the homepage request for an audit, including:
//! - Building HTTP clients with proper user agent strings
//! - HTTPS first, with a single fallback to plain HTTP
//! - Redirect handling (capped hop count)
//! - Classification of auth walls and bot-protection pages

use async_trait::async_trait;
use reqwest::{header::SET_COOKIE, redirect::Policy, Client, StatusCode};
use std::time::Duration;
use url::Url;

use crate::config::{Config, FetcherConfig, UserAgentConfig};
use crate::fetcher::{BlockDetector, FetchedPage, PageSource};
use crate::{AuditError, Result};

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `fetcher` - Timeouts and redirect limits
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use seo_audit::config::{FetcherConfig, UserAgentConfig};
/// use seo_audit::fetcher::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    fetcher: &FetcherConfig,
) -> std::result::Result<Client, reqwest::Error> {
    let request_timeout = Duration::from_secs(fetcher.request_timeout_secs);

    Client::builder()
        .user_agent(user_agent.user_agent_string())
        .timeout(request_timeout)
        .connect_timeout(request_timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(fetcher.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Outcome of one protocol attempt
enum Attempt {
    /// Worth retrying over the other protocol
    Retryable(String),
    /// Ends the audit immediately
    Terminal(AuditError),
}

/// Fetches audit targets over HTTPS, falling back to HTTP once
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    detector: BlockDetector,
}

impl HttpFetcher {
    pub fn new(client: Client, detector: BlockDetector) -> Self {
        Self { client, detector }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = build_http_client(&config.user_agent, &config.fetcher)?;
        Ok(Self::new(
            client,
            BlockDetector::new(&config.block_detection),
        ))
    }

    /// Fetches a URL and classifies the response
    ///
    /// # Response Handling
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | Block page signature | Terminal `Blocked` |
    /// | HTTP 401 / 403 | Terminal `AuthRequired` |
    /// | HTTP 2xx / 3xx / 404 | Accepted |
    /// | Any other status | Retryable |
    /// | Network error, timeout, redirect overflow | Retryable |
    async fn attempt(&self, url: &str) -> std::result::Result<FetchedPage, Attempt> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                Attempt::Retryable("request timeout".to_string())
            } else if e.is_redirect() {
                Attempt::Retryable("too many redirects".to_string())
            } else if e.is_connect() {
                Attempt::Retryable(format!("connection failed: {}", e))
            } else {
                Attempt::Retryable(e.to_string())
            }
        })?;

        let status = response.status();
        let effective_url = response.url().clone();
        let cookies: Vec<String> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok().map(str::to_string))
            .collect();

        let html = response
            .text()
            .await
            .map_err(|e| Attempt::Retryable(format!("failed to read body: {}", e)))?;

        if let Some(signals) = self.detector.detect(&html, &cookies) {
            return Err(Attempt::Terminal(AuditError::Blocked {
                url: effective_url.to_string(),
                signals,
            }));
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Attempt::Terminal(AuditError::AuthRequired {
                url: effective_url.to_string(),
                status: status.as_u16(),
            }));
        }

        if status.is_success() || status.is_redirection() || status == StatusCode::NOT_FOUND {
            Ok(FetchedPage {
                html,
                effective_url,
                status: status.as_u16(),
            })
        } else {
            Err(Attempt::Retryable(format!("HTTP {}", status.as_u16())))
        }
    }
}

#[async_trait]
impl PageSource for HttpFetcher {
    async fn fetch(&self, domain: &str) -> Result<FetchedPage> {
        let https_url = format!("https://{}/", domain);
        let https_failure = match self.attempt(&https_url).await {
            Ok(page) => return Ok(page),
            Err(Attempt::Terminal(e)) => return Err(e),
            Err(Attempt::Retryable(reason)) => reason,
        };

        tracing::warn!(
            "HTTPS fetch of {} failed ({}), retrying over HTTP",
            domain,
            https_failure
        );

        let http_url = format!("http://{}/", domain);
        match self.attempt(&http_url).await {
            Ok(page) => Ok(page),
            Err(Attempt::Terminal(e)) => Err(e),
            Err(Attempt::Retryable(reason)) => Err(AuditError::Fetch {
                url: domain.to_string(),
                message: format!("https: {}; http: {}", https_failure, reason),
            }),
        }
    }
}

/// Returns true when the page was served over TLS
pub fn served_over_https(url: &Url) -> bool {
    url.scheme() == "https"
}
