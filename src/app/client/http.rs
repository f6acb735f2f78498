//! HTTP transport for single page requests
//!
//! This module provides the [`PageTransport`] seam used by the retry policy and
//! its reqwest-backed implementation. The transport performs exactly one
//! request per call and reports the raw status and body; deciding what counts
//! as a failure and whether to retry is left to the caller.

use std::fmt::Debug;
use std::num::NonZeroU32;

use async_trait::async_trait;
use governor::{clock::DefaultClock, state::InMemoryState, state::NotKeyed, Quota, RateLimiter};
use reqwest::Client;
use url::Url;

use crate::app::client::config::ClientConfig;
use crate::app::query::SearchQuery;
use crate::constants::http;
use crate::errors::{FetchError, FetchResult};

type RequestQuota = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Status and body of one page response, before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPage {
    pub status: u16,
    pub body: String,
}

impl RawPage {
    /// Create a raw page from a status code and body text
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the response carried HTTP 200
    pub fn is_success(&self) -> bool {
        self.status == http::STATUS_OK
    }
}

/// Issues a single request for one page of a query
#[async_trait]
pub trait PageTransport: Send + Sync + Debug {
    /// Request `page` of `query` once
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if no response could be obtained. A
    /// response with a non-200 status is returned as `Ok`.
    async fn get_page(&self, query: &SearchQuery, page: u32) -> FetchResult<RawPage>;
}

/// reqwest-backed transport for the sold-properties endpoint
#[derive(Debug)]
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
    request_quota: Option<RequestQuota>,
}

impl HttpTransport {
    /// Creates a new transport from client configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the endpoint is not a valid URL, the rate limit
    /// is zero, or the HTTP client cannot be built
    pub fn new(config: &ClientConfig) -> FetchResult<Self> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| FetchError::InvalidUrl {
            url: config.endpoint.clone(),
            error: e.to_string(),
        })?;
        let client = config.build_http_client()?;
        let request_quota = config
            .rate_limit_rps
            .map(Self::build_request_quota)
            .transpose()?;

        Ok(Self {
            client,
            endpoint,
            request_quota,
        })
    }

    /// Builds the global requests-per-second cap
    fn build_request_quota(rate_limit_rps: u32) -> FetchResult<RequestQuota> {
        let rps = NonZeroU32::new(rate_limit_rps).ok_or_else(|| {
            FetchError::Configuration("Rate limit must be non-zero".to_string())
        })?;
        Ok(RateLimiter::direct(Quota::per_second(rps)))
    }

    /// Endpoint this transport requests
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl PageTransport for HttpTransport {
    async fn get_page(&self, query: &SearchQuery, page: u32) -> FetchResult<RawPage> {
        if let Some(quota) = &self.request_quota {
            quota.until_ready().await;
        }

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&query.to_params(page))
            .send()
            .await?;

        let status = response.status().as_u16();
        tracing::debug!("GET {} -> {}", response.url(), status);
        let body = response.text().await?;

        Ok(RawPage { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_request_quota_creation() {
        let quota = HttpTransport::build_request_quota(5).unwrap();
        quota.until_ready().await;
    }

    #[test]
    fn test_request_quota_zero_fails() {
        let result = HttpTransport::build_request_quota(0);
        assert!(matches!(result, Err(FetchError::Configuration(_))));
    }

    #[test]
    fn test_transport_creation() {
        let transport = HttpTransport::new(&ClientConfig::default()).unwrap();
        assert_eq!(transport.endpoint().host_str(), Some("www.rightmove.co.uk"));
    }

    #[test]
    fn test_transport_rejects_bad_endpoint() {
        let config = ClientConfig {
            endpoint: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            HttpTransport::new(&config),
            Err(FetchError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_raw_page_success() {
        assert!(RawPage::new(200, "{}").is_success());
        assert!(!RawPage::new(429, "slow down").is_success());
        assert!(!RawPage::new(204, "").is_success());
    }
}
