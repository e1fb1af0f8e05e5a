//! reqwest-backed fetch adapter.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, trace};

use crate::domain::entities::{CachedResponse, FetchRequest};
use crate::domain::errors::FetchError;
use crate::domain::ports::HttpFetchPort;

const USER_AGENT: &str = concat!("oxiline/", env!("CARGO_PKG_VERSION"));

/// HTTP client used for images, emotes and track lookups.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    /// Creates a fetcher with a connect timeout.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(connect_timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| FetchError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

fn map_send_error(error: &reqwest::Error, timeout: Duration) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    } else if error.is_builder() {
        FetchError::invalid_url(
            error.url().map_or_else(String::new, ToString::to_string),
            error.to_string(),
        )
    } else {
        FetchError::network(format!("Request failed: {error}"))
    }
}

#[async_trait]
impl HttpFetchPort for ReqwestFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<CachedResponse, FetchError> {
        trace!(url = %request.url(), timeout = ?request.timeout(), "Sending request");

        let url = reqwest::Url::parse(request.url())
            .map_err(|e| FetchError::invalid_url(request.url(), e.to_string()))?;

        let response = self
            .client
            .get(url)
            .timeout(request.timeout())
            .send()
            .await
            .map_err(|e| map_send_error(&e, request.timeout()))?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status().as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| map_send_error(&e, request.timeout()))
            .map_err(|e| match e {
                FetchError::Network { message } => FetchError::body(message),
                other => other,
            })?;

        debug!(url = %request.url(), size = bytes.len(), "Fetched response");

        Ok(CachedResponse::new(bytes, content_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{CachePolicy, RequestKey};

    #[test]
    fn test_fetcher_creation() {
        assert!(ReqwestFetcher::new(Duration::from_secs(3)).is_ok());
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected_before_sending() {
        let fetcher = ReqwestFetcher::new(Duration::from_secs(1)).unwrap();
        let request = FetchRequest::new(
            RequestKey::new("not a url", CachePolicy::UseProtocolDefault),
            Duration::from_secs(1),
        );

        let result = fetcher.fetch(&request).await;
        assert!(matches!(result, Err(FetchError::InvalidUrl { .. })));
    }
}
