//! Song link lookup client.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::entities::{CachePolicy, FetchRequest, RequestKey};
use crate::domain::errors::{FetchError, TrackError};
use crate::domain::ports::{HttpFetchPort, TrackResolverPort};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinksResponse {
    #[serde(default)]
    links_by_platform: HashMap<String, PlatformLink>,
}

#[derive(Debug, Deserialize)]
struct PlatformLink {
    url: String,
}

/// Resolves track links through a song.link-compatible lookup service.
pub struct SongLinkClient {
    fetcher: Arc<dyn HttpFetchPort>,
    endpoint: String,
    platform: String,
    timeout: Duration,
}

impl SongLinkClient {
    /// Creates a client for the given endpoint and target platform.
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn HttpFetchPort>,
        endpoint: impl Into<String>,
        platform: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            fetcher,
            endpoint: endpoint.into(),
            platform: platform.into(),
            timeout,
        }
    }

    fn lookup_url(&self, track_url: &str) -> Result<String, FetchError> {
        reqwest::Url::parse_with_params(&self.endpoint, &[("url", track_url)])
            .map(String::from)
            .map_err(|e| FetchError::invalid_url(&self.endpoint, e.to_string()))
    }
}

#[async_trait]
impl TrackResolverPort for SongLinkClient {
    async fn resolve(&self, track_url: &str) -> Result<String, TrackError> {
        let request = FetchRequest::new(
            RequestKey::new(self.lookup_url(track_url)?, CachePolicy::UseProtocolDefault),
            self.timeout,
        );
        let response = self.fetcher.fetch(&request).await?;

        let body: LinksResponse =
            serde_json::from_slice(response.bytes()).map_err(|e| TrackError::Malformed {
                message: e.to_string(),
            })?;

        let link = body
            .links_by_platform
            .get(&self.platform)
            .map(|link| link.url.clone())
            .ok_or_else(|| TrackError::PlatformMissing {
                platform: self.platform.clone(),
            })?;

        debug!(track = %track_url, platform = %self.platform, "Resolved track link");
        Ok(link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::CachedResponse;
    use crate::domain::ports::MockHttpFetchPort;

    const ENDPOINT: &str = "https://api.song.link/v1-alpha.1/links";
    const TRACK: &str = "https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC";

    fn client(fetcher: MockHttpFetchPort, platform: &str) -> SongLinkClient {
        SongLinkClient::new(Arc::new(fetcher), ENDPOINT, platform, Duration::from_secs(3))
    }

    #[tokio::test]
    async fn test_resolves_platform_link() {
        let mut fetcher = MockHttpFetchPort::new();
        fetcher
            .expect_fetch()
            .withf(|request| {
                request.url().starts_with(ENDPOINT) && request.url().contains("open.spotify.com")
            })
            .times(1)
            .returning(|_| {
                Ok(CachedResponse::new(
                    r#"{"linksByPlatform":{"appleMusic":{"url":"https://music.apple.com/x"},"youtube":{"url":"https://youtube.com/y"}}}"#.as_bytes(),
                    Some("application/json".to_string()),
                ))
            });

        let link = client(fetcher, "appleMusic").resolve(TRACK).await.unwrap();
        assert_eq!(link, "https://music.apple.com/x");
    }

    #[tokio::test]
    async fn test_missing_platform() {
        let mut fetcher = MockHttpFetchPort::new();
        fetcher
            .expect_fetch()
            .returning(|_| Ok(CachedResponse::new(r#"{"linksByPlatform":{}}"#.as_bytes(), None)));

        let result = client(fetcher, "appleMusic").resolve(TRACK).await;
        assert!(matches!(result, Err(TrackError::PlatformMissing { .. })));
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let mut fetcher = MockHttpFetchPort::new();
        fetcher
            .expect_fetch()
            .returning(|_| Err(FetchError::Status { status: 500 }));

        let result = client(fetcher, "appleMusic").resolve(TRACK).await;
        assert!(matches!(result, Err(TrackError::Fetch(FetchError::Status { status: 500 }))));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mut fetcher = MockHttpFetchPort::new();
        fetcher
            .expect_fetch()
            .returning(|_| Ok(CachedResponse::new("<html>".as_bytes(), None)));

        let result = client(fetcher, "appleMusic").resolve(TRACK).await;
        assert!(matches!(result, Err(TrackError::Malformed { .. })));
    }
}
