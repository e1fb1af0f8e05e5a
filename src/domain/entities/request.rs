use std::time::Duration;

use bytes::Bytes;

/// How a request interacts with the shared response cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CachePolicy {
    /// Use a cached response if one exists for this exact request.
    #[default]
    UseProtocolDefault,
    /// Prefer cached data regardless of age, load only on a miss.
    ReturnCacheDataElseLoad,
    /// Always go to the network; the response is still stored.
    ReloadIgnoringCache,
}

impl CachePolicy {
    /// Returns true if the cache should be consulted before fetching.
    #[must_use]
    pub const fn reads_cache(self) -> bool {
        !matches!(self, Self::ReloadIgnoringCache)
    }
}

/// Cache key: the URL together with the policy it was requested with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    url: String,
    policy: CachePolicy,
}

impl RequestKey {
    /// Creates a key for the given request.
    #[must_use]
    pub fn new(url: impl Into<String>, policy: CachePolicy) -> Self {
        Self {
            url: url.into(),
            policy,
        }
    }

    /// Request URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Cache policy the request was made with.
    #[must_use]
    pub const fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Short stable digest of the URL, used in logs.
    #[must_use]
    pub fn digest(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(self.url.as_bytes());
        let result = hasher.finalize();
        hex::encode(&result[..8])
    }
}

impl std::fmt::Display for RequestKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:?})", self.url, self.policy)
    }
}

/// A fetch to perform through the HTTP capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    key: RequestKey,
    timeout: Duration,
}

impl FetchRequest {
    /// Creates a fetch request.
    #[must_use]
    pub const fn new(key: RequestKey, timeout: Duration) -> Self {
        Self { key, timeout }
    }

    /// Cache key for this request.
    #[must_use]
    pub const fn key(&self) -> &RequestKey {
        &self.key
    }

    /// Request URL.
    #[must_use]
    pub fn url(&self) -> &str {
        self.key.url()
    }

    /// Request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// A stored response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    bytes: Bytes,
    content_type: Option<String>,
}

impl CachedResponse {
    /// Creates a response.
    #[must_use]
    pub fn new(bytes: impl Into<Bytes>, content_type: Option<String>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type,
        }
    }

    /// Response body.
    #[must_use]
    pub const fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Content type header, if the server sent one.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Body size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the body is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
