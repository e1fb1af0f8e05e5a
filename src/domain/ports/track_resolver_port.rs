//! Track resolution port definition.

use async_trait::async_trait;

use crate::domain::errors::TrackError;

/// Port for turning a streaming-service track link into an equivalent
/// universal playback link.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrackResolverPort: Send + Sync {
    /// Resolves the track URL.
    async fn resolve(&self, track_url: &str) -> Result<String, TrackError>;
}
