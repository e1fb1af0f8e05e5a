//! HTTP fetch port definition.

use async_trait::async_trait;

use crate::domain::entities::{CachedResponse, FetchRequest};
use crate::domain::errors::FetchError;

/// Port for fetching response bodies over the network.
///
/// Implementations do not consult any cache; callers decide when a fetch is
/// needed based on the request's cache policy.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpFetchPort: Send + Sync {
    /// Fetches the body for the request, honoring its timeout.
    async fn fetch(&self, request: &FetchRequest) -> Result<CachedResponse, FetchError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::time::Duration;

    use parking_lot::Mutex;

    /// Encodes a solid PNG of the given size.
    pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = image::DynamicImage::new_rgba8(width, height);
        let mut out = Cursor::new(Vec::new());
        image
            .write_to(&mut out, image::ImageFormat::Png)
            .expect("encode png");
        out.into_inner()
    }

    #[derive(Clone)]
    struct Route {
        result: Result<CachedResponse, FetchError>,
        delay: Duration,
    }

    /// In-memory fetcher with per-URL responses, delays and call counts.
    #[derive(Default)]
    pub struct FakeFetcher {
        routes: Mutex<HashMap<String, Route>>,
        calls: Mutex<HashMap<String, usize>>,
    }

    impl FakeFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(self, url: &str, bytes: Vec<u8>) -> Self {
            self.respond_after(url, bytes, Duration::ZERO)
        }

        pub fn respond_after(self, url: &str, bytes: Vec<u8>, delay: Duration) -> Self {
            self.routes.lock().insert(
                url.to_string(),
                Route {
                    result: Ok(CachedResponse::new(bytes, None)),
                    delay,
                },
            );
            self
        }

        pub fn fail(self, url: &str, error: FetchError) -> Self {
            self.routes.lock().insert(
                url.to_string(),
                Route {
                    result: Err(error),
                    delay: Duration::ZERO,
                },
            );
            self
        }

        pub fn calls(&self, url: &str) -> usize {
            self.calls.lock().get(url).copied().unwrap_or(0)
        }
    }

    #[async_trait]
    impl HttpFetchPort for FakeFetcher {
        async fn fetch(&self, request: &FetchRequest) -> Result<CachedResponse, FetchError> {
            *self
                .calls
                .lock()
                .entry(request.url().to_string())
                .or_insert(0) += 1;

            let route = self.routes.lock().get(request.url()).cloned();
            match route {
                Some(route) => {
                    if !route.delay.is_zero() {
                        tokio::time::sleep(route.delay).await;
                    }
                    route.result
                }
                None => Err(FetchError::Status { status: 404 }),
            }
        }
    }
}
