//! Cache-aware inline image loading shared by the emote and image resolvers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use parking_lot::Mutex;
use tokio::sync::{OnceCell, Semaphore};
use tracing::{debug, trace};

use crate::domain::entities::{CachePolicy, CachedResponse, FetchRequest, InlineImage, RequestKey};
use crate::domain::errors::{DecodeError, FetchError, ResolveError};
use crate::domain::ports::{HttpFetchPort, ImageDecoderPort, ResponseCachePort};

type SharedFetch = Arc<OnceCell<Result<CachedResponse, FetchError>>>;

/// Loads inline images through the shared response cache.
///
/// Cache hits decode on the calling task without suspending. Misses fetch
/// over the network, store the response under its request key and decode
/// on a blocking thread. Concurrent misses for the same key share a single
/// fetch.
pub struct ImageFetchService {
    fetcher: Arc<dyn HttpFetchPort>,
    cache: Arc<dyn ResponseCachePort>,
    decoder: Arc<dyn ImageDecoderPort>,
    permits: Arc<Semaphore>,
    in_flight: Mutex<HashMap<RequestKey, SharedFetch>>,
    timeout: Duration,
    target_size: u32,
}

impl ImageFetchService {
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn HttpFetchPort>,
        cache: Arc<dyn ResponseCachePort>,
        decoder: Arc<dyn ImageDecoderPort>,
        max_concurrent_fetches: usize,
        timeout: Duration,
        target_size: u32,
    ) -> Self {
        Self {
            fetcher,
            cache,
            decoder,
            permits: Arc::new(Semaphore::new(max_concurrent_fetches.max(1))),
            in_flight: Mutex::new(HashMap::new()),
            timeout,
            target_size,
        }
    }

    /// Loads and downsamples the image at `url`.
    ///
    /// # Errors
    /// Returns error if the fetch fails or the body is not a decodable image.
    pub async fn load_inline(
        &self,
        url: &str,
        policy: CachePolicy,
        animated: bool,
    ) -> Result<InlineImage, ResolveError> {
        let key = RequestKey::new(url, policy);

        if let Some(cached) = self.cached(&key) {
            trace!(url = %url, "Inline image cache hit");
            return Ok(decode(
                self.decoder.as_ref(),
                cached.bytes(),
                url,
                animated,
                self.target_size,
            )?);
        }

        let response = self.fetch_shared(key).await?;

        let decoder = Arc::clone(&self.decoder);
        let bytes: Bytes = response.bytes().clone();
        let source = url.to_string();
        let size = self.target_size;
        let image = tokio::task::spawn_blocking(move || {
            decode(decoder.as_ref(), &bytes, &source, animated, size)
        })
        .await
        .map_err(|e| DecodeError::Task {
            message: e.to_string(),
        })??;

        debug!(url = %url, source = "network", frames = image.frame_count(), "Inline image loaded");
        Ok(image)
    }

    fn cached(&self, key: &RequestKey) -> Option<CachedResponse> {
        if key.policy().reads_cache() {
            self.cache.get(key)
        } else {
            None
        }
    }

    async fn fetch_shared(&self, key: RequestKey) -> Result<CachedResponse, FetchError> {
        let cell = {
            let mut in_flight = self.in_flight.lock();
            Arc::clone(
                in_flight
                    .entry(key.clone())
                    .or_insert_with(|| Arc::new(OnceCell::new())),
            )
        };
        let _entry = InFlightEntry {
            in_flight: &self.in_flight,
            key: &key,
            cell: &cell,
        };

        let result = cell
            .get_or_init(|| async {
                if let Some(cached) = self.cached(&key) {
                    return Ok(cached);
                }
                let _permit = self
                    .permits
                    .acquire()
                    .await
                    .map_err(|_| FetchError::network("fetch pool closed"))?;

                debug!(url = %key.url(), policy = ?key.policy(), "Downloading inline image");
                let request = FetchRequest::new(key.clone(), self.timeout);
                let response = self.fetcher.fetch(&request).await?;
                self.cache.put(key.clone(), response.clone());
                trace!(url = %key.url(), cached = self.cache.len(), "Stored inline image response");
                Ok(response)
            })
            .await
            .clone();

        result
    }
}

/// Removes a shared fetch from the in-flight map when its waiter finishes
/// or is dropped mid-await.
struct InFlightEntry<'a> {
    in_flight: &'a Mutex<HashMap<RequestKey, SharedFetch>>,
    key: &'a RequestKey,
    cell: &'a SharedFetch,
}

impl Drop for InFlightEntry<'_> {
    fn drop(&mut self) {
        let mut in_flight = self.in_flight.lock();
        if in_flight
            .get(self.key)
            .is_some_and(|c| Arc::ptr_eq(c, self.cell))
        {
            in_flight.remove(self.key);
        }
    }
}

fn decode(
    decoder: &dyn ImageDecoderPort,
    bytes: &[u8],
    source: &str,
    animated: bool,
    size: u32,
) -> Result<InlineImage, DecodeError> {
    let frames = if animated {
        decoder.decode_frames(bytes)?
    } else {
        vec![decoder.decode(bytes)?]
    };
    let frames = frames
        .iter()
        .map(|frame| decoder.downsample(frame, size))
        .collect();
    InlineImage::new(source, frames).ok_or(DecodeError::NoFrames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::{FakeFetcher, png_bytes};
    use crate::infrastructure::cache::MemoryResponseCache;
    use crate::infrastructure::image::ImageCrateDecoder;

    const URL: &str = "https://example.com/pic.png";

    fn service(fetcher: Arc<FakeFetcher>, cache: Arc<MemoryResponseCache>) -> ImageFetchService {
        ImageFetchService::new(
            fetcher,
            cache,
            Arc::new(ImageCrateDecoder),
            4,
            Duration::from_secs(3),
            40,
        )
    }

    #[tokio::test]
    async fn test_miss_fetches_stores_and_downsamples() {
        let fetcher = Arc::new(FakeFetcher::new().respond(URL, png_bytes(200, 100)));
        let cache = Arc::new(MemoryResponseCache::new(16));
        let svc = service(Arc::clone(&fetcher), Arc::clone(&cache));

        let image = svc
            .load_inline(URL, CachePolicy::UseProtocolDefault, false)
            .await
            .unwrap();

        assert_eq!(image.dimensions(), (40, 20));
        assert_eq!(fetcher.calls(URL), 1);
        assert!(svc.in_flight.lock().is_empty());
        assert!(
            cache
                .get(&RequestKey::new(URL, CachePolicy::UseProtocolDefault))
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_second_load_hits_cache() {
        let fetcher = Arc::new(FakeFetcher::new().respond(URL, png_bytes(10, 10)));
        let cache = Arc::new(MemoryResponseCache::new(16));
        let svc = service(Arc::clone(&fetcher), cache);

        for _ in 0..2 {
            svc.load_inline(URL, CachePolicy::UseProtocolDefault, false)
                .await
                .unwrap();
        }
        assert_eq!(fetcher.calls(URL), 1);
    }

    #[tokio::test]
    async fn test_concurrent_misses_share_one_fetch() {
        let fetcher = Arc::new(FakeFetcher::new().respond_after(
            URL,
            png_bytes(10, 10),
            Duration::from_millis(50),
        ));
        let svc = Arc::new(service(
            Arc::clone(&fetcher),
            Arc::new(MemoryResponseCache::new(16)),
        ));

        let a = {
            let svc = Arc::clone(&svc);
            tokio::spawn(async move {
                svc.load_inline(URL, CachePolicy::UseProtocolDefault, false)
                    .await
            })
        };
        let b = {
            let svc = Arc::clone(&svc);
            tokio::spawn(async move {
                svc.load_inline(URL, CachePolicy::UseProtocolDefault, false)
                    .await
            })
        };

        assert!(a.await.unwrap().is_ok());
        assert!(b.await.unwrap().is_ok());
        assert_eq!(fetcher.calls(URL), 1);
    }

    #[tokio::test]
    async fn test_aborted_load_clears_in_flight_entry() {
        let fetcher = Arc::new(FakeFetcher::new().respond_after(
            URL,
            png_bytes(10, 10),
            Duration::from_millis(200),
        ));
        let svc = Arc::new(service(fetcher, Arc::new(MemoryResponseCache::new(16))));

        let task = {
            let svc = Arc::clone(&svc);
            tokio::spawn(async move {
                svc.load_inline(URL, CachePolicy::UseProtocolDefault, false)
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(svc.in_flight.lock().len(), 1);

        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());
        assert!(svc.in_flight.lock().is_empty());
    }

    #[tokio::test]
    async fn test_reload_policy_skips_cache_read() {
        let fetcher = Arc::new(FakeFetcher::new().respond(URL, png_bytes(10, 10)));
        let svc = service(Arc::clone(&fetcher), Arc::new(MemoryResponseCache::new(16)));

        for _ in 0..2 {
            svc.load_inline(URL, CachePolicy::ReloadIgnoringCache, false)
                .await
                .unwrap();
        }
        assert_eq!(fetcher.calls(URL), 2);
    }

    #[tokio::test]
    async fn test_fetch_error_surfaces() {
        let fetcher = Arc::new(FakeFetcher::new().fail(URL, FetchError::Timeout { timeout_ms: 3000 }));
        let svc = service(fetcher, Arc::new(MemoryResponseCache::new(16)));

        let err = svc
            .load_inline(URL, CachePolicy::UseProtocolDefault, false)
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::Fetch(e) if e.is_timeout()));
    }

    #[tokio::test]
    async fn test_garbage_body_is_decode_error() {
        let fetcher = Arc::new(FakeFetcher::new().respond(URL, b"not an image".to_vec()));
        let svc = service(fetcher, Arc::new(MemoryResponseCache::new(16)));

        let err = svc
            .load_inline(URL, CachePolicy::UseProtocolDefault, false)
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::Decode(_)));
    }
}
