mod http_fetch_port;
mod image_decoder_port;
mod response_cache_port;
mod track_resolver_port;

pub use http_fetch_port::HttpFetchPort;
pub use image_decoder_port::ImageDecoderPort;
pub use response_cache_port::ResponseCachePort;
pub use track_resolver_port::TrackResolverPort;

#[cfg(test)]
pub use http_fetch_port::MockHttpFetchPort;
#[cfg(test)]
pub use track_resolver_port::MockTrackResolverPort;

#[cfg(test)]
pub mod mocks {
    pub use super::http_fetch_port::mock::{FakeFetcher, png_bytes};
}
