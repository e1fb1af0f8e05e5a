//! Infrastructure layer with external service adapters.

/// Response caching.
pub mod cache;
/// Application configuration.
pub mod config;
/// HTTP transport.
pub mod http;
/// Image decoding and CDN helpers.
pub mod image;
/// Track link lookup service.
pub mod track;

pub use cache::{CacheStats, MemoryResponseCache};
pub use config::{AppConfig, CliArgs, EmbedConfig, LogLevel, PipelineConfig, StorageManager};
pub use http::ReqwestFetcher;
pub use image::ImageCrateDecoder;
pub use track::SongLinkClient;
