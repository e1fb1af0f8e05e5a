//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub(super) const APP_NAME: &str = "oxiline";
pub(super) const APP_QUALIFIER: &str = "com";
pub(super) const APP_ORGANIZATION: &str = "linuxmobile";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(default)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Inline resolution pipeline settings.
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Embed card settings.
    #[serde(default)]
    pub embed: EmbedConfig,
}

/// Inline resolution pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Edge length of downsampled inline images, in pixels.
    #[serde(default = "default_inline_size")]
    pub inline_image_size: u32,

    /// Size requested from the emote CDN.
    #[serde(default = "default_inline_size")]
    pub emote_size: u32,

    /// Per-request fetch timeout in seconds.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Maximum number of responses kept in the shared cache.
    #[serde(default = "default_response_cache_capacity")]
    pub response_cache_capacity: usize,

    /// Maximum concurrent network fetches across all jobs.
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,

    /// Base URL of the custom emote CDN.
    #[serde(default = "default_emote_cdn_base")]
    pub emote_cdn_base: String,

    /// Track lookup service endpoint.
    #[serde(default = "default_track_resolver_endpoint")]
    pub track_resolver_endpoint: String,

    /// Platform whose link is used from the track lookup response.
    #[serde(default = "default_track_platform")]
    pub track_platform: String,

    /// Label used for mentions of users missing from the member directory.
    #[serde(default = "default_unknown_user_label")]
    pub unknown_user_label: String,

    /// Animation clock tick interval in milliseconds.
    #[serde(default = "default_animation_interval_ms")]
    pub animation_interval_ms: u64,

    /// Number of ticks before the animation clock wraps.
    #[serde(default = "default_animation_frames")]
    pub animation_frames: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            inline_image_size: default_inline_size(),
            emote_size: default_inline_size(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            response_cache_capacity: default_response_cache_capacity(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
            emote_cdn_base: default_emote_cdn_base(),
            track_resolver_endpoint: default_track_resolver_endpoint(),
            track_platform: default_track_platform(),
            unknown_user_label: default_unknown_user_label(),
            animation_interval_ms: default_animation_interval_ms(),
            animation_frames: default_animation_frames(),
        }
    }
}

impl PipelineConfig {
    /// Fetch timeout as a duration.
    #[must_use]
    pub const fn fetch_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Animation tick interval as a duration.
    #[must_use]
    pub const fn animation_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.animation_interval_ms)
    }
}

/// Embed card configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmbedConfig {
    /// Columns in the field grid.
    #[serde(default = "default_grid_columns")]
    pub grid_columns: usize,

    /// Maximum media frame width.
    #[serde(default = "default_max_media_width")]
    pub max_media_width: u32,

    /// Maximum media frame height.
    #[serde(default = "default_max_media_height")]
    pub max_media_height: u32,

    /// Show links in descriptions as their host name only.
    #[serde(default = "default_true")]
    pub shorten_links: bool,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            grid_columns: default_grid_columns(),
            max_media_width: default_max_media_width(),
            max_media_height: default_max_media_height(),
            shorten_links: true,
        }
    }
}

const fn default_inline_size() -> u32 {
    40
}

const fn default_fetch_timeout_secs() -> u64 {
    3
}

const fn default_response_cache_capacity() -> usize {
    256
}

const fn default_max_concurrent_fetches() -> usize {
    8
}

fn default_emote_cdn_base() -> String {
    "https://cdn.discordapp.com/emojis".to_string()
}

fn default_track_resolver_endpoint() -> String {
    "https://api.song.link/v1-alpha.1/links".to_string()
}

fn default_track_platform() -> String {
    "appleMusic".to_string()
}

fn default_unknown_user_label() -> String {
    "Unknown user".to_string()
}

const fn default_animation_interval_ms() -> u64 {
    50
}

const fn default_animation_frames() -> u64 {
    20
}

const fn default_grid_columns() -> usize {
    4
}

const fn default_max_media_width() -> u32 {
    380
}

const fn default_max_media_height() -> u32 {
    300
}

const fn default_true() -> bool {
    true
}

use super::args::CliArgs;

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(size) = args.inline_image_size {
            self.pipeline.inline_image_size = size;
            self.pipeline.emote_size = size;
        }
        if let Some(timeout) = args.fetch_timeout_secs {
            self.pipeline.fetch_timeout_secs = timeout;
        }
        if let Some(platform) = &args.track_platform {
            self.pipeline.track_platform.clone_from(platform);
        }
        if let Some(columns) = args.grid_columns {
            self.embed.grid_columns = columns;
        }
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("oxiline.log"))
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}
