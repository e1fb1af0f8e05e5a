//! Resolver-facing error types.
//!
//! None of these reach the aggregator: resolvers log them and report an
//! empty result instead.

use thiserror::Error;

use super::FetchError;

/// Image decoding failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum DecodeError {
    #[error("failed to decode image: {message}")]
    Malformed { message: String },

    #[error("image contained no frames")]
    NoFrames,

    #[error("decode task failed: {message}")]
    Task { message: String },
}

impl DecodeError {
    /// Creates malformed data error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

/// Track link resolution failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum TrackError {
    #[error("track lookup request failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("no {platform} link available for track")]
    PlatformMissing { platform: String },

    #[error("malformed track lookup response: {message}")]
    Malformed { message: String },
}

/// Inline formatting failures on malformed rich-text syntax.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum FormatError {
    #[error("unclosed code span at byte {offset}")]
    UnclosedCodeSpan { offset: usize },

    #[error("formatting nested deeper than {max} levels")]
    NestingTooDeep { max: usize },
}

/// Any failure a resolver can run into.
#[derive(Debug, Clone, Error)]
#[allow(missing_docs)]
pub enum ResolveError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Track(#[from] TrackError),
}
