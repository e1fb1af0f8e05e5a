//! Domain layer with core entities and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{
    CachePolicy, CachedResponse, Embed, FetchRequest, Fragment, InlineImage, MemberDirectory,
    RequestKey, ResolvedUnit, StyledText, Token, TokenKind, UnitKey,
};
pub use errors::{DecodeError, FetchError, FormatError, ResolveError, TrackError};
pub use ports::{HttpFetchPort, ImageDecoderPort, ResponseCachePort, TrackResolverPort};
