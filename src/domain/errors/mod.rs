//! Domain error types.

mod fetch_error;
mod resolve_error;

pub use fetch_error::FetchError;
pub use resolve_error::{DecodeError, FormatError, ResolveError, TrackError};
