//! Port definition for the shared response cache.

use crate::domain::entities::{CachedResponse, RequestKey};

/// Process-wide keyed store of fetched responses.
///
/// Shared by every job and resolver kind, so implementations must be safe
/// for concurrent reads and writes. Lookups never suspend.
pub trait ResponseCachePort: Send + Sync {
    /// Returns the stored response for this exact request, if any.
    fn get(&self, key: &RequestKey) -> Option<CachedResponse>;

    /// Stores a response.
    fn put(&self, key: RequestKey, response: CachedResponse);

    /// Returns the current number of stored responses.
    fn len(&self) -> usize;

    /// Returns true if the cache is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
