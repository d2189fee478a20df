//! At-most-once rating cache contract.
//!
//! The engine checks the cache before computing and writes into it after
//! computing, so a rating is computed at most once per artifact identity.
//! Entries are logically permanent — there is no TTL or invalidation, and
//! writes are full replacements. A cache failure is the one error class the
//! engine surfaces to its caller, since swallowing it would silently break
//! the at-most-once guarantee.

use crate::Result;
use crate::rating::Rating;
use ohno::app_err;
use std::collections::HashMap;
use std::sync::Mutex;

/// Key-value store of ratings keyed by artifact identity.
pub trait RatingCache: Send + Sync {
    /// Look up the rating for an artifact identity.
    fn get(&self, artifact_id: &str) -> Result<Option<Rating>>;

    /// Store a rating, replacing any previous entry for the identity.
    fn put(&self, artifact_id: &str, rating: &Rating) -> Result<()>;
}

/// In-memory rating cache.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Rating>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached ratings.
    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Rating>>> {
        self.entries.lock().map_err(|_| app_err!("rating cache lock poisoned"))
    }
}

impl RatingCache for MemoryCache {
    fn get(&self, artifact_id: &str) -> Result<Option<Rating>> {
        Ok(self.lock()?.get(artifact_id).cloned())
    }

    fn put(&self, artifact_id: &str, rating: &Rating) -> Result<()> {
        let _ = self.lock()?.insert(artifact_id.to_string(), rating.clone());
        Ok(())
    }
}
