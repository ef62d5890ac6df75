//! Memoization of pipeline runs.
//!
//! Entries are keyed by a blake3 digest of the uploaded file bytes combined
//! with the canonical parameter tuple, so a byte-identical upload with the
//! same filters and colours returns the earlier result without recomputing.
//! Failed runs are never stored.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::debug;

use crate::error::{Result, TipsError};
use crate::export::ColorHints;
use crate::filters::FilterParams;
use crate::pipeline::PipelineOutput;

pub const DEFAULT_CAPACITY: usize = 16;

/// Content-addressed key of one run
pub type CacheKey = [u8; 32];

/// Digest of the uploaded bytes plus the parameters of the run
pub fn cache_key(bytes: &[u8], params: &FilterParams, hints: &ColorHints) -> Result<CacheKey> {
    let file_digest = blake3::hash(bytes);
    let canonical = serde_json::to_vec(&(params, hints))?;

    let mut hasher = blake3::Hasher::new();
    hasher.update(file_digest.as_bytes());
    hasher.update(&canonical);
    Ok(*hasher.finalize().as_bytes())
}

pub struct ReportCache {
    entries: LruCache<CacheKey, Arc<PipelineOutput>>,
    hits: u64,
    misses: u64,
}

impl ReportCache {
    pub fn new(capacity: usize) -> std::result::Result<Self, TipsError> {
        let capacity = NonZeroUsize::new(capacity).ok_or_else(|| {
            TipsError::Validation("cache capacity must be at least 1".to_string())
        })?;
        Ok(Self {
            entries: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        })
    }

    pub fn get(&mut self, key: &CacheKey) -> Option<Arc<PipelineOutput>> {
        match self.entries.get(key) {
            Some(output) => {
                self.hits += 1;
                debug!("Report cache hit ({} hits, {} misses)", self.hits, self.misses);
                Some(Arc::clone(output))
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, key: CacheKey, output: Arc<PipelineOutput>) {
        if let Some((evicted, _)) = self.entries.push(key, output) {
            if evicted != key {
                debug!("Report cache full, evicted least recently used entry");
            }
        }
    }

    /// Return the cached output for `key`, or compute, store and return it.
    /// Errors from `compute` propagate and leave the cache untouched.
    pub fn get_or_try_insert<F>(&mut self, key: CacheKey, compute: F) -> Result<Arc<PipelineOutput>>
    where
        F: FnOnce() -> Result<PipelineOutput>,
    {
        if let Some(hit) = self.get(&key) {
            return Ok(hit);
        }
        let output = Arc::new(compute()?);
        self.insert(key, Arc::clone(&output));
        Ok(output)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for ReportCache {
    fn default() -> Self {
        Self {
            entries: LruCache::new(NonZeroUsize::MIN.saturating_add(DEFAULT_CAPACITY - 1)),
            hits: 0,
            misses: 0,
        }
    }
}
