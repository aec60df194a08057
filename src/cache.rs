//! Content-addressed cache of reconstructed pages.
//!
//! Reconstruction is a pure function of the source page and the layout
//! options, so its output can be keyed by a digest of both. Entries are
//! bounded and evicted least-recently-used.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use lru::LruCache;
use md5::{Digest, Md5};

use crate::input::SourcePage;
use crate::layout::{LayoutOptions, Reconstruction};

/// Default number of cached pages.
pub const DEFAULT_MAX_ENTRIES: usize = 256;

/// Digest identifying one (page, options) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Compute the key for a page reconstructed with the given options.
    ///
    /// The crate version is part of the digest, so upgrading the library
    /// never serves results computed by an older algorithm. Batch
    /// concurrency does not change a page's output and is left out.
    ///
    /// Floats are hashed by bit pattern and optional values carry a
    /// presence tag, so a non-finite coordinate never collides with a
    /// missing one.
    pub fn for_page(page: &SourcePage, options: &LayoutOptions) -> Self {
        let mut hasher = Md5::new();
        hasher.update(env!("CARGO_PKG_VERSION").as_bytes());
        hasher.update([0u8]);

        update_f32(&mut hasher, options.line_threshold);
        update_f32(&mut hasher, options.paragraph_gap);
        update_f32(&mut hasher, options.spacing_threshold);
        update_f32(&mut hasher, options.title_size_ratio);
        update_f32(&mut hasher, options.subtitle_size_ratio);
        update_len(&mut hasher, options.title_top_n);

        update_f32(&mut hasher, page.width);
        update_f32(&mut hasher, page.height);
        update_len(&mut hasher, page.fragments.len());
        for fragment in &page.fragments {
            update_len(&mut hasher, fragment.text.len());
            hasher.update(fragment.text.as_bytes());
            update_opt_f32(&mut hasher, fragment.x);
            update_opt_f32(&mut hasher, fragment.y);
            update_opt_f32(&mut hasher, fragment.font_size);
            hasher.update([u8::from(fragment.bold), u8::from(fragment.italic)]);
        }

        Self(hex::encode(hasher.finalize()))
    }

    /// The hex digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn update_f32(hasher: &mut Md5, value: f32) {
    hasher.update(value.to_bits().to_le_bytes());
}

fn update_opt_f32(hasher: &mut Md5, value: Option<f32>) {
    match value {
        Some(value) => {
            hasher.update([1u8]);
            update_f32(hasher, value);
        }
        None => hasher.update([0u8]),
    }
}

fn update_len(hasher: &mut Md5, len: usize) {
    hasher.update((len as u64).to_le_bytes());
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bounded, thread-safe store of reconstructed pages.
pub struct ReconstructionCache {
    entries: Mutex<LruCache<CacheKey, Arc<Reconstruction>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ReconstructionCache {
    /// Create a cache holding at most `max_entries` pages.
    ///
    /// A zero capacity is raised to one.
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<CacheKey, Arc<Reconstruction>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Look up a cached reconstruction.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<Reconstruction>> {
        let found = self.lock().get(key).cloned();
        match found {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        found
    }

    /// Store a reconstruction, returning the shared handle.
    pub fn insert(&self, key: CacheKey, value: Reconstruction) -> Arc<Reconstruction> {
        let value = Arc::new(value);
        if let Some((evicted, _)) = self.lock().push(key.clone(), Arc::clone(&value)) {
            if evicted != key {
                log::debug!("Evicted cached page {}", evicted);
            }
        }
        value
    }

    /// Return the cached value for `key`, computing and storing it on a miss.
    ///
    /// The lock is not held while `compute` runs; two workers racing on the
    /// same key both compute, and the results are identical.
    pub fn get_or_insert_with<F>(&self, key: CacheKey, compute: F) -> Arc<Reconstruction>
    where
        F: FnOnce() -> Reconstruction,
    {
        if let Some(hit) = self.get(&key) {
            return hit;
        }
        self.insert(key, compute())
    }

    /// Drop one entry. Returns whether it was present.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        self.lock().pop(key).is_some()
    }

    /// Drop every entry. Counters are kept.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of cached pages.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Maximum number of cached pages.
    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    /// Lookups that found an entry.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Lookups that found nothing.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

impl Default for ReconstructionCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl fmt::Debug for ReconstructionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReconstructionCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("hits", &self.hits())
            .field("misses", &self.misses())
            .finish()
    }
}
