//! Resource manager owning the per-kind caches.
//!
//! Keys are content-addressed: a SHA-256 digest of the raw bytes, prefixed
//! with the resource kind so identical content never collides across kinds
//! and identical content under one kind always maps to the same entry, no
//! matter which caller submitted it.

use std::time::Duration;

use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use tracing::trace;

use super::lru::LruCache;
use super::resource::CachedResource;

/// Default advisory time-to-live for cached resources.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// The kind of resource a cache entry belongs to. Each kind has its own
/// cache instance and key namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Parsed font objects.
    Font,
    /// Raw, unparsed SVG markup bytes.
    Svg,
    /// Decoded background rasters.
    Image,
}

impl ResourceKind {
    fn prefix(self) -> &'static str {
        match self {
            Self::Font => "font",
            Self::Svg => "svg",
            Self::Image => "img",
        }
    }
}

/// Owns three independent [`LruCache`] instances, one per resource kind,
/// so font, vector and raster traffic never contend on one lock.
///
/// Renderers hold a shared reference to the manager and never construct
/// caches themselves.
pub struct ResourceManager {
    svg_cache: LruCache<CachedResource>,
    font_cache: LruCache<CachedResource>,
    image_cache: LruCache<CachedResource>,
    /// Advisory expiry policy. Stored and settable, but no eviction or
    /// expiry logic consults it: entries age out purely by LRU capacity
    /// pressure. Reserved for a future wall-clock expiry mechanism.
    ttl: RwLock<Duration>,
}

impl ResourceManager {
    /// Create a manager with the given per-kind entry capacities.
    pub fn new(svg_capacity: usize, font_capacity: usize, image_capacity: usize) -> Self {
        Self {
            svg_cache: LruCache::new(svg_capacity),
            font_cache: LruCache::new(font_capacity),
            image_cache: LruCache::new(image_capacity),
            ttl: RwLock::new(DEFAULT_TTL),
        }
    }

    /// Set the advisory time-to-live.
    pub fn set_ttl(&self, ttl: Duration) {
        *self.ttl.write() = ttl;
    }

    /// The advisory time-to-live.
    pub fn ttl(&self) -> Duration {
        *self.ttl.read()
    }

    fn cache_for(&self, kind: ResourceKind) -> &LruCache<CachedResource> {
        match kind {
            ResourceKind::Font => &self.font_cache,
            ResourceKind::Svg => &self.svg_cache,
            ResourceKind::Image => &self.image_cache,
        }
    }

    /// Look up a resource by kind and content key.
    pub fn get(&self, kind: ResourceKind, key: &str) -> Option<CachedResource> {
        let scoped = format!("{}:{}", kind.prefix(), key);
        let found = self.cache_for(kind).get(&scoped);
        trace!(key = %scoped, hit = found.is_some(), "resource lookup");
        found
    }

    /// Store a resource under its kind and content key.
    ///
    /// May silently evict the least recently used entry of that kind's
    /// cache; evicted resources are simply no longer retrievable.
    pub fn put(&self, kind: ResourceKind, key: &str, resource: CachedResource) {
        let scoped = format!("{}:{}", kind.prefix(), key);
        self.cache_for(kind).put(scoped, resource);
    }

    /// Derive a content-addressed cache key: the lowercase hex SHA-256
    /// digest of `content`. Pure and deterministic.
    pub fn key_from_content(&self, content: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content);
        hex::encode(hasher.finalize())
    }

    /// Number of entries currently cached for a kind.
    pub fn len(&self, kind: ResourceKind) -> usize {
        self.cache_for(kind).len()
    }

    /// True when no kind holds any entry.
    pub fn is_empty(&self) -> bool {
        self.svg_cache.is_empty() && self.font_cache.is_empty() && self.image_cache.is_empty()
    }

    /// Drop every entry from every cache.
    pub fn clear_all(&self) {
        self.svg_cache.clear();
        self.font_cache.clear();
        self.image_cache.clear();
    }
}
