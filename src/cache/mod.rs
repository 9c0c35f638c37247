//! Caching infrastructure for parsed fonts, raw vector data and decoded
//! backgrounds.
//!
//! The cache layer has two pieces:
//!
//! - [`LruCache`]: a generic capacity-bounded store with least-recently-used
//!   eviction. It knows nothing about what it holds.
//! - [`ResourceManager`]: owns one cache per resource kind, derives
//!   content-addressed keys and namespaces them so identical bytes never
//!   collide across kinds.
//!
//! Cached values are never mutated after insertion. [`CachedResource`]'s
//! `Clone` gives each variant the right sharing semantics: parsed fonts are
//! shared (immutable), raw SVG bytes and decoded rasters are deep-copied so
//! no two callers can alias the same backing buffer.

pub mod lru;
pub mod manager;
pub mod resource;

pub use lru::LruCache;
pub use manager::{ResourceKind, ResourceManager, DEFAULT_TTL};
pub use resource::{CacheItem, CachedResource};
