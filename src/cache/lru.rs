//! Capacity-bounded cache with least-recently-used eviction.
//!
//! Entries live in a slab; a `HashMap` gives O(1) key lookup and the slab
//! nodes carry prev/next indices forming the recency list, so promotion and
//! eviction are O(1) splices. A single `RwLock` guards each cache instance:
//! `get` takes the exclusive path because a hit promotes the entry, while
//! `len`/`capacity` only need the shared path.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;

use super::resource::CacheItem;

/// Sentinel index for "no node".
const NIL: usize = usize::MAX;

struct Node<V> {
    key: String,
    value: V,
    /// Estimated byte size of the value, recorded at insertion.
    size: usize,
    prev: usize,
    next: usize,
}

struct LruInner<V> {
    map: HashMap<String, usize>,
    slots: Vec<Option<Node<V>>>,
    free: Vec<usize>,
    head: usize,
    tail: usize,
}

impl<V> LruInner<V> {
    fn node(&self, idx: usize) -> &Node<V> {
        self.slots[idx].as_ref().expect("lru slot occupied")
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node<V> {
        self.slots[idx].as_mut().expect("lru slot occupied")
    }

    /// Unlink a node from the recency list.
    fn detach(&mut self, idx: usize) {
        let (prev, next) = {
            let node = self.node(idx);
            (node.prev, node.next)
        };
        if prev != NIL {
            self.node_mut(prev).next = next;
        } else {
            self.head = next;
        }
        if next != NIL {
            self.node_mut(next).prev = prev;
        } else {
            self.tail = prev;
        }
    }

    /// Link a node at the most-recently-used position.
    fn push_front(&mut self, idx: usize) {
        let old_head = self.head;
        {
            let node = self.node_mut(idx);
            node.prev = NIL;
            node.next = old_head;
        }
        if old_head != NIL {
            self.node_mut(old_head).prev = idx;
        } else {
            self.tail = idx;
        }
        self.head = idx;
    }

    /// Remove the least-recently-used entry. No-op on an empty cache.
    fn evict_tail(&mut self) {
        let idx = self.tail;
        if idx == NIL {
            return;
        }
        self.detach(idx);
        let node = self.slots[idx].take().expect("lru slot occupied");
        self.map.remove(&node.key);
        self.free.push(idx);
        debug!(key = %node.key, size = node.size, "evicted least recently used entry");
    }

    fn allocate(&mut self, node: Node<V>) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }
}

/// Thread-safe LRU cache holding at most `capacity` entries.
///
/// `get` and `put` are O(1) amortized. Eviction removes exactly one entry,
/// the least recently used, and is silent: the caller only observes it
/// through a later miss. A capacity of zero retains nothing.
pub struct LruCache<V> {
    capacity: usize,
    inner: RwLock<LruInner<V>>,
}

impl<V: CacheItem + Clone> LruCache<V> {
    /// Create a cache bounded to `capacity` entries. The capacity is fixed
    /// for the lifetime of the cache.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: RwLock::new(LruInner {
                map: HashMap::new(),
                slots: Vec::new(),
                free: Vec::new(),
                head: NIL,
                tail: NIL,
            }),
        }
    }

    /// Look up a key, promoting the entry to most-recently-used on a hit.
    ///
    /// Returns a clone of the stored value; for shared-immutable values the
    /// clone is a cheap handle, for byte buffers it is a deep copy.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut inner = self.inner.write();
        let idx = *inner.map.get(key)?;
        if inner.head != idx {
            inner.detach(idx);
            inner.push_front(idx);
        }
        Some(inner.node(idx).value.clone())
    }

    /// Insert or replace a value, promoting it to most-recently-used.
    ///
    /// If the insert pushes the cache past its capacity, the least recently
    /// used entry is evicted.
    pub fn put(&self, key: impl Into<String>, value: V) {
        let key = key.into();
        let size = value.size_estimate();
        let mut inner = self.inner.write();

        if let Some(&idx) = inner.map.get(&key) {
            {
                let node = inner.node_mut(idx);
                node.value = value;
                node.size = size;
            }
            if inner.head != idx {
                inner.detach(idx);
                inner.push_front(idx);
            }
            return;
        }

        let idx = inner.allocate(Node {
            key: key.clone(),
            value,
            size,
            prev: NIL,
            next: NIL,
        });
        inner.map.insert(key, idx);
        inner.push_front(idx);

        if inner.map.len() > self.capacity {
            inner.evict_tail();
        }
    }

    /// Remove an entry if present.
    pub fn remove(&self, key: &str) {
        let mut inner = self.inner.write();
        if let Some(idx) = inner.map.remove(key) {
            inner.detach(idx);
            inner.slots[idx] = None;
            inner.free.push(idx);
        }
    }

    /// Drop every entry.
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.map.clear();
        inner.slots.clear();
        inner.free.clear();
        inner.head = NIL;
        inner.tail = NIL;
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.inner.read().map.len()
    }

    /// True when the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.read().map.is_empty()
    }

    /// The fixed entry capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Arc;

    impl CacheItem for String {
        fn size_estimate(&self) -> usize {
            self.len()
        }
    }

    fn value(n: usize) -> String {
        format!("value-{}", n)
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(5)]
    #[case(16)]
    fn test_len_never_exceeds_capacity(#[case] capacity: usize) {
        let cache = LruCache::new(capacity);
        for i in 0..capacity * 3 {
            cache.put(format!("key-{}", i), value(i));
            assert!(cache.len() <= capacity);
        }
        assert_eq!(cache.len(), capacity);
    }

    #[test]
    fn test_get_miss_returns_none_without_side_effect() {
        let cache: LruCache<String> = LruCache::new(2);
        assert!(cache.get("missing").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_get_promotes_entry() {
        // Capacity 2: put A, B, get A, put C. B was least recently used
        // after A's promotion, so C's insert evicts B.
        let cache = LruCache::new(2);
        cache.put("a", value(1));
        cache.put("b", value(2));
        assert!(cache.get("a").is_some());
        cache.put("c", value(3));

        assert!(cache.get("a").is_some());
        assert!(cache.get("c").is_some());
        assert!(cache.get("b").is_none());
    }

    #[test]
    fn test_put_existing_key_replaces_and_promotes() {
        let cache = LruCache::new(2);
        cache.put("a", value(1));
        cache.put("b", value(2));
        cache.put("a", value(9));
        cache.put("c", value(3));

        assert_eq!(cache.get("a").as_deref(), Some("value-9"));
        assert!(cache.get("b").is_none());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_eviction_is_silent_and_exact() {
        let capacity = 4;
        let cache = LruCache::new(capacity);
        for i in 0..=capacity {
            cache.put(format!("key-{}", i), value(i));
        }
        // The first-inserted, untouched key is the one evicted.
        assert!(cache.get("key-0").is_none());
        for i in 1..=capacity {
            assert!(cache.get(&format!("key-{}", i)).is_some());
        }
    }

    #[test]
    fn test_remove_and_clear() {
        let cache = LruCache::new(4);
        cache.put("a", value(1));
        cache.put("b", value(2));

        cache.remove("a");
        assert!(cache.get("a").is_none());
        assert_eq!(cache.len(), 1);

        // Removing an absent key is a no-op.
        cache.remove("ghost");
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get("b").is_none());
    }

    #[test]
    fn test_zero_capacity_retains_nothing() {
        let cache = LruCache::new(0);
        cache.put("a", value(1));
        assert!(cache.get("a").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_slot_reuse_after_eviction() {
        let cache = LruCache::new(2);
        for i in 0..100 {
            cache.put(format!("key-{}", i), value(i));
        }
        assert_eq!(cache.len(), 2);
        assert!(cache.get("key-98").is_some());
        assert!(cache.get("key-99").is_some());
    }

    #[test]
    fn test_concurrent_access_holds_capacity_invariant() {
        let cache = Arc::new(LruCache::new(8));
        let mut handles = Vec::new();
        for t in 0..4 {
            let cache = Arc::clone(&cache);
            handles.push(std::thread::spawn(move || {
                for i in 0..200 {
                    let key = format!("key-{}-{}", t, i % 16);
                    cache.put(key.clone(), value(i));
                    cache.get(&key);
                }
            }));
        }
        for handle in handles {
            handle.join().expect("worker panicked");
        }
        assert!(cache.len() <= 8);
    }

    #[test]
    fn test_implements_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LruCache<String>>();
    }
}
