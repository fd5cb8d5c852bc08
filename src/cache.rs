//! Bounded caches for host encoding.
//!
//! Host canonicalization leans on comparatively expensive work (IDNA
//! processing, IP-literal parsing), so the results are memoized in four
//! process-global least-recently-used caches: `idna_encode`, `idna_decode`,
//! `ip_address` and `host_validate`. Each cache holds 256 entries by
//! default and is guarded by its own lock; readers and writers of one
//! cache never contend with users of another.
//!
//! The caches can be inspected with [`info`], emptied with [`clear`]
//! (useful between test cases) and resized with [`configure`].

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;

use once_cell::sync::Lazy;

const DEFAULT_CAPACITY: usize = 256;

struct Entry<V> {
    value: V,
    last_access: u64,
}

/// A bounded map that evicts the least recently used entry.
///
/// Capacities are small, so eviction scans for the oldest access stamp
/// instead of maintaining an ordering structure.
struct LruCache<K, V> {
    entries: HashMap<K, Entry<V>>,
    capacity: Option<usize>,
    clock: u64,
    hits: u64,
    misses: u64,
}

impl<K: Hash + Eq + Clone, V: Clone> LruCache<K, V> {
    fn new(capacity: Option<usize>) -> Self {
        LruCache {
            entries: HashMap::new(),
            capacity,
            clock: 0,
            hits: 0,
            misses: 0,
        }
    }

    fn get<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.clock += 1;
        if let Some(entry) = self.entries.get_mut(key) {
            entry.last_access = self.clock;
            self.hits += 1;
            Some(entry.value.clone())
        } else {
            self.misses += 1;
            None
        }
    }

    fn insert(&mut self, key: K, value: V) {
        if self.capacity == Some(0) {
            return;
        }
        if let Some(capacity) = self.capacity {
            while self.entries.len() >= capacity && self.evict_lru() {}
        }
        self.clock += 1;
        self.entries.insert(
            key,
            Entry {
                value,
                last_access: self.clock,
            },
        );
    }

    fn evict_lru(&mut self) -> bool {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_access)
            .map(|(key, _)| key.clone());
        match oldest {
            Some(key) => self.entries.remove(&key).is_some(),
            None => false,
        }
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            capacity: self.capacity,
            len: self.entries.len(),
        }
    }
}

/// A cache shared across threads.
pub(crate) struct SharedCache<K, V> {
    inner: Mutex<LruCache<K, V>>,
}

impl<K: Hash + Eq + Clone, V: Clone> SharedCache<K, V> {
    fn new() -> Self {
        SharedCache {
            inner: Mutex::new(LruCache::new(Some(DEFAULT_CAPACITY))),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<K, V>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn reset(&self, capacity: Option<usize>) {
        *self.lock() = LruCache::new(capacity);
    }
}

impl<V: Clone> SharedCache<String, V> {
    /// Looks up `key`, computing and caching the value on a miss.
    pub(crate) fn get_or_insert_with(&self, key: &str, f: impl FnOnce(&str) -> V) -> V {
        let mut cache = self.lock();
        if let Some(value) = cache.get(key) {
            return value;
        }
        let value = f(key);
        cache.insert(key.to_owned(), value.clone());
        value
    }
}

/// Statistics of a single cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of lookups answered from the cache.
    pub hits: u64,
    /// Number of lookups that had to compute the value.
    pub misses: u64,
    /// Maximum number of entries, or `None` when unbounded.
    pub capacity: Option<usize>,
    /// Current number of entries.
    pub len: usize,
}

/// Statistics of all host-encoding caches, as returned by [`info`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheInfo {
    /// The IDNA encoding cache.
    pub idna_encode: CacheStats,
    /// The IDNA decoding cache.
    pub idna_decode: CacheStats,
    /// The IP-literal parsing cache.
    pub ip_address: CacheStats,
    /// The ASCII host validation cache.
    pub host_validate: CacheStats,
}

/// A cache size for [`configure`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheSize {
    /// Evict beyond the given number of entries.
    Bounded(usize),
    /// Never evict.
    Unbounded,
}

impl CacheSize {
    fn capacity(self) -> Option<usize> {
        match self {
            CacheSize::Bounded(n) => Some(n),
            CacheSize::Unbounded => None,
        }
    }
}

/// New sizes for [`configure`]; caches left as `None` are untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct CacheConfig {
    /// New size of the IDNA encoding cache.
    pub idna_encode_size: Option<CacheSize>,
    /// New size of the IDNA decoding cache.
    pub idna_decode_size: Option<CacheSize>,
    /// New size of the IP-literal parsing cache.
    pub ip_address_size: Option<CacheSize>,
    /// New size of the ASCII host validation cache.
    pub host_validate_size: Option<CacheSize>,
}

pub(crate) static IDNA_ENCODE: Lazy<SharedCache<String, Result<String, crate::error::Error>>> =
    Lazy::new(SharedCache::new);
pub(crate) static IDNA_DECODE: Lazy<SharedCache<String, String>> = Lazy::new(SharedCache::new);
pub(crate) static IP_ADDRESS: Lazy<SharedCache<String, Option<crate::host::IpLiteral>>> =
    Lazy::new(SharedCache::new);
pub(crate) static HOST_VALIDATE: Lazy<SharedCache<String, Result<String, crate::error::Error>>> =
    Lazy::new(SharedCache::new);

/// Empties all host-encoding caches, keeping their configured sizes.
pub fn clear() {
    IDNA_ENCODE.lock().clear();
    IDNA_DECODE.lock().clear();
    IP_ADDRESS.lock().clear();
    HOST_VALIDATE.lock().clear();
}

/// Reports statistics of all host-encoding caches.
#[must_use]
pub fn info() -> CacheInfo {
    CacheInfo {
        idna_encode: IDNA_ENCODE.lock().stats(),
        idna_decode: IDNA_DECODE.lock().stats(),
        ip_address: IP_ADDRESS.lock().stats(),
        host_validate: HOST_VALIDATE.lock().stats(),
    }
}

/// Resizes the host-encoding caches.
///
/// A resized cache starts out empty with fresh statistics.
pub fn configure(config: CacheConfig) {
    if let Some(size) = config.idna_encode_size {
        IDNA_ENCODE.reset(size.capacity());
    }
    if let Some(size) = config.idna_decode_size {
        IDNA_DECODE.reset(size.capacity());
    }
    if let Some(size) = config.ip_address_size {
        IP_ADDRESS.reset(size.capacity());
    }
    if let Some(size) = config.host_validate_size {
        HOST_VALIDATE.reset(size.capacity());
    }
}
