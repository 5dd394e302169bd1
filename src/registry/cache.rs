//! Keyed get-or-create cache with first-insert-wins semantics.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

/// Concurrent memoization cache.
///
/// Each key has one slot ([`OnceLock`]); `get_or_create` runs the init
/// closure at most once per key. Concurrent requests for the same key
/// block until the first finishes, then all observe the same value. The
/// outer map lock is only held while locating the slot, never during
/// initialization, so building one key does not block lookups of others.
///
/// # Example
///
/// ```ignore
/// let cache: ResourceCache<u64, Arc<Texture>> = ResourceCache::new();
/// let texture = cache.get_or_create(key, || Arc::new(load_texture(key)));
/// ```
pub struct ResourceCache<K, V> {
    slots: Mutex<HashMap<K, Arc<OnceLock<V>>>>,
}

impl<K, V> ResourceCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached value for `key`, building it with `init` if absent.
    pub fn get_or_create(&self, key: K, init: impl FnOnce() -> V) -> V {
        let slot = {
            let mut slots = self.slots.lock();
            slots.entry(key).or_default().clone()
        };
        slot.get_or_init(init).clone()
    }

    /// Return the cached value for `key` if it has been built.
    pub fn find(&self, key: &K) -> Option<V> {
        let slot = self.slots.lock().get(key).cloned()?;
        slot.get().cloned()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Drop built entries for which `keep` returns false. Slots still
    /// being initialized are left alone.
    pub fn retain(&self, mut keep: impl FnMut(&K, &V) -> bool) {
        self.slots.lock().retain(|key, slot| match slot.get() {
            Some(value) => keep(key, value),
            None => true,
        });
    }

    /// Number of keys present (built or still building).
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }

    pub fn clear(&self) {
        self.slots.lock().clear();
    }
}

impl<K, V> Default for ResourceCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
