//! In-memory keyed store backed by a sharded concurrent map.

use super::{Keyed, KeyedStore, StoreError};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// In-memory store.
///
/// Each shard of the underlying map has its own lock, so operations on keys
/// in different shards proceed in parallel. `get_all` visits shards one at
/// a time: each returned value is a complete version of that entry, but the
/// set as a whole is not a single point-in-time cut.
pub struct InMemoryStore<T> {
    items: DashMap<String, T>,
}

impl<T> InMemoryStore<T> {
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: DashMap::with_capacity(capacity),
        }
    }

    /// `shards` must be a power of two greater than 1.
    pub fn with_capacity_and_shards(capacity: usize, shards: usize) -> Self {
        Self {
            items: DashMap::with_capacity_and_shard_amount(capacity, shards),
        }
    }

    fn checked_key(item: &T) -> Result<String, StoreError>
    where
        T: Keyed,
    {
        let key = item.key();
        if key.is_empty() {
            return Err(StoreError::InvalidItem {
                type_name: short_type_name::<T>(),
            });
        }
        Ok(key.to_string())
    }
}

impl<T> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> KeyedStore<T> for InMemoryStore<T>
where
    T: Keyed + Clone + Send + Sync,
{
    fn put(&self, item: T) -> Result<(), StoreError> {
        let key = Self::checked_key(&item)?;
        self.items.insert(key, item);
        Ok(())
    }

    fn insert_new(&self, item: T) -> Result<(), StoreError> {
        let key = Self::checked_key(&item)?;
        match self.items.entry(key) {
            Entry::Occupied(entry) => Err(StoreError::Occupied {
                key: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                entry.insert(item);
                Ok(())
            }
        }
    }

    fn get(&self, id: &str) -> Option<T> {
        self.items.get(id).map(|item| item.value().clone())
    }

    fn get_all(&self) -> Vec<T> {
        self.items.iter().map(|item| item.value().clone()).collect()
    }

    fn update<R, F>(&self, id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        let mut item = self.items.get_mut(id)?;
        let result = f(item.value_mut());
        debug_assert_eq!(item.value().key(), id, "update changed the item key");
        Some(result)
    }

    fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
