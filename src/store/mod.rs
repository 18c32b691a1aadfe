//! Keyed storage for definitions and instances.
//!
//! Items name their own key through [`Keyed`]; stores never inspect values
//! beyond that. Every method takes `&self` so a store can sit behind an
//! `Arc` and be shared by concurrent callers.

mod memory;

pub use memory::InMemoryStore;

use thiserror::Error;

/// A value that carries its own storage key.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Errors raised by a store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The item's key is empty
    #[error("{type_name} has no usable identifier")]
    InvalidItem { type_name: &'static str },

    /// `insert_new` found the key already taken
    #[error("'{key}' already exists")]
    Occupied { key: String },
}

/// Storage mapping a non-empty identifier to one value.
///
/// Implementations must make every method safe to call concurrently and
/// must run `update` closures while holding exclusive access to that key.
pub trait KeyedStore<T>: Send + Sync
where
    T: Keyed + Clone + Send + Sync,
{
    /// Insert or overwrite the entry under `item.key()`.
    fn put(&self, item: T) -> Result<(), StoreError>;

    /// Insert only if the key is vacant.
    fn insert_new(&self, item: T) -> Result<(), StoreError>;

    /// A copy of the stored value, if any.
    fn get(&self, id: &str) -> Option<T>;

    /// Copies of every stored value, in no particular order.
    fn get_all(&self) -> Vec<T>;

    /// Run `f` against the stored value while holding its lock.
    ///
    /// Returns `None` if the key is absent. `f` must not change the key.
    fn update<R, F>(&self, id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R;

    fn contains(&self, id: &str) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
