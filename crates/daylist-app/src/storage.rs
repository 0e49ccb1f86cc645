//! Key-value persistence port consumed by [`TaskStore`](crate::TaskStore).

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::convert::Infallible;

/// Minimal key-value abstraction the task store persists through.
pub trait KeyValueStore {
    /// Error type bubbled up from the backing store.
    type Error: Into<anyhow::Error>;

    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    /// Returns a store-specific error when the value cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    /// Returns a store-specific error when the value cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;
}

impl<S> KeyValueStore for &S
where
    S: KeyValueStore + ?Sized,
{
    type Error = S::Error;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        (**self).set(key, value)
    }
}

/// In-process store; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
    writes: Cell<usize>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate `key` without counting it as a write.
    #[must_use]
    pub fn with_entry(self, key: &str, value: impl Into<String>) -> Self {
        self.entries.borrow_mut().insert(key.to_owned(), value.into());
        self
    }

    /// Number of successful [`set`](KeyValueStore::set) calls so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }

    /// Current raw value under `key`.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    type Error = Infallible;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
