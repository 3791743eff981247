//! Durable key-value storage backing the secondary cache tier.
//!
//! The trait is byte-oriented so the same envelope format works for an
//! in-memory store, a directory of files, or a browser-local store supplied
//! by the host.

pub mod envelope;
pub mod file_store;
pub mod secondary;

pub use envelope::PersistedEntry;
pub use file_store::FileStore;
pub use secondary::SecondaryTier;

use std::collections::HashMap;
use std::sync::Arc;
use futures::future::{BoxFuture, FutureExt};
use parking_lot::RwLock;
use crate::core::error::Result;

/// A generic async key-value store over byte values.
pub trait KeyValueStore: Send + Sync {
    /// Stores a value, overwriting any previous one.
    fn put(&self, key: &str, value: Vec<u8>) -> BoxFuture<'_, Result<()>>;

    /// Returns `Ok(None)` when the key does not exist.
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>>>;

    /// Succeeds even if the key did not exist.
    fn delete(&self, key: &str) -> BoxFuture<'_, Result<()>>;

    fn keys(&self) -> BoxFuture<'_, Result<Vec<String>>>;

    fn clear(&self) -> BoxFuture<'_, Result<()>>;
}

/// Process-local store, used when persistence is enabled without a directory
/// and in tests.
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn put(&self, key: &str, value: Vec<u8>) -> BoxFuture<'_, Result<()>> {
        let key = key.to_string();
        async move {
            self.data.write().insert(key, value);
            Ok(())
        }
        .boxed()
    }

    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>>> {
        let key = key.to_string();
        async move { Ok(self.data.read().get(&key).cloned()) }.boxed()
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, Result<()>> {
        let key = key.to_string();
        async move {
            self.data.write().remove(&key);
            Ok(())
        }
        .boxed()
    }

    fn keys(&self) -> BoxFuture<'_, Result<Vec<String>>> {
        async move { Ok(self.data.read().keys().cloned().collect()) }.boxed()
    }

    fn clear(&self) -> BoxFuture<'_, Result<()>> {
        async move {
            self.data.write().clear();
            Ok(())
        }
        .boxed()
    }
}
