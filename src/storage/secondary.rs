use std::sync::Arc;
use std::time::Duration;
use crate::core::error::Result;
use crate::storage::envelope::PersistedEntry;
use crate::storage::KeyValueStore;

/// Best-effort durable tier. Nothing here ever fails the caller: errors are
/// logged and reported as a miss or a skipped write.
#[derive(Clone)]
pub struct SecondaryTier {
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
}

impl SecondaryTier {
    pub fn new(store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        SecondaryTier { store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fetch and open the entry for `key`, then hand its bytes to `decode`.
    pub async fn restore<V>(&self, key: &str, decode: impl FnOnce(&[u8]) -> Result<V>) -> Option<V> {
        let bytes = match self.store.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("secondary tier read of '{}' failed: {}", key, e);
                return None;
            }
        };

        let opened = PersistedEntry::decode(&bytes).and_then(|entry| {
            if entry.is_expired(self.ttl) {
                Ok(None)
            } else {
                entry.open().map(Some)
            }
        });

        let raw = match opened {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::debug!("secondary tier entry '{}' expired", key);
                self.discard(key).await;
                return None;
            }
            Err(e) => {
                log::warn!("discarding unreadable secondary tier entry '{}': {}", key, e);
                self.discard(key).await;
                return None;
            }
        };

        match decode(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("secondary tier entry '{}' failed to decode: {}", key, e);
                self.discard(key).await;
                None
            }
        }
    }

    /// Seal and write `raw` under `key`. Returns whether the write landed.
    pub async fn persist(&self, key: &str, raw: &[u8]) -> bool {
        let encoded = match PersistedEntry::seal(raw).encode() {
            Ok(encoded) => encoded,
            Err(e) => {
                log::warn!("could not encode secondary tier entry '{}': {}", key, e);
                return false;
            }
        };
        match self.store.put(key, encoded).await {
            Ok(()) => true,
            Err(e) => {
                log::warn!("secondary tier write of '{}' failed: {}", key, e);
                false
            }
        }
    }

    pub async fn discard(&self, key: &str) {
        if let Err(e) = self.store.delete(key).await {
            log::warn!("secondary tier delete of '{}' failed: {}", key, e);
        }
    }

    pub async fn clear(&self) {
        if let Err(e) = self.store.clear().await {
            log::warn!("secondary tier clear failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{Error, ErrorKind};
    use crate::storage::MemoryStore;
    use futures::future::{BoxFuture, FutureExt};

    /// Store whose every operation fails.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn put(&self, _key: &str, _value: Vec<u8>) -> BoxFuture<'_, Result<()>> {
            async { Err(Error::new(ErrorKind::Storage, "quota exceeded".to_string())) }.boxed()
        }
        fn get(&self, _key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>>> {
            async { Err(Error::new(ErrorKind::Storage, "unavailable".to_string())) }.boxed()
        }
        fn delete(&self, _key: &str) -> BoxFuture<'_, Result<()>> {
            async { Err(Error::new(ErrorKind::Storage, "unavailable".to_string())) }.boxed()
        }
        fn keys(&self) -> BoxFuture<'_, Result<Vec<String>>> {
            async { Err(Error::new(ErrorKind::Storage, "unavailable".to_string())) }.boxed()
        }
        fn clear(&self) -> BoxFuture<'_, Result<()>> {
            async { Err(Error::new(ErrorKind::Storage, "unavailable".to_string())) }.boxed()
        }
    }

    #[tokio::test]
    async fn persisted_bytes_restore() {
        let tier = SecondaryTier::new(Arc::new(MemoryStore::new()), Duration::from_secs(60));
        assert!(tier.persist("events", b"row data").await);

        let restored = tier.restore("events", |raw| Ok(raw.to_vec())).await;
        assert_eq!(restored, Some(b"row data".to_vec()));
    }

    #[tokio::test]
    async fn expired_entries_are_dropped() {
        let store = Arc::new(MemoryStore::new());
        let tier = SecondaryTier::new(store.clone(), Duration::ZERO);
        tier.persist("events", b"row data").await;

        assert_eq!(tier.restore("events", |raw| Ok(raw.to_vec())).await, None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn garbage_and_decode_failures_read_as_absent() {
        let store = Arc::new(MemoryStore::new());
        store.put("items", vec![0xde, 0xad]).await.unwrap();
        let tier = SecondaryTier::new(store.clone(), Duration::from_secs(60));

        assert_eq!(tier.restore("items", |raw| Ok(raw.to_vec())).await, None);

        tier.persist("items", b"ok").await;
        let failed: Option<Vec<u8>> = tier
            .restore("items", |_| Err(Error::new(ErrorKind::Serialization, "bad".to_string())))
            .await;
        assert_eq!(failed, None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn store_failures_are_swallowed() {
        let tier = SecondaryTier::new(Arc::new(BrokenStore), Duration::from_secs(60));

        assert!(!tier.persist("characters", b"x").await);
        assert_eq!(tier.restore("characters", |raw| Ok(raw.to_vec())).await, None);
        tier.clear().await;
    }
}
