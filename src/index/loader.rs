use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;
use futures::future::{self, BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use crate::core::config::LoaderConfig;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::stats::{CacheStats, LoadMetrics, LoadOrigin};
use crate::core::types::{RawRow, RecordId, RecordRef, RecordSet};
use crate::index::descriptor::CollectionDescriptor;
use crate::index::lookup::{CollectionIndex, LookupIndex};
use crate::memory::cache_store::{CacheStore, Lookup};

/// In-flight load of one collection, shared by every caller that asks for it
/// before it settles.
type PendingLoad = Shared<BoxFuture<'static, Result<RecordSet>>>;

/// Approximate footprint of a collection for the cache's memory bound.
pub fn footprint(records: &[RecordRef]) -> usize {
    records
        .iter()
        .map(|record| record.approx_bytes() + std::mem::size_of::<RecordRef>())
        .sum()
}

/// Turns raw rows into cached, indexed collections, at most once per cache
/// miss no matter how many callers race for the same collection.
#[derive(Clone)]
pub struct RecordLoader {
    descriptors: Arc<Vec<Arc<CollectionDescriptor>>>,
    cache: CacheStore<RecordSet>,
    index: LookupIndex,
    pending: Arc<Mutex<HashMap<String, PendingLoad>>>,
    metrics: Arc<Mutex<BTreeMap<String, LoadMetrics>>>,
    config: LoaderConfig,
}

impl RecordLoader {
    pub fn new(
        descriptors: Vec<CollectionDescriptor>,
        cache: CacheStore<RecordSet>,
        config: LoaderConfig,
    ) -> Result<Self> {
        let mut registered: Vec<Arc<CollectionDescriptor>> = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            if registered.iter().any(|d| d.name == descriptor.name) {
                return Err(Error::new(
                    ErrorKind::InvalidInput,
                    format!("collection '{}' registered twice", descriptor.name),
                ));
            }
            registered.push(Arc::new(descriptor));
        }

        Ok(RecordLoader {
            descriptors: Arc::new(registered),
            cache,
            index: LookupIndex::new(),
            pending: Arc::new(Mutex::new(HashMap::new())),
            metrics: Arc::new(Mutex::new(BTreeMap::new())),
            config,
        })
    }

    /// Registered collection names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.descriptors.iter().map(|d| d.name.clone()).collect()
    }

    pub fn descriptors(&self) -> &[Arc<CollectionDescriptor>] {
        &self.descriptors
    }

    pub fn descriptor(&self, name: &str) -> Result<Arc<CollectionDescriptor>> {
        self.descriptors
            .iter()
            .find(|d| d.name == name)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("unknown collection '{}'", name)))
    }

    /// Load `name`, serving the cache when possible and joining an in-flight
    /// load when one exists.
    pub async fn load(&self, name: &str) -> Result<RecordSet> {
        let descriptor = self.descriptor(name)?;

        match self.cache.lookup(name) {
            Lookup::Hit(records) => {
                log::debug!("cache hit for '{}'", name);
                return Ok(records);
            }
            Lookup::Expired => self.index.clear(name),
            Lookup::Miss => {}
        }

        let load = {
            let mut pending = self.pending.lock();
            match pending.get(name) {
                Some(in_flight) => {
                    log::debug!("joining in-flight load of '{}'", name);
                    in_flight.clone()
                }
                None => {
                    // A load may have settled between the first check and the lock.
                    if let Some(records) = self.cache.peek(name) {
                        return Ok(records);
                    }
                    let loader = self.clone();
                    let load = async move { loader.run_load(descriptor).await }
                        .boxed()
                        .shared();
                    pending.insert(name.to_string(), load.clone());
                    load
                }
            }
        };

        load.await
    }

    /// Load every registered collection concurrently. One failure does not
    /// hold back the others.
    pub async fn load_all(&self) -> Vec<(String, Result<RecordSet>)> {
        let loads = self.names().into_iter().map(|name| async move {
            let result = self.load(&name).await;
            (name, result)
        });
        future::join_all(loads).await
    }

    /// Drop the cached copy (both tiers) and the index of `name`, then load it
    /// again. A load already in flight is allowed to settle first, so the
    /// result always comes from a pass that started after the call.
    pub async fn reload(&self, name: &str) -> Result<RecordSet> {
        self.descriptor(name)?;
        let in_flight = self.pending.lock().get(name).cloned();
        if let Some(in_flight) = in_flight {
            let _ = in_flight.await;
        }
        self.cache.forget(name).await;
        self.index.clear(name);
        self.load(name).await
    }

    /// Last cached collection, or an empty one. Counts as an access for
    /// eviction purposes but never starts a load.
    pub fn get(&self, name: &str) -> RecordSet {
        match self.cache.lookup(name) {
            Lookup::Hit(records) => records,
            Lookup::Expired => {
                self.index.clear(name);
                RecordSet::default()
            }
            Lookup::Miss => RecordSet::default(),
        }
    }

    /// Like `get`, but leaves recency, hit counters and expiry untouched.
    /// Used by searches, which must not reorder the cache.
    pub fn peek(&self, name: &str) -> RecordSet {
        self.cache.peek(name).unwrap_or_default()
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.cache.has(name)
    }

    pub fn lookup_by_id(&self, name: &str, id: RecordId) -> Option<RecordRef> {
        if !self.cache.has(name) {
            return None;
        }
        self.index.lookup_by_id(name, id)
    }

    pub fn lookup_by_key(&self, name: &str, key: &str) -> Option<RecordRef> {
        if !self.cache.has(name) {
            return None;
        }
        self.index.lookup_by_key(name, key)
    }

    /// Sweep expired collections together with their indices.
    pub fn evict_expired(&self) -> usize {
        let expired = self.cache.evict_expired_keys();
        for name in &expired {
            self.index.clear(name);
        }
        if !expired.is_empty() {
            log::debug!("expired collections: {:?}", expired);
        }
        expired.len()
    }

    /// Clear both cache tiers and every index. In-flight loads still complete
    /// and cache their result.
    pub async fn clear_cache(&self) {
        self.cache.clear_all().await;
        self.index.clear_all();
        log::info!("record cache cleared");
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn metrics(&self, name: &str) -> Option<LoadMetrics> {
        self.metrics.lock().get(name).cloned()
    }

    pub fn all_metrics(&self) -> BTreeMap<String, LoadMetrics> {
        self.metrics.lock().clone()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }

    async fn run_load(self, descriptor: Arc<CollectionDescriptor>) -> Result<RecordSet> {
        let name = descriptor.name.clone();
        let result = self.produce(&descriptor).await;
        self.pending.lock().remove(&name);

        match result {
            Ok(records) => Ok(records),
            Err(cause) => {
                log::warn!("load of '{}' failed: {}", name, cause);
                Err(Error::load(&name, cause))
            }
        }
    }

    async fn produce(&self, descriptor: &CollectionDescriptor) -> Result<RecordSet> {
        let name = descriptor.name.as_str();

        if let Some(records) = self.restore(descriptor).await {
            return Ok(records);
        }

        let rows = descriptor.source.read().await?;
        if rows.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "raw source produced no rows".to_string(),
            ));
        }

        let started = Instant::now();
        let threshold = descriptor.chunk_threshold.unwrap_or(self.config.chunk_threshold);
        let (records, chunks) = if rows.len() > threshold {
            self.transform_chunked(descriptor, &rows).await?
        } else {
            (transform_rows(descriptor, &rows, 0)?, 1)
        };
        let index = CollectionIndex::build(&records)?;
        let parse_duration = started.elapsed();

        let records: RecordSet = Arc::new(records);
        self.admit(name, records.clone(), index);
        self.record_metrics(LoadMetrics {
            collection: name.to_string(),
            row_count: records.len(),
            parse_duration,
            chunks,
            origin: LoadOrigin::Source,
        });

        self.cache
            .mirror(name, || (descriptor.encode)(&records))
            .await;
        Ok(records)
    }

    /// Consult the secondary tier. Restored collections are re-validated
    /// before they are served; anything unusable is discarded.
    async fn restore(&self, descriptor: &CollectionDescriptor) -> Option<RecordSet> {
        if !self.cache.has_secondary() {
            return None;
        }
        let name = descriptor.name.as_str();
        let started = Instant::now();

        let mut built = None;
        let decode = |raw: &[u8]| -> Result<RecordSet> {
            let records = (descriptor.decode)(raw)?;
            if records.is_empty() {
                return Err(Error::new(
                    ErrorKind::Storage,
                    "persisted collection is empty".to_string(),
                ));
            }
            built = Some(CollectionIndex::build(&records)?);
            Ok(Arc::new(records))
        };
        let (records, evicted) = self
            .cache
            .restore(name, decode, |records: &RecordSet| footprint(records))
            .await?;

        let index = built?;
        self.index.install(name, index);
        self.clear_evicted(evicted);

        self.record_metrics(LoadMetrics {
            collection: name.to_string(),
            row_count: records.len(),
            parse_duration: started.elapsed(),
            chunks: 1,
            origin: LoadOrigin::Secondary,
        });
        Some(records)
    }

    async fn transform_chunked(
        &self,
        descriptor: &CollectionDescriptor,
        rows: &[RawRow],
    ) -> Result<(Vec<RecordRef>, usize)> {
        let chunk_size = self.config.chunk_size.max(1);
        let mut records = Vec::with_capacity(rows.len());
        let mut chunks = 0;

        for (n, chunk) in rows.chunks(chunk_size).enumerate() {
            records.extend(transform_rows(descriptor, chunk, n * chunk_size)?);
            chunks += 1;
            log::debug!(
                "'{}': transformed {}/{} rows",
                descriptor.name,
                records.len(),
                rows.len()
            );
            tokio::task::yield_now().await;
        }

        Ok((records, chunks))
    }

    fn admit(&self, name: &str, records: RecordSet, index: CollectionIndex) {
        let evicted = self.cache.set(name, records.clone(), footprint(&records));
        self.index.install(name, index);
        self.clear_evicted(evicted);
    }

    fn clear_evicted(&self, evicted: Vec<String>) {
        for victim in evicted {
            log::debug!("collection '{}' evicted from the cache", victim);
            self.index.clear(&victim);
        }
    }

    fn record_metrics(&self, metrics: LoadMetrics) {
        log::info!(
            "loaded '{}': {} records in {:?} ({} chunk(s), from {:?})",
            metrics.collection,
            metrics.row_count,
            metrics.parse_duration,
            metrics.chunks,
            metrics.origin
        );
        self.metrics
            .lock()
            .insert(metrics.collection.clone(), metrics);
    }
}

fn transform_rows(
    descriptor: &CollectionDescriptor,
    rows: &[RawRow],
    first_row: usize,
) -> Result<Vec<RecordRef>> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| (descriptor.transform)(row).map_err(|e| e.at_row(first_row + i)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use serde::{Deserialize, Serialize};
    use crate::core::config::CacheConfig;
    use crate::core::types::{Language, Record, TypedRecord};
    use crate::index::descriptor::RawSource;
    use crate::storage::{MemoryStore, SecondaryTier};

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Note {
        id: u64,
        key: String,
    }

    impl Record for Note {
        fn id(&self) -> RecordId {
            RecordId(self.id)
        }
        fn unique_key(&self) -> &str {
            &self.key
        }
        fn search_text(&self, _language: Language) -> Vec<&str> {
            vec![&self.key]
        }
        fn title(&self, _language: Language) -> &str {
            &self.key
        }
        fn approx_bytes(&self) -> usize {
            self.key.len() + 16
        }
    }

    impl TypedRecord for Note {
        fn transform(row: &RawRow) -> Result<Self> {
            let id = row
                .get("id")
                .and_then(|v| v.parse().ok())
                .ok_or_else(|| Error::transform("bad id"))?;
            let key = row
                .get("key")
                .cloned()
                .ok_or_else(|| Error::transform("missing key"))?;
            Ok(Note { id, key })
        }
    }

    /// Source that counts reads and yields before answering, so concurrent
    /// callers overlap.
    struct CountingSource {
        rows: Vec<RawRow>,
        reads: Arc<AtomicUsize>,
    }

    impl RawSource for CountingSource {
        fn read(&self) -> BoxFuture<'_, Result<Vec<RawRow>>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            async move {
                for _ in 0..3 {
                    tokio::task::yield_now().await;
                }
                Ok(self.rows.clone())
            }
            .boxed()
        }
    }

    fn row(id: &str, key: &str) -> RawRow {
        RawRow::from([
            ("id".to_string(), id.to_string()),
            ("key".to_string(), key.to_string()),
        ])
    }

    fn notes(count: usize) -> Vec<RawRow> {
        (0..count)
            .map(|i| row(&i.to_string(), &format!("note-{}", i)))
            .collect()
    }

    fn counting(name: &str, rows: Vec<RawRow>) -> (CollectionDescriptor, Arc<AtomicUsize>) {
        let reads = Arc::new(AtomicUsize::new(0));
        let source = CountingSource {
            rows,
            reads: reads.clone(),
        };
        (CollectionDescriptor::new::<Note>(name, source), reads)
    }

    fn loader_with(descriptors: Vec<CollectionDescriptor>, cache: CacheStore<RecordSet>) -> RecordLoader {
        let config = LoaderConfig {
            chunk_size: 10,
            chunk_threshold: 2000,
        };
        RecordLoader::new(descriptors, cache, config).unwrap()
    }

    fn loader(descriptors: Vec<CollectionDescriptor>) -> RecordLoader {
        loader_with(descriptors, CacheStore::new(&CacheConfig::default()))
    }

    #[tokio::test]
    async fn second_load_is_a_cache_hit() {
        let (descriptor, reads) = counting("notes", notes(3));
        let loader = loader(vec![descriptor]);

        let first = loader.load("notes").await.unwrap();
        let second = loader.load("notes").await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(reads.load(Ordering::SeqCst), 1);
        assert_eq!(loader.metrics("notes").unwrap().origin, LoadOrigin::Source);
    }

    #[tokio::test]
    async fn concurrent_loads_share_one_pass() {
        let (descriptor, reads) = counting("notes", notes(3));
        let loader = loader(vec![descriptor]);

        let (a, b, c) = tokio::join!(loader.load("notes"), loader.load("notes"), loader.load("notes"));
        let (a, b, c) = (a.unwrap(), b.unwrap(), c.unwrap());

        assert_eq!(reads.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&b, &c));
        assert_eq!(loader.pending_count(), 0);
    }

    #[tokio::test]
    async fn failed_load_is_not_cached_and_can_retry() {
        let reads = Arc::new(AtomicUsize::new(0));
        let counter = reads.clone();
        let source = crate::index::descriptor::FnSource::new(move || {
            let attempt = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                let rows: Result<Vec<RawRow>> = if attempt == 0 {
                    Ok(Vec::new())
                } else {
                    Ok(vec![row("1", "first")])
                };
                rows
            }
            .boxed()
        });
        let loader = loader(vec![CollectionDescriptor::new::<Note>("notes", source)]);

        let err = loader.load("notes").await.unwrap_err();
        assert!(err.is_load());
        assert_eq!(err.collection.as_deref(), Some("notes"));
        assert_eq!(loader.pending_count(), 0);
        assert!(loader.get("notes").is_empty());

        let records = loader.load("notes").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn transform_failure_names_the_row() {
        let mut rows = notes(4);
        rows[2] = row("not-a-number", "broken");
        let (descriptor, _) = counting("notes", rows);
        let loader = loader(vec![descriptor]);

        let err = loader.load("notes").await.unwrap_err();
        assert_eq!(err.root_kind(), ErrorKind::Transform);
        assert!(err.to_string().contains("row 2"));
        assert!(!loader.is_loaded("notes"));
    }

    #[tokio::test]
    async fn large_sources_are_transformed_in_chunks() {
        let (descriptor, _) = counting("notes", notes(25));
        let loader = loader(vec![descriptor.with_chunk_threshold(10)]);

        let records = loader.load("notes").await.unwrap();
        let metrics = loader.metrics("notes").unwrap();

        assert_eq!(records.len(), 25);
        assert_eq!(metrics.row_count, 25);
        assert_eq!(metrics.chunks, 3);
        assert!(metrics.chunked());
        assert_eq!(records[24].unique_key(), "note-24");
    }

    #[tokio::test]
    async fn chunked_failure_reports_the_absolute_row() {
        let mut rows = notes(25);
        rows[17] = row("x", "broken");
        let (descriptor, _) = counting("notes", rows);
        let loader = loader(vec![descriptor.with_chunk_threshold(10)]);

        let err = loader.load("notes").await.unwrap_err();
        assert!(err.to_string().contains("row 17"));
    }

    #[tokio::test]
    async fn duplicate_keys_fail_the_load() {
        let (descriptor, _) = counting("notes", vec![row("1", "same"), row("2", "same")]);
        let loader = loader(vec![descriptor]);

        let err = loader.load("notes").await.unwrap_err();
        assert!(err.is_load());
        assert_eq!(err.root_kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn lookups_follow_the_cache() {
        let (notes_descriptor, _) = counting("notes", notes(2));
        let (memos_descriptor, _) = counting("memos", notes(2));
        let cache = CacheStore::new(&CacheConfig {
            max_entries: 1,
            ..CacheConfig::default()
        });
        let loader = loader_with(vec![notes_descriptor, memos_descriptor], cache);

        assert!(loader.lookup_by_id("notes", RecordId(1)).is_none());
        loader.load("notes").await.unwrap();
        assert_eq!(
            loader.lookup_by_key("notes", "note-1").map(|r| r.id()),
            Some(RecordId(1))
        );

        loader.load("memos").await.unwrap();
        assert!(loader.lookup_by_key("notes", "note-1").is_none());
        assert!(loader.get("notes").is_empty());
        assert!(loader.lookup_by_id("memos", RecordId(0)).is_some());
    }

    #[tokio::test]
    async fn cold_load_counts_one_miss() {
        let (descriptor, _) = counting("notes", notes(2));
        let loader = loader(vec![descriptor]);

        loader.load("notes").await.unwrap();
        let stats = loader.cache_stats();
        assert_eq!((stats.hit_count, stats.miss_count), (0, 1));

        loader.load("notes").await.unwrap();
        let stats = loader.cache_stats();
        assert_eq!((stats.hit_count, stats.miss_count), (1, 1));
    }

    #[tokio::test]
    async fn peek_does_not_protect_from_eviction() {
        let (notes_descriptor, _) = counting("notes", notes(2));
        let (memos_descriptor, _) = counting("memos", notes(2));
        let (todos_descriptor, _) = counting("todos", notes(2));
        let cache = CacheStore::new(&CacheConfig {
            max_entries: 2,
            ..CacheConfig::default()
        });
        let loader = loader_with(vec![notes_descriptor, memos_descriptor, todos_descriptor], cache);

        loader.load("notes").await.unwrap();
        loader.load("memos").await.unwrap();
        assert_eq!(loader.peek("notes").len(), 2);

        loader.load("todos").await.unwrap();
        assert!(!loader.is_loaded("notes"));
        assert!(loader.is_loaded("memos"));
    }

    #[tokio::test(start_paused = true)]
    async fn lazy_expiry_drops_the_index() {
        let (descriptor, reads) = counting("notes", notes(2));
        let cache = CacheStore::new(&CacheConfig {
            ttl_secs: 10,
            ..CacheConfig::default()
        });
        let loader = loader_with(vec![descriptor], cache);
        loader.load("notes").await.unwrap();
        assert!(loader.index.contains("notes"));

        tokio::time::advance(Duration::from_secs(11)).await;
        assert!(loader.peek("notes").is_empty());
        assert!(loader.index.contains("notes"));

        assert!(loader.get("notes").is_empty());
        assert!(!loader.index.contains("notes"));
        assert_eq!(loader.cache_stats().approx_bytes, 0);

        loader.load("notes").await.unwrap();
        assert!(loader.index.contains("notes"));
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_load_rebuilds_the_index() {
        let (descriptor, reads) = counting("notes", notes(2));
        let cache = CacheStore::new(&CacheConfig {
            ttl_secs: 10,
            ..CacheConfig::default()
        });
        let loader = loader_with(vec![descriptor], cache);
        loader.load("notes").await.unwrap();

        tokio::time::advance(Duration::from_secs(11)).await;
        assert!(loader.lookup_by_key("notes", "note-1").is_none());
        loader.load("notes").await.unwrap();
        assert_eq!(reads.load(Ordering::SeqCst), 2);
        assert!(loader.lookup_by_key("notes", "note-1").is_some());
    }

    #[tokio::test]
    async fn reload_waits_for_an_in_flight_load() {
        let (descriptor, reads) = counting("notes", notes(2));
        let loader = loader(vec![descriptor]);

        let (loaded, reloaded) = tokio::join!(loader.load("notes"), loader.reload("notes"));
        let (loaded, reloaded) = (loaded.unwrap(), reloaded.unwrap());

        assert!(!Arc::ptr_eq(&loaded, &reloaded));
        assert_eq!(reads.load(Ordering::SeqCst), 2);
        assert!(Arc::ptr_eq(&loader.get("notes"), &reloaded));
    }

    #[tokio::test]
    async fn reload_runs_a_fresh_pass() {
        let (descriptor, reads) = counting("notes", notes(2));
        let loader = loader(vec![descriptor]);

        let first = loader.load("notes").await.unwrap();
        let second = loader.reload("notes").await.unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn secondary_tier_survives_a_fresh_loader() {
        let store = Arc::new(MemoryStore::new());
        let tier = SecondaryTier::new(store.clone(), Duration::from_secs(60));

        let (descriptor, reads) = counting("notes", notes(3));
        let cold = loader_with(
            vec![descriptor.clone()],
            CacheStore::new(&CacheConfig::default()).with_secondary(tier.clone()),
        );
        cold.load("notes").await.unwrap();
        assert_eq!(store.len(), 1);

        let warm = loader_with(
            vec![descriptor],
            CacheStore::new(&CacheConfig::default()).with_secondary(tier),
        );
        let records = warm.load("notes").await.unwrap();

        assert_eq!(reads.load(Ordering::SeqCst), 1);
        assert_eq!(records.len(), 3);
        assert_eq!(warm.metrics("notes").unwrap().origin, LoadOrigin::Secondary);
        assert!(warm.lookup_by_key("notes", "note-2").is_some());
    }

    #[tokio::test]
    async fn unknown_collections_and_double_registration() {
        let loader = loader(Vec::new());
        assert_eq!(loader.load("nope").await.unwrap_err().kind, ErrorKind::NotFound);

        let (a, _) = counting("notes", notes(1));
        let (b, _) = counting("notes", notes(1));
        let result = RecordLoader::new(vec![a, b], CacheStore::new(&CacheConfig::default()), LoaderConfig::default());
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn clear_cache_drops_records_and_indices() {
        let (descriptor, reads) = counting("notes", notes(2));
        let loader = loader(vec![descriptor]);
        loader.load("notes").await.unwrap();

        loader.clear_cache().await;
        assert!(loader.get("notes").is_empty());
        assert!(loader.lookup_by_id("notes", RecordId(0)).is_none());

        loader.load("notes").await.unwrap();
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }
}
