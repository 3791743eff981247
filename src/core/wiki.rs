use std::sync::Arc;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::stats::{LoadMetrics, WikiStats};
use crate::core::types::{downcast, RecordId, RecordRef, RecordSet, TypedRecord};
use crate::index::descriptor::CollectionDescriptor;
use crate::index::loader::RecordLoader;
use crate::memory::cache_store::CacheStore;
use crate::query::ast::ParsedQuery;
use crate::query::parser::QueryParser;
use crate::search::executor::{CollectionView, QueryExecutor, SearchOptions};
use crate::search::results::SearchResults;
use crate::storage::{FileStore, KeyValueStore, MemoryStore, SecondaryTier};

/// Composition root: owns the loader, cache, indices and the query pipeline.
/// Cloning shares the same state.
#[derive(Clone)]
pub struct Wiki {
    config: Arc<Config>,
    loader: RecordLoader,
    query_parser: QueryParser,
    query_executor: QueryExecutor,
}

impl Wiki {
    /// Build from `config`. When persistence is enabled the secondary tier is
    /// a `FileStore` if a directory is configured, otherwise in-memory.
    pub fn new(config: Config, descriptors: Vec<CollectionDescriptor>) -> Result<Self> {
        let store: Option<Arc<dyn KeyValueStore>> = if config.persistence.enabled {
            match &config.persistence.directory {
                Some(directory) => Some(Arc::new(FileStore::open(directory)?)),
                None => Some(Arc::new(MemoryStore::new())),
            }
        } else {
            None
        };
        Self::build(config, descriptors, store)
    }

    /// Build with a caller-supplied secondary store, regardless of
    /// `persistence.enabled`.
    pub fn with_store(
        config: Config,
        descriptors: Vec<CollectionDescriptor>,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self> {
        Self::build(config, descriptors, Some(store))
    }

    fn build(
        config: Config,
        descriptors: Vec<CollectionDescriptor>,
        store: Option<Arc<dyn KeyValueStore>>,
    ) -> Result<Self> {
        let persistent = store.is_some();
        let mut cache = CacheStore::new(&config.cache);
        if let Some(store) = store {
            cache = cache.with_secondary(SecondaryTier::new(store, config.persistence.ttl()));
        }
        let loader = RecordLoader::new(descriptors, cache, config.loader.clone())?;

        log::info!(
            "wiki ready: {} collections, persistence {}",
            loader.names().len(),
            if persistent { "on" } else { "off" }
        );

        Ok(Wiki {
            config: Arc::new(config),
            loader,
            query_parser: QueryParser::new(),
            query_executor: QueryExecutor::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn loader(&self) -> &RecordLoader {
        &self.loader
    }

    pub fn collection_names(&self) -> Vec<String> {
        self.loader.names()
    }

    pub async fn load(&self, name: &str) -> Result<RecordSet> {
        self.loader.load(name).await
    }

    /// Load and downcast to the collection's concrete record type.
    pub async fn load_typed<T: TypedRecord>(&self, name: &str) -> Result<Vec<T>> {
        let records = self.loader.load(name).await?;
        Ok(typed(&records))
    }

    pub async fn load_all(&self) -> Vec<(String, Result<RecordSet>)> {
        self.loader.load_all().await
    }

    pub async fn reload(&self, name: &str) -> Result<RecordSet> {
        self.loader.reload(name).await
    }

    /// Last cached collection, or empty. Never loads.
    pub fn get(&self, name: &str) -> RecordSet {
        self.loader.get(name)
    }

    pub fn get_typed<T: TypedRecord>(&self, name: &str) -> Vec<T> {
        typed(&self.loader.get(name))
    }

    pub fn lookup_by_id(&self, name: &str, id: RecordId) -> Option<RecordRef> {
        self.loader.lookup_by_id(name, id)
    }

    pub fn lookup_by_key(&self, name: &str, key: &str) -> Option<RecordRef> {
        self.loader.lookup_by_key(name, key)
    }

    pub fn lookup_typed<T: TypedRecord>(&self, name: &str, key: &str) -> Option<T> {
        let record = self.loader.lookup_by_key(name, key)?;
        downcast::<T>(&record).cloned()
    }

    /// Quick grouped search with the configured defaults.
    pub fn search(&self, query: &str) -> SearchResults {
        self.search_with(query, &SearchOptions::from(&self.config.search))
    }

    pub fn search_with(&self, query: &str, options: &SearchOptions) -> SearchResults {
        let parsed = self.query_parser.parse(query);
        if parsed.has_errors() {
            log::debug!("query {:?} parsed with errors: {:?}", query, parsed.error_messages());
        }
        self.execute(&parsed, options)
    }

    pub fn parse(&self, query: &str) -> ParsedQuery {
        self.query_parser.parse(query)
    }

    /// Run an already parsed query over whatever is cached right now.
    pub fn execute(&self, query: &ParsedQuery, options: &SearchOptions) -> SearchResults {
        self.query_executor.execute(query, &self.collections(), options)
    }

    /// Current view of every registered collection; unloaded ones are empty.
    /// Reading the views leaves cache recency and counters untouched.
    pub fn collections(&self) -> Vec<CollectionView> {
        self.loader
            .descriptors()
            .iter()
            .map(|d| CollectionView::new(&d.name, self.loader.peek(&d.name), d.capabilities))
            .collect()
    }

    pub fn evict_expired(&self) -> usize {
        self.loader.evict_expired()
    }

    pub async fn clear_cache(&self) {
        self.loader.clear_cache().await
    }

    pub fn metrics(&self, name: &str) -> Option<LoadMetrics> {
        self.loader.metrics(name)
    }

    pub fn stats(&self) -> WikiStats {
        WikiStats {
            cache: self.loader.cache_stats(),
            loads: self.loader.all_metrics(),
            pending_loads: self.loader.pending_count(),
            registered_collections: self.loader.names().len(),
        }
    }
}

fn typed<T: TypedRecord>(records: &RecordSet) -> Vec<T> {
    records
        .iter()
        .filter_map(|record| downcast::<T>(record).cloned())
        .collect()
}
