pub mod core;
pub mod storage;
pub mod memory;
pub mod index;
pub mod query;
pub mod search;
pub mod catalog;

pub use crate::core::config::Config;
pub use crate::core::error::{Error, ErrorKind, Result};
pub use crate::core::types::{Language, RawRow, Record, RecordId, RecordRef, RecordSet, TypedRecord};
pub use crate::core::wiki::Wiki;
pub use crate::index::descriptor::{CollectionDescriptor, FnSource, RawSource, StaticSource};
pub use crate::search::executor::{ResultLimit, SearchOptions};
pub use crate::search::results::SearchResults;

/*
┌────────────────────────────────────────────────────────────────────────────────────────────┐
│                            VENUSDEX STRUCT ARCHITECTURE                                     │
└────────────────────────────────────────────────────────────────────────────────────────────┘

┌─────────────────────────────────────── CORE LAYER ──────────────────────────────────────────┐
│                                                                                              │
│  ┌────────────────────────────────────────────────────────────────────────────────────┐    │
│  │                               struct Wiki                                           │    │
│  │  ┌──────────────────────────────────────────────────────────────────────────────┐ │    │
│  │  │ config: Arc<Config>               // Cache, loader, persistence, search     │ │    │
│  │  │ loader: RecordLoader              // Cache + indices + in-flight loads      │ │    │
│  │  │ query_parser: QueryParser         // Search string -> ParsedQuery           │ │    │
│  │  │ query_executor: QueryExecutor     // Stateless, synchronous execution       │ │    │
│  │  └──────────────────────────────────────────────────────────────────────────────┘ │    │
│  └────────────────────────────────────────────────────────────────────────────────────┘    │
│                                                                                              │
│  ┌──────────────────┐  ┌──────────────────────┐  ┌───────────────────────────────────┐    │
│  │ struct Config    │  │ trait Record         │  │ struct WikiStats                  │    │
│  │ • cache          │  │ • id() / unique_key()│  │ • cache: CacheStats               │    │
│  │ • loader         │  │ • search_text(lang)  │  │ • loads: Map<name, LoadMetrics>   │    │
│  │ • persistence    │  │ • stats() / dates()  │  │ • pending_loads                   │    │
│  │ • search         │  │ • badge() / url()    │  │ • registered_collections          │    │
│  └──────────────────┘  └──────────────────────┘  └───────────────────────────────────┘    │
│                                                                                              │
│  ┌──────────────────┐  ┌──────────────────────┐  ┌───────────────────────────────────┐    │
│  │ struct RecordId  │  │ trait TypedRecord    │  │ struct Error                      │    │
│  │ • 0: u64         │  │ • CAPABILITIES       │  │ • kind: ErrorKind                 │    │
│  └──────────────────┘  │ • transform(&RawRow) │  │ • context / collection / cause    │    │
│                        └──────────────────────┘  └───────────────────────────────────┘    │
└──────────────────────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────────── LOADING LAYER ──────────────────────────────────────────┐
│                                                                                              │
│  ┌────────────────────────────────────────────────────────────────────────────────────┐    │
│  │                           struct RecordLoader                                       │    │
│  │  ┌──────────────────────────────────────────────────────────────────────────────┐ │    │
│  │  │ descriptors: Arc<Vec<Arc<CollectionDescriptor>>>  // Fixed at startup       │ │    │
│  │  │ cache: CacheStore<RecordSet>                      // Memoized collections   │ │    │
│  │  │ index: LookupIndex                                // id / key maps          │ │    │
│  │  │ pending: Arc<Mutex<HashMap<String, Shared<..>>>>  // Coalesced loads        │ │    │
│  │  │ metrics: Arc<Mutex<BTreeMap<String, LoadMetrics>>>                          │ │    │
│  │  └──────────────────────────────────────────────────────────────────────────────┘ │    │
│  └────────────────────────────────────────────────────────────────────────────────────┘    │
│                                                                                              │
│  ┌────────────────────────┐  ┌─────────────────────────┐  ┌────────────────────────┐      │
│  │ struct Collection-     │  │ struct LookupIndex      │  │ trait RawSource        │      │
│  │        Descriptor      │  │ • Map<name,             │  │ • read() -> Vec<RawRow>│      │
│  │ • name / source        │  │   Arc<CollectionIndex>> │  │ StaticSource, FnSource │      │
│  │ • transform / encode   │  │ • by_id / by_key        │  └────────────────────────┘      │
│  │ • chunk_threshold      │  └─────────────────────────┘                                   │
│  └────────────────────────┘                                                                 │
└──────────────────────────────────────────────────────────────────────────────────────────────┘

┌────────────────────────────────────── SEARCH LAYER ─────────────────────────────────────────┐
│                                                                                              │
│  ┌─────────────────────┐  ┌──────────────────────┐  ┌────────────────────────────┐        │
│  │ struct ParsedQuery  │  │ enum Filter          │  │ struct SearchResults       │        │
│  │ • filters           │  │ • Id(IdFilter)       │  │ • groups: Vec<ResultGroup> │        │
│  │ • free_text         │  │ • Key(KeyFilter)     │  │ • errors: Vec<QueryError>  │        │
│  │ • errors            │  │ • Stat(StatFilter)   │  │ • took_ms: u64             │        │
│  └─────────────────────┘  │ • Date(DateFilter)   │  │ • total() (derived)        │        │
│                           └──────────────────────┘  └────────────────────────────┘        │
│  ┌─────────────────────┐  ┌──────────────────────┐  ┌────────────────────────────┐        │
│  │ struct SearchOptions│  │ enum ResultLimit     │  │ struct SearchHit           │        │
│  │ • limit             │  │ • PerType(n)         │  │ • record / title           │        │
│  │ • language          │  │ • Unbounded          │  │ • badge / url              │        │
│  └─────────────────────┘  │ • Page{offset,limit} │  └────────────────────────────┘        │
│                           └──────────────────────┘                                          │
└──────────────────────────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────────── STORAGE LAYER ──────────────────────────────────────────┐
│                                                                                              │
│  ┌────────────────────────┐  ┌──────────────────────┐  ┌───────────────────────┐          │
│  │ struct CacheStore<V>   │  │ struct SecondaryTier │  │ trait KeyValueStore   │          │
│  │ • entries: LruCache    │  │ • store: Arc<dyn KV> │  │ • put / get / delete  │          │
│  │ • tracker: MemoryTrack │  │ • ttl: Duration      │  │ • keys / clear        │          │
│  │ • max_entries / ttl    │  └──────────────────────┘  │ MemoryStore, FileStore│          │
│  │ • secondary: Option<>  │                             └───────────────────────┘          │
│  │ • hit/miss/evictions   │  ┌──────────────────────┐                                      │
│  └────────────────────────┘  │ struct PersistedEntry│                                      │
│                               │ • version / checksum │                                      │
│                               │ • stored_at_ms       │                                      │
│                               │ • payload (lz4)      │                                      │
│                               └──────────────────────┘                                      │
└──────────────────────────────────────────────────────────────────────────────────────────────┘
*/
