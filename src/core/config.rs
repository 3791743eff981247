use std::path::PathBuf;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::core::error::Result;
use crate::core::types::Language;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub cache: CacheConfig,
    pub loader: LoaderConfig,
    pub persistence: PersistenceConfig,
    pub search: SearchConfig,
}

impl Config {
    /// Parse a (possibly partial) JSON document; absent fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Fast-tier bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub max_entries: usize,
    pub max_memory_bytes: usize,
    pub ttl_secs: u64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            max_entries: 32,
            max_memory_bytes: 64 * 1024 * 1024, // 64MB
            ttl_secs: 60 * 60,                  // 1 hour
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Rows transformed between two yields when chunking.
    pub chunk_size: usize,
    /// Row count above which a collection is transformed in chunks.
    pub chunk_threshold: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            chunk_size: 500,
            chunk_threshold: 2000,
        }
    }
}

/// Secondary (durable) tier settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    pub enabled: bool,
    pub ttl_secs: u64,
    /// Directory for the file-backed store; in-memory when unset.
    pub directory: Option<PathBuf>,
}

impl PersistenceConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        PersistenceConfig {
            enabled: false,
            ttl_secs: 24 * 60 * 60, // 24 hours
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub max_per_type: usize,
    pub default_language: Language,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_per_type: 5,
            default_language: Language::En,
        }
    }
}
