use std::collections::BTreeMap;
use std::time::Duration;
use serde::{Serialize, Deserialize};

/// Where a load took its rows from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadOrigin {
    Source,
    Secondary,
}

/// Metrics recorded for the most recent successful load of one collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadMetrics {
    pub collection: String,
    pub row_count: usize,
    pub parse_duration: Duration,
    pub chunks: usize,
    pub origin: LoadOrigin,
}

impl LoadMetrics {
    pub fn chunked(&self) -> bool {
        self.chunks > 1
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub entry_count: usize,
    pub approx_bytes: usize,
    pub hit_count: usize,
    pub miss_count: usize,
    pub eviction_count: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hit_count + self.miss_count;
        if total == 0 {
            0.0
        } else {
            self.hit_count as f64 / total as f64
        }
    }
}

/// Snapshot for monitoring the wiki engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikiStats {
    pub cache: CacheStats,
    pub loads: BTreeMap<String, LoadMetrics>,
    pub pending_loads: usize,
    pub registered_collections: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_rate_handles_empty_counters() {
        assert_eq!(CacheStats::default().hit_rate(), 0.0);

        let stats = CacheStats {
            hit_count: 3,
            miss_count: 1,
            ..Default::default()
        };
        assert_eq!(stats.hit_rate(), 0.75);
    }
}
