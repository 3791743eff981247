use std::time::Instant;
use crate::core::config::SearchConfig;
use crate::core::types::{Capabilities, Language, RecordRef, RecordSet};
use crate::query::ast::{Filter, ParsedQuery};
use crate::search::results::{ResultGroup, SearchHit, SearchResults};

/// Read-only view of one collection handed to the executor. Collections that
/// are not loaded are passed with an empty record set.
#[derive(Debug, Clone)]
pub struct CollectionView {
    pub name: String,
    pub records: RecordSet,
    pub capabilities: Capabilities,
}

impl CollectionView {
    pub fn new(name: &str, records: RecordSet, capabilities: Capabilities) -> Self {
        CollectionView {
            name: name.to_string(),
            records,
            capabilities,
        }
    }
}

/// How many hits survive per collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultLimit {
    /// Grouped "quick results": at most `n` hits per collection.
    PerType(usize),
    /// Every match.
    Unbounded,
    /// Window over the flattened hit order (group by group).
    Page { offset: usize, limit: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub limit: ResultLimit,
    pub language: Language,
}

impl SearchOptions {
    pub fn quick(max_per_type: usize, language: Language) -> Self {
        SearchOptions {
            limit: ResultLimit::PerType(max_per_type),
            language,
        }
    }

    pub fn all(language: Language) -> Self {
        SearchOptions {
            limit: ResultLimit::Unbounded,
            language,
        }
    }

    pub fn page(offset: usize, limit: usize, language: Language) -> Self {
        SearchOptions {
            limit: ResultLimit::Page { offset, limit },
            language,
        }
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for SearchOptions {
    fn from(config: &SearchConfig) -> Self {
        SearchOptions::quick(config.max_per_type, config.default_language)
    }
}

/// Applies a parsed query to already-loaded collections. Stateless and
/// synchronous; it never triggers a load.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryExecutor;

impl QueryExecutor {
    pub fn new() -> Self {
        QueryExecutor
    }

    pub fn execute(
        &self,
        query: &ParsedQuery,
        collections: &[CollectionView],
        options: &SearchOptions,
    ) -> SearchResults {
        let start = Instant::now();
        let needle = query.free_text.to_lowercase();

        let matched: Vec<(&CollectionView, Vec<RecordRef>)> = collections
            .iter()
            .map(|view| (view, self.filter_collection(view, query, &needle, options.language)))
            .collect();

        let mut groups = Vec::with_capacity(matched.len());
        let (mut skip, mut remaining) = match options.limit {
            ResultLimit::Page { offset, limit } => (offset, limit),
            _ => (0, usize::MAX),
        };

        for (view, records) in matched {
            let found = records.len();
            let kept: Vec<RecordRef> = match options.limit {
                ResultLimit::PerType(max) => records.into_iter().take(max).collect(),
                ResultLimit::Unbounded => records,
                ResultLimit::Page { .. } => {
                    let skipped = skip.min(found);
                    skip -= skipped;
                    let taken: Vec<RecordRef> =
                        records.into_iter().skip(skipped).take(remaining).collect();
                    remaining -= taken.len();
                    taken
                }
            };

            groups.push(ResultGroup {
                collection: view.name.clone(),
                truncated: kept.len() < found,
                hits: kept
                    .into_iter()
                    .map(|record| hit(&view.name, record, options.language))
                    .collect(),
            });
        }

        SearchResults {
            groups,
            errors: query.errors.clone(),
            took_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Free text first, then each filter left to right, narrowing the set.
    fn filter_collection(
        &self,
        view: &CollectionView,
        query: &ParsedQuery,
        needle: &str,
        language: Language,
    ) -> Vec<RecordRef> {
        let mut records: Vec<RecordRef> = if needle.is_empty() {
            view.records.iter().cloned().collect()
        } else {
            view.records
                .iter()
                .filter(|record| matches_text(record, needle, language))
                .cloned()
                .collect()
        };

        for filter in &query.filters {
            if records.is_empty() {
                break;
            }
            apply_filter(filter, view.capabilities, &mut records);
        }
        records
    }
}

fn matches_text(record: &RecordRef, needle: &str, language: Language) -> bool {
    record.unique_key().to_lowercase().contains(needle)
        || record
            .search_text(language)
            .iter()
            .any(|text| text.to_lowercase().contains(needle))
}

fn apply_filter(filter: &Filter, capabilities: Capabilities, records: &mut Vec<RecordRef>) {
    match filter {
        Filter::Id(id) => records.retain(|r| r.id() == id.value),
        Filter::Key(key) => records.retain(|r| r.unique_key() == key.value),
        // Collections without the filtered field yield nothing for this query.
        Filter::Stat(_) if !capabilities.stats => records.clear(),
        Filter::Stat(stat) => records.retain(|r| r.stats().is_some_and(|s| stat.matches(s))),
        Filter::Date(_) if !capabilities.dates => records.clear(),
        Filter::Date(date) => records.retain(|r| r.date_range().is_some_and(|d| date.matches(&d))),
    }
}

fn hit(collection: &str, record: RecordRef, language: Language) -> SearchHit {
    SearchHit {
        collection: collection.to_string(),
        title: record.title(language).to_string(),
        badge: record.badge(),
        url: record.url(collection),
        record,
    }
}
