use crate::core::types::RecordRef;
use crate::query::ast::QueryError;

/// One matching record with the display hints consumers render.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub collection: String,
    pub record: RecordRef,
    pub title: String,
    pub badge: Option<String>,
    pub url: String,
}

/// Surviving records of one collection, in collection order.
#[derive(Debug, Clone)]
pub struct ResultGroup {
    pub collection: String,
    pub hits: Vec<SearchHit>,
    /// Whether the limit cut matches from this group.
    pub truncated: bool,
}

impl ResultGroup {
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Search results container
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    /// One group per registered collection, empty groups included.
    pub groups: Vec<ResultGroup>,
    /// Parser warnings, passed through untouched.
    pub errors: Vec<QueryError>,
    pub took_ms: u64,
}

impl SearchResults {
    /// Sum of the returned group sizes. Always derived, never stored.
    pub fn total(&self) -> usize {
        self.groups.iter().map(ResultGroup::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn group(&self, collection: &str) -> Option<&ResultGroup> {
        self.groups.iter().find(|g| g.collection == collection)
    }

    /// Hits of `collection`, or an empty slice.
    pub fn hits_for(&self, collection: &str) -> &[SearchHit] {
        self.group(collection).map(|g| g.hits.as_slice()).unwrap_or(&[])
    }

    /// All hits in group order.
    pub fn hits(&self) -> impl Iterator<Item = &SearchHit> {
        self.groups.iter().flat_map(|g| g.hits.iter())
    }

    /// Flattened slice of the hits for an "all results" page.
    pub fn page(&self, offset: usize, limit: usize) -> Vec<&SearchHit> {
        self.hits().skip(offset).take(limit).collect()
    }
}
