use std::collections::HashMap;
use std::sync::Arc;
use parking_lot::RwLock;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{RecordId, RecordRef};

/// O(1) id and key maps for one loaded collection.
#[derive(Debug, Default)]
pub struct CollectionIndex {
    pub by_id: HashMap<RecordId, RecordRef>,
    pub by_key: HashMap<String, RecordRef>,
}

impl CollectionIndex {
    /// Index `records` in one pass. A repeated id or key is rejected.
    pub fn build(records: &[RecordRef]) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(records.len());
        let mut by_key = HashMap::with_capacity(records.len());

        for record in records {
            let id = record.id();
            if by_id.insert(id, record.clone()).is_some() {
                return Err(Error::new(
                    ErrorKind::InvalidInput,
                    format!("duplicate id {}", id),
                ));
            }

            let key = record.unique_key();
            if by_key.insert(key.to_string(), record.clone()).is_some() {
                return Err(Error::new(
                    ErrorKind::InvalidInput,
                    format!("duplicate unique key '{}'", key),
                ));
            }
        }

        Ok(CollectionIndex { by_id, by_key })
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Derived lookup maps for every loaded collection.
///
/// A collection's index is swapped in whole; readers never observe a
/// half-built map.
#[derive(Clone, Default)]
pub struct LookupIndex {
    collections: Arc<RwLock<HashMap<String, Arc<CollectionIndex>>>>,
}

impl LookupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the index for `collection`, replacing any previous one.
    pub fn install(&self, collection: &str, index: CollectionIndex) {
        self.collections
            .write()
            .insert(collection.to_string(), Arc::new(index));
    }

    pub fn lookup_by_id(&self, collection: &str, id: RecordId) -> Option<RecordRef> {
        self.collections
            .read()
            .get(collection)
            .and_then(|index| index.by_id.get(&id).cloned())
    }

    pub fn lookup_by_key(&self, collection: &str, key: &str) -> Option<RecordRef> {
        self.collections
            .read()
            .get(collection)
            .and_then(|index| index.by_key.get(key).cloned())
    }

    pub fn contains(&self, collection: &str) -> bool {
        self.collections.read().contains_key(collection)
    }

    pub fn clear(&self, collection: &str) {
        self.collections.write().remove(collection);
    }

    pub fn clear_all(&self) {
        self.collections.write().clear();
    }

    /// Names of the collections that currently have an index.
    pub fn collections(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.read().keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Language;

    #[derive(Debug)]
    struct Row {
        id: u64,
        key: &'static str,
    }

    impl crate::core::types::Record for Row {
        fn id(&self) -> RecordId {
            RecordId(self.id)
        }
        fn unique_key(&self) -> &str {
            self.key
        }
        fn search_text(&self, _language: Language) -> Vec<&str> {
            vec![self.key]
        }
        fn title(&self, _language: Language) -> &str {
            self.key
        }
        fn approx_bytes(&self) -> usize {
            32
        }
    }

    fn rows(pairs: &[(u64, &'static str)]) -> Vec<RecordRef> {
        pairs
            .iter()
            .map(|&(id, key)| Arc::new(Row { id, key }) as RecordRef)
            .collect()
    }

    #[test]
    fn lookups_hit_the_same_shared_record() {
        let records = rows(&[(1, "kasumi"), (2, "ayane")]);
        let index = LookupIndex::new();
        index.install("characters", CollectionIndex::build(&records).unwrap());

        let by_id = index.lookup_by_id("characters", RecordId(2)).unwrap();
        let by_key = index.lookup_by_key("characters", "ayane").unwrap();
        assert!(Arc::ptr_eq(&by_id, &records[1]));
        assert!(Arc::ptr_eq(&by_key, &records[1]));
        assert!(index.lookup_by_id("characters", RecordId(9)).is_none());
    }

    #[test]
    fn unloaded_collections_read_as_absent() {
        let index = LookupIndex::new();
        assert!(index.lookup_by_key("items", "potion").is_none());
        assert!(!index.contains("items"));
    }

    #[test]
    fn duplicates_are_rejected() {
        let err = CollectionIndex::build(&rows(&[(1, "a"), (1, "b")])).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidInput);

        let err = CollectionIndex::build(&rows(&[(1, "a"), (2, "a")])).unwrap_err();
        assert!(err.context.contains("'a'"));
    }

    #[test]
    fn rebuild_replaces_and_clear_removes() {
        let index = LookupIndex::new();
        index.install("items", CollectionIndex::build(&rows(&[(1, "potion")])).unwrap());
        index.install("items", CollectionIndex::build(&rows(&[(2, "ether")])).unwrap());

        assert!(index.lookup_by_key("items", "potion").is_none());
        assert!(index.lookup_by_key("items", "ether").is_some());

        index.install("events", CollectionIndex::build(&rows(&[(1, "summer")])).unwrap());
        index.clear("items");
        assert_eq!(index.collections(), vec!["events".to_string()]);

        index.clear_all();
        assert!(index.collections().is_empty());
    }
}
