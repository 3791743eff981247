use std::fmt;
use std::sync::Arc;
use futures::future::{BoxFuture, FutureExt};
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::types::{downcast, Capabilities, RawRow, RecordRef, RecordSet, TypedRecord};

pub type TransformFn = Arc<dyn Fn(&RawRow) -> Result<RecordRef> + Send + Sync>;
pub type EncodeFn = Arc<dyn Fn(&RecordSet) -> Result<Vec<u8>> + Send + Sync>;
pub type DecodeFn = Arc<dyn Fn(&[u8]) -> Result<Vec<RecordRef>> + Send + Sync>;

/// Supplier of already-tokenized rows for one collection.
pub trait RawSource: Send + Sync {
    fn read(&self) -> BoxFuture<'_, Result<Vec<RawRow>>>;
}

/// Rows held in memory, e.g. embedded at build time.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    rows: Arc<Vec<RawRow>>,
}

impl StaticSource {
    pub fn new(rows: Vec<RawRow>) -> Self {
        StaticSource { rows: Arc::new(rows) }
    }
}

impl RawSource for StaticSource {
    fn read(&self) -> BoxFuture<'_, Result<Vec<RawRow>>> {
        let rows = self.rows.as_ref().clone();
        async move { Ok(rows) }.boxed()
    }
}

/// Source backed by an async closure, for fetch-style collaborators.
pub struct FnSource<F> {
    read: F,
}

impl<F> FnSource<F>
where
    F: Fn() -> BoxFuture<'static, Result<Vec<RawRow>>> + Send + Sync,
{
    pub fn new(read: F) -> Self {
        FnSource { read }
    }
}

impl<F> RawSource for FnSource<F>
where
    F: Fn() -> BoxFuture<'static, Result<Vec<RawRow>>> + Send + Sync,
{
    fn read(&self) -> BoxFuture<'_, Result<Vec<RawRow>>> {
        (self.read)()
    }
}

/// Everything the loader needs to produce one typed collection. Built once
/// and never mutated.
#[derive(Clone)]
pub struct CollectionDescriptor {
    pub name: String,
    pub source: Arc<dyn RawSource>,
    pub transform: TransformFn,
    /// Overrides the loader-wide chunking threshold when set.
    pub chunk_threshold: Option<usize>,
    pub capabilities: Capabilities,
    pub(crate) encode: EncodeFn,
    pub(crate) decode: DecodeFn,
}

impl CollectionDescriptor {
    /// Descriptor using the record kind's own row transform.
    pub fn new<T: TypedRecord>(name: &str, source: impl RawSource + 'static) -> Self {
        Self::with_transform::<T>(name, source, T::transform)
    }

    pub fn with_transform<T: TypedRecord>(
        name: &str,
        source: impl RawSource + 'static,
        transform: impl Fn(&RawRow) -> Result<T> + Send + Sync + 'static,
    ) -> Self {
        let transform: TransformFn =
            Arc::new(move |row: &RawRow| transform(row).map(|record| Arc::new(record) as RecordRef));

        let collection = name.to_string();
        let encode: EncodeFn = Arc::new(move |records: &RecordSet| -> Result<Vec<u8>> {
            let typed = records
                .iter()
                .map(|record| {
                    downcast::<T>(record).ok_or_else(|| {
                        Error::new(
                            ErrorKind::Internal,
                            format!("record {} is not a {} record", record.id(), collection),
                        )
                    })
                })
                .collect::<Result<Vec<&T>>>()?;
            Ok(bincode::serialize(&typed)?)
        });

        let decode: DecodeFn = Arc::new(|raw: &[u8]| -> Result<Vec<RecordRef>> {
            let typed: Vec<T> = bincode::deserialize(raw)?;
            Ok(typed
                .into_iter()
                .map(|record| Arc::new(record) as RecordRef)
                .collect())
        });

        CollectionDescriptor {
            name: name.to_string(),
            source: Arc::new(source),
            transform,
            chunk_threshold: None,
            capabilities: T::CAPABILITIES,
            encode,
            decode,
        }
    }

    pub fn with_chunk_threshold(mut self, rows: usize) -> Self {
        self.chunk_threshold = Some(rows);
        self
    }
}

impl fmt::Debug for CollectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionDescriptor")
            .field("name", &self.name)
            .field("chunk_threshold", &self.chunk_threshold)
            .field("capabilities", &self.capabilities)
            .finish()
    }
}
