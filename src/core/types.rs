use serde::{Serialize, Deserialize};
use serde::de::DeserializeOwned;
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use chrono::NaiveDateTime;

/// One tokenized row handed over by the tabular source: column name -> cell text.
pub type RawRow = HashMap<String, String>;

/// Shared handle to a transformed record.
pub type RecordRef = Arc<dyn Record>;

/// A loaded collection. Cloning shares the same underlying list.
pub type RecordSet = Arc<Vec<RecordRef>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(pub u64);

impl RecordId {
    pub fn new(id: u64) -> Self {
        RecordId(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        RecordId(id)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Jp,
    Cn,
    Tw,
    Kr,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::En,
        Language::Jp,
        Language::Cn,
        Language::Tw,
        Language::Kr,
    ];

    /// Column suffix used by the tabular sources (`name_en`, `name_jp`, ...).
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Jp => "jp",
            Language::Cn => "cn",
            Language::Tw => "tw",
            Language::Kr => "kr",
        }
    }
}

/// Text bundle keyed by language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub values: BTreeMap<Language, String>,
}

impl LocalizedText {
    pub fn new() -> Self {
        LocalizedText {
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, language: Language, text: impl Into<String>) -> Self {
        self.insert(language, text);
        self
    }

    pub fn insert(&mut self, language: Language, text: impl Into<String>) {
        let text = text.into();
        if !text.trim().is_empty() {
            self.values.insert(language, text);
        }
    }

    pub fn get(&self, language: Language) -> Option<&str> {
        self.values.get(&language).map(String::as_str)
    }

    /// Text in `language`, falling back to the default language.
    pub fn resolve(&self, language: Language) -> Option<&str> {
        self.get(language).or_else(|| self.get(Language::default()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn approx_bytes(&self) -> usize {
        self.values.values().map(|v| v.len() + 16).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatField {
    Pow,
    Tec,
    Stm,
    Apl,
}

impl StatField {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "pow" => Some(StatField::Pow),
            "tec" => Some(StatField::Tec),
            "stm" => Some(StatField::Stm),
            "apl" => Some(StatField::Apl),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StatField::Pow => "pow",
            StatField::Tec => "tec",
            StatField::Stm => "stm",
            StatField::Apl => "apl",
        }
    }
}

/// Numeric stat block. `apl` is absent on records that never carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBlock {
    pub pow: u32,
    pub tec: u32,
    pub stm: u32,
    pub apl: Option<u32>,
}

impl StatBlock {
    pub fn new(pow: u32, tec: u32, stm: u32) -> Self {
        StatBlock { pow, tec, stm, apl: None }
    }

    pub fn with_apl(mut self, apl: u32) -> Self {
        self.apl = Some(apl);
        self
    }

    pub fn get(&self, field: StatField) -> Option<u32> {
        match field {
            StatField::Pow => Some(self.pow),
            StatField::Tec => Some(self.tec),
            StatField::Stm => Some(self.stm),
            StatField::Apl => self.apl,
        }
    }
}

/// Availability window of a dated record. Either end may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        DateRange { start, end }
    }

    /// Whether this range touches the closed interval `[from, to]`.
    ///
    /// With both ends set the intervals must overlap; with a single end set
    /// that one instant must fall inside the interval.
    pub fn overlaps(&self, from: NaiveDateTime, to: NaiveDateTime) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= to && from <= end,
            (Some(at), None) | (None, Some(at)) => from <= at && at <= to,
            (None, None) => false,
        }
    }
}

/// Which optional field groups a collection exposes to structured filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub stats: bool,
    pub dates: bool,
}

pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A typed record as seen by the cache, the indices and the executor.
pub trait Record: AsAny + fmt::Debug + Send + Sync {
    fn id(&self) -> RecordId;

    /// Lowercase, hyphenated key, unique within the collection.
    fn unique_key(&self) -> &str;

    /// Display fields matched by free text, resolved for `language`.
    fn search_text(&self, language: Language) -> Vec<&str>;

    /// Primary display label.
    fn title(&self, language: Language) -> &str;

    fn stats(&self) -> Option<&StatBlock> {
        None
    }

    fn date_range(&self) -> Option<DateRange> {
        None
    }

    fn badge(&self) -> Option<String> {
        None
    }

    fn url(&self, collection: &str) -> String {
        format!("/{}/{}", collection, self.unique_key())
    }

    fn approx_bytes(&self) -> usize;
}

/// A concrete record kind that can be registered as a collection.
pub trait TypedRecord: Record + Clone + Serialize + DeserializeOwned + Sized + 'static {
    const CAPABILITIES: Capabilities = Capabilities { stats: false, dates: false };

    fn transform(row: &RawRow) -> crate::core::error::Result<Self>;
}

/// Borrow a shared record as its concrete type.
pub fn downcast<T: Record + 'static>(record: &RecordRef) -> Option<&T> {
    let record: &dyn Record = &**record;
    record.as_any().downcast_ref::<T>()
}
