//! Helpers shared by the record transforms: typed column access, key
//! normalization and date parsing.

use std::str::FromStr;
use chrono::{NaiveDate, NaiveDateTime};
use crate::core::error::{Error, Result};
use crate::core::types::{Language, LocalizedText, RawRow, RecordId};

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Build a row from column/value pairs.
pub fn raw_row(pairs: &[(&str, &str)]) -> RawRow {
    pairs
        .iter()
        .map(|(column, value)| (column.to_string(), value.to_string()))
        .collect()
}

/// Lowercase, hyphen-separated form used for unique keys.
pub fn normalize_key(text: &str) -> String {
    let mut key = String::with_capacity(text.len());
    for c in text.trim().chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() || c == '_' {
            key.push(c);
        } else if (c.is_whitespace() || c == '-') && !key.ends_with('-') {
            key.push('-');
        }
    }
    key.trim_matches('-').to_string()
}

/// Which instant a bare date stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayBound {
    Start,
    End,
}

/// Parse a timestamp or a bare `YYYY-MM-DD` date. A bare end date covers the
/// whole day.
pub fn parse_datetime(text: &str, bound: DayBound) -> Result<NaiveDateTime> {
    let text = text.trim();
    for format in DATETIME_FORMATS {
        if let Ok(at) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(at);
        }
    }

    let date = NaiveDate::parse_from_str(text, DATE_FORMAT)?;
    let at = match bound {
        DayBound::Start => date.and_hms_opt(0, 0, 0),
        DayBound::End => date.and_hms_opt(23, 59, 59),
    };
    at.ok_or_else(|| Error::transform(format!("invalid time of day for '{}'", text)))
}

/// Typed column access over a raw row. Blank cells count as missing.
pub trait RowExt {
    fn optional(&self, column: &str) -> Option<&str>;

    fn required(&self, column: &str) -> Result<&str> {
        self.optional(column)
            .ok_or_else(|| Error::transform(format!("missing column '{}'", column)))
    }

    fn parse_required<T: FromStr>(&self, column: &str) -> Result<T> {
        let text = self.required(column)?;
        text.parse()
            .map_err(|_| Error::transform(format!("column '{}': '{}' is not a valid number", column, text)))
    }

    fn parse_optional<T: FromStr>(&self, column: &str) -> Result<Option<T>> {
        match self.optional(column) {
            Some(_) => self.parse_required(column).map(Some),
            None => Ok(None),
        }
    }

    fn id(&self) -> Result<RecordId> {
        self.parse_required::<u64>("id").map(RecordId)
    }

    /// `unique_key` column when present, otherwise derived from `fallback`.
    fn unique_key(&self, fallback: Option<&str>) -> Result<String> {
        let source = self
            .optional("unique_key")
            .or(fallback)
            .ok_or_else(|| Error::transform("missing column 'unique_key'"))?;
        let key = normalize_key(source);
        if key.is_empty() {
            return Err(Error::transform(format!("cannot derive a key from '{}'", source)));
        }
        Ok(key)
    }

    /// Collect `<base>_<lang>` columns. A bare `<base>` column fills in the
    /// default language when it has no explicit value.
    fn localized(&self, base: &str) -> LocalizedText {
        let mut text = LocalizedText::new();
        for language in Language::ALL {
            if let Some(value) = self.optional(&format!("{}_{}", base, language.code())) {
                text.insert(language, value);
            }
        }
        if text.get(Language::default()).is_none() {
            if let Some(value) = self.optional(base) {
                text.insert(Language::default(), value);
            }
        }
        text
    }

    fn datetime(&self, column: &str, bound: DayBound) -> Result<Option<NaiveDateTime>> {
        match self.optional(column) {
            Some(text) => parse_datetime(text, bound)
                .map(Some)
                .map_err(|e| Error::transform(format!("column '{}': {}", column, e.context))),
            None => Ok(None),
        }
    }
}

impl RowExt for RawRow {
    fn optional(&self, column: &str) -> Option<&str> {
        self.get(column)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }
}
