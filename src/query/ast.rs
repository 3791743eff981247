use std::fmt;
use serde::{Serialize, Deserialize};
use chrono::{NaiveDate, NaiveDateTime};
use crate::core::types::{DateRange, RecordId, StatBlock, StatField};

/// Result of parsing one search string. Built fresh per search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedQuery {
    pub filters: Vec<Filter>,
    /// Non-structured tokens, in input order, joined by single spaces.
    pub free_text: String,
    pub errors: Vec<QueryError>,
}

impl ParsedQuery {
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.free_text.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }
}

/// Field-scoped constraint recognized in a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    Id(IdFilter),
    Key(KeyFilter),
    Stat(StatFilter),
    Date(DateFilter),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdFilter {
    pub value: RecordId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyFilter {
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatFilter {
    pub field: StatField,
    pub comparison: StatComparison,
}

impl StatFilter {
    /// A record whose block lacks the field (e.g. no APL) never matches.
    pub fn matches(&self, stats: &StatBlock) -> bool {
        stats
            .get(self.field)
            .is_some_and(|value| self.comparison.matches(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatComparison {
    Eq(u32),
    Gt(u32),
    Lt(u32),
    Gte(u32),
    Lte(u32),
    /// Inclusive on both ends, `min <= max`.
    Range { min: u32, max: u32 },
}

impl StatComparison {
    pub fn from_operator(operator: &str, value: u32) -> Option<Self> {
        match operator {
            "=" => Some(StatComparison::Eq(value)),
            ">" => Some(StatComparison::Gt(value)),
            "<" => Some(StatComparison::Lt(value)),
            ">=" => Some(StatComparison::Gte(value)),
            "<=" => Some(StatComparison::Lte(value)),
            _ => None,
        }
    }

    pub fn matches(&self, value: u32) -> bool {
        match *self {
            StatComparison::Eq(target) => value == target,
            StatComparison::Gt(target) => value > target,
            StatComparison::Lt(target) => value < target,
            StatComparison::Gte(target) => value >= target,
            StatComparison::Lte(target) => value <= target,
            StatComparison::Range { min, max } => min <= value && value <= max,
        }
    }

    pub fn operator(&self) -> &'static str {
        match self {
            StatComparison::Eq(_) => "=",
            StatComparison::Gt(_) => ">",
            StatComparison::Lt(_) => "<",
            StatComparison::Gte(_) => ">=",
            StatComparison::Lte(_) => "<=",
            StatComparison::Range { .. } => "range",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateGranularity {
    Year,
    Month,
    Day,
}

/// Date filter with its closed query interval precomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateFilter {
    pub granularity: DateGranularity,
    /// Canonical text: `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
    pub value: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateFilter {
    /// Build the filter for a calendar year, month or day. Returns `None` for
    /// dates that do not exist (e.g. February 30th).
    pub fn new(year: i32, month: Option<u32>, day: Option<u32>) -> Option<Self> {
        let (granularity, first, last) = match (month, day) {
            (None, _) => (
                DateGranularity::Year,
                NaiveDate::from_ymd_opt(year, 1, 1)?,
                NaiveDate::from_ymd_opt(year, 12, 31)?,
            ),
            (Some(month), None) => {
                let first = NaiveDate::from_ymd_opt(year, month, 1)?;
                let next = if month == 12 {
                    NaiveDate::from_ymd_opt(year + 1, 1, 1)?
                } else {
                    NaiveDate::from_ymd_opt(year, month + 1, 1)?
                };
                (DateGranularity::Month, first, next.pred_opt()?)
            }
            (Some(month), Some(day)) => {
                let date = NaiveDate::from_ymd_opt(year, month, day)?;
                (DateGranularity::Day, date, date)
            }
        };

        let value = match granularity {
            DateGranularity::Year => first.format("%Y").to_string(),
            DateGranularity::Month => first.format("%Y-%m").to_string(),
            DateGranularity::Day => first.format("%Y-%m-%d").to_string(),
        };

        Some(DateFilter {
            granularity,
            value,
            start: first.and_hms_opt(0, 0, 0)?,
            end: last.and_hms_opt(23, 59, 59)?,
        })
    }

    pub fn matches(&self, range: &DateRange) -> bool {
        range.overlaps(self.start, self.end)
    }
}

/// A structured token that was close to valid but rejected. The token itself
/// is searched as free text instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryError {
    pub token: String,
    pub message: String,
}

impl QueryError {
    pub fn new(token: &str, message: impl Into<String>) -> Self {
        QueryError {
            token: token.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "'{}': {}", self.token, self.message)
    }
}
