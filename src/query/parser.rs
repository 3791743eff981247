use std::sync::LazyLock;
use regex::Regex;
use crate::core::types::{RecordId, StatField};
use crate::query::ast::{
    DateFilter, Filter, IdFilter, KeyFilter, ParsedQuery, QueryError, StatComparison, StatFilter,
};

static ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^id:([0-9]+)$").unwrap());
static KEY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^key:([a-z0-9_-]+)$").unwrap());
static STAT_RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(pow|tec|stm|apl):([0-9]+)-([0-9]+)$").unwrap());
static STAT_COMPARE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(pow|tec|stm|apl)(>=|<=|[><=])([0-9]+)$").unwrap());
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^date:([0-9]{4})(?:-([0-9]{2}))?(?:-([0-9]{2}))?$").unwrap());

/// Prefixes whose malformed tokens are reported instead of silently searched.
const STRICT_PREFIXES: [&str; 3] = ["id:", "key:", "date:"];

pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 2100;

/// How a single token was classified.
enum Token {
    Filter(Filter),
    Rejected(QueryError),
    Text,
}

/// Splits a search string into structured filters and free text.
///
/// Parsing is total: a malformed structured token is recorded in
/// `ParsedQuery::errors` and searched as free text, never dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParser;

impl QueryParser {
    pub fn new() -> Self {
        QueryParser
    }

    pub fn parse(&self, input: &str) -> ParsedQuery {
        let mut parsed = ParsedQuery::default();
        let mut text = Vec::new();

        for token in input.split_whitespace() {
            match classify(token) {
                Token::Filter(filter) => parsed.filters.push(filter),
                Token::Rejected(error) => {
                    parsed.errors.push(error);
                    text.push(token);
                }
                Token::Text => text.push(token),
            }
        }

        parsed.free_text = text.join(" ");
        parsed
    }
}

/// Shorthand for `QueryParser::new().parse(input)`.
pub fn parse(input: &str) -> ParsedQuery {
    QueryParser.parse(input)
}

// First match wins: id, key, stat range, stat comparison, date.
fn classify(token: &str) -> Token {
    if let Some(caps) = ID_RE.captures(token) {
        return match caps[1].parse::<u64>() {
            Ok(id) => Token::Filter(Filter::Id(IdFilter { value: RecordId(id) })),
            Err(_) => Token::Rejected(QueryError::new(token, "id is out of range")),
        };
    }

    if let Some(caps) = KEY_RE.captures(token) {
        return Token::Filter(Filter::Key(KeyFilter {
            value: caps[1].to_string(),
        }));
    }

    if let Some(caps) = STAT_RANGE_RE.captures(token) {
        return stat_range(token, &caps[1], &caps[2], &caps[3]);
    }

    if let Some(caps) = STAT_COMPARE_RE.captures(token) {
        return stat_comparison(token, &caps[1], &caps[2], &caps[3]);
    }

    if let Some(caps) = DATE_RE.captures(token) {
        return date(
            token,
            &caps[1],
            caps.get(2).map(|m| m.as_str()),
            caps.get(3).map(|m| m.as_str()),
        );
    }

    if let Some(prefix) = STRICT_PREFIXES.iter().find(|p| token.starts_with(**p)) {
        return Token::Rejected(QueryError::new(token, malformed_message(prefix)));
    }

    Token::Text
}

fn malformed_message(prefix: &str) -> &'static str {
    match prefix {
        "id:" => "expected a numeric id, e.g. id:42",
        "key:" => "expected a lowercase key, e.g. key:kasumi",
        _ => "expected a date as YYYY, YYYY-MM or YYYY-MM-DD",
    }
}

fn stat_field(name: &str) -> Option<StatField> {
    StatField::parse(name)
}

fn stat_range(token: &str, field: &str, min: &str, max: &str) -> Token {
    let (Some(field), Ok(min), Ok(max)) = (stat_field(field), min.parse::<u32>(), max.parse::<u32>())
    else {
        return Token::Rejected(QueryError::new(token, "stat value is out of range"));
    };

    if min > max {
        return Token::Rejected(QueryError::new(
            token,
            format!("inverted range: {} is greater than {}", min, max),
        ));
    }

    Token::Filter(Filter::Stat(StatFilter {
        field,
        comparison: StatComparison::Range { min, max },
    }))
}

fn stat_comparison(token: &str, field: &str, operator: &str, value: &str) -> Token {
    let (Some(field), Ok(value)) = (stat_field(field), value.parse::<u32>()) else {
        return Token::Rejected(QueryError::new(token, "stat value is out of range"));
    };

    match StatComparison::from_operator(operator, value) {
        Some(comparison) => Token::Filter(Filter::Stat(StatFilter { field, comparison })),
        None => Token::Text,
    }
}

fn date(token: &str, year: &str, month: Option<&str>, day: Option<&str>) -> Token {
    let reject = |message: String| Token::Rejected(QueryError::new(token, message));

    // The patterns only admit ASCII digits, so these always fit.
    let year: i32 = year.parse().unwrap_or_default();
    let month: Option<u32> = month.map(|m| m.parse().unwrap_or_default());
    let day: Option<u32> = day.map(|d| d.parse().unwrap_or_default());

    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return reject(format!("year {} is outside {}-{}", year, MIN_YEAR, MAX_YEAR));
    }
    if let Some(month) = month {
        if !(1..=12).contains(&month) {
            return reject(format!("invalid month {}", month));
        }
    }
    if let Some(day) = day {
        if !(1..=31).contains(&day) {
            return reject(format!("invalid day {}", day));
        }
    }

    match DateFilter::new(year, month, day) {
        Some(filter) => Token::Filter(Filter::Date(filter)),
        None => reject("no such calendar date".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ast::DateGranularity;

    #[test]
    fn empty_input() {
        assert_eq!(parse("   "), ParsedQuery::default());
        assert!(parse("").is_empty());
    }

    #[test]
    fn id_filter() {
        let parsed = parse("id:42");
        assert_eq!(parsed.filters, vec![Filter::Id(IdFilter { value: RecordId(42) })]);
        assert_eq!(parsed.free_text, "");
        assert!(parsed.errors.is_empty());
    }

    #[test]
    fn stat_range_with_free_text() {
        let parsed = parse("pow:300-400 kasumi");
        assert_eq!(
            parsed.filters,
            vec![Filter::Stat(StatFilter {
                field: StatField::Pow,
                comparison: StatComparison::Range { min: 300, max: 400 },
            })]
        );
        assert_eq!(parsed.free_text, "kasumi");
        assert!(parsed.errors.is_empty());
    }

    #[test]
    fn inverted_range_falls_back_to_text() {
        let parsed = parse("pow:500-100");
        assert!(parsed.filters.is_empty());
        assert_eq!(parsed.free_text, "pow:500-100");
        assert_eq!(parsed.errors.len(), 1);
        assert!(parsed.errors[0].message.contains("inverted range"));
    }

    #[test]
    fn invalid_month_falls_back_to_text() {
        let parsed = parse("date:2024-13");
        assert!(parsed.filters.is_empty());
        assert_eq!(parsed.free_text, "date:2024-13");
        assert_eq!(parsed.errors.len(), 1);
        assert!(parsed.errors[0].message.contains("month"));
    }

    #[test]
    fn comparison_operators() {
        let parsed = parse("pow>500 tec<=300 stm=10 apl>=7 pow<1");
        let operators: Vec<&str> = parsed
            .filters
            .iter()
            .map(|f| match f {
                Filter::Stat(stat) => stat.comparison.operator(),
                other => panic!("unexpected filter {:?}", other),
            })
            .collect();
        assert_eq!(operators, vec![">", "<=", "=", ">=", "<"]);
        assert_eq!(parsed.free_text, "");
    }

    #[test]
    fn key_and_date_filters_keep_input_order() {
        let parsed = parse("summer key:beach-party date:2024-07 festival");
        assert_eq!(parsed.free_text, "summer festival");
        assert_eq!(parsed.filters.len(), 2);
        assert_eq!(
            parsed.filters[0],
            Filter::Key(KeyFilter {
                value: "beach-party".to_string()
            })
        );
        match &parsed.filters[1] {
            Filter::Date(date) => {
                assert_eq!(date.granularity, DateGranularity::Month);
                assert_eq!(date.value, "2024-07");
            }
            other => panic!("unexpected filter {:?}", other),
        }
    }

    #[test]
    fn malformed_prefixes_are_reported() {
        let parsed = parse("id:abc key:Upper date:24");
        assert!(parsed.filters.is_empty());
        assert_eq!(parsed.free_text, "id:abc key:Upper date:24");
        assert_eq!(parsed.errors.len(), 3);
        assert_eq!(parsed.errors[1].token, "key:Upper");
    }

    #[test]
    fn unknown_colon_tokens_are_plain_text() {
        let parsed = parse("http://example pow:abc");
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.free_text, "http://example pow:abc");
    }

    #[test]
    fn out_of_range_dates() {
        let parsed = parse("date:1999 date:2024-02-30 date:2024-01-32");
        assert!(parsed.filters.is_empty());
        assert_eq!(parsed.errors.len(), 3);
        assert!(parsed.errors[0].message.contains("1999"));
        assert!(parsed.errors[1].message.contains("calendar"));
        assert!(parsed.errors[2].message.contains("day"));
    }

    #[test]
    fn numeric_overflow_is_an_error() {
        let parsed = parse("id:99999999999999999999 pow>99999999999");
        assert!(parsed.filters.is_empty());
        assert_eq!(parsed.errors.len(), 2);
        assert_eq!(parsed.free_text, "id:99999999999999999999 pow>99999999999");
    }

    #[test]
    fn only_ascii_digits_are_numbers() {
        let parsed = parse("date:\u{0662}\u{0660}\u{0662}\u{0664} id:\u{0664}\u{0662} pow>\u{0665}\u{0660}\u{0660}");
        assert!(parsed.filters.is_empty());
        assert_eq!(parsed.errors.len(), 2);
        assert!(parsed.errors[0].message.contains("YYYY"));
        assert!(parsed.errors[1].message.contains("numeric id"));
    }

    #[test]
    fn whitespace_runs_collapse() {
        let parsed = parse("  ayane \t  kasumi\n");
        assert_eq!(parsed.free_text, "ayane kasumi");
    }
}
