use chrono::NaiveDateTime;
use serde::{Serialize, Deserialize};
use crate::catalog::row::{DayBound, RowExt};
use crate::core::error::{Error, Result};
use crate::core::types::{Capabilities, DateRange, Language, LocalizedText, RawRow, Record, RecordId, TypedRecord};

/// A time-boxed event (gacha banner, festival, ranking). Either end of the
/// window may be unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: RecordId,
    pub unique_key: String,
    pub name: LocalizedText,
    pub event_type: String,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl Record for Event {
    fn id(&self) -> RecordId {
        self.id
    }

    fn unique_key(&self) -> &str {
        &self.unique_key
    }

    fn search_text(&self, language: Language) -> Vec<&str> {
        let mut text: Vec<&str> = self.name.resolve(language).into_iter().collect();
        text.push(&self.event_type);
        text
    }

    fn title(&self, language: Language) -> &str {
        self.name.resolve(language).unwrap_or(&self.unique_key)
    }

    fn date_range(&self) -> Option<DateRange> {
        Some(DateRange::new(self.start, self.end))
    }

    fn badge(&self) -> Option<String> {
        Some(self.event_type.clone())
    }

    fn approx_bytes(&self) -> usize {
        std::mem::size_of::<Self>() + self.unique_key.len() + self.name.approx_bytes() + self.event_type.len()
    }
}

impl TypedRecord for Event {
    const CAPABILITIES: Capabilities = Capabilities { stats: false, dates: true };

    fn transform(row: &RawRow) -> Result<Self> {
        let name = row.localized("name");
        let start = row.datetime("start", DayBound::Start)?;
        let end = row.datetime("end", DayBound::End)?;

        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(Error::transform(format!("event ends ({}) before it starts ({})", end, start)));
            }
        }

        Ok(Event {
            id: row.id()?,
            unique_key: row.unique_key(name.get(Language::En))?,
            name,
            event_type: row.required("type")?.to_lowercase(),
            start,
            end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::row::raw_row;

    #[test]
    fn window_is_validated() {
        let row = raw_row(&[
            ("id", "1"),
            ("name_en", "Backwards"),
            ("type", "gacha"),
            ("start", "2024-02-01"),
            ("end", "2024-01-01"),
        ]);
        assert!(Event::transform(&row).is_err());

        let row = raw_row(&[("id", "1"), ("name_en", "Open"), ("type", "Festival"), ("start", "2024-02-01 12:00")]);
        let event = Event::transform(&row).unwrap();
        assert_eq!(event.event_type, "festival");
        assert_eq!(event.end, None);
        assert!(event.date_range().is_some());
    }
}
