use serde::{Serialize, Deserialize};
use crate::catalog::row::RowExt;
use crate::core::error::Result;
use crate::core::types::{Language, LocalizedText, RawRow, Record, RecordId, TypedRecord};

/// Editorial page. Only carries a plain title, optionally translated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guide {
    pub id: RecordId,
    pub unique_key: String,
    pub title: String,
    pub localized_title: LocalizedText,
    pub summary: Option<String>,
}

impl Record for Guide {
    fn id(&self) -> RecordId {
        self.id
    }

    fn unique_key(&self) -> &str {
        &self.unique_key
    }

    fn search_text(&self, language: Language) -> Vec<&str> {
        let mut text = vec![self.title(language)];
        if let Some(summary) = &self.summary {
            text.push(summary);
        }
        text
    }

    fn title(&self, language: Language) -> &str {
        self.localized_title.resolve(language).unwrap_or(&self.title)
    }

    fn approx_bytes(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.unique_key.len()
            + self.title.len()
            + self.localized_title.approx_bytes()
            + self.summary.as_ref().map_or(0, String::len)
    }
}

impl TypedRecord for Guide {
    fn transform(row: &RawRow) -> Result<Self> {
        let title = row.required("title")?.to_string();
        Ok(Guide {
            id: row.id()?,
            unique_key: row.unique_key(Some(title.as_str()))?,
            localized_title: row.localized("title"),
            title,
            summary: row.optional("summary").map(str::to_string),
        })
    }
}
