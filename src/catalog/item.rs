use serde::{Serialize, Deserialize};
use crate::catalog::row::RowExt;
use crate::core::error::Result;
use crate::core::types::{Language, LocalizedText, RawRow, Record, RecordId, TypedRecord};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: RecordId,
    pub unique_key: String,
    pub name: LocalizedText,
    pub category: String,
    pub rarity: Option<String>,
}

impl Record for Item {
    fn id(&self) -> RecordId {
        self.id
    }

    fn unique_key(&self) -> &str {
        &self.unique_key
    }

    fn search_text(&self, language: Language) -> Vec<&str> {
        let mut text: Vec<&str> = self.name.resolve(language).into_iter().collect();
        text.push(&self.category);
        text
    }

    fn title(&self, language: Language) -> &str {
        self.name.resolve(language).unwrap_or(&self.unique_key)
    }

    fn badge(&self) -> Option<String> {
        Some(self.category.clone())
    }

    fn approx_bytes(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.unique_key.len()
            + self.name.approx_bytes()
            + self.category.len()
            + self.rarity.as_ref().map_or(0, String::len)
    }
}

impl TypedRecord for Item {
    fn transform(row: &RawRow) -> Result<Self> {
        let name = row.localized("name");
        Ok(Item {
            id: row.id()?,
            unique_key: row.unique_key(name.get(Language::En))?,
            name,
            category: row.required("category")?.to_lowercase(),
            rarity: row.optional("rarity").map(str::to_uppercase),
        })
    }
}
