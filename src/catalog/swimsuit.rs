use serde::{Serialize, Deserialize};
use crate::catalog::row::{normalize_key, RowExt};
use crate::core::error::{Error, Result};
use crate::core::types::{Language, LocalizedText, RawRow, Record, RecordId, TypedRecord};

const RARITIES: [&str; 3] = ["SSR", "SR", "R"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swimsuit {
    pub id: RecordId,
    pub unique_key: String,
    pub name: LocalizedText,
    /// Key of the character wearing it.
    pub character: String,
    pub rarity: String,
}

impl Record for Swimsuit {
    fn id(&self) -> RecordId {
        self.id
    }

    fn unique_key(&self) -> &str {
        &self.unique_key
    }

    fn search_text(&self, language: Language) -> Vec<&str> {
        let mut text: Vec<&str> = self.name.resolve(language).into_iter().collect();
        text.push(&self.character);
        text
    }

    fn title(&self, language: Language) -> &str {
        self.name.resolve(language).unwrap_or(&self.unique_key)
    }

    fn badge(&self) -> Option<String> {
        Some(self.rarity.clone())
    }

    fn approx_bytes(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.unique_key.len()
            + self.name.approx_bytes()
            + self.character.len()
            + self.rarity.len()
    }
}

impl TypedRecord for Swimsuit {
    fn transform(row: &RawRow) -> Result<Self> {
        let name = row.localized("name");
        let rarity = row.required("rarity")?.to_uppercase();
        if !RARITIES.contains(&rarity.as_str()) {
            return Err(Error::transform(format!("unknown rarity '{}'", rarity)));
        }

        Ok(Swimsuit {
            id: row.id()?,
            unique_key: row.unique_key(name.get(Language::En))?,
            name,
            character: normalize_key(row.required("character")?),
            rarity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::row::raw_row;

    #[test]
    fn rarity_is_validated() {
        let row = raw_row(&[("id", "1"), ("name_en", "Tide"), ("character", "Ayane"), ("rarity", "sr")]);
        let swimsuit = Swimsuit::transform(&row).unwrap();
        assert_eq!(swimsuit.rarity, "SR");
        assert_eq!(swimsuit.character, "ayane");
        assert!(swimsuit.stats().is_none());

        let row = raw_row(&[("id", "1"), ("name_en", "Tide"), ("character", "ayane"), ("rarity", "UR")]);
        assert!(Swimsuit::transform(&row).is_err());
    }
}
