use serde::{Serialize, Deserialize};
use crate::catalog::row::RowExt;
use crate::core::error::Result;
use crate::core::types::{Capabilities, Language, LocalizedText, RawRow, Record, RecordId, StatBlock, TypedRecord};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: RecordId,
    pub unique_key: String,
    pub name: LocalizedText,
    pub stats: StatBlock,
    pub birthday: Option<String>,
    /// Dominant stat type shown as the badge, e.g. "POW".
    pub character_type: Option<String>,
}

impl Record for Character {
    fn id(&self) -> RecordId {
        self.id
    }

    fn unique_key(&self) -> &str {
        &self.unique_key
    }

    fn search_text(&self, language: Language) -> Vec<&str> {
        self.name.resolve(language).into_iter().collect()
    }

    fn title(&self, language: Language) -> &str {
        self.name.resolve(language).unwrap_or(&self.unique_key)
    }

    fn stats(&self) -> Option<&StatBlock> {
        Some(&self.stats)
    }

    fn badge(&self) -> Option<String> {
        self.character_type.clone()
    }

    fn approx_bytes(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.unique_key.len()
            + self.name.approx_bytes()
            + self.birthday.as_ref().map_or(0, String::len)
            + self.character_type.as_ref().map_or(0, String::len)
    }
}

impl TypedRecord for Character {
    const CAPABILITIES: Capabilities = Capabilities { stats: true, dates: false };

    /// POW, TEC and STM are required; a missing APL stays absent.
    fn transform(row: &RawRow) -> Result<Self> {
        let name = row.localized("name");
        let mut stats = StatBlock::new(
            row.parse_required("pow")?,
            row.parse_required("tec")?,
            row.parse_required("stm")?,
        );
        stats.apl = row.parse_optional("apl")?;

        Ok(Character {
            id: row.id()?,
            unique_key: row.unique_key(name.get(Language::En))?,
            name,
            stats,
            birthday: row.optional("birthday").map(str::to_string),
            character_type: row.optional("type").map(str::to_uppercase),
        })
    }
}
