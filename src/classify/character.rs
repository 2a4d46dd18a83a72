use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::CatalogError;
use crate::parser::TokenRecord;
use crate::query::write_pretty_json;

/// The closed set of characters, with the ids the game contract expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Character {
    Aurelia,
    Kaelth,
    Lumora,
    Sylor,
    VerdantCore,
    Veyra,
}

impl Character {
    /// All characters in id order
    pub const ALL: [Character; 6] = [
        Character::Aurelia,
        Character::Kaelth,
        Character::Lumora,
        Character::Sylor,
        Character::VerdantCore,
        Character::Veyra,
    ];

    pub fn id(self) -> u8 {
        match self {
            Character::Aurelia => 0,
            Character::Kaelth => 1,
            Character::Lumora => 2,
            Character::Sylor => 3,
            Character::VerdantCore => 4,
            Character::Veyra => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Character::Aurelia => "Aurelia",
            Character::Kaelth => "Kaelth",
            Character::Lumora => "Lumora",
            Character::Sylor => "Sylor",
            Character::VerdantCore => "Verdant Core",
            Character::Veyra => "Veyra",
        }
    }

    /// Exact match against the display names
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One `{tokenId, characterId}` entry of the token character map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterEntry {
    pub token_id: u64,
    pub character_id: u8,
}

/// Token -> character assignments sorted by token id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharacterMap {
    pub entries: Vec<CharacterEntry>,
}

impl CharacterMap {
    /// Count per character in id order, including characters with no tokens
    pub fn distribution(&self) -> Vec<(Character, usize)> {
        Character::ALL
            .into_iter()
            .map(|c| {
                let count = self
                    .entries
                    .iter()
                    .filter(|e| e.character_id == c.id())
                    .count();
                (c, count)
            })
            .collect()
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        write_pretty_json(path, &self.entries)
    }

    /// Read a previously written `[{tokenId, characterId}]` array.
    ///
    /// Entries whose ids are not non-negative integers are rejected.
    pub fn read_json(path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("Failed to read: {:?}", path))?;
        let mut entries: Vec<CharacterEntry> = serde_json::from_str(&text)
            .with_context(|| format!("Invalid character map entry in {:?}", path))?;
        entries.sort_by_key(|e| e.token_id);
        Ok(Self { entries })
    }

    /// `tokenId -> characterId`, serialized as a JSON object keyed by token id
    pub fn keyed(&self) -> BTreeMap<u64, u8> {
        self.entries
            .iter()
            .map(|e| (e.token_id, e.character_id))
            .collect()
    }

    pub fn write_keyed_json(&self, path: &Path) -> Result<()> {
        write_pretty_json(path, &self.keyed())
    }
}

/// Resolve a record's character from its display name
pub fn classify(record: &TokenRecord) -> Result<Character, CatalogError> {
    let name = record.character_name();
    Character::from_name(name).ok_or_else(|| CatalogError::UnknownCharacter {
        token_id: record.token_id,
        name: name.to_string(),
    })
}

/// Classify every record. A single unknown name fails the whole map.
pub fn build_character_map(records: &[TokenRecord]) -> Result<CharacterMap, CatalogError> {
    let mut entries = records
        .iter()
        .map(|r| {
            classify(r).map(|c| CharacterEntry {
                token_id: r.token_id,
                character_id: c.id(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    entries.sort_by_key(|e| e.token_id);
    Ok(CharacterMap { entries })
}

pub fn render_distribution(map: &CharacterMap) -> String {
    let mut out = String::from("Character distribution:\n");
    for (character, count) in map.distribution() {
        out.push_str(&format!("  {}: {}\n", character, count));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(token_id: u64, name: &str) -> TokenRecord {
        TokenRecord {
            token_id,
            filename: format!("{}.json", token_id),
            name: name.to_string(),
            description: String::new(),
            collection: String::new(),
            image: String::new(),
            fee_recipient: String::new(),
            seller_fee_basis_points: 1000,
            attack: 0,
            defense: 0,
            vitality: 0,
            agility: 0,
            core: 0,
            background: "Common".to_string(),
            token_uri: String::new(),
        }
    }

    #[test]
    fn test_ids_are_stable() {
        let ids: Vec<u8> = Character::ALL.iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(Character::from_name("Verdant Core"), Some(Character::VerdantCore));
        assert_eq!(Character::from_name("kaelth"), None);
    }

    #[test]
    fn test_classify_strips_number() {
        assert_eq!(classify(&record(312, "Kaelth #312")).unwrap(), Character::Kaelth);
        assert_eq!(classify(&record(1, " Veyra #1")).unwrap(), Character::Veyra);
    }

    #[test]
    fn test_unknown_name_fails_whole_map() {
        let records = vec![record(1, "Kaelth #1"), record(2, "Unknown Thing #1")];
        let err = build_character_map(&records).unwrap_err();
        match err {
            CatalogError::UnknownCharacter { token_id, name } => {
                assert_eq!(token_id, 2);
                assert_eq!(name, "Unknown Thing");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_map_sorted_with_zero_counts() {
        let records = vec![
            record(9, "Sylor #9"),
            record(2, "Aurelia #2"),
            record(4, "Sylor #4"),
        ];
        let map = build_character_map(&records).unwrap();

        let ids: Vec<u64> = map.entries.iter().map(|e| e.token_id).collect();
        assert_eq!(ids, vec![2, 4, 9]);

        let dist = map.distribution();
        assert_eq!(dist.len(), 6);
        assert_eq!(dist[0], (Character::Aurelia, 1));
        assert_eq!(dist[1], (Character::Kaelth, 0));
        assert_eq!(dist[3], (Character::Sylor, 2));
    }

    #[test]
    fn test_keyed_map_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let array_path = dir.path().join("tokenCharacterMap.json");
        let keyed_path = dir.path().join("tokenCharacterMap_map.json");

        let map = build_character_map(&[
            record(10, "Veyra #10"),
            record(2, "Kaelth #2"),
            record(1, "Verdant Core #1"),
        ])
        .unwrap();
        map.write_json(&array_path).unwrap();

        let read = CharacterMap::read_json(&array_path).unwrap();
        assert_eq!(read, map);

        read.write_keyed_json(&keyed_path).unwrap();
        let text = fs::read_to_string(&keyed_path).unwrap();
        assert_eq!(text, "{\n  \"1\": 4,\n  \"2\": 1,\n  \"10\": 5\n}");

        let keyed: BTreeMap<String, u8> = serde_json::from_str(&text).unwrap();
        assert_eq!(keyed.len(), 3);
        assert_eq!(keyed["10"], 5);
    }

    #[test]
    fn test_read_rejects_non_integer_ids() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"[{"tokenId": 1, "characterId": "Kaelth"}]"#).unwrap();
        assert!(CharacterMap::read_json(&path).is_err());

        fs::write(&path, r#"[{"tokenId": 1.5, "characterId": 1}]"#).unwrap();
        assert!(CharacterMap::read_json(&path).is_err());
    }

    #[test]
    fn test_entry_serializes_camel_case() {
        let entry = CharacterEntry {
            token_id: 5,
            character_id: 5,
        };
        assert_eq!(
            serde_json::to_string(&entry).unwrap(),
            r#"{"tokenId":5,"characterId":5}"#
        );
    }
}
