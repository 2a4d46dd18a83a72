use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;

use super::metadata::{numeric_trait, MetadataDocument};
use crate::config::{
    DEFAULT_BACKGROUND, DEFAULT_COLLECTION, DEFAULT_NAME, DEFAULT_ROYALTY_BASIS_POINTS,
};
use crate::error::CatalogError;

/// A parsed row of the `nfts` table
#[derive(Debug, Clone, PartialEq)]
pub struct TokenRecord {
    pub token_id: u64,
    pub filename: String,
    pub name: String,
    pub description: String,
    pub collection: String,
    pub image: String,
    pub fee_recipient: String,
    pub seller_fee_basis_points: i64,
    pub attack: i64,
    pub defense: i64,
    pub vitality: i64,
    pub agility: i64,
    pub core: i64,
    pub background: String,
    pub token_uri: String,
}

impl TokenRecord {
    /// Build a record from a decoded document, applying field defaults
    pub fn from_document(token_id: u64, path: &Path, doc: &MetadataDocument) -> Result<Self> {
        let traits = doc.traits();
        let stat = |key: &str| numeric_trait(traits.get(key));

        let token_uri = match doc.token_uri.as_deref() {
            Some(uri) if !uri.is_empty() => uri.to_string(),
            _ => path.display().to_string(),
        };

        Ok(Self {
            token_id,
            filename: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            name: doc.name.clone().unwrap_or_else(|| DEFAULT_NAME.to_string()),
            description: doc.description.clone().unwrap_or_default(),
            collection: doc
                .collection
                .clone()
                .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            image: doc.image.clone().unwrap_or_default(),
            fee_recipient: doc.fee_recipient.clone().unwrap_or_default(),
            seller_fee_basis_points: royalty_basis_points(
                doc.seller_fee_basis_points.as_ref(),
                path,
            )?,
            attack: stat("attack"),
            defense: stat("defense"),
            vitality: stat("vitality"),
            agility: stat("agility"),
            core: stat("core"),
            background: background(traits.get("background")),
            token_uri,
        })
    }

    /// The character part of the display name: `"Kaelth #312"` -> `"Kaelth"`
    pub fn character_name(&self) -> &str {
        self.name
            .split(" #")
            .next()
            .unwrap_or_default()
            .trim()
    }
}

/// Read and decode one metadata document into a record for `token_id`
pub fn parse_metadata(token_id: u64, path: &Path) -> Result<TokenRecord> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read: {:?}", path))?;

    let doc: MetadataDocument = serde_json::from_str(&text)
        .map_err(|e| CatalogError::InvalidDocument {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    TokenRecord::from_document(token_id, path, &doc)
}

fn royalty_basis_points(value: Option<&Value>, path: &Path) -> Result<i64> {
    let invalid = |v: &Value| CatalogError::InvalidDocument {
        path: path.to_path_buf(),
        reason: format!("seller_fee_basis_points is not an integer: {}", v),
    };

    match value {
        None => Ok(DEFAULT_ROYALTY_BASIS_POINTS),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .ok_or_else(|| invalid(&Value::Number(n.clone())).into()),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| invalid(&Value::String(s.clone())).into()),
        Some(other) => Err(invalid(other).into()),
    }
}

fn background(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::String(_)) | None => DEFAULT_BACKGROUND.to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn record(doc: Value) -> Result<TokenRecord> {
        let doc: MetadataDocument = serde_json::from_value(doc).unwrap();
        TokenRecord::from_document(5, &PathBuf::from("meta/a.json"), &doc)
    }

    #[test]
    fn test_defaults_for_empty_document() {
        let rec = record(json!({})).unwrap();
        assert_eq!(rec.token_id, 5);
        assert_eq!(rec.filename, "a.json");
        assert_eq!(rec.name, "Unknown");
        assert_eq!(rec.collection, "The Verdant Kin");
        assert_eq!(rec.seller_fee_basis_points, 1000);
        assert_eq!((rec.attack, rec.defense, rec.core), (0, 0, 0));
        assert_eq!(rec.background, "Common");
        assert_eq!(rec.token_uri, "meta/a.json");
    }

    #[test]
    fn test_traits_fill_numeric_fields() {
        let rec = record(json!({
            "name": "Veyra #5",
            "tokenURI": "ipfs://abc/5.json",
            "seller_fee_basis_points": "500",
            "attributes": [
                {"trait_type": "ATTACK", "value": "10"},
                {"trait_type": "Agility", "value": 4},
                {"trait_type": "Background", "value": "Mythic"}
            ]
        }))
        .unwrap();

        assert_eq!(rec.attack, 10);
        assert_eq!(rec.defense, 0);
        assert_eq!(rec.agility, 4);
        assert_eq!(rec.background, "Mythic");
        assert_eq!(rec.seller_fee_basis_points, 500);
        assert_eq!(rec.token_uri, "ipfs://abc/5.json");
    }

    #[test]
    fn test_non_string_background_is_rendered() {
        let rec = record(json!({
            "attributes": [{"trait_type": "background", "value": "3"}]
        }))
        .unwrap();
        assert_eq!(rec.background, "3");

        let rec = record(json!({
            "attributes": [{"trait_type": "background", "value": ""}]
        }))
        .unwrap();
        assert_eq!(rec.background, "Common");
    }

    #[test]
    fn test_bad_royalty_rejects_document() {
        let err = record(json!({"seller_fee_basis_points": "ten percent"})).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CatalogError>(),
            Some(CatalogError::InvalidDocument { .. })
        ));
    }

    #[test]
    fn test_character_name() {
        let mut rec = record(json!({"name": "Kaelth #312"})).unwrap();
        assert_eq!(rec.character_name(), "Kaelth");

        rec.name = "  Verdant Core #9 #2".to_string();
        assert_eq!(rec.character_name(), "Verdant Core");

        rec.name = "Lumora".to_string();
        assert_eq!(rec.character_name(), "Lumora");
    }
}
