use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;

use crate::config::{FILENAME_COLUMN, TOKEN_ID_COLUMN};
use crate::error::CatalogError;

/// `tokenId -> metadata filename`, ordered by token id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenMapping {
    entries: BTreeMap<u64, String>,
}

impl TokenMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later entries for the same token replace earlier ones
    pub fn insert(&mut self, token_id: u64, filename: impl Into<String>) {
        self.entries.insert(token_id, filename.into());
    }

    pub fn get(&self, token_id: u64) -> Option<&str> {
        self.entries.get(&token_id).map(|s| s.as_str())
    }

    pub fn contains(&self, token_id: u64) -> bool {
        self.entries.contains_key(&token_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &str)> {
        self.entries.iter().map(|(id, f)| (*id, f.as_str()))
    }
}

/// Load the mint mapping CSV (`tokenId,metadataFile`).
///
/// The file is a required input: a missing file, a missing column or a
/// non-integer token id all fail the whole load.
pub fn load_mapping(csv_path: &Path) -> Result<TokenMapping> {
    if !csv_path.exists() {
        return Err(CatalogError::MappingFileMissing(csv_path.to_path_buf()).into());
    }

    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open mapping file: {}", csv_path.display()))?;

    let headers = reader.headers()?.clone();
    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or(CatalogError::MissingColumn(name))
    };
    let id_idx = column(TOKEN_ID_COLUMN)?;
    let file_idx = column(FILENAME_COLUMN)?;

    let mut mapping = TokenMapping::new();

    for (idx, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("Failed to read mapping row {}", idx + 1))?;

        let raw_id = row.get(id_idx).unwrap_or_default().trim();
        let token_id: u64 = raw_id.parse().map_err(|_| CatalogError::InvalidTokenId {
            row: idx + 1,
            value: raw_id.to_string(),
        })?;
        let filename = row.get(file_idx).unwrap_or_default().trim();

        mapping.insert(token_id, filename);
    }

    Ok(mapping)
}
