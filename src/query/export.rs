use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

use super::store::{CatalogReader, UniqueCard};

/// Write `value` as pretty-printed JSON (two-space indent)
pub fn write_pretty_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
    fs::write(path, json).with_context(|| format!("Failed to write: {:?}", path))?;
    Ok(())
}

/// Dump every `nfts` row to `path`, returning the row count
pub fn export_catalog(reader: &CatalogReader, path: &Path) -> Result<usize> {
    let rows = reader.export_rows()?;
    write_pretty_json(path, &rows)?;
    Ok(rows.len())
}

/// Unique character + background combinations and the distinct name count
pub struct UniqueCardsReport {
    pub cards: Vec<UniqueCard>,
    pub distinct_names: u64,
}

/// Extract unique cards and save them to `path`
pub fn export_unique_cards(reader: &CatalogReader, path: &Path) -> Result<UniqueCardsReport> {
    let cards = reader.unique_cards()?;
    write_pretty_json(path, &cards)?;
    Ok(UniqueCardsReport {
        cards,
        distinct_names: reader.distinct_names()?,
    })
}
