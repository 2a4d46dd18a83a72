//! Default locations and document defaults used when no flag overrides them

use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "verdantkin_metadata.db";
pub const DEFAULT_METADATA_DIR: &str = "VKINjson";
pub const DEFAULT_MAPPING_CSV: &str = "mapping.csv";
pub const DEFAULT_CHARACTER_MAP: &str = "tokenCharacterMap.json";
pub const DEFAULT_KEYED_CHARACTER_MAP: &str = "tokenCharacterMap_map.json";
pub const DEFAULT_UNIQUE_CARDS: &str = "unique_cards.json";
pub const DEFAULT_EXPORT: &str = "verdantkin_metadata.json";

/// Mapping CSV header names
pub const TOKEN_ID_COLUMN: &str = "tokenId";
pub const FILENAME_COLUMN: &str = "metadataFile";

pub const DEFAULT_NAME: &str = "Unknown";
pub const DEFAULT_COLLECTION: &str = "The Verdant Kin";
pub const DEFAULT_ROYALTY_BASIS_POINTS: i64 = 1000;
pub const DEFAULT_BACKGROUND: &str = "Common";
/// Stored for a trait that names no value
pub const DEFAULT_TRAIT_VALUE: &str = "Unknown";

/// Inputs and output of an indexing run
#[derive(Debug, Clone)]
pub struct CatalogPaths {
    pub db: PathBuf,
    pub metadata_dir: PathBuf,
    pub mapping_csv: PathBuf,
}
