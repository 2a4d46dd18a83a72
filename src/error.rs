use std::path::PathBuf;
use thiserror::Error;

/// Failures the catalog distinguishes from generic I/O and SQLite errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("mapping file {0:?} not found (expected headers: tokenId,metadataFile)")]
    MappingFileMissing(PathBuf),

    #[error("mapping file is missing the '{0}' column")]
    MissingColumn(&'static str),

    #[error("mapping row {row}: token id '{value}' is not an integer")]
    InvalidTokenId { row: usize, value: String },

    #[error("unknown character '{name}' in token {token_id}")]
    UnknownCharacter { token_id: u64, name: String },

    #[error("invalid metadata document {path:?}: {reason}")]
    InvalidDocument { path: PathBuf, reason: String },
}
