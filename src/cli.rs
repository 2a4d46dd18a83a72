use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{
    DEFAULT_CHARACTER_MAP, DEFAULT_DB_PATH, DEFAULT_EXPORT, DEFAULT_KEYED_CHARACTER_MAP,
    DEFAULT_MAPPING_CSV, DEFAULT_METADATA_DIR, DEFAULT_UNIQUE_CARDS,
};

#[derive(Parser, Debug)]
#[command(name = "verdantkin-catalog")]
#[command(version, about = "Index Verdant Kin NFT metadata into SQLite and query it")]
pub struct Cli {
    /// SQLite catalog path
    #[arg(long, global = true, default_value = DEFAULT_DB_PATH)]
    pub db: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the mint mapping and index every metadata document
    Index {
        /// Directory containing the JSON metadata documents
        #[arg(long, default_value = DEFAULT_METADATA_DIR)]
        metadata_dir: PathBuf,

        /// Mint mapping CSV (headers: tokenId,metadataFile)
        #[arg(long, default_value = DEFAULT_MAPPING_CSV)]
        mapping: PathBuf,
    },

    /// Show one token in full, or the first tokens plus statistics
    Query {
        /// Token id; a non-numeric value shows the summary
        token: Option<String>,
    },

    /// Build the token -> character id map
    CharacterMap {
        /// Output JSON path for the `[{tokenId, characterId}]` array
        #[arg(short, long, default_value = DEFAULT_CHARACTER_MAP)]
        output: PathBuf,

        /// Output JSON path for the `{tokenId: characterId}` object
        #[arg(long, default_value = DEFAULT_KEYED_CHARACTER_MAP)]
        map_output: PathBuf,
    },

    /// Convert an existing character map array into the keyed object form
    KeyedMap {
        /// Input `[{tokenId, characterId}]` array
        #[arg(short, long, default_value = DEFAULT_CHARACTER_MAP)]
        input: PathBuf,

        /// Output `{tokenId: characterId}` object
        #[arg(short, long, default_value = DEFAULT_KEYED_CHARACTER_MAP)]
        output: PathBuf,
    },

    /// Extract one card per character and background combination
    UniqueCards {
        /// Output JSON path
        #[arg(short, long, default_value = DEFAULT_UNIQUE_CARDS)]
        output: PathBuf,
    },

    /// Dump the whole catalog as JSON
    Export {
        /// Output JSON path
        #[arg(short, long, default_value = DEFAULT_EXPORT)]
        output: PathBuf,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_without_token() {
        let cli = Cli::try_parse_from(["verdantkin-catalog", "query"]).unwrap();
        assert_eq!(cli.db, PathBuf::from(DEFAULT_DB_PATH));
        assert!(matches!(cli.command, Commands::Query { token: None }));
    }

    #[test]
    fn test_character_map_defaults() {
        let cli = Cli::try_parse_from(["verdantkin-catalog", "character-map"]).unwrap();
        match cli.command {
            Commands::CharacterMap { output, map_output } => {
                assert_eq!(output, PathBuf::from(DEFAULT_CHARACTER_MAP));
                assert_eq!(map_output, PathBuf::from(DEFAULT_KEYED_CHARACTER_MAP));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_index_overrides() {
        let cli = Cli::try_parse_from([
            "verdantkin-catalog",
            "index",
            "--metadata-dir",
            "meta",
            "--db",
            "cat.db",
        ])
        .unwrap();
        assert_eq!(cli.db, PathBuf::from("cat.db"));
        match cli.command {
            Commands::Index {
                metadata_dir,
                mapping,
            } => {
                assert_eq!(metadata_dir, PathBuf::from("meta"));
                assert_eq!(mapping, PathBuf::from(DEFAULT_MAPPING_CSV));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
