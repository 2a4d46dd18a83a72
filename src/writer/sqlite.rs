use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::path::Path;

use super::schema_gen::{generate_create_table, generate_upsert};
use crate::mapping::TokenMapping;
use crate::parser::TokenRecord;
use crate::schema::{ALL_TABLES, MINT_MAPPING, NFTS};

/// Write side of the catalog: schema setup and per-record upserts.
///
/// The connection stays in autocommit mode, so every upsert is its own
/// durable commit and a failed record never rolls back earlier ones.
pub struct CatalogWriter {
    conn: Connection,
}

impl CatalogWriter {
    /// Open (or create) the catalog database in place
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database: {:?}", db_path))?;

        Ok(Self { conn })
    }

    /// Wrap an existing connection (e.g. in-memory for tests)
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn into_connection(self) -> Connection {
        self.conn
    }

    /// Create all catalog tables that do not exist yet
    pub fn create_tables(&self) -> Result<()> {
        for schema in ALL_TABLES {
            let sql = generate_create_table(schema);
            self.conn
                .execute(&sql, [])
                .with_context(|| format!("Failed to create table: {}", schema.name))?;
        }
        Ok(())
    }

    /// Persist the raw mapping entries for auditing
    pub fn record_mapping(&self, mapping: &TokenMapping) -> Result<usize> {
        let mut stmt = self.conn.prepare_cached(&generate_upsert(&MINT_MAPPING))?;
        for (token_id, filename) in mapping.iter() {
            stmt.execute(params![to_sql_id(token_id)?, filename])
                .with_context(|| format!("Failed to record mapping for #{}", token_id))?;
        }
        Ok(mapping.len())
    }

    /// Insert a record, fully replacing any earlier record with the same id
    pub fn upsert_record(&self, record: &TokenRecord) -> Result<()> {
        let mut stmt = self.conn.prepare_cached(&generate_upsert(&NFTS))?;
        stmt.execute(params![
            to_sql_id(record.token_id)?,
            record.filename,
            record.name,
            record.description,
            record.collection,
            record.image,
            record.fee_recipient,
            record.seller_fee_basis_points,
            record.attack,
            record.defense,
            record.vitality,
            record.agility,
            record.core,
            record.background,
            record.token_uri,
        ])
        .with_context(|| format!("Failed to write record #{}", record.token_id))?;
        Ok(())
    }
}

/// SQLite integers are signed; ids past i64::MAX cannot be stored
pub(crate) fn to_sql_id(token_id: u64) -> Result<i64> {
    i64::try_from(token_id).with_context(|| format!("Token id {} is out of range", token_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(token_id: u64, name: &str, attack: i64) -> TokenRecord {
        TokenRecord {
            token_id,
            filename: format!("{}.json", token_id),
            name: name.to_string(),
            description: String::new(),
            collection: "The Verdant Kin".to_string(),
            image: String::new(),
            fee_recipient: String::new(),
            seller_fee_basis_points: 1000,
            attack,
            defense: 0,
            vitality: 0,
            agility: 0,
            core: 0,
            background: "Common".to_string(),
            token_uri: String::new(),
        }
    }

    fn writer() -> CatalogWriter {
        let writer = CatalogWriter::from_connection(Connection::open_in_memory().unwrap());
        writer.create_tables().unwrap();
        writer
    }

    #[test]
    fn test_create_tables_twice() {
        let writer = writer();
        writer.create_tables().unwrap();
    }

    #[test]
    fn test_upsert_replaces_record() {
        let writer = writer();
        writer.upsert_record(&sample(3, "Sylor #3", 5)).unwrap();
        writer.upsert_record(&sample(3, "Sylor #3", 9)).unwrap();

        let (count, attack): (i64, i64) = writer
            .connection()
            .query_row("SELECT COUNT(*), MAX(attack) FROM nfts", [], |r| {
                Ok((r.get(0)?, r.get(1)?))
            })
            .unwrap();
        assert_eq!((count, attack), (1, 9));
    }

    #[test]
    fn test_record_mapping() {
        let writer = writer();
        let mut mapping = TokenMapping::new();
        mapping.insert(1, "17.json");
        mapping.insert(2, "4.json");

        assert_eq!(writer.record_mapping(&mapping).unwrap(), 2);

        let filename: String = writer
            .connection()
            .query_row("SELECT filename FROM mint_mapping WHERE token_id = 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(filename, "17.json");
    }

    #[test]
    fn test_open_keeps_full_sync() {
        let dir = tempfile::TempDir::new().unwrap();
        let writer = CatalogWriter::open(&dir.path().join("catalog.db")).unwrap();
        let sync: i64 = writer
            .connection()
            .query_row("PRAGMA synchronous", [], |r| r.get(0))
            .unwrap();
        // 2 = FULL: every autocommit upsert is synced before returning
        assert_eq!(sync, 2);
    }

    #[test]
    fn test_out_of_range_id() {
        assert!(to_sql_id(u64::MAX).is_err());
        assert_eq!(to_sql_id(42).unwrap(), 42);
    }
}
