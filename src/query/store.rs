use anyhow::{Context, Result};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, OptionalExtension, Row};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;

use crate::parser::TokenRecord;
use crate::schema::NFTS;

/// Mean of each numeric trait over all records
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraitAverages {
    pub attack: f64,
    pub defense: f64,
    pub vitality: f64,
    pub agility: f64,
    pub core: f64,
}

/// One representative card per distinct `(name, background)` pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UniqueCard {
    pub character: String,
    pub background: String,
    pub attack: i64,
    pub defense: i64,
    pub vitality: i64,
    pub agility: i64,
    pub core: i64,
}

/// Read-only access to the catalog
pub struct CatalogReader {
    conn: Connection,
}

impl CatalogReader {
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .with_context(|| format!("Failed to open catalog {:?} (run `index` first)", db_path))?;
        Ok(Self { conn })
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// Point lookup by token id
    pub fn get_token(&self, token_id: u64) -> Result<Option<TokenRecord>> {
        // ids past i64::MAX can never have been stored
        let Ok(sql_id) = i64::try_from(token_id) else {
            return Ok(None);
        };

        let sql = format!("{} WHERE token_id = ?1", select_tokens());
        let record = self
            .conn
            .query_row(&sql, [sql_id], record_from_row)
            .optional()?;
        Ok(record)
    }

    /// First `limit` records ordered by ascending token id
    pub fn list_tokens(&self, limit: usize) -> Result<Vec<TokenRecord>> {
        let sql = format!("{} ORDER BY token_id LIMIT ?1", select_tokens());
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([limit as i64], record_from_row)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    /// Every record ordered by ascending token id
    pub fn all_tokens(&self) -> Result<Vec<TokenRecord>> {
        let sql = format!("{} ORDER BY token_id", select_tokens());
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], record_from_row)?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM nfts", [], |r| r.get(0))?;
        Ok(count as u64)
    }

    /// Trait means, or `None` when the catalog is empty
    pub fn trait_averages(&self) -> Result<Option<TraitAverages>> {
        if self.count()? == 0 {
            return Ok(None);
        }

        let averages = self.conn.query_row(
            "SELECT AVG(attack), AVG(defense), AVG(vitality), AVG(agility), AVG(core) FROM nfts",
            [],
            |r| {
                Ok(TraitAverages {
                    attack: r.get(0)?,
                    defense: r.get(1)?,
                    vitality: r.get(2)?,
                    agility: r.get(3)?,
                    core: r.get(4)?,
                })
            },
        )?;
        Ok(Some(averages))
    }

    /// `background -> count`, most common first
    pub fn background_counts(&self) -> Result<Vec<(String, u64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT background, COUNT(*) FROM nfts
             GROUP BY background
             ORDER BY COUNT(*) DESC, background ASC",
        )?;
        let rows = stmt.query_map([], |r| {
            let background: String = r.get(0)?;
            let count: i64 = r.get(1)?;
            Ok((background, count as u64))
        })?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    /// Lowest-id card of each `(name, background)` pair, ordered by name then background
    pub fn unique_cards(&self) -> Result<Vec<UniqueCard>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, background, attack, defense, vitality, agility, core
             FROM (
                 SELECT name, background, attack, defense, vitality, agility, core,
                        ROW_NUMBER() OVER (PARTITION BY name, background ORDER BY token_id ASC) AS rn
                 FROM nfts
             ) ranked
             WHERE rn = 1
             ORDER BY name, background",
        )?;
        let rows = stmt.query_map([], |r| {
            Ok(UniqueCard {
                character: r.get(0)?,
                background: r.get(1)?,
                attack: r.get(2)?,
                defense: r.get(3)?,
                vitality: r.get(4)?,
                agility: r.get(5)?,
                core: r.get(6)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }

    pub fn distinct_names(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(DISTINCT name) FROM nfts", [], |r| r.get(0))?;
        Ok(count as u64)
    }

    /// Every `nfts` row as a column-name -> value object
    pub fn export_rows(&self) -> Result<Vec<Map<String, Value>>> {
        let mut stmt = self.conn.prepare("SELECT * FROM nfts ORDER BY token_id")?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let rows = stmt.query_map([], |r| {
            let mut object = Map::new();
            for (idx, name) in columns.iter().enumerate() {
                object.insert(name.clone(), json_value(r.get_ref(idx)?));
            }
            Ok(object)
        })?;
        Ok(rows.collect::<rusqlite::Result<_>>()?)
    }
}

fn select_tokens() -> String {
    format!("SELECT {} FROM {}", NFTS.column_names().join(", "), NFTS.name)
}

/// Map a row selected by `select_tokens` back into a record
fn record_from_row(row: &Row) -> rusqlite::Result<TokenRecord> {
    let token_id: i64 = row.get("token_id")?;
    Ok(TokenRecord {
        token_id: token_id as u64,
        filename: row.get::<_, Option<String>>("filename")?.unwrap_or_default(),
        name: row.get::<_, Option<String>>("name")?.unwrap_or_default(),
        description: row.get::<_, Option<String>>("description")?.unwrap_or_default(),
        collection: row.get::<_, Option<String>>("collection")?.unwrap_or_default(),
        image: row.get::<_, Option<String>>("image")?.unwrap_or_default(),
        fee_recipient: row.get::<_, Option<String>>("fee_recipient")?.unwrap_or_default(),
        seller_fee_basis_points: row.get("seller_fee_basis_points")?,
        attack: row.get("attack")?,
        defense: row.get("defense")?,
        vitality: row.get("vitality")?,
        agility: row.get("agility")?,
        core: row.get("core")?,
        background: row.get("background")?,
        token_uri: row.get::<_, Option<String>>("token_uri")?.unwrap_or_default(),
    })
}

fn json_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Value::from(f),
        ValueRef::Text(t) | ValueRef::Blob(t) => {
            Value::String(String::from_utf8_lossy(t).into_owned())
        }
    }
}
