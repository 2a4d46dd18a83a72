//! Table schema definitions for the catalog database

use super::types::*;

/// One row per token, replaced wholesale on every write
pub static NFTS: TableSchema = TableSchema {
    name: "nfts",
    columns: &[
        Column::key("token_id"),
        Column::new("filename", ColumnType::Text),
        Column::new("name", ColumnType::Text),
        Column::new("description", ColumnType::Text),
        Column::new("collection", ColumnType::Text),
        Column::new("image", ColumnType::Text),
        Column::new("fee_recipient", ColumnType::Text),
        Column::required("seller_fee_basis_points", ColumnType::Integer),
        Column::required("attack", ColumnType::Integer),
        Column::required("defense", ColumnType::Integer),
        Column::required("vitality", ColumnType::Integer),
        Column::required("agility", ColumnType::Integer),
        Column::required("core", ColumnType::Integer),
        Column::required("background", ColumnType::Text),
        Column::new("token_uri", ColumnType::Text),
    ],
};

/// Raw `tokenId -> metadataFile` rows from the mint mapping CSV
pub static MINT_MAPPING: TableSchema = TableSchema {
    name: "mint_mapping",
    columns: &[
        Column::key("token_id"),
        Column::required("filename", ColumnType::Text),
    ],
};

/// All tables, in creation order
pub static ALL_TABLES: &[&TableSchema] = &[&NFTS, &MINT_MAPPING];
