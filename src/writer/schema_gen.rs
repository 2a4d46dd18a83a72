use crate::schema::TableSchema;

/// Generate CREATE TABLE SQL for a table schema.
///
/// Tables are created only when absent so an existing catalog is reused.
pub fn generate_create_table(schema: &TableSchema) -> String {
    let mut sql = format!("CREATE TABLE IF NOT EXISTS {} (\n", schema.name);
    let mut columns = Vec::new();

    for col in schema.columns {
        let pk = if col.primary_key { " PRIMARY KEY" } else { "" };
        let null_constraint = if !col.nullable && !col.primary_key {
            " NOT NULL"
        } else {
            ""
        };

        columns.push(format!(
            "    {} {}{}{}",
            col.name,
            col.col_type.sql_type(),
            pk,
            null_constraint
        ));
    }

    sql.push_str(&columns.join(",\n"));
    sql.push_str("\n)");

    sql
}

/// Generate the replace-by-key insert statement for a table
pub fn generate_upsert(schema: &TableSchema) -> String {
    let columns = schema.column_names();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
    format!(
        "INSERT OR REPLACE INTO {} ({}) VALUES ({})",
        schema.name,
        columns.join(", "),
        placeholders.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::tables::{MINT_MAPPING, NFTS};

    #[test]
    fn test_generate_create_table() {
        let sql = generate_create_table(&NFTS);
        assert!(sql.contains("CREATE TABLE IF NOT EXISTS nfts"));
        assert!(sql.contains("token_id INTEGER PRIMARY KEY"));
        assert!(sql.contains("attack INTEGER NOT NULL"));
        assert!(sql.contains("background TEXT NOT NULL"));
        assert!(sql.contains("    name TEXT,"));
    }

    #[test]
    fn test_generate_upsert() {
        let sql = generate_upsert(&MINT_MAPPING);
        assert_eq!(
            sql,
            "INSERT OR REPLACE INTO mint_mapping (token_id, filename) VALUES (?1, ?2)"
        );
    }
}
