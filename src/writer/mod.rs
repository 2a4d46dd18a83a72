pub mod index;
pub mod schema_gen;
pub mod sqlite;

pub use index::*;
pub use sqlite::CatalogWriter;
