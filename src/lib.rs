pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod mapping;
pub mod parser;
pub mod query;
pub mod schema;
pub mod ui;
pub mod writer;

pub use cli::{Cli, Commands};
pub use error::CatalogError;
pub use ui::{ConsoleUi, Phase, SilentUi, Ui};
