pub mod export;
pub mod report;
pub mod store;

pub use export::*;
pub use report::*;
pub use store::*;
