pub mod coerce;
pub mod columns;
pub mod error;
pub mod loader;

pub use columns::{default_rules, ColumnRule};
pub use error::LoadError;
pub use loader::RecordLoader;
