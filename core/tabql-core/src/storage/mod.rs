//! Storage module — table stores the query engine loads from and persists to.
//!
//! The engine depends only on the [`TableStore`] trait; concrete stores are
//! chosen when the [`Database`](crate::engine::Database) is opened.

pub mod csv_store;
pub mod memory;

pub use csv_store::{CsvOptions, CsvTableStore};
pub use memory::InMemoryTableStore;

use crate::error::TabqlResult;
use crate::table::Table;

/// Whole-table storage interface.
///
/// # Contract
///
/// - `load`: Returns the current rows of `table` in stored order; `TableNotFound` when absent.
/// - `persist`: Replaces the stored contents of `table` with `data`.
/// - `table_names`: Returns all table names, sorted.
pub trait TableStore: Send + Sync {
    /// Load every row of a table.
    fn load(&self, table: &str) -> TabqlResult<Table>;

    /// Replace a table's stored contents.
    fn persist(&self, table: &str, data: &Table) -> TabqlResult<()>;

    /// List available tables.
    fn table_names(&self) -> TabqlResult<Vec<String>>;
}
