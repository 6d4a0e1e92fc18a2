//! In-memory table store
//!
//! Used by tests, benches and `Database::open_in_memory`.

use crate::error::{TabqlError, TabqlResult};
use crate::storage::TableStore;
use crate::table::Table;
use ahash::AHashMap;
use parking_lot::RwLock;

/// In-memory table store guarded by a read/write lock
#[derive(Default)]
pub struct InMemoryTableStore {
    tables: RwLock<AHashMap<String, Table>>,
}

impl InMemoryTableStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style seeding, mainly for tests.
    pub fn with_table(self, name: impl Into<String>, table: Table) -> Self {
        self.tables.write().insert(name.into(), table);
        self
    }
}

impl TableStore for InMemoryTableStore {
    fn load(&self, table: &str) -> TabqlResult<Table> {
        self.tables
            .read()
            .get(table)
            .cloned()
            .ok_or_else(|| TabqlError::TableNotFound(table.to_string()))
    }

    fn persist(&self, table: &str, data: &Table) -> TabqlResult<()> {
        self.tables.write().insert(table.to_string(), data.clone());
        Ok(())
    }

    fn table_names(&self) -> TabqlResult<Vec<String>> {
        let mut names: Vec<String> = self.tables.read().keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}
