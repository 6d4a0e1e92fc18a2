//! Database struct definition — the query engine facade

use crate::engine::EngineConfig;
use crate::error::TabqlResult;
use crate::sql::parser::SqlParser;
use crate::storage::TableStore;
use std::sync::Arc;

/// tabql 쿼리 엔진
///
/// SQL 문장을 파싱하고 [`TableStore`]에서 읽은 테이블 위에서 실행합니다.
/// 쿼리마다 참조하는 테이블을 새로 읽으며 쿼리 간 캐시는 없습니다.
///
/// # 예제
///
/// ```rust
/// use std::sync::Arc;
/// use tabql_core::storage::InMemoryTableStore;
/// use tabql_core::{Database, Row, Table};
///
/// # fn main() -> tabql_core::TabqlResult<()> {
/// let student = Table::from_rows(vec![Row::from_iter([("id", "1"), ("name", "John"), ("age", "30")])]);
/// let db = Database::with_store(Arc::new(InMemoryTableStore::new().with_table("student", student)));
///
/// let rows = db.run_select("SELECT name FROM student WHERE age > 25")?;
/// assert_eq!(rows.len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct Database {
    /// Table source and sink
    pub(crate) store: Arc<dyn TableStore>,

    /// SQL parser (cached)
    pub(crate) sql_parser: SqlParser,

    pub(crate) config: EngineConfig,
}

impl Database {
    pub fn store(&self) -> &Arc<dyn TableStore> {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Tables visible through the store, sorted by name.
    pub fn table_names(&self) -> TabqlResult<Vec<String>> {
        self.store.table_names()
    }
}
