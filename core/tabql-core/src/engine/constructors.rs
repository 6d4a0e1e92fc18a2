//! Database Constructors — factory methods for creating Database instances

use crate::engine::{Database, EngineConfig};
use crate::error::TabqlResult;
use crate::sql::parser::SqlParser;
use crate::storage::{CsvTableStore, InMemoryTableStore, TableStore};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

impl Database {
    /// CSV 디렉터리를 데이터베이스로 엽니다.
    ///
    /// 디렉터리의 `<table>.csv` 파일 하나가 테이블 하나입니다. 디렉터리가 없으면 생성합니다.
    ///
    /// # 예제
    ///
    /// ```rust,no_run
    /// use tabql_core::Database;
    /// use std::path::Path;
    ///
    /// # fn main() -> tabql_core::TabqlResult<()> {
    /// let db = Database::open(Path::new("./data"))?;
    /// let rows = db.run_select("SELECT name FROM student WHERE age > 25")?;
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(path))]
    pub fn open(path: &Path) -> TabqlResult<Self> {
        Self::from_config(EngineConfig::new(path))
    }

    /// CSV 저장소를 설정값으로 엽니다.
    #[instrument(skip(config))]
    pub fn from_config(config: EngineConfig) -> TabqlResult<Self> {
        info!("Opening database at {:?}", config.data_dir);
        let options = config.csv_options()?;
        std::fs::create_dir_all(&config.data_dir)?;

        let store = CsvTableStore::with_options(&config.data_dir, options);
        info!(
            "Database opened (delimiter {:?}, null text {:?})",
            config.delimiter, config.null_text
        );
        Ok(Self::with_store_and_config(Arc::new(store), config))
    }

    /// 인메모리 데이터베이스를 생성합니다.
    ///
    /// 테스트 및 임시 데이터 용도이며 영구 저장되지 않습니다.
    #[instrument]
    pub fn open_in_memory() -> TabqlResult<Self> {
        info!("Creating in-memory database");
        Ok(Self::with_store(Arc::new(InMemoryTableStore::new())))
    }

    /// Engine over an arbitrary store.
    pub fn with_store(store: Arc<dyn TableStore>) -> Self {
        Self::with_store_and_config(store, EngineConfig::default())
    }

    fn with_store_and_config(store: Arc<dyn TableStore>, config: EngineConfig) -> Self {
        Self {
            store,
            sql_parser: SqlParser::new(),
            config,
        }
    }
}
