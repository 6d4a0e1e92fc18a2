//! # tabql — SQL over text tables
//!
//! tabql은 텍스트 테이블(CSV 디렉터리 또는 인메모리 저장소) 위에서 동작하는 작은 SQL
//! 엔진입니다. 모든 셀은 텍스트로 저장되고, 비교와 집계에 필요할 때만 숫자로 변환합니다.
//!
//! ## 주요 특징
//!
//! - **SELECT**: DISTINCT, INNER/LEFT/RIGHT JOIN, WHERE (AND/OR/NOT, LIKE, IS NULL),
//!   GROUP BY, COUNT/SUM/AVG/MIN/MAX, ORDER BY, LIMIT
//! - **INSERT / DELETE**: 컬럼 검증 후 테이블 전체를 저장소에 다시 기록
//! - **Volcano 실행기**: 연산자마다 `next()`로 행 배치를 당겨온다
//!
//! ## 빠른 시작
//!
//! ```rust
//! use std::sync::Arc;
//! use tabql_core::storage::InMemoryTableStore;
//! use tabql_core::{Database, Row, Table, Value};
//!
//! # fn main() -> tabql_core::TabqlResult<()> {
//! let student = Table::from_rows(vec![
//!     Row::from_iter([("id", "1"), ("name", "John"), ("age", "30")]),
//!     Row::from_iter([("id", "2"), ("name", "Jane"), ("age", "20")]),
//! ]);
//! let db = Database::with_store(Arc::new(InMemoryTableStore::new().with_table("student", student)));
//!
//! let rows = db.run_select("SELECT name FROM student WHERE age > 25")?;
//! assert_eq!(rows[0].get("name"), Some(&Value::text("John")));
//!
//! db.run_insert("INSERT INTO student (id, name) VALUES (3, 'Bob')")?;
//! assert_eq!(db.run_delete("DELETE FROM student WHERE age IS NULL")?, 1);
//! # Ok(())
//! # }
//! ```
//!
//! ### SQL 실행 파이프라인
//!
//! ```text
//! SQL 문자열 → Tokenizer → SqlParser → SelectQuery
//!          → TableScan → Join → Filter → Sort → Projection → Distinct → Limit → Vec<Row>
//! ```
//!
//! ## 모듈 구조
//!
//! - [`engine`] — 쿼리 엔진 ([`Database`]), 설정
//! - [`sql`] — SQL 파서, 쿼리 구조체, 실행기
//! - [`storage`] — [`TableStore`](storage::TableStore) 구현 (CSV, 인메모리)
//! - [`table`] — 행/테이블/값 모델

pub mod engine;
pub mod error;
pub mod sql;
pub mod storage;
pub mod table;

// Logging utilities
pub mod logging;

// Re-export commonly used types
pub use engine::{Database, EngineConfig, QueryOutput};
pub use error::{TabqlError, TabqlResult};
pub use table::{Row, Table, Value};
