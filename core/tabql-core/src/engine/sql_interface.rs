//! SQL Execution Pipeline — SQL query execution methods

use crate::engine::Database;
use crate::error::TabqlResult;
use crate::sql::executor::{build_select_pipeline, collect_rows};
use crate::sql::query::{SelectQuery, Statement};
use crate::table::Row;
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, instrument};

/// Outcome of [`Database::execute_sql`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryOutput {
    /// SELECT result rows
    Rows(Vec<Row>),
    /// Rows added by INSERT
    Inserted(usize),
    /// Rows removed by DELETE
    Deleted(usize),
}

impl QueryOutput {
    pub fn rows(&self) -> Option<&[Row]> {
        match self {
            QueryOutput::Rows(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn into_rows(self) -> Option<Vec<Row>> {
        match self {
            QueryOutput::Rows(rows) => Some(rows),
            _ => None,
        }
    }

    /// Rows touched by INSERT/DELETE, `None` for SELECT.
    pub fn affected(&self) -> Option<usize> {
        match self {
            QueryOutput::Rows(_) => None,
            QueryOutput::Inserted(n) | QueryOutput::Deleted(n) => Some(*n),
        }
    }
}

impl Database {
    /// 선행 키워드로 문장 종류를 판별해 실행합니다.
    ///
    /// # 예제
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use tabql_core::engine::QueryOutput;
    /// use tabql_core::storage::InMemoryTableStore;
    /// use tabql_core::{Database, Table};
    ///
    /// # fn main() -> tabql_core::TabqlResult<()> {
    /// let student = Table::new(vec!["id".into(), "name".into()], Vec::new());
    /// let db = Database::with_store(Arc::new(InMemoryTableStore::new().with_table("student", student)));
    ///
    /// let out = db.execute_sql("INSERT INTO student (id, name) VALUES (1, 'John')")?;
    /// assert_eq!(out, QueryOutput::Inserted(1));
    /// let out = db.execute_sql("SELECT name FROM student")?;
    /// assert_eq!(out.rows().map(|r| r.len()), Some(1));
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self))]
    pub fn execute_sql(&self, sql: &str) -> TabqlResult<QueryOutput> {
        let statement = self.sql_parser.parse(sql).map_err(|e| e.in_query(sql))?;
        let result = match &statement {
            Statement::Select(query) => self.execute_select(query).map(QueryOutput::Rows),
            Statement::Insert(query) => self.execute_insert(query).map(QueryOutput::Inserted),
            Statement::Delete(query) => self.execute_delete(query).map(QueryOutput::Deleted),
        };
        result.map_err(|e| e.in_query(sql))
    }

    /// SELECT 문을 실행하고 결과 행을 반환합니다.
    #[instrument(skip(self))]
    pub fn run_select(&self, sql: &str) -> TabqlResult<Vec<Row>> {
        self.sql_parser
            .parse_select(sql)
            .and_then(|query| self.execute_select(&query))
            .map_err(|e| e.in_query(sql))
    }

    /// Execute an already parsed SELECT.
    pub fn execute_select(&self, query: &SelectQuery) -> TabqlResult<Vec<Row>> {
        let start = Instant::now();

        let base = self.store.load(&query.table)?;
        let join = match &query.join {
            Some(spec) => Some(self.store.load(&spec.table)?),
            None => None,
        };
        debug!(
            table = %query.table,
            base_rows = base.len(),
            join_rows = join.as_ref().map(|t| t.len()),
            "tables loaded"
        );

        let mut plan = build_select_pipeline(query, base, join)?;
        let rows = collect_rows(plan.as_mut())?;

        debug!(
            rows = rows.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "select complete"
        );
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TabqlError;
    use crate::storage::InMemoryTableStore;
    use crate::table::{Table, Value};
    use std::sync::Arc;

    fn db() -> Database {
        let student = Table::from_rows(vec![
            Row::from_iter([("id", "1"), ("name", "John"), ("age", "30")]),
            Row::from_iter([("id", "2"), ("name", "Jane"), ("age", "20")]),
        ]);
        Database::with_store(Arc::new(
            InMemoryTableStore::new().with_table("student", student),
        ))
    }

    #[test]
    fn test_run_select() {
        let rows = db().run_select("SELECT name FROM student WHERE age > 25").unwrap();
        assert_eq!(rows, vec![Row::from_iter([("name", "John")])]);
    }

    #[test]
    fn test_execute_sql_classifies_statements() {
        let db = db();
        let out = db.execute_sql("select * from student").unwrap();
        assert_eq!(out.rows().map(<[Row]>::len), Some(2));
        assert_eq!(out.affected(), None);

        let out = db
            .execute_sql("INSERT INTO student (id, name) VALUES (3, 'Bob')")
            .unwrap();
        assert_eq!(out, QueryOutput::Inserted(1));

        let out = db.execute_sql("DELETE FROM student WHERE age IS NULL").unwrap();
        assert_eq!(out.affected(), Some(1));
    }

    #[test]
    fn test_errors_carry_query_context() {
        let db = db();
        let err = db.run_select("SELECT * FROM teacher").unwrap_err();
        assert!(matches!(err, TabqlError::Query { ref sql, .. } if sql == "SELECT * FROM teacher"));
        assert!(matches!(err.root(), TabqlError::TableNotFound(name) if name == "teacher"));

        let err = db.execute_sql("SELECT * FROM student WHERE age == 1").unwrap_err();
        assert!(matches!(err.root(), TabqlError::UnsupportedOperator { .. }));

        let err = db.execute_sql("SELECT SUM(name) FROM student").unwrap_err();
        assert!(matches!(err.root(), TabqlError::AggregateType { .. }));
    }

    #[test]
    fn test_run_select_rejects_other_statements() {
        let err = db().run_select("DELETE FROM student").unwrap_err();
        assert!(matches!(err.root(), TabqlError::SqlParse { .. }));
    }

    #[test]
    fn test_query_output_serializes() {
        let out = QueryOutput::Rows(vec![Row::from_iter([("name", Value::Null)])]);
        assert_eq!(
            serde_json::to_string(&out).unwrap(),
            r#"{"rows":[{"name":null}]}"#
        );
        assert_eq!(
            serde_json::to_string(&QueryOutput::Deleted(2)).unwrap(),
            r#"{"deleted":2}"#
        );
    }
}
