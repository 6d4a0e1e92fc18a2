//! INSERT / DELETE execution

use crate::engine::Database;
use crate::error::{TabqlError, TabqlResult};
use crate::sql::executor::Predicate;
use crate::sql::query::{DeleteQuery, InsertQuery};
use crate::table::{Row, Table, Value};
use tracing::{debug, instrument};

impl Database {
    /// INSERT 문을 실행하고 추가된 행 수(1)를 반환합니다.
    #[instrument(skip(self))]
    pub fn run_insert(&self, sql: &str) -> TabqlResult<usize> {
        self.sql_parser
            .parse_insert(sql)
            .and_then(|query| self.execute_insert(&query))
            .map_err(|e| e.in_query(sql))
    }

    /// DELETE 문을 실행하고 삭제된 행 수를 반환합니다.
    #[instrument(skip(self))]
    pub fn run_delete(&self, sql: &str) -> TabqlResult<usize> {
        self.sql_parser
            .parse_delete(sql)
            .and_then(|query| self.execute_delete(&query))
            .map_err(|e| e.in_query(sql))
    }

    /// Append one row. Validation happens before anything is written.
    pub fn execute_insert(&self, query: &InsertQuery) -> TabqlResult<usize> {
        if query.columns.len() != query.values.len() {
            return Err(TabqlError::ColumnMismatch(format!(
                "{} columns but {} values",
                query.columns.len(),
                query.values.len()
            )));
        }

        let mut table = self.store.load(&query.table)?;

        for (i, column) in query.columns.iter().enumerate() {
            if !table.columns().contains(column) {
                return Err(TabqlError::ColumnMismatch(format!(
                    "column '{}' does not exist in table '{}'",
                    column, query.table
                )));
            }
            if query.columns[..i].contains(column) {
                return Err(TabqlError::ColumnMismatch(format!(
                    "column '{}' specified more than once",
                    column
                )));
            }
        }

        let row: Row = table
            .columns()
            .iter()
            .map(|column| {
                let value = query
                    .columns
                    .iter()
                    .position(|c| c == column)
                    .map(|i| query.values[i].clone())
                    .unwrap_or(Value::Null);
                (column.as_str(), value)
            })
            .collect();
        table.push(row);

        self.store.persist(&query.table, &table)?;
        debug!(table = %query.table, rows = table.len(), "row inserted");
        Ok(1)
    }

    /// Remove matching rows (all rows without WHERE).
    pub fn execute_delete(&self, query: &DeleteQuery) -> TabqlResult<usize> {
        let predicate = query.filter.as_ref().map(Predicate::compile).transpose()?;
        let table = self.store.load(&query.table)?;
        let columns = table.columns().to_vec();
        let before = table.len();

        let kept: Vec<Row> = match &predicate {
            Some(predicate) => table
                .into_rows()
                .into_iter()
                .filter(|row| !predicate.evaluate(row))
                .collect(),
            None => Vec::new(),
        };
        let removed = before - kept.len();

        self.store.persist(&query.table, &Table::new(columns, kept))?;
        debug!(table = %query.table, removed, "rows deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryTableStore;
    use std::sync::Arc;

    fn db() -> Database {
        let student = Table::from_rows(vec![
            Row::from_iter([("id", "1"), ("name", "John"), ("age", "30")]),
            Row::from_iter([("id", "2"), ("name", "Jane"), ("age", "20")]),
            Row::from_iter([("id", "3"), ("name", "Bob"), ("age", "25")]),
        ]);
        Database::with_store(Arc::new(
            InMemoryTableStore::new().with_table("student", student),
        ))
    }

    fn stored(db: &Database) -> Table {
        db.store().load("student").unwrap()
    }

    #[test]
    fn test_insert_fills_missing_columns_with_null() {
        let db = db();
        let n = db
            .run_insert("INSERT INTO student (name, id) VALUES ('Ann', 4)")
            .unwrap();
        assert_eq!(n, 1);

        let table = stored(&db);
        assert_eq!(table.len(), 4);
        let last = &table.rows()[3];
        assert_eq!(last.columns().collect::<Vec<_>>(), vec!["id", "name", "age"]);
        assert_eq!(last.get("id"), Some(&Value::text("4")));
        assert_eq!(last.get("age"), Some(&Value::Null));
    }

    #[test]
    fn test_insert_count_mismatch_leaves_data_unchanged() {
        let db = db();
        let err = db
            .run_insert("INSERT INTO student (id, name) VALUES (4)")
            .unwrap_err();
        assert!(matches!(err.root(), TabqlError::ColumnMismatch(_)));
        assert_eq!(stored(&db).len(), 3);
    }

    #[test]
    fn test_insert_unknown_or_duplicate_column() {
        let db = db();
        let err = db
            .run_insert("INSERT INTO student (id, email) VALUES (4, 'x@y')")
            .unwrap_err();
        assert!(matches!(err.root(), TabqlError::ColumnMismatch(_)));

        let err = db
            .run_insert("INSERT INTO student (id, id) VALUES (4, 5)")
            .unwrap_err();
        assert!(matches!(err.root(), TabqlError::ColumnMismatch(_)));
        assert_eq!(stored(&db).len(), 3);
    }

    #[test]
    fn test_insert_into_missing_table() {
        let err = db()
            .run_insert("INSERT INTO teacher (id) VALUES (1)")
            .unwrap_err();
        assert!(matches!(err.root(), TabqlError::TableNotFound(_)));
    }

    #[test]
    fn test_delete_with_where() {
        let db = db();
        let removed = db
            .run_delete("DELETE FROM student WHERE age < 26 AND name != 'Bob'")
            .unwrap();
        assert_eq!(removed, 1);

        let names: Vec<String> = stored(&db)
            .rows()
            .iter()
            .map(|r| r.get("name").unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["John", "Bob"]);
    }

    #[test]
    fn test_delete_with_or() {
        let db = db();
        let removed = db
            .run_delete("DELETE FROM student WHERE name = 'John' OR name = 'Bob'")
            .unwrap();
        assert_eq!(removed, 2);
    }

    #[test]
    fn test_delete_without_where_removes_everything() {
        let db = db();
        assert_eq!(db.run_delete("DELETE FROM student").unwrap(), 3);
        let table = stored(&db);
        assert!(table.is_empty());
        assert_eq!(table.columns(), ["id", "name", "age"]);
    }
}
