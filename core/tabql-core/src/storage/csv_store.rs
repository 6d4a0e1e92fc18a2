//! CSV file table store
//!
//! Each table is `<dir>/<table>.csv` with a header record. Cells equal to the configured
//! null text load as `Value::Null`, and `Value::Null` is written back as that text.
//! Writes go to a temporary file in the same directory which then replaces the target.
//!
//! With the default empty null text an empty string and a null share the same cell
//! encoding, so a stored `''` reloads as `Value::Null`. The reader cannot tell a quoted
//! empty field from a bare one. Set a non-empty null text (e.g. `NULL`) to keep them apart.

use crate::error::{TabqlError, TabqlResult};
use crate::storage::TableStore;
use crate::table::{Row, Table, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// CSV dialect options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    pub delimiter: u8,
    /// Cell text that stands for a null value
    pub null_text: String,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            null_text: String::new(),
        }
    }
}

/// CSV 디렉터리 기반 테이블 저장소
#[derive(Debug, Clone)]
pub struct CsvTableStore {
    dir: PathBuf,
    options: CsvOptions,
}

impl CsvTableStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_options(dir, CsvOptions::default())
    }

    pub fn with_options(dir: impl Into<PathBuf>, options: CsvOptions) -> Self {
        Self {
            dir: dir.into(),
            options,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn options(&self) -> &CsvOptions {
        &self.options
    }

    fn table_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", table))
    }

    fn decode(&self, cell: &str) -> Value {
        if cell == self.options.null_text {
            Value::Null
        } else {
            Value::text(cell)
        }
    }

    fn encode<'a>(&'a self, value: Option<&'a Value>) -> &'a str {
        match value {
            Some(Value::Text(s)) => s,
            Some(Value::Null) | None => &self.options.null_text,
        }
    }
}

impl TableStore for CsvTableStore {
    fn load(&self, table: &str) -> TabqlResult<Table> {
        let path = self.table_path(table);
        if !path.is_file() {
            return Err(TabqlError::TableNotFound(table.to_string()));
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.options.delimiter)
            .has_headers(true)
            .from_path(&path)?;

        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let row: Row = columns
                .iter()
                .zip(record.iter())
                .map(|(column, cell)| (column.as_str(), self.decode(cell)))
                .collect();
            rows.push(row);
        }

        debug!(table = %table, rows = rows.len(), path = %path.display(), "csv table loaded");
        Ok(Table::new(columns, rows))
    }

    fn persist(&self, table: &str, data: &Table) -> TabqlResult<()> {
        let path = self.table_path(table);
        let tmp = NamedTempFile::new_in(&self.dir)?;
        {
            let mut writer = csv::WriterBuilder::new()
                .delimiter(self.options.delimiter)
                .from_writer(tmp.as_file());
            writer.write_record(data.columns())?;
            for row in data.rows() {
                writer.write_record(
                    data.columns()
                        .iter()
                        .map(|column| self.encode(row.get(column))),
                )?;
            }
            writer.flush()?;
        }
        tmp.persist(&path).map_err(|e| TabqlError::Io { source: e.error })?;

        debug!(table = %table, rows = data.len(), path = %path.display(), "csv table persisted");
        Ok(())
    }

    fn table_names(&self) -> TabqlResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "csv") && path.is_file() {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) {
        fs::write(dir.path().join(name), contents).unwrap();
    }

    #[test]
    fn test_load_with_header_and_nulls() {
        let dir = TempDir::new().unwrap();
        write(&dir, "student.csv", "id,name,email\n1,John,\n2,\"Doe, Jane\",jane@x.org\n");
        let store = CsvTableStore::new(dir.path());

        let table = store.load("student").unwrap();
        assert_eq!(table.columns(), ["id", "name", "email"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].get("email"), Some(&Value::Null));
        assert_eq!(table.rows()[1].get("name"), Some(&Value::text("Doe, Jane")));
    }

    #[test]
    fn test_header_only_table_keeps_columns() {
        let dir = TempDir::new().unwrap();
        write(&dir, "empty.csv", "id,name\n");
        let table = CsvTableStore::new(dir.path()).load("empty").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns(), ["id", "name"]);
    }

    #[test]
    fn test_missing_table() {
        let dir = TempDir::new().unwrap();
        let err = CsvTableStore::new(dir.path()).load("ghost").unwrap_err();
        assert!(matches!(err, TabqlError::TableNotFound(name) if name == "ghost"));
    }

    #[test]
    fn test_persist_round_trips_nulls_with_custom_dialect() {
        let dir = TempDir::new().unwrap();
        let store = CsvTableStore::with_options(
            dir.path(),
            CsvOptions {
                delimiter: b';',
                null_text: "NULL".to_string(),
            },
        );
        let mut row = Row::from_iter([("id", "1"), ("name", "John")]);
        row.insert("email", Value::Null);
        let table = Table::new(
            vec!["id".to_string(), "name".to_string(), "email".to_string()],
            vec![row],
        );

        store.persist("student", &table).unwrap();
        let raw = fs::read_to_string(dir.path().join("student.csv")).unwrap();
        assert_eq!(raw, "id;name;email\n1;John;NULL\n");
        assert_eq!(store.load("student").unwrap(), table);
    }

    #[test]
    fn test_empty_string_and_null_text() {
        let dir = TempDir::new().unwrap();
        let table = Table::new(
            vec!["id".to_string(), "name".to_string()],
            vec![Row::from_iter([("id", "1"), ("name", "")])],
        );

        // 기본 null 텍스트("")에서는 빈 문자열이 null로 다시 읽힌다
        let store = CsvTableStore::new(dir.path());
        store.persist("student", &table).unwrap();
        let loaded = store.load("student").unwrap();
        assert_eq!(loaded.rows()[0].get("name"), Some(&Value::Null));

        let store = CsvTableStore::with_options(
            dir.path(),
            CsvOptions {
                delimiter: b',',
                null_text: "NULL".to_string(),
            },
        );
        store.persist("student", &table).unwrap();
        let loaded = store.load("student").unwrap();
        assert_eq!(loaded.rows()[0].get("name"), Some(&Value::text("")));
    }

    #[test]
    fn test_table_names_lists_csv_files_only() {
        let dir = TempDir::new().unwrap();
        write(&dir, "student.csv", "id\n");
        write(&dir, "enrollment.csv", "student_id\n");
        write(&dir, "notes.txt", "ignored");
        let names = CsvTableStore::new(dir.path()).table_names().unwrap();
        assert_eq!(names, vec!["enrollment", "student"]);
    }
}
