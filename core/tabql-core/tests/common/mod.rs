// Shared fixtures (included via `mod common;`)

#![allow(dead_code)]

use std::sync::Arc;
use tabql_core::storage::InMemoryTableStore;
use tabql_core::{Database, Row, Table};

pub fn row(pairs: &[(&str, &str)]) -> Row {
    pairs.iter().map(|(k, v)| (*k, *v)).collect()
}

pub fn student() -> Table {
    Table::from_rows(vec![
        row(&[("id", "1"), ("name", "John"), ("age", "30")]),
        row(&[("id", "2"), ("name", "Jane"), ("age", "25")]),
        row(&[("id", "3"), ("name", "Bob"), ("age", "22")]),
        row(&[("id", "4"), ("name", "Alice"), ("age", "30")]),
        row(&[("id", "5"), ("name", "John"), ("age", "20")]),
    ])
}

pub fn enrollment() -> Table {
    Table::from_rows(vec![
        row(&[("student_id", "1"), ("course", "Mathematics")]),
        row(&[("student_id", "2"), ("course", "Physics")]),
        row(&[("student_id", "1"), ("course", "Chemistry")]),
        row(&[("student_id", "4"), ("course", "Biology")]),
        row(&[("student_id", "9"), ("course", "History")]),
    ])
}

pub fn school() -> Database {
    let store = InMemoryTableStore::new()
        .with_table("student", student())
        .with_table("enrollment", enrollment());
    Database::with_store(Arc::new(store))
}

/// Values of `column` in row order, nulls rendered as "null".
pub fn column(rows: &[Row], name: &str) -> Vec<String> {
    rows.iter()
        .map(|r| r.get(name).map(|v| v.to_string()).unwrap_or_default())
        .collect()
}
