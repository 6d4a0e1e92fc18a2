// SELECT 파이프라인 통합 테스트

mod common;

use common::{column, row, school};
use proptest::prelude::*;
use std::sync::Arc;
use tabql_core::storage::InMemoryTableStore;
use tabql_core::{Database, Row, Table, TabqlError, Value};

#[test]
fn test_basic_projection() {
    let db = school();
    let rows = db.run_select("SELECT id, name FROM student").unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0], row(&[("id", "1"), ("name", "John")]));
}

#[test]
fn test_where_numeric_comparison() {
    let db = school();
    let rows = db
        .run_select("SELECT name FROM student WHERE age > 25")
        .unwrap();
    assert_eq!(column(&rows, "name"), vec!["John", "Alice"]);
}

#[test]
fn test_where_or_is_honoured() {
    let db = school();
    let rows = db
        .run_select("SELECT id FROM student WHERE name = 'Bob' OR age < 21")
        .unwrap();
    assert_eq!(column(&rows, "id"), vec!["3", "5"]);
}

#[test]
fn test_where_keyword_inside_string_literal() {
    let db = school();
    let rows = db
        .run_select("SELECT id FROM student WHERE name = 'WHERE LIMIT 1'")
        .unwrap();
    assert!(rows.is_empty());
}

#[test]
fn test_where_like_and_not() {
    let db = school();
    let rows = db
        .run_select("SELECT name FROM student WHERE name LIKE 'j%' AND NOT age = 20")
        .unwrap();
    assert_eq!(column(&rows, "name"), vec!["John", "Jane"]);
}

#[test]
fn test_inner_join() {
    let db = school();
    let rows = db
        .run_select(
            "SELECT student.name, enrollment.course FROM student \
             INNER JOIN enrollment ON student.id = enrollment.student_id",
        )
        .unwrap();
    assert_eq!(column(&rows, "student.name"), vec!["John", "John", "Jane", "Alice"]);
    assert_eq!(
        column(&rows, "enrollment.course"),
        vec!["Mathematics", "Chemistry", "Physics", "Biology"]
    );
}

#[test]
fn test_left_join_pads_unmatched_rows() {
    let db = school();
    let rows = db
        .run_select(
            "SELECT student.name, enrollment.course FROM student \
             LEFT JOIN enrollment ON student.id = enrollment.student_id",
        )
        .unwrap();
    assert_eq!(rows.len(), 6);
    let unmatched: Vec<&str> = rows
        .iter()
        .filter(|r| r.get("enrollment.course") == Some(&Value::Null))
        .map(|r| r.get("student.name").and_then(Value::as_str).unwrap())
        .collect();
    assert_eq!(unmatched, vec!["Bob", "John"]);
}

#[test]
fn test_inner_join_drops_unmatched_rows() {
    let db = school();
    let rows = db
        .run_select(
            "SELECT student.name FROM student \
             INNER JOIN enrollment ON student.id = enrollment.student_id \
             WHERE student.name = 'Bob'",
        )
        .unwrap();
    assert!(rows.is_empty());
}

#[test]
fn test_right_join_pads_base_columns() {
    let db = school();
    let rows = db
        .run_select(
            "SELECT student.name, enrollment.course FROM student \
             RIGHT JOIN enrollment ON enrollment.student_id = student.id",
        )
        .unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[4].get("student.name"), Some(&Value::Null));
    assert_eq!(rows[4].get("enrollment.course"), Some(&Value::text("History")));
}

#[test]
fn test_join_with_where_on_joined_column() {
    let db = school();
    let rows = db
        .run_select(
            "SELECT student.name FROM student \
             LEFT JOIN enrollment ON student.id = enrollment.student_id \
             WHERE enrollment.course IS NULL",
        )
        .unwrap();
    assert_eq!(column(&rows, "student.name"), vec!["Bob", "John"]);
}

#[test]
fn test_group_by_count_one_row_per_group() {
    let db = school();
    let rows = db
        .run_select("SELECT age, COUNT(*) FROM student GROUP BY age")
        .unwrap();
    // 발견 순서
    assert_eq!(column(&rows, "age"), vec!["30", "25", "22", "20"]);
    assert_eq!(column(&rows, "COUNT(*)"), vec!["2", "1", "1", "1"]);
}

#[test]
fn test_aggregates_without_group_by() {
    let db = school();
    let rows = db
        .run_select("SELECT COUNT(*), AVG(age), MIN(age), MAX(age), SUM(age) FROM student")
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0],
        row(&[
            ("COUNT(*)", "5"),
            ("AVG(age)", "25.4"),
            ("MIN(age)", "20"),
            ("MAX(age)", "30"),
            ("SUM(age)", "127"),
        ])
    );
}

#[test]
fn test_group_by_join_field() {
    let db = school();
    let rows = db
        .run_select(
            "SELECT student.name, COUNT(*) FROM student \
             INNER JOIN enrollment ON student.id = enrollment.student_id \
             GROUP BY student.name",
        )
        .unwrap();
    assert_eq!(column(&rows, "student.name"), vec!["John", "Jane", "Alice"]);
    assert_eq!(column(&rows, "COUNT(*)"), vec!["2", "1", "1"]);
}

#[test]
fn test_aggregate_over_text_fails() {
    let db = school();
    let err = db.run_select("SELECT AVG(name) FROM student").unwrap_err();
    assert!(matches!(
        err.root(),
        TabqlError::AggregateType { function, value } if function == "AVG" && value == "John"
    ));
}

#[test]
fn test_order_by_numeric_then_text() {
    let db = school();
    let rows = db
        .run_select("SELECT name FROM student ORDER BY age DESC, name ASC")
        .unwrap();
    assert_eq!(
        column(&rows, "name"),
        vec!["Alice", "John", "Jane", "Bob", "John"]
    );
}

#[test]
fn test_order_by_mixed_numeric_and_text_values() {
    let values = ["10", "9", "1a", "100", "2b", "3", "x", "20", "05", "b", "7"];
    let data: Vec<Row> = (0..200)
        .map(|i| row(&[("v", values[(i * 5) % values.len()])]))
        .collect();
    let db = Database::with_store(Arc::new(
        InMemoryTableStore::new().with_table("t", Table::from_rows(data)),
    ));

    let rows = db.run_select("SELECT v FROM t ORDER BY v").unwrap();
    assert_eq!(rows.len(), 200);

    let mut ordered = column(&rows, "v");
    ordered.dedup();
    assert_eq!(
        ordered,
        vec!["3", "05", "7", "9", "10", "20", "100", "1a", "2b", "b", "x"]
    );
}

#[test]
fn test_distinct_first_seen_order() {
    let db = school();
    let rows = db.run_select("SELECT DISTINCT name FROM student").unwrap();
    assert_eq!(
        column(&rows, "name"),
        vec!["John", "Jane", "Bob", "Alice"]
    );
}

#[test]
fn test_limit() {
    let db = school();
    assert!(db.run_select("SELECT * FROM student LIMIT 0").unwrap().is_empty());
    assert_eq!(db.run_select("SELECT * FROM student LIMIT 2").unwrap().len(), 2);
    assert_eq!(db.run_select("SELECT * FROM student LIMIT -3").unwrap().len(), 5);
    assert_eq!(db.run_select("SELECT * FROM student LIMIT 99").unwrap().len(), 5);
}

#[test]
fn test_wildcard_and_missing_field() {
    let db = school();
    let rows = db
        .run_select("SELECT *, email FROM student WHERE id = 1")
        .unwrap();
    assert_eq!(
        rows[0].columns().collect::<Vec<_>>(),
        vec!["id", "name", "age", "email"]
    );
    assert_eq!(rows[0].get("email"), Some(&Value::Null));
}

#[test]
fn test_failures_name_their_cause() {
    let db = school();

    let err = db.run_select("SELECT * FROM teacher").unwrap_err();
    assert!(matches!(err.root(), TabqlError::TableNotFound(t) if t == "teacher"));

    let err = db
        .run_select("SELECT * FROM student INNER JOIN teacher ON student.id = teacher.id")
        .unwrap_err();
    assert!(matches!(err.root(), TabqlError::TableNotFound(t) if t == "teacher"));

    let err = db.run_select("SELECT name student").unwrap_err();
    assert!(matches!(err.root(), TabqlError::SqlParse { .. }));
    assert!(err.to_string().contains("SELECT name student"));
}

proptest! {
    #[test]
    fn prop_limit_bounds_result(limit in -5i64..10) {
        let db = school();
        let all = db.run_select("SELECT * FROM student").unwrap();
        let rows = db
            .run_select(&format!("SELECT * FROM student LIMIT {}", limit))
            .unwrap();
        let expected = if limit < 0 { all.len() } else { all.len().min(limit as usize) };
        prop_assert_eq!(rows.len(), expected);
        prop_assert_eq!(&rows[..], &all[..expected]);
    }

    #[test]
    fn prop_distinct_has_no_duplicates(field in prop_oneof![Just("name"), Just("age"), Just("id")]) {
        let db = school();
        let plain = db.run_select(&format!("SELECT {} FROM student", field)).unwrap();
        let distinct = db
            .run_select(&format!("SELECT DISTINCT {} FROM student", field))
            .unwrap();
        for (i, r) in distinct.iter().enumerate() {
            prop_assert!(!distinct[..i].contains(r));
            prop_assert!(plain.contains(r));
        }
        for r in &plain {
            prop_assert!(distinct.contains(r));
        }
    }
}
