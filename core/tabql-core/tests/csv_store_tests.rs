// CSV 디렉터리 기반 엔드투엔드 테스트

use std::fs;
use tabql_core::{Database, EngineConfig, TabqlError, Value};
use tempfile::TempDir;

fn data_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("student.csv"),
        "id,name,age\n1,John,30\n2,Jane,25\n3,Bob,\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("enrollment.csv"),
        "student_id,course\n1,Mathematics\n2,Physics\n",
    )
    .unwrap();
    dir
}

#[test]
fn test_select_over_csv_files() {
    let dir = data_dir();
    let db = Database::open(dir.path()).unwrap();

    assert_eq!(db.table_names().unwrap(), vec!["enrollment", "student"]);

    let rows = db
        .run_select(
            "SELECT student.name, enrollment.course FROM student \
             LEFT JOIN enrollment ON student.id = enrollment.student_id ORDER BY student.name",
        )
        .unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].get("student.name"), Some(&Value::text("Bob")));
    assert_eq!(rows[0].get("enrollment.course"), Some(&Value::Null));
}

#[test]
fn test_empty_cell_is_null() {
    let dir = data_dir();
    let db = Database::open(dir.path()).unwrap();
    let rows = db
        .run_select("SELECT name FROM student WHERE age IS NULL")
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("name"), Some(&Value::text("Bob")));
}

#[test]
fn test_mutations_persist_to_disk() {
    let dir = data_dir();
    let db = Database::open(dir.path()).unwrap();

    db.run_insert("INSERT INTO student (id, name) VALUES (4, 'Ann')")
        .unwrap();
    let raw = fs::read_to_string(dir.path().join("student.csv")).unwrap();
    assert_eq!(raw, "id,name,age\n1,John,30\n2,Jane,25\n3,Bob,\n4,Ann,\n");

    assert_eq!(db.run_delete("DELETE FROM student WHERE age IS NULL").unwrap(), 2);

    // 새 엔진 인스턴스로 다시 읽기
    let reopened = Database::open(dir.path()).unwrap();
    let rows = reopened.run_select("SELECT name FROM student").unwrap();
    let names: Vec<&str> = rows
        .iter()
        .map(|r| r.get("name").and_then(Value::as_str).unwrap())
        .collect();
    assert_eq!(names, vec!["John", "Jane"]);
}

#[test]
fn test_custom_dialect_from_config() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("t.csv"), "a|b\n1|NULL\n2|x\n").unwrap();

    let config = EngineConfig::new(dir.path())
        .with_delimiter('|')
        .with_null_text("NULL");
    let db = Database::from_config(config).unwrap();

    let rows = db.run_select("SELECT a FROM t WHERE b IS NOT NULL").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("a"), Some(&Value::text("2")));
}

#[test]
fn test_missing_csv_table() {
    let dir = data_dir();
    let db = Database::open(dir.path()).unwrap();
    let err = db.run_select("SELECT * FROM teacher").unwrap_err();
    assert!(matches!(err.root(), TabqlError::TableNotFound(t) if t == "teacher"));
}
