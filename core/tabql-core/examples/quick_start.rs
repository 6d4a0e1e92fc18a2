//! CSV 디렉터리 쿼리 예제
//!
//! 실행: cargo run --example quick_start

use tabql_core::{Database, QueryOutput, TabqlResult};

fn main() -> TabqlResult<()> {
    tabql_core::logging::init_with_level("info");

    println!("=== tabql 빠른 시작 ===\n");

    // 1. 임시 디렉터리에 CSV 테이블 준비
    let dir = std::env::temp_dir().join("tabql_quick_start");
    std::fs::create_dir_all(&dir)?;
    std::fs::write(
        dir.join("student.csv"),
        "id,name,age\n1,John,30\n2,Jane,25\n3,Bob,22\n",
    )?;
    std::fs::write(
        dir.join("enrollment.csv"),
        "student_id,course\n1,Mathematics\n2,Physics\n1,Chemistry\n",
    )?;

    // 2. 데이터베이스 열기
    let db = Database::open(&dir)?;
    println!("tables: {:?}\n", db.table_names()?);

    // 3. 쿼리 실행
    for sql in [
        "SELECT name, age FROM student WHERE age > 24 ORDER BY age DESC",
        "SELECT student.name, enrollment.course FROM student LEFT JOIN enrollment ON student.id = enrollment.student_id",
        "SELECT age, COUNT(*) FROM student GROUP BY age",
        "INSERT INTO student (id, name) VALUES (4, 'Ann')",
        "DELETE FROM student WHERE age IS NULL",
    ] {
        println!("SQL> {}", sql);
        match db.execute_sql(sql)? {
            QueryOutput::Rows(rows) => {
                for row in rows {
                    let cells: Vec<String> =
                        row.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                    println!("   {}", cells.join(", "));
                }
            }
            QueryOutput::Inserted(n) => println!("   {} row(s) inserted", n),
            QueryOutput::Deleted(n) => println!("   {} row(s) deleted", n),
        }
        println!();
    }

    Ok(())
}
