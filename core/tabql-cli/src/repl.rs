//! Interactive read-eval-print loop

use crate::args::OutputFormat;
use crate::format::format_output;
use anyhow::Result;
use std::io::{BufRead, Write};
use tabql_core::Database;
use tracing::debug;

pub const PROMPT: &str = "SQL> ";

/// Read statements line by line until `exit` or end of input.
///
/// Statement errors are reported on `output` and the loop continues.
pub fn run<R: BufRead, W: Write>(
    db: &Database,
    format: OutputFormat,
    input: R,
    mut output: W,
) -> Result<()> {
    let mut lines = input.lines();
    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        let Some(line) = lines.next() else {
            writeln!(output)?;
            break;
        };
        let line = line?;
        let statement = line.trim();

        match statement {
            "" => continue,
            "exit" | "quit" => break,
            ".tables" => match db.table_names() {
                Ok(names) => {
                    for name in names {
                        writeln!(output, "{}", name)?;
                    }
                }
                Err(e) => writeln!(output, "Error: {}", e)?,
            },
            sql => {
                debug!(target: "repl", sql, "executing statement");
                match db
                    .execute_sql(sql)
                    .map_err(anyhow::Error::from)
                    .and_then(|out| format_output(&out, format))
                {
                    Ok(text) => writeln!(output, "{}", text)?,
                    Err(e) => writeln!(output, "Error: {}", e)?,
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tabql_core::storage::InMemoryTableStore;
    use tabql_core::{Row, Table};

    fn db() -> Database {
        let student = Table::from_rows(vec![
            Row::from_iter([("id", "1"), ("name", "John")]),
            Row::from_iter([("id", "2"), ("name", "Jane")]),
        ]);
        Database::with_store(Arc::new(
            InMemoryTableStore::new().with_table("student", student),
        ))
    }

    fn session(db: &Database, input: &str) -> String {
        let mut out = Vec::new();
        run(db, OutputFormat::Csv, input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_select_then_exit() {
        let out = session(&db(), "SELECT name FROM student WHERE id = 2\nexit\nSELECT 1\n");
        assert_eq!(out, "SQL> name\nJane\nSQL> ");
    }

    #[test]
    fn test_error_keeps_loop_running() {
        let db = db();
        let out = session(&db, "SELECT * FROM ghost\nINSERT INTO student (id, name) VALUES (3, 'Bob')\n");
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("SQL> Error: "));
        assert!(lines[0].contains("ghost"));
        assert_eq!(lines[1], "SQL> 1 row inserted");
        assert_eq!(db.run_select("SELECT * FROM student").unwrap().len(), 3);
    }

    #[test]
    fn test_tables_command_and_eof() {
        let out = session(&db(), "\n.tables\n");
        assert_eq!(out, "SQL> SQL> student\nSQL> \n");
    }
}
