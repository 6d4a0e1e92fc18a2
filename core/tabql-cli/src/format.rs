//! Output formatting for query results

use crate::args::OutputFormat;
use anyhow::Result;
use tabql_core::{QueryOutput, Row, Value};

/// Render `output` in the requested format.
///
/// INSERT and DELETE print an affected-row message regardless of format.
pub fn format_output(output: &QueryOutput, format: OutputFormat) -> Result<String> {
    match output {
        QueryOutput::Rows(rows) => match format {
            OutputFormat::Table => Ok(format_table(rows)),
            OutputFormat::Csv => format_csv(rows),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
        },
        QueryOutput::Inserted(n) => Ok(format!("{} row{} inserted", n, plural(*n))),
        QueryOutput::Deleted(n) => Ok(format!("{} row{} deleted", n, plural(*n))),
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Union of the rows' columns in first-seen order.
fn columns(rows: &[Row]) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::new();
    for row in rows {
        for column in row.columns() {
            if !out.contains(&column) {
                out.push(column);
            }
        }
    }
    out
}

fn cell<'a>(row: &'a Row, column: &str) -> &'a str {
    match row.get(column) {
        Some(Value::Text(s)) => s,
        Some(Value::Null) | None => "NULL",
    }
}

fn format_table(rows: &[Row]) -> String {
    let columns = columns(rows);
    if columns.is_empty() {
        return "(0 rows)".to_string();
    }

    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for row in rows {
        for (i, column) in columns.iter().enumerate() {
            widths[i] = widths[i].max(cell(row, column).chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{:<width$}", c, width = *w))
        .collect();
    out.push_str(header.join(" | ").trim_end());
    out.push('\n');

    let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&sep.join("-+-"));
    out.push('\n');

    for row in rows {
        let line: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", cell(row, c), width = *w))
            .collect();
        out.push_str(line.join(" | ").trim_end());
        out.push('\n');
    }

    out.push_str(&format!("({} row{})", rows.len(), plural(rows.len())));
    out
}

fn format_csv(rows: &[Row]) -> Result<String> {
    let columns = columns(rows);
    let mut writer = csv::Writer::from_writer(Vec::new());
    if !columns.is_empty() {
        writer.write_record(&columns)?;
    }
    for row in rows {
        writer.write_record(columns.iter().map(|c| match row.get(c) {
            Some(Value::Text(s)) => s.as_str(),
            Some(Value::Null) | None => "",
        }))?;
    }
    let bytes = writer.into_inner().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let mut out = String::from_utf8(bytes)?;
    if out.ends_with('\n') {
        out.pop();
    }
    Ok(out)
}
