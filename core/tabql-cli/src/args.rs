//! Command-line argument definitions

use clap::Parser;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tabql_core::engine::config::parse_delimiter;
use tabql_core::{EngineConfig, TabqlResult};

/// SQL over a directory of CSV tables.
#[derive(Parser, Debug, Clone)]
#[command(name = "tabql", version, about = "SQL over a directory of CSV tables")]
pub struct CliArgs {
    /// Directory holding `<table>.csv` files
    #[arg(value_name = "DIR", env = "TABQL_DATA_DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Execute a single statement and exit
    #[arg(short = 'e', long = "execute", value_name = "SQL")]
    pub execute: Option<String>,

    /// Output format for SELECT results: table, csv, json
    #[arg(long = "format", default_value = "table")]
    pub format: OutputFormat,

    /// Field delimiter of the CSV files (`\t` or `tab` for tab)
    #[arg(long = "delimiter", env = "TABQL_DELIMITER", default_value = ",")]
    pub delimiter: String,

    /// Cell text read and written as null
    #[arg(long = "null-text", env = "TABQL_NULL_TEXT", default_value = "")]
    pub null_text: String,

    /// Log level when RUST_LOG is unset
    #[arg(long = "log-level", default_value = "warn")]
    pub log_level: String,
}

impl CliArgs {
    /// Engine settings described by these arguments.
    pub fn engine_config(&self) -> TabqlResult<EngineConfig> {
        let config = EngineConfig::new(&self.dir)
            .with_delimiter(parse_delimiter(&self.delimiter)?)
            .with_null_text(&self.null_text);
        config.validate()?;
        Ok(config)
    }
}

/// Output format for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!(
                "unknown format '{}': expected table, csv or json",
                other
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("Json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_output_format_display() {
        for format in [OutputFormat::Table, OutputFormat::Csv, OutputFormat::Json] {
            assert_eq!(format.to_string().parse::<OutputFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_parse_execute_and_format() {
        let args = CliArgs::try_parse_from([
            "tabql",
            "./data",
            "-e",
            "SELECT * FROM student",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(args.dir, PathBuf::from("./data"));
        assert_eq!(args.execute.as_deref(), Some("SELECT * FROM student"));
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.log_level, "warn");
    }

    #[test]
    fn test_engine_config_from_args() {
        let args = CliArgs::try_parse_from([
            "tabql",
            "tables",
            "--delimiter",
            "tab",
            "--null-text",
            "NULL",
        ])
        .unwrap();
        let config = args.engine_config().unwrap();
        assert_eq!(config.data_dir, PathBuf::from("tables"));
        assert_eq!(config.delimiter, '\t');
        assert_eq!(config.null_text, "NULL");
    }

    #[test]
    fn test_invalid_delimiter_rejected() {
        let args = CliArgs::try_parse_from(["tabql", "tables", "--delimiter", ";;"]).unwrap();
        assert!(args.engine_config().is_err());

        let args = CliArgs::try_parse_from(["tabql", "tables", "--delimiter", "\""]).unwrap();
        assert!(args.engine_config().is_err());
    }
}
