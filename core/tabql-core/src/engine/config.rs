//! Engine configuration
//!
//! 환경 변수:
//! - `TABQL_DATA_DIR` - CSV 테이블 디렉터리 (기본값: `.`)
//! - `TABQL_DELIMITER` - 필드 구분자, ASCII 한 글자 (기본값: `,`)
//! - `TABQL_NULL_TEXT` - null로 읽고 쓰는 셀 텍스트 (기본값: 빈 문자열)

use crate::error::{TabqlError, TabqlResult};
use crate::storage::CsvOptions;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

pub const ENV_DATA_DIR: &str = "TABQL_DATA_DIR";
pub const ENV_DELIMITER: &str = "TABQL_DELIMITER";
pub const ENV_NULL_TEXT: &str = "TABQL_NULL_TEXT";

/// 엔진 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub data_dir: PathBuf,
    pub delimiter: char,
    pub null_text: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            delimiter: ',',
            null_text: String::new(),
        }
    }
}

impl EngineConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    /// Defaults overridden by `TABQL_*` environment variables.
    pub fn from_env() -> TabqlResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> TabqlResult<Self> {
        let mut config = Self::default();
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(delimiter) = lookup(ENV_DELIMITER) {
            config.delimiter = parse_delimiter(&delimiter)?;
        }
        if let Some(null_text) = lookup(ENV_NULL_TEXT) {
            config.null_text = null_text;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_null_text(mut self, null_text: impl Into<String>) -> Self {
        self.null_text = null_text.into();
        self
    }

    pub fn validate(&self) -> TabqlResult<()> {
        if !self.delimiter.is_ascii() || matches!(self.delimiter, '"' | '\n' | '\r') {
            return Err(TabqlError::InvalidConfig(format!(
                "delimiter {:?} must be a single ASCII character other than quote or newline",
                self.delimiter
            )));
        }
        if self.null_text.contains(self.delimiter) {
            return Err(TabqlError::InvalidConfig(format!(
                "null text {:?} contains the delimiter",
                self.null_text
            )));
        }
        Ok(())
    }

    /// CSV dialect for [`CsvTableStore`](crate::storage::CsvTableStore).
    pub fn csv_options(&self) -> TabqlResult<CsvOptions> {
        self.validate()?;
        Ok(CsvOptions {
            delimiter: self.delimiter as u8,
            null_text: self.null_text.clone(),
        })
    }
}

/// `\t` and `tab` mean a tab; anything else must be exactly one character.
pub fn parse_delimiter(raw: &str) -> TabqlResult<char> {
    if matches!(raw, "\\t" | "tab") {
        return Ok('\t');
    }
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(TabqlError::InvalidConfig(format!(
            "delimiter must be one character, got {:?}",
            raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.csv_options().unwrap(), CsvOptions::default());
    }

    #[test]
    fn test_env_overrides() {
        let config = EngineConfig::from_lookup(lookup(&[
            (ENV_DATA_DIR, "/srv/tables"),
            (ENV_DELIMITER, "\\t"),
            (ENV_NULL_TEXT, "NULL"),
        ]))
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/tables"));
        assert_eq!(config.delimiter, '\t');
        assert_eq!(config.null_text, "NULL");
        assert_eq!(config.csv_options().unwrap().delimiter, b'\t');
    }

    #[test]
    fn test_invalid_delimiter() {
        let err = EngineConfig::from_lookup(lookup(&[(ENV_DELIMITER, ";;")])).unwrap_err();
        assert!(matches!(err, TabqlError::InvalidConfig(_)));

        let config = EngineConfig::default().with_delimiter('é');
        assert!(config.validate().is_err());

        let config = EngineConfig::default()
            .with_delimiter(';')
            .with_null_text("a;b");
        assert!(config.csv_options().is_err());
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::new("data")
            .with_delimiter('|')
            .with_null_text("-");
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.csv_options().unwrap().delimiter, b'|');
    }
}
