//! The flat run configuration, from the command line or a JSON file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};
use crate::export::OutputFormat;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub filename: Option<PathBuf>,
    pub filesdir: Option<PathBuf>,
    pub query: Option<String>,
    pub query_file: Option<PathBuf>,
    #[serde(deserialize_with = "one_or_many")]
    pub out_file: Option<Vec<PathBuf>>,
    pub out_file_format: Option<OutputFormat>,
    pub delimiter: Option<char>,
    pub editor: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(PathBuf),
    Many(Vec<PathBuf>),
}

/// Accept `"out_file": "a.csv"` as shorthand for `["a.csv"]`.
fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<PathBuf>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<OneOrMany> = Option::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        OneOrMany::One(path) => vec![path],
        OneOrMany::Many(paths) => paths,
    }))
}

impl RunConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    /// Check that the options describe exactly one input and one query source.
    pub fn validate(&self) -> Result<()> {
        match (&self.filename, &self.filesdir) {
            (None, None) => {
                return Err(invalid(
                    "you must provide either a file name or a path to a directory \
                     containing CSV, Parquet and/or JSON files",
                ));
            }
            (Some(_), Some(_)) => {
                return Err(invalid("you cannot provide both filename and filesdir"));
            }
            _ => {}
        }

        match (&self.query, &self.query_file) {
            (None, None) if !self.editor => {
                return Err(invalid(
                    "you must provide either a query or a path to a file with a query",
                ));
            }
            (Some(_), Some(_)) => {
                return Err(invalid("you cannot provide both query and query_file"));
            }
            _ => {}
        }

        if self.editor && self.out_files().is_some() {
            return Err(invalid("out_file cannot be used with the editor"));
        }

        Ok(())
    }

    /// The file or directory to load tables from.
    pub fn input_path(&self) -> Option<&Path> {
        self.filename.as_deref().or(self.filesdir.as_deref())
    }

    /// Output destinations, or `None` when results go to stdout.
    pub fn out_files(&self) -> Option<&[PathBuf]> {
        self.out_file.as_deref().filter(|files| !files.is_empty())
    }

    pub fn output_format(&self) -> OutputFormat {
        self.out_file_format.unwrap_or_default()
    }

    /// Delimiter for written files, `,` unless configured.
    pub fn file_delimiter(&self) -> char {
        self.delimiter.unwrap_or(',')
    }

    /// The SQL text to run, read from `query_file` when that is set.
    pub fn load_query(&self) -> Result<Option<String>> {
        if let Some(path) = &self.query_file {
            let sql = std::fs::read_to_string(path).map_err(|e| {
                Error::InvalidConfig(format!(
                    "error reading query file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            return Ok(Some(sql));
        }
        Ok(self.query.clone())
    }
}

fn invalid(msg: &str) -> Error {
    Error::InvalidConfig(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> RunConfig {
        RunConfig {
            filename: Some(PathBuf::from("example/test.csv")),
            query: Some("select * from test".to_string()),
            ..RunConfig::default()
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn test_no_filename_or_filesdir() {
        let config = RunConfig {
            filename: None,
            ..base()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_filename_and_filesdir() {
        let config = RunConfig {
            filesdir: Some(PathBuf::from("example/data")),
            ..base()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("both filename and filesdir"));
    }

    #[test]
    fn test_no_query_or_query_file() {
        let config = RunConfig {
            query: None,
            ..base()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_editor_needs_no_query() {
        let config = RunConfig {
            query: None,
            editor: true,
            ..base()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_query_and_query_file() {
        let config = RunConfig {
            query_file: Some(PathBuf::from("join.sql")),
            ..base()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("both query and query_file"));
    }

    #[test]
    fn test_editor_with_out_file() {
        let config = RunConfig {
            editor: true,
            out_file: Some(vec![PathBuf::from("out.csv")]),
            ..base()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_single_out_file_becomes_list() {
        let config = RunConfig::from_json_str(
            r#"{"filename": "test.csv", "query": "select 1", "out_file": "out.csv",
                "out_file_format": "parquet", "delimiter": "|"}"#,
        )
        .unwrap();
        assert_eq!(config.out_files(), Some(&[PathBuf::from("out.csv")][..]));
        assert_eq!(config.output_format(), OutputFormat::Parquet);
        assert_eq!(config.file_delimiter(), '|');
        assert!(!config.editor);
    }

    #[test]
    fn test_json_out_file_list_and_defaults() {
        let config = RunConfig::from_json_str(
            r#"{"filesdir": "data", "query_file": "q.sql", "out_file": ["a.csv", "b.csv"]}"#,
        )
        .unwrap();
        assert_eq!(config.out_files().map(<[PathBuf]>::len), Some(2));
        assert_eq!(config.output_format(), OutputFormat::Csv);
        assert_eq!(config.file_delimiter(), ',');
        assert_eq!(config.input_path(), Some(Path::new("data")));
    }

    #[test]
    fn test_json_parse_error() {
        let err = RunConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_load_query_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q.sql");
        std::fs::write(&path, "select 1;\nselect 2;").unwrap();

        let config = RunConfig {
            query: None,
            query_file: Some(path),
            ..base()
        };
        assert_eq!(
            config.load_query().unwrap().as_deref(),
            Some("select 1;\nselect 2;")
        );
    }

    #[test]
    fn test_load_query_missing_file() {
        let config = RunConfig {
            query: None,
            query_file: Some(PathBuf::from("does/not/exist.sql")),
            ..base()
        };
        assert!(config.load_query().is_err());
    }
}
