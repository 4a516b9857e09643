//! Recognized input formats and the engine reader call for each.

use std::fmt;
use std::path::Path;

/// Input file formats that can be loaded as tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    Csv,
    Parquet,
    Json,
    NdJson,
}

impl FileType {
    /// Match a file extension, ignoring case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(FileType::Csv),
            "parquet" => Some(FileType::Parquet),
            "json" => Some(FileType::Json),
            "ndjson" => Some(FileType::NdJson),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Table function call that reads `path`.
    ///
    /// Text formats sample the whole file so type inference sees every row.
    pub fn reader_call(&self, path: &Path) -> String {
        let literal = string_literal(&path.to_string_lossy());
        match self {
            FileType::Csv => format!("read_csv_auto({}, sample_size=-1)", literal),
            FileType::Parquet => format!("read_parquet({})", literal),
            FileType::Json => format!("read_json_auto({}, sample_size=-1)", literal),
            FileType::NdJson => format!(
                "read_json_auto({}, format='newline_delimited', sample_size=-1)",
                literal
            ),
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileType::Csv => "csv",
            FileType::Parquet => "parquet",
            FileType::Json => "json",
            FileType::NdJson => "ndjson",
        };
        f.write_str(name)
    }
}

/// Single-quoted SQL string literal with embedded quotes doubled.
pub fn string_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
