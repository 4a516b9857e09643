//! Error types for filequery

use std::path::PathBuf;

use thiserror::Error;

use crate::session::TabId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // Input errors
    #[error("file type must be one of: csv, parquet, json, ndjson ({})", .0.display())]
    InvalidFileType(PathBuf),

    #[error("table name {0:?} contains a double quote and cannot be used as an identifier")]
    UnsupportedIdentifier(String),

    // Query errors
    #[error("{0}")]
    StatementExecution(String),

    #[error("number of queries ({statements}) and output files ({destinations}) do not match")]
    ExportCountMismatch {
        statements: usize,
        destinations: usize,
    },

    #[error("no query under cursor")]
    NoQueryUnderCursor,

    #[error("no query to run")]
    NoQuery,

    #[error("no query result to save")]
    NoResult,

    // Session errors
    #[error("no tab with id {0}")]
    UnknownTab(TabId),

    // Configuration errors
    #[error("{0}")]
    InvalidConfig(String),

    #[error("failed to parse config file: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<duckdb::Error> for Error {
    fn from(err: duckdb::Error) -> Self {
        Error::StatementExecution(err.to_string())
    }
}
