//! Query CSV, Parquet and JSON files with SQL.
//!
//! Files are loaded as tables into an embedded DuckDB connection. Statements
//! are split out of a SQL buffer, optionally resolved from a cursor position,
//! run one at a time, and rendered as delimited text, boxed tables, or files.

pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod filetype;
pub mod identifier;
pub mod ingest;
pub mod locator;
pub mod result;
pub mod runner;
pub mod session;
pub mod splitter;

pub use config::RunConfig;
pub use engine::{DuckDbEngine, Engine};
pub use error::{Error, Result};
pub use export::{ExportPlan, OutputFormat};
pub use identifier::{ReservedWords, needs_quoting};
pub use ingest::{TableSource, ingest};
pub use locator::{Located, Position, Span, locate};
pub use result::{ColumnKind, QueryResult, Value};
pub use session::{Command, Outcome, Session, TabId};
pub use splitter::split_statements;

