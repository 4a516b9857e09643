//! Pairing statements with output files and writing them out.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;

use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::filetype::string_literal;

/// Format applied to every destination of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Parquet,
}

/// Statements paired one to one with output files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPlan {
    pairs: Vec<(String, PathBuf)>,
}

impl ExportPlan {
    /// Pair statement *i* with destination *i*. Unequal counts are rejected.
    pub fn reconcile(statements: Vec<String>, destinations: Vec<PathBuf>) -> Result<Self> {
        if statements.len() != destinations.len() {
            return Err(Error::ExportCountMismatch {
                statements: statements.len(),
                destinations: destinations.len(),
            });
        }

        Ok(ExportPlan {
            pairs: statements.into_iter().zip(destinations).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.pairs.iter().map(|(s, p)| (s.as_str(), p.as_path()))
    }

    /// Run every pair in order. The first failure stops the batch; files
    /// already written stay in place.
    pub fn run<E: Engine + ?Sized>(
        &self,
        engine: &E,
        format: OutputFormat,
        delimiter: char,
    ) -> Result<()> {
        for (i, (statement, destination)) in self.iter().enumerate() {
            let sql = copy_statement(statement, destination, format, delimiter);
            engine.execute(&sql).inspect_err(|e| {
                tracing::warn!("Export {} of {} failed: {}", i + 1, self.len(), e);
            })?;
            tracing::info!("Wrote {}", destination.display());
        }
        Ok(())
    }
}

/// `COPY` instruction writing the result of `statement` to `destination`.
pub fn copy_statement(
    statement: &str,
    destination: &Path,
    format: OutputFormat,
    delimiter: char,
) -> String {
    let target = string_literal(&destination.to_string_lossy());
    let query = statement.trim();
    match format {
        OutputFormat::Csv => format!(
            "copy ({}) to {} (header, delimiter {})",
            query,
            target,
            string_literal(&delimiter.to_string())
        ),
        OutputFormat::Parquet => format!("copy ({}) to {} (format parquet)", query, target),
    }
}
