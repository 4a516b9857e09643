//! Loading files into the engine as tables.

use std::path::{Path, PathBuf};

use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::filetype::FileType;
use crate::identifier::{self, ReservedWords};

/// A file registered as a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSource {
    pub path: PathBuf,
    pub file_type: FileType,
    pub table_name: String,
    pub needs_quoting: bool,
    identifier: String,
}

impl TableSource {
    /// Describe `path` as a table source without touching the engine's tables.
    ///
    /// The table name is the file stem with its case kept.
    pub fn new<R: ReservedWords + ?Sized>(path: &Path, reserved: &R) -> Result<Self> {
        let file_type =
            FileType::from_path(path).ok_or_else(|| Error::InvalidFileType(path.to_path_buf()))?;

        let table_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .ok_or_else(|| Error::InvalidFileType(path.to_path_buf()))?;

        let needs_quoting = identifier::needs_quoting(&table_name, reserved);
        let identifier = if needs_quoting {
            tracing::debug!("Quoting table name {:?}", table_name);
            identifier::quote(&table_name)?
        } else {
            table_name.clone()
        };

        Ok(TableSource {
            path: path.to_path_buf(),
            file_type,
            table_name,
            needs_quoting,
            identifier,
        })
    }

    /// The table name as it must appear in SQL.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn create_statement(&self) -> String {
        format!(
            "create table {} as select * from {};",
            self.identifier(),
            self.file_type.reader_call(&self.path)
        )
    }
}

/// Load a file, or every recognized file directly inside a directory.
///
/// Directory entries with unknown extensions are skipped; a single file with
/// an unknown extension is an error.
pub fn ingest<E: Engine + ?Sized>(engine: &E, path: &Path) -> Result<Vec<TableSource>> {
    let files = if path.is_dir() {
        list_table_files(path)?
    } else {
        vec![path.to_path_buf()]
    };

    let mut sources = Vec::with_capacity(files.len());
    for file in files {
        let source = TableSource::new(&file, engine)?;
        engine.execute(&source.create_statement())?;
        tracing::info!(
            "Loaded {} as table {}",
            source.path.display(),
            source.identifier()
        );
        sources.push(source);
    }

    Ok(sources)
}

/// Immediate children of `dir` with a recognized extension, sorted by name.
pub fn list_table_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        if FileType::from_path(&path).is_some() {
            files.push(path);
        } else {
            tracing::debug!("Skipping {}: unrecognized file type", path.display());
        }
    }

    files.sort();
    Ok(files)
}
