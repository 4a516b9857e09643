//! Shared test helpers.
#![allow(dead_code)]

use std::cell::RefCell;
use std::path::Path;

use filequery::engine::Engine;
use filequery::error::{Error, Result};
use filequery::identifier::ReservedWords;
use filequery::result::QueryResult;

/// Engine stand-in that records every statement it is handed.
#[derive(Default)]
pub struct RecordingEngine {
    pub statements: RefCell<Vec<String>>,
    pub reserved: Vec<&'static str>,
    /// Statements containing this text fail.
    pub fail_on: Option<&'static str>,
}

impl RecordingEngine {
    pub fn with_reserved(reserved: &[&'static str]) -> Self {
        RecordingEngine {
            reserved: reserved.to_vec(),
            ..Default::default()
        }
    }

    pub fn failing_on(text: &'static str) -> Self {
        RecordingEngine {
            fail_on: Some(text),
            ..Default::default()
        }
    }

    pub fn recorded(&self) -> Vec<String> {
        self.statements.borrow().clone()
    }

    fn record(&self, sql: &str) -> Result<()> {
        self.statements.borrow_mut().push(sql.to_string());
        match self.fail_on {
            Some(text) if sql.contains(text) => {
                Err(Error::StatementExecution(format!("cannot run: {}", sql)))
            }
            _ => Ok(()),
        }
    }
}

impl ReservedWords for RecordingEngine {
    fn is_reserved_word(&self, name: &str) -> bool {
        self.reserved.iter().any(|w| *w == name)
    }
}

impl Engine for RecordingEngine {
    fn execute(&self, sql: &str) -> Result<()> {
        self.record(sql)
    }

    fn query(&self, sql: &str) -> Result<QueryResult> {
        self.record(sql)?;
        Ok(QueryResult::new(vec!["sql".to_string()], vec![]))
    }

    fn table_names(&self) -> Result<Vec<String>> {
        Ok(vec![])
    }
}

pub const TEST_CSV: &str = "col1,col2,col3\n1,a,1.5\n2,b,2.5\n3,c,3.5\n";

pub const TEST1_CSV: &str = "col1,label\n1,one\n3,three\n";

pub fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}
