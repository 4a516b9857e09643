//! Query results and their text renderings.

use std::fmt;
use std::path::Path;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    /// Exact numerics that do not fit the other variants, already rendered.
    Decimal(String),
    Text(String),
    /// Dates, times, nested and binary values, already rendered.
    Other(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Field text for delimited output: strings quoted, nulls empty.
    pub fn to_delimited(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Text(s) => format!("\"{}\"", s),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            // Debug keeps the fractional part of whole numbers (1.0, not 1).
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Decimal(s) | Value::Text(s) | Value::Other(s) => f.write_str(s),
        }
    }
}

/// Type tag of a result column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Boolean,
    Integer,
    Float,
    Text,
    /// Dates, times, timestamps and intervals.
    Temporal,
    Other,
}

impl ColumnKind {
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Boolean(_) => Some(ColumnKind::Boolean),
            Value::Integer(_) => Some(ColumnKind::Integer),
            Value::Float(_) | Value::Decimal(_) => Some(ColumnKind::Float),
            Value::Text(_) => Some(ColumnKind::Text),
            Value::Other(_) => Some(ColumnKind::Other),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ColumnKind::Boolean | ColumnKind::Integer | ColumnKind::Float
        )
    }

    /// Whether cells of this kind sit against the right edge of a table.
    pub fn is_right_aligned(&self) -> bool {
        self.is_numeric() || *self == ColumnKind::Temporal
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub kinds: Vec<ColumnKind>,
    pub rows: Vec<Vec<Value>>,
}

impl QueryResult {
    /// Build a result, tagging each column by its first non-null value.
    /// Columns holding nothing but nulls are tagged as text.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let kinds = (0..columns.len())
            .map(|i| {
                rows.iter()
                    .filter_map(|row| row.get(i).and_then(ColumnKind::of))
                    .next()
                    .unwrap_or(ColumnKind::Text)
            })
            .collect();

        QueryResult {
            columns,
            kinds,
            rows,
        }
    }

    /// Build a result whose column kinds are already known.
    pub fn with_kinds(
        columns: Vec<String>,
        kinds: Vec<ColumnKind>,
        rows: Vec<Vec<Value>>,
    ) -> Self {
        QueryResult {
            columns,
            kinds,
            rows,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Header row plus one line per record, fields joined by `delimiter`.
    pub fn to_delimited(&self, delimiter: &str) -> String {
        let header = self
            .columns
            .iter()
            .map(|c| format!("\"{}\"", c))
            .collect::<Vec<_>>()
            .join(delimiter);

        let records = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(Value::to_delimited)
                    .collect::<Vec<_>>()
                    .join(delimiter)
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!("{}\n{}", header, records)
    }

    /// Boxed table; text columns are left justified, numeric and temporal ones right.
    pub fn to_table(&self) -> String {
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect())
            .collect();

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                cells
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        out.push_str(&border('┌', '┬', '┐', &widths));

        let header: Vec<String> = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(name, &width)| pad(name, width, false))
            .collect();
        out.push_str(&format!("│ {} │\n", header.join(" │ ")));
        out.push_str(&border('├', '┼', '┤', &widths));

        for row in &cells {
            let line: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(i, &width)| {
                    let cell = row.get(i).map(String::as_str).unwrap_or("");
                    let right = self.kinds.get(i).is_some_and(ColumnKind::is_right_aligned);
                    pad(cell, width, right)
                })
                .collect();
            out.push_str(&format!("│ {} │\n", line.join(" │ ")));
        }

        out.push_str(&border('└', '┴', '┘', &widths));
        out.push_str(&format!("{} row(s)", self.rows.len()));
        out
    }

    /// Delimited text when a delimiter is given, otherwise the boxed table.
    pub fn render(&self, delimiter: Option<&str>) -> String {
        match delimiter {
            Some(d) => self.to_delimited(d),
            None => self.to_table(),
        }
    }

    /// Write the delimited rendering to `path`.
    pub fn save_to_file(&self, path: &Path, delimiter: &str) -> Result<()> {
        std::fs::write(path, self.to_delimited(delimiter))?;
        Ok(())
    }
}

fn pad(text: &str, width: usize, right: bool) -> String {
    if right {
        format!("{:>width$}", text, width = width)
    } else {
        format!("{:<width$}", text, width = width)
    }
}

fn border(left: char, mid: char, right: char, widths: &[usize]) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{}{}{}\n", left, segments.join(&mid.to_string()), right)
}
