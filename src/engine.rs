//! The embedded engine seam and its DuckDB implementation.

use chrono::{DateTime, NaiveTime, TimeDelta};
use duckdb::arrow::datatypes::DataType;
use duckdb::types::{TimeUnit, Value as DuckValue};
use duckdb::{Connection, params};

use crate::error::Result;
use crate::identifier::ReservedWords;
use crate::result::{ColumnKind, QueryResult, Value};

/// The embedded SQL engine as seen by the rest of the crate.
///
/// Calls are issued one at a time against a single connection.
pub trait Engine: ReservedWords {
    /// Run a statement and discard whatever it returns.
    fn execute(&self, sql: &str) -> Result<()>;

    /// Run a statement and collect its full result set.
    fn query(&self, sql: &str) -> Result<QueryResult>;

    /// Names of the tables currently defined.
    fn table_names(&self) -> Result<Vec<String>>;
}

/// In-memory DuckDB connection.
pub struct DuckDbEngine {
    conn: Connection,
}

impl DuckDbEngine {
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(DuckDbEngine { conn })
    }
}

impl ReservedWords for DuckDbEngine {
    fn is_reserved_word(&self, name: &str) -> bool {
        let lookup = || -> duckdb::Result<bool> {
            let mut stmt = self.conn.prepare(
                "select keyword_name from duckdb_keywords() \
                 where keyword_name = ? and keyword_category <> 'unreserved'",
            )?;
            let mut rows = stmt.query(params![name])?;
            Ok(rows.next()?.is_some())
        };

        match lookup() {
            Ok(reserved) => reserved,
            Err(e) => {
                // Quoting an identifier that did not need it is harmless.
                tracing::warn!("Keyword lookup for {:?} failed: {}", name, e);
                true
            }
        }
    }
}

impl Engine for DuckDbEngine {
    fn execute(&self, sql: &str) -> Result<()> {
        tracing::debug!("Executing: {}", sql);
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    fn query(&self, sql: &str) -> Result<QueryResult> {
        tracing::debug!("Querying: {}", sql);
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params![])?;

        let (columns, kinds) = rows
            .as_ref()
            .map(|stmt| {
                let kinds: Vec<ColumnKind> = (0..stmt.column_count())
                    .map(|i| column_kind(&stmt.column_type(i)))
                    .collect();
                (stmt.column_names(), kinds)
            })
            .unwrap_or_default();

        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Vec::with_capacity(columns.len());
            for i in 0..columns.len() {
                let value: DuckValue = row.get(i)?;
                record.push(convert_value(value));
            }
            records.push(record);
        }

        Ok(QueryResult::with_kinds(columns, kinds, records))
    }

    fn table_names(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("select table_name from duckdb_tables() order by table_name")?;
        let mut rows = stmt.query(params![])?;

        let mut names = Vec::new();
        while let Some(row) = rows.next()? {
            names.push(row.get::<_, String>(0)?);
        }
        Ok(names)
    }
}

/// Display tag for a result column, taken from its declared type.
fn column_kind(data_type: &DataType) -> ColumnKind {
    match data_type {
        DataType::Boolean => ColumnKind::Boolean,
        t if t.is_integer() => ColumnKind::Integer,
        t if t.is_floating() || t.is_decimal() => ColumnKind::Float,
        t if t.is_string() => ColumnKind::Text,
        DataType::Dictionary(..) => ColumnKind::Text,
        t if t.is_temporal() => ColumnKind::Temporal,
        _ => ColumnKind::Other,
    }
}

fn convert_value(value: DuckValue) -> Value {
    match value {
        DuckValue::Null => Value::Null,
        DuckValue::Boolean(b) => Value::Boolean(b),
        DuckValue::TinyInt(i) => Value::Integer(i.into()),
        DuckValue::SmallInt(i) => Value::Integer(i.into()),
        DuckValue::Int(i) => Value::Integer(i.into()),
        DuckValue::BigInt(i) => Value::Integer(i),
        DuckValue::UTinyInt(i) => Value::Integer(i.into()),
        DuckValue::USmallInt(i) => Value::Integer(i.into()),
        DuckValue::UInt(i) => Value::Integer(i.into()),
        DuckValue::UBigInt(i) => match i64::try_from(i) {
            Ok(i) => Value::Integer(i),
            Err(_) => Value::Decimal(i.to_string()),
        },
        DuckValue::HugeInt(i) => match i64::try_from(i) {
            Ok(i) => Value::Integer(i),
            Err(_) => Value::Decimal(i.to_string()),
        },
        DuckValue::UHugeInt(i) => match i64::try_from(i) {
            Ok(i) => Value::Integer(i),
            Err(_) => Value::Decimal(i.to_string()),
        },
        DuckValue::Float(x) => Value::Float(x.into()),
        DuckValue::Double(x) => Value::Float(x),
        DuckValue::Decimal(d) => Value::Decimal(d.to_string()),
        DuckValue::Text(s) => Value::Text(s),
        DuckValue::Enum(s) => Value::Text(s),
        other => Value::Other(render(&other)),
    }
}

/// Text for values without a dedicated [`Value`] variant, shaped like the
/// engine's own casts to `VARCHAR`.
fn render(value: &DuckValue) -> String {
    match value {
        DuckValue::Date32(days) => render_date(*days),
        DuckValue::Time64(unit, t) => render_time(*unit, *t),
        DuckValue::Timestamp(unit, t) => render_timestamp(*unit, *t),
        DuckValue::Interval {
            months,
            days,
            nanos,
        } => render_interval(*months, *days, *nanos),
        DuckValue::Blob(bytes) | DuckValue::Geometry(bytes) => render_blob(bytes),
        DuckValue::List(items) | DuckValue::Array(items) => {
            let items: Vec<_> = items.iter().map(render_child).collect();
            format!("[{}]", items.join(", "))
        }
        DuckValue::Struct(fields) => {
            let fields: Vec<_> = fields
                .iter()
                .map(|(name, v)| format!("'{}': {}", name, render_child(v)))
                .collect();
            format!("{{{}}}", fields.join(", "))
        }
        DuckValue::Map(entries) => {
            let entries: Vec<_> = entries
                .iter()
                .map(|(k, v)| format!("{}={}", render_child(k), render_child(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
        DuckValue::Union(inner) => render_child(inner),
        other => format!("{:?}", other),
    }
}

fn render_child(value: &DuckValue) -> String {
    convert_value(value.clone()).to_string()
}

fn render_date(days: i32) -> String {
    DateTime::from_timestamp(i64::from(days) * 86_400, 0)
        .map(|dt| dt.date_naive().to_string())
        .unwrap_or_else(|| format!("{} days", days))
}

fn render_time(unit: TimeUnit, t: i64) -> String {
    let since_midnight = match unit {
        TimeUnit::Second => TimeDelta::try_seconds(t),
        TimeUnit::Millisecond => TimeDelta::try_milliseconds(t),
        TimeUnit::Microsecond => Some(TimeDelta::microseconds(t)),
        TimeUnit::Nanosecond => Some(TimeDelta::nanoseconds(t)),
    };
    since_midnight
        .map(|delta| (NaiveTime::MIN + delta).to_string())
        .unwrap_or_else(|| t.to_string())
}

fn render_timestamp(unit: TimeUnit, t: i64) -> String {
    let timestamp = match unit {
        TimeUnit::Second => DateTime::from_timestamp(t, 0),
        TimeUnit::Millisecond => DateTime::from_timestamp_millis(t),
        TimeUnit::Microsecond => DateTime::from_timestamp_micros(t),
        TimeUnit::Nanosecond => Some(DateTime::from_timestamp_nanos(t)),
    };
    timestamp
        .map(|dt| dt.naive_utc().to_string())
        .unwrap_or_else(|| t.to_string())
}

fn render_interval(months: i32, days: i32, nanos: i64) -> String {
    let mut parts = Vec::new();
    push_unit(&mut parts, months / 12, "year");
    push_unit(&mut parts, months % 12, "month");
    push_unit(&mut parts, days, "day");

    if nanos != 0 || parts.is_empty() {
        let clock = TimeDelta::nanoseconds(nanos.saturating_abs());
        let sign = if nanos < 0 { "-" } else { "" };
        let hms = format!(
            "{}{:02}:{:02}:{:02}",
            sign,
            clock.num_hours(),
            clock.num_minutes() % 60,
            clock.num_seconds() % 60
        );
        let micros = clock.subsec_nanos() / 1_000;
        parts.push(if micros == 0 {
            hms
        } else {
            format!("{}.{:06}", hms, micros)
        });
    }

    parts.join(" ")
}

fn push_unit(parts: &mut Vec<String>, n: i32, unit: &str) {
    match n {
        0 => {}
        1 | -1 => parts.push(format!("{} {}", n, unit)),
        _ => parts.push(format!("{} {}s", n, unit)),
    }
}

fn render_blob(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                (b as char).to_string()
            } else {
                format!("\\x{:02X}", b)
            }
        })
        .collect()
}
