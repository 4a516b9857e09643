//! Batch and interactive drivers built on top of an [`Engine`].

use std::io::{BufRead, Write};

use crate::config::RunConfig;
use crate::engine::{DuckDbEngine, Engine};
use crate::error::{Error, Result};
use crate::export::ExportPlan;
use crate::ingest::{self, TableSource};
use crate::session::{Command, Outcome, Session};
use crate::splitter::{has_runnable, split_statements};

/// Open an in-memory engine and load the configured input into it.
pub fn open(config: &RunConfig) -> Result<(DuckDbEngine, Vec<TableSource>)> {
    let path = config
        .input_path()
        .ok_or_else(|| Error::InvalidConfig("no input file or directory given".to_string()))?;

    let engine = DuckDbEngine::open_in_memory()?;
    let sources = ingest::ingest(&engine, path)?;
    Ok((engine, sources))
}

/// Run every statement of the configured query in source order.
///
/// With output files, statements and files are paired up front and nothing
/// runs when the counts differ. Without them, each result is printed to `out`.
pub fn run_batch<E, W>(engine: &E, config: &RunConfig, out: &mut W) -> Result<()>
where
    E: Engine + ?Sized,
    W: Write,
{
    let sql = config.load_query()?.ok_or(Error::NoQuery)?;
    let statements = split_statements(&sql, true);

    if let Some(destinations) = config.out_files() {
        let plan = ExportPlan::reconcile(statements, destinations.to_vec())?;
        return plan.run(engine, config.output_format(), config.file_delimiter());
    }

    if !has_runnable(&statements) {
        return Err(Error::NoQuery);
    }

    let delimiter = config.delimiter.map(String::from);
    for statement in statements.iter().map(|s| s.trim()) {
        if statement.is_empty() {
            tracing::debug!("Skipping empty statement");
            continue;
        }
        let result = engine.query(statement)?;
        writeln!(out, "{}", result.render(delimiter.as_deref()))?;
    }

    Ok(())
}

/// Line-oriented editor loop: plain lines go into the active tab, `\`
/// commands are dispatched to the session.
pub fn run_editor<E, R, W>(
    session: &mut Session<E>,
    input: R,
    out: &mut W,
    prompt: bool,
) -> Result<()>
where
    E: Engine,
    R: BufRead,
    W: Write,
{
    if prompt {
        writeln!(out, "filequery editor, type \\help for commands")?;
        if let Ok(tables) = session.engine().table_names() {
            writeln!(out, "tables: {}", tables.join(", "))?;
        }
    }

    let mut lines = input.lines();
    loop {
        if prompt {
            write!(out, "[{}]> ", session.active_id())?;
            out.flush()?;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        let outcome = match Command::parse(&line) {
            None => {
                session.active_tab_mut().push_line(&line);
                continue;
            }
            Some(Err(msg)) => Outcome::Error(msg),
            Some(Ok(command)) => session.dispatch(command),
        };

        match outcome {
            Outcome::Result { result, span } => {
                tracing::debug!("Ran statement spanning {} to {}", span.start, span.end);
                writeln!(out, "{}", result.to_table())?;
            }
            Outcome::Message(msg) => writeln!(out, "{}", msg)?,
            Outcome::Error(msg) => writeln!(out, "error: {}", msg)?,
            Outcome::Quit => break,
        }
    }

    Ok(())
}
