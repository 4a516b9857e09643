//! Interactive editing session: tabs of SQL text over one engine connection.
//!
//! Every command runs to completion and reports back through an [`Outcome`].
//! Failures become [`Outcome::Error`] text; nothing here ends the session.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::locator::{self, Position, Span};
use crate::result::QueryResult;
use crate::splitter::{self, split_statements, strip_line_comments};

pub const DEFAULT_SQL_FILE: &str = "filequery.sql";
pub const DEFAULT_RESULT_FILE: &str = "result.csv";

pub const HELP: &str = "\
commands

  \\run [line col]   execute the statement under the cursor
  \\save [path]      save the editor content (default filequery.sql)
  \\result [path]    save the last result as CSV (default result.csv)
  \\load path        replace the editor content with a SQL file
  \\new              open a new tab
  \\close            close the current tab
  \\tab N            switch to tab N
  \\tables           list the tables in the database
  \\show             print the editor content
  \\clear            clear the editor content
  \\help             toggle this help
  \\quit             leave filequery

any other line is appended to the editor

helpful SQL statements

  show tables;                   list tables in the database
  describe <table name>;         columns of a table
";

/// Opaque handle of an editor tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TabId(u32);

impl TabId {
    pub const fn new(id: u32) -> Self {
        TabId(id)
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which part of the screen receives input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Editor,
    Results,
    Help,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tab {
    pub buffer: String,
    pub cursor: Position,
    pub selection: Option<Span>,
}

impl Tab {
    /// Append a line of text and move the cursor to the last statement.
    pub fn push_line(&mut self, line: &str) {
        if !self.buffer.is_empty() && !self.buffer.ends_with('\n') {
            self.buffer.push('\n');
        }
        self.buffer.push_str(line);
        self.cursor = default_cursor(&self.buffer);
    }

    pub fn set_text(&mut self, text: String) {
        self.cursor = default_cursor(&text);
        self.buffer = text;
        self.selection = None;
    }
}

/// Position just past the last character of `text`.
pub fn end_position(text: &str) -> Position {
    let line = text.matches('\n').count();
    let col = text
        .rsplit('\n')
        .next()
        .map(|last| last.chars().count())
        .unwrap_or(0);
    Position::new(line, col)
}

/// A caret for "run what I just typed": the buffer end, pulled back onto a
/// trailing terminator so the statement before it is chosen.
pub fn default_cursor(text: &str) -> Position {
    let trimmed = text.trim_end();
    let end = end_position(trimmed);
    if trimmed.ends_with(splitter::TERMINATOR) {
        Position::new(end.line, end.col.saturating_sub(1))
    } else {
        end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Option<Position>),
    SaveBuffer(Option<PathBuf>),
    SaveResult(Option<PathBuf>),
    Load(PathBuf),
    NewTab,
    CloseTab,
    SwitchTab(TabId),
    Tables,
    Show,
    Clear,
    ToggleHelp,
    Quit,
}

impl Command {
    /// Parse a backslash command. Lines that are not commands give `None`.
    pub fn parse(line: &str) -> Option<std::result::Result<Command, String>> {
        let rest = line.trim().strip_prefix('\\')?;
        let mut words = rest.split_whitespace();
        let name = words.next().unwrap_or("");
        let args: Vec<&str> = words.collect();

        let command = match (name, args.as_slice()) {
            ("run", []) => Ok(Command::Run(None)),
            ("run", [line, col]) => match (line.parse(), col.parse()) {
                (Ok(line), Ok(col)) => Ok(Command::Run(Some(Position::new(line, col)))),
                _ => Err(format!("invalid cursor position: {} {}", line, col)),
            },
            ("save", []) => Ok(Command::SaveBuffer(None)),
            ("save", [path]) => Ok(Command::SaveBuffer(Some(PathBuf::from(path)))),
            ("result", []) => Ok(Command::SaveResult(None)),
            ("result", [path]) => Ok(Command::SaveResult(Some(PathBuf::from(path)))),
            ("load", [path]) => Ok(Command::Load(PathBuf::from(path))),
            ("new", []) => Ok(Command::NewTab),
            ("close", []) => Ok(Command::CloseTab),
            ("tab", [id]) => id
                .parse()
                .map(|id| Command::SwitchTab(TabId(id)))
                .map_err(|_| format!("invalid tab id: {}", id)),
            ("tables", []) => Ok(Command::Tables),
            ("show", []) => Ok(Command::Show),
            ("clear", []) => Ok(Command::Clear),
            ("help", []) => Ok(Command::ToggleHelp),
            ("quit" | "q" | "exit", []) => Ok(Command::Quit),
            _ => Err(format!("unknown command: \\{}", rest.trim())),
        };
        Some(command)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Result { result: QueryResult, span: Span },
    Message(String),
    Error(String),
    Quit,
}

pub struct Session<E: Engine> {
    engine: E,
    tabs: BTreeMap<TabId, Tab>,
    active: TabId,
    next_id: u32,
    last_result: Option<QueryResult>,
    help_visible: bool,
    focus: Focus,
}

impl<E: Engine> Session<E> {
    pub fn new(engine: E) -> Self {
        let mut session = Session {
            engine,
            tabs: BTreeMap::new(),
            active: TabId(0),
            next_id: 0,
            last_result: None,
            help_visible: false,
            focus: Focus::Editor,
        };
        session.new_tab();
        session
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn active_id(&self) -> TabId {
        self.active
    }

    pub fn tab_ids(&self) -> Vec<TabId> {
        self.tabs.keys().copied().collect()
    }

    pub fn active_tab(&self) -> &Tab {
        &self.tabs[&self.active]
    }

    pub fn active_tab_mut(&mut self) -> &mut Tab {
        self.tabs.entry(self.active).or_default()
    }

    pub fn last_result(&self) -> Option<&QueryResult> {
        self.last_result.as_ref()
    }

    pub fn help_visible(&self) -> bool {
        self.help_visible
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn dispatch(&mut self, command: Command) -> Outcome {
        let outcome = match command {
            Command::Run(cursor) => self.execute_at_cursor(cursor),
            Command::SaveBuffer(path) => self.save_buffer(path.as_deref()),
            Command::SaveResult(path) => self.save_result(path.as_deref()),
            Command::Load(path) => self.load_sql(&path),
            Command::NewTab => {
                let id = self.new_tab();
                Ok(Outcome::Message(format!("opened tab {}", id)))
            }
            Command::CloseTab => {
                let id = self.close_tab();
                Ok(Outcome::Message(format!("now on tab {}", id)))
            }
            Command::SwitchTab(id) => self
                .switch_tab(id)
                .map(|()| Outcome::Message(format!("now on tab {}", id))),
            Command::Tables => self
                .engine
                .table_names()
                .map(|names| Outcome::Message(names.join("\n"))),
            Command::Show => Ok(Outcome::Message(self.active_tab().buffer.clone())),
            Command::Clear => {
                self.active_tab_mut().set_text(String::new());
                Ok(Outcome::Message("editor cleared".to_string()))
            }
            Command::ToggleHelp => {
                if self.toggle_help() {
                    Ok(Outcome::Message(HELP.to_string()))
                } else {
                    Ok(Outcome::Message("help hidden".to_string()))
                }
            }
            Command::Quit => Ok(Outcome::Quit),
        };

        outcome.unwrap_or_else(|e| Outcome::Error(e.to_string()))
    }

    /// Run the statement under `cursor`, or under the tab's own cursor.
    pub fn execute_at_cursor(&mut self, cursor: Option<Position>) -> Result<Outcome> {
        let tab = self.active_tab_mut();
        if let Some(cursor) = cursor {
            tab.cursor = cursor;
        }

        let segments = split_statements(&tab.buffer, false);
        let located = locator::locate(&segments, tab.cursor);
        let sql = strip_line_comments(&located.text);
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(Error::NoQueryUnderCursor);
        }

        tab.selection = Some(located.span);
        let span = located.span;
        let sql = sql.to_string();

        self.focus = Focus::Results;
        match self.engine.query(&sql) {
            Ok(result) => {
                self.last_result = Some(result.clone());
                Ok(Outcome::Result { result, span })
            }
            Err(e) => {
                self.last_result = None;
                Err(e)
            }
        }
    }

    pub fn save_buffer(&self, path: Option<&Path>) -> Result<Outcome> {
        let path = path.unwrap_or(Path::new(DEFAULT_SQL_FILE));
        std::fs::write(path, &self.active_tab().buffer)?;
        Ok(Outcome::Message(format!("saved editor to {}", path.display())))
    }

    pub fn save_result(&self, path: Option<&Path>) -> Result<Outcome> {
        let path = path.unwrap_or(Path::new(DEFAULT_RESULT_FILE));
        let result = self.last_result.as_ref().ok_or(Error::NoResult)?;
        result.save_to_file(path, ",")?;
        Ok(Outcome::Message(format!("saved result to {}", path.display())))
    }

    pub fn load_sql(&mut self, path: &Path) -> Result<Outcome> {
        let text = std::fs::read_to_string(path)?;
        self.active_tab_mut().set_text(text);
        self.focus = Focus::Editor;
        Ok(Outcome::Message(format!("loaded {}", path.display())))
    }

    pub fn new_tab(&mut self) -> TabId {
        let id = TabId(self.next_id);
        self.next_id += 1;
        self.tabs.insert(id, Tab::default());
        self.active = id;
        self.focus = Focus::Editor;
        id
    }

    /// Close the active tab and return the tab that is active afterwards.
    /// Closing the last tab leaves a fresh empty one.
    pub fn close_tab(&mut self) -> TabId {
        self.tabs.remove(&self.active);

        let next = self
            .tabs
            .range(..self.active)
            .next_back()
            .or_else(|| self.tabs.range(self.active..).next())
            .map(|(id, _)| *id);

        match next {
            Some(id) => {
                self.active = id;
                id
            }
            None => self.new_tab(),
        }
    }

    pub fn switch_tab(&mut self, id: TabId) -> Result<()> {
        if !self.tabs.contains_key(&id) {
            return Err(Error::UnknownTab(id));
        }
        self.active = id;
        self.focus = Focus::Editor;
        Ok(())
    }

    /// Flip help visibility and return the new state.
    pub fn toggle_help(&mut self) -> bool {
        self.help_visible = !self.help_visible;
        self.focus = if self.help_visible {
            Focus::Help
        } else {
            Focus::Editor
        };
        self.help_visible
    }
}
