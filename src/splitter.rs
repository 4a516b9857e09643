//! Splits a blob of SQL text into statements.
//!
//! Splitting is purely textual: every `;` is a terminator, including one that
//! sits inside a string literal or a comment. Callers that need comments gone
//! ask for a line-oriented strip pass first.

use std::sync::LazyLock;

use regex::Regex;

static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"--[^\n]*").expect("line comment pattern is valid"));

pub const TERMINATOR: char = ';';

/// Remove every `-- ...` comment up to (not including) the end of its line.
pub fn strip_line_comments(sql: &str) -> String {
    LINE_COMMENT.replace_all(sql, "").into_owned()
}

/// Split `sql` on `;`, dropping a final segment that is empty or blank.
///
/// Segments keep their surrounding whitespace so that their character counts
/// still line up with the buffer they came from.
pub fn split_statements(sql: &str, strip_comments: bool) -> Vec<String> {
    let text = if strip_comments {
        strip_line_comments(sql)
    } else {
        sql.to_string()
    };

    let mut statements: Vec<String> = text.split(TERMINATOR).map(String::from).collect();

    if statements.last().is_some_and(|s| s.trim().is_empty()) {
        statements.pop();
    }

    statements
}

/// True when at least one statement has something other than whitespace.
pub fn has_runnable(statements: &[String]) -> bool {
    statements.iter().any(|s| !s.trim().is_empty())
}
