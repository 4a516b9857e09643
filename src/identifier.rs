//! Table identifier checks and quoting.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

static PLAIN_IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]+$").expect("identifier pattern is valid")
});

/// Capability to ask the engine whether a word is reserved.
pub trait ReservedWords {
    /// `name` is passed already lower-cased.
    fn is_reserved_word(&self, name: &str) -> bool;
}

impl<T: ReservedWords + ?Sized> ReservedWords for &T {
    fn is_reserved_word(&self, name: &str) -> bool {
        (**self).is_reserved_word(name)
    }
}

/// A fixed keyword list, for callers that have no engine at hand.
impl ReservedWords for [&str] {
    fn is_reserved_word(&self, name: &str) -> bool {
        self.iter().any(|word| word.eq_ignore_ascii_case(name))
    }
}

/// Whether `name` must be wrapped in double quotes to be used as a table name.
///
/// Single character names are flagged along with names that start with a
/// digit or symbol, contain anything besides letters, digits and `_`, or
/// collide with a reserved keyword.
pub fn needs_quoting<R: ReservedWords + ?Sized>(name: &str, reserved: &R) -> bool {
    if !PLAIN_IDENTIFIER.is_match(name) {
        return true;
    }

    reserved.is_reserved_word(&name.to_lowercase())
}

/// Wrap `name` in double quotes.
///
/// Embedded quotes are rejected instead of escaped.
pub fn quote(name: &str) -> Result<String> {
    if name.contains('"') {
        return Err(Error::UnsupportedIdentifier(name.to_string()));
    }
    Ok(format!("\"{}\"", name))
}
