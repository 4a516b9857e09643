//! Resolves which statement of a multi-statement buffer sits under the caret.

use std::fmt;

/// A caret or boundary position, zero based. Lines are counted by `\n` and
/// the column restarts at 0 after every newline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(line: usize, col: usize) -> Self {
        Position { line, col }
    }

    fn advance(&mut self, ch: char) {
        if ch == '\n' {
            self.line += 1;
            self.col = 0;
        } else {
            self.col += 1;
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Half-open `[start, end)` highlight range of a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub const fn new(start: Position, end: Position) -> Self {
        Span { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// The statement found under the caret.
///
/// `text` still carries the padding space appended during the scan, so trim
/// it before handing it to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Located {
    pub index: Option<usize>,
    pub text: String,
    pub span: Span,
}

impl Located {
    pub fn is_found(&self) -> bool {
        self.index.is_some()
    }
}

/// Find the segment that contains `cursor`.
///
/// Each segment gets one trailing space, standing in for the terminator that
/// followed it, so a caret sitting on the `;` lands in the statement before it.
/// The running position carries across segments. While a segment has shown
/// only whitespace, its highlight start keeps moving forward, so a caret on a
/// blank line between statements belongs to the next statement.
pub fn locate<S: AsRef<str>>(segments: &[S], cursor: Position) -> Located {
    let mut pos = Position::default();

    for (index, segment) in segments.iter().enumerate() {
        let padded = format!("{} ", segment.as_ref());
        let mut start = pos;
        let mut seen_token = false;
        let mut found = false;

        for ch in padded.chars() {
            if pos == cursor {
                found = true;
            }

            pos.advance(ch);

            if !ch.is_whitespace() {
                seen_token = true;
            }
            if !seen_token {
                start = pos;
            }
        }

        if found {
            return Located {
                index: Some(index),
                text: padded,
                span: Span::new(start, pos),
            };
        }
    }

    Located::default()
}
