//! Immutable input cursor.
//!
//! A [`Cursor`] is a position inside a borrowed input string plus the
//! configuration of the running parse. It is `Copy` and never mutated in
//! place: every rule takes a cursor by value and hands back a new one on
//! success. Backtracking is therefore just reusing the cursor a failed
//! alternative was started from.

use crate::config::ParserConfig;
use crate::error::Error;

static DEFAULT_CONFIG: ParserConfig = ParserConfig::DEFAULT;

/// Outcome of applying a rule: the matched value and the cursor after it.
pub type PResult<'a, T> = Result<(T, Cursor<'a>), Error>;

/// Read-only view of the remaining input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'a> {
    input: &'a str,
    pos: usize,
    config: &'a ParserConfig,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at the start of `input` with the strict configuration.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self::with_config(input, &DEFAULT_CONFIG)
    }

    /// Creates a cursor at the start of `input` with the given configuration.
    #[must_use]
    pub const fn with_config(input: &'a str, config: &'a ParserConfig) -> Self {
        Self {
            input,
            pos: 0,
            config,
        }
    }

    /// Byte offset from the start of the input.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// The whole input this cursor walks over.
    #[must_use]
    pub const fn input(&self) -> &'a str {
        self.input
    }

    /// Configuration of the running parse.
    #[must_use]
    pub const fn config(&self) -> &'a ParserConfig {
        self.config
    }

    /// Input that has not been consumed yet.
    #[must_use]
    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Returns true if all input has been consumed.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Peeks at the next character.
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consumes one character.
    #[must_use]
    pub fn next_char(self) -> Option<(char, Self)> {
        let c = self.peek()?;
        Some((c, self.advance(c.len_utf8())))
    }

    /// Moves forward by `len` bytes, clamped to the end of input.
    ///
    /// `len` must land on a character boundary.
    #[must_use]
    pub fn advance(self, len: usize) -> Self {
        Self {
            pos: (self.pos + len).min(self.input.len()),
            ..self
        }
    }

    /// Text consumed between `start` and this cursor.
    #[must_use]
    pub fn since(&self, start: Self) -> &'a str {
        &self.input[start.pos..self.pos]
    }

    /// Builds the failure for `expected` at this position.
    ///
    /// Reports [`Error::UnexpectedEnd`] when nothing is left to read.
    #[must_use]
    pub const fn fail(&self, expected: &'static str) -> Error {
        if self.is_eof() {
            Error::UnexpectedEnd {
                expected,
                position: self.pos,
            }
        } else {
            Error::GrammarMismatch {
                expected,
                position: self.pos,
            }
        }
    }

    /// One-based line and column of this position.
    ///
    /// Lines are counted by LF; columns count characters.
    #[must_use]
    pub fn location(&self) -> (usize, usize) {
        let consumed = &self.input[..self.pos];
        let line = consumed.matches('\n').count() + 1;
        let line_start = consumed.rfind('\n').map_or(0, |i| i + 1);
        let column = consumed[line_start..].chars().count() + 1;
        (line, column)
    }
}
