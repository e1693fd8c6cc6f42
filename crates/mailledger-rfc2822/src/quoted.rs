//! Quoted strings, comments and CFWS.
//!
//! ```text
//! quoted-pair   = "\" (any character except CR and LF)
//! quoted-string = [CFWS] DQUOTE *([FWS] (qtext / quoted-pair)) [FWS] DQUOTE [CFWS]
//! comment       = "(" *([FWS] (ctext / quoted-pair / comment)) [FWS] ")"
//! CFWS          = *([FWS] comment) (([FWS] comment) / FWS)
//! ```
//!
//! Comments nest; the depth is capped by
//! [`ParserConfig::max_comment_depth`](crate::ParserConfig::max_comment_depth).

use std::fmt;

use crate::abnf::core_rules::{CTEXT, QTEXT};
use crate::abnf::literal::literal;
use crate::cursor::{Cursor, PResult};
use crate::error::Error;
use crate::folding::fws;

/// Content of a quoted string with escapes resolved.
///
/// `Display` writes the canonical quoted form, escaping `\` and `"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuotedString(String);

impl QuotedString {
    /// Wraps unescaped content.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self(content.into())
    }

    /// Returns the unescaped content.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the value, returning the unescaped content.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for QuotedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for c in self.0.chars() {
            if matches!(c, '\\' | '"') {
                f.write_str("\\")?;
            }
            write!(f, "{c}")?;
        }
        f.write_str("\"")
    }
}

/// Matches a backslash-escaped character and returns the character.
///
/// # Errors
///
/// Fails if there is no backslash, or it is followed by CR, LF or nothing.
pub fn quoted_pair(input: Cursor<'_>) -> PResult<'_, char> {
    let (_, rest) = literal("\\")(input).map_err(|e| e.relabel("quoted pair"))?;
    match rest.next_char() {
        Some((c, after)) if !matches!(c, '\r' | '\n') => Ok((c, after)),
        _ => Err(rest.fail("quoted pair")),
    }
}

/// Matches a quoted string, including surrounding CFWS.
///
/// Folds inside the quotes are unfolded; the whitespace is kept.
///
/// # Errors
///
/// Fails if there is no opening quote, or with `"closing quote"` if the
/// string is not terminated.
pub fn quoted_string(input: Cursor<'_>) -> PResult<'_, QuotedString> {
    let ((), cursor) = opt_cfws(input)?;
    let (_, mut cursor) = literal("\"")(cursor).map_err(|e| e.relabel("quoted string"))?;
    let mut content = String::new();
    loop {
        if let Ok((ws, rest)) = fws(cursor) {
            content.push_str(&ws);
            cursor = rest;
        }
        if let Ok((run, rest)) = QTEXT.parse_run(cursor) {
            content.push_str(run);
            cursor = rest;
        } else if let Ok((c, rest)) = quoted_pair(cursor) {
            content.push(c);
            cursor = rest;
        } else {
            break;
        }
    }
    let (_, cursor) = literal("\"")(cursor).map_err(|e| e.relabel("closing quote"))?;
    let ((), cursor) = opt_cfws(cursor)?;
    Ok((QuotedString(content), cursor))
}

/// Matches one comment, including any nested comments.
///
/// # Errors
///
/// Fails if there is no opening parenthesis, with `"closing parenthesis"`
/// if the comment is unbalanced, or with [`Error::NestingTooDeep`] past the
/// configured depth.
pub fn comment(input: Cursor<'_>) -> PResult<'_, ()> {
    comment_at(input, 0)
}

fn comment_at(input: Cursor<'_>, depth: usize) -> PResult<'_, ()> {
    let (_, mut cursor) = literal("(")(input).map_err(|e| e.relabel("comment"))?;
    let limit = input.config().max_comment_depth;
    if depth >= limit {
        return Err(Error::NestingTooDeep {
            limit,
            position: input.position(),
        });
    }
    loop {
        if let Ok((_, rest)) = fws(cursor) {
            cursor = rest;
        }
        if let Ok((_, rest)) = CTEXT.parse_run(cursor) {
            cursor = rest;
        } else if let Ok((_, rest)) = quoted_pair(cursor) {
            cursor = rest;
        } else if cursor.peek() == Some('(') {
            let ((), rest) = comment_at(cursor, depth + 1)?;
            cursor = rest;
        } else {
            break;
        }
    }
    let (_, cursor) = literal(")")(cursor).map_err(|e| e.relabel("closing parenthesis"))?;
    Ok(((), cursor))
}

/// Matches comments and folding whitespace between tokens.
///
/// # Errors
///
/// Fails if neither whitespace nor a comment starts at the cursor, or if a
/// comment is opened but malformed.
pub fn cfws(input: Cursor<'_>) -> PResult<'_, ()> {
    let mut cursor = input;
    loop {
        let before = cursor.position();
        if let Ok((_, rest)) = fws(cursor) {
            cursor = rest;
        }
        if cursor.peek() == Some('(') {
            let ((), rest) = comment(cursor)?;
            cursor = rest;
        }
        if cursor.position() == before {
            break;
        }
    }
    if cursor.position() == input.position() {
        return Err(input.fail("comment or folding whitespace"));
    }
    Ok(((), cursor))
}

/// Matches optional CFWS.
///
/// A comment that was opened but is malformed still fails, so the
/// unbalanced-parenthesis diagnostic is not lost.
///
/// # Errors
///
/// Fails only on a malformed comment.
pub fn opt_cfws(input: Cursor<'_>) -> PResult<'_, ()> {
    match cfws(input) {
        Ok(matched) => Ok(matched),
        Err(e) if e.position() > input.position() || !e.is_recoverable() => Err(e),
        Err(_) => Ok(((), input)),
    }
}
