//! Message identifiers (RFC 2822 section 3.6.4).
//!
//! ```text
//! msg-id          = [CFWS] "<" id-left "@" id-right ">" [CFWS]
//! id-left         = dot-atom-text / no-fold-quote / obs-id-left
//! id-right        = dot-atom-text / no-fold-literal / obs-id-right
//! no-fold-quote   = DQUOTE *(qtext / quoted-pair) DQUOTE
//! no-fold-literal = "[" *(dtext / quoted-pair) "]"
//! ```

use std::fmt;

use crate::abnf::combinator::{alt, map, recognize};
use crate::abnf::core_rules::{DTEXT, QTEXT};
use crate::abnf::literal::literal;
use crate::address::{domain, local_part};
use crate::atom::{dot_atom_text, phrase};
use crate::cursor::{Cursor, PResult};
use crate::quoted::{opt_cfws, quoted_pair};

/// A message identifier, `<left@right>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageId {
    /// Part before the `@`.
    pub left: String,
    /// Part after the `@`.
    pub right: String,
}

impl MessageId {
    /// Creates an identifier from its two halves.
    #[must_use]
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}@{}>", self.left, self.right)
    }
}

/// Matches one message identifier, including surrounding CFWS.
///
/// # Errors
///
/// Fails if there is no `<`, or the identifier inside is malformed.
pub fn msg_id(input: Cursor<'_>) -> PResult<'_, MessageId> {
    let ((), cursor) = opt_cfws(input)?;
    let (_, cursor) = literal("<")(cursor).map_err(|e| e.relabel("message id"))?;
    let (id, cursor) = alt((strict_id, obs_id))(cursor)?;
    let ((), cursor) = opt_cfws(cursor)?;
    Ok((id, cursor))
}

// Both halves run through the closing ">" so that a strict prefix match
// cannot hide the obsolete form.
fn strict_id(input: Cursor<'_>) -> PResult<'_, MessageId> {
    let (left, cursor) = alt((map(dot_atom_text, str::to_string), no_fold_quote))(input)?;
    let (_, cursor) = literal("@")(cursor)?;
    let (right, cursor) = alt((map(dot_atom_text, str::to_string), no_fold_literal))(cursor)?;
    let (_, cursor) = closing(cursor)?;
    Ok((MessageId { left, right }, cursor))
}

fn obs_id(input: Cursor<'_>) -> PResult<'_, MessageId> {
    let (left, cursor) = local_part(input)?;
    let (_, cursor) = literal("@")(cursor)?;
    let (right, cursor) = domain(cursor)?;
    let (_, cursor) = closing(cursor)?;
    Ok((MessageId { left, right }, cursor))
}

fn closing(input: Cursor<'_>) -> PResult<'_, &str> {
    literal(">")(input).map_err(|e| e.relabel("closing angle bracket"))
}

fn no_fold_quote(input: Cursor<'_>) -> PResult<'_, String> {
    map(recognize(quoted_body('"', '"', |c| QTEXT.contains(c))), str::to_string)(input)
}

fn no_fold_literal(input: Cursor<'_>) -> PResult<'_, String> {
    map(recognize(quoted_body('[', ']', |c| DTEXT.contains(c))), str::to_string)(input)
}

fn quoted_body<'a>(
    open: char,
    close: char,
    allowed: impl Fn(char) -> bool,
) -> impl Fn(Cursor<'a>) -> PResult<'a, ()> {
    move |input| {
        let mut cursor = match input.next_char() {
            Some((c, rest)) if c == open => rest,
            _ => return Err(input.fail("identifier")),
        };
        loop {
            match cursor.next_char() {
                Some((c, rest)) if c == close => return Ok(((), rest)),
                Some((c, rest)) if allowed(c) => cursor = rest,
                Some(('\\', _)) => {
                    let (_, rest) = quoted_pair(cursor)?;
                    cursor = rest;
                }
                _ => return Err(cursor.fail("identifier")),
            }
        }
    }
}

/// Matches one or more message identifiers.
///
/// # Errors
///
/// Fails if no identifier is present.
pub fn msg_id_list(input: Cursor<'_>) -> PResult<'_, Vec<MessageId>> {
    let (first, mut cursor) = msg_id(input)?;
    let mut ids = vec![first];
    loop {
        match msg_id(cursor) {
            Ok((id, rest)) => {
                ids.push(id);
                cursor = rest;
            }
            Err(e) if !e.is_recoverable() || e.position() > cursor.position() => return Err(e),
            Err(_) => break,
        }
    }
    Ok((ids, cursor))
}

/// Matches the obsolete `In-Reply-To`/`References` syntax: identifiers
/// mixed with phrases. Phrases are skipped.
///
/// # Errors
///
/// Fails if the value contains no identifier, or an identifier is
/// malformed.
pub fn references(input: Cursor<'_>) -> PResult<'_, Vec<MessageId>> {
    let mut ids = Vec::new();
    let mut cursor = input;
    loop {
        let ((), start) = opt_cfws(cursor)?;
        match msg_id(start) {
            Ok((id, rest)) => {
                ids.push(id);
                cursor = rest;
                continue;
            }
            Err(e) if !e.is_recoverable() || e.position() > start.position() => return Err(e),
            Err(_) => {}
        }
        match phrase(start) {
            Ok((_, rest)) => cursor = rest,
            Err(e) if !e.is_recoverable() => return Err(e),
            Err(_) => {
                cursor = start;
                break;
            }
        }
    }
    if ids.is_empty() {
        return Err(input.fail("message id"));
    }
    Ok((ids, cursor))
}
