//! Atoms, words, phrases and unstructured text.

use crate::abnf::combinator::{alt, label, map, recognize};
use crate::abnf::core_rules::{ATEXT, UTEXT};
use crate::abnf::literal::literal;
use crate::cursor::{Cursor, PResult};
use crate::folding::fws;
use crate::quoted::{QuotedString, opt_cfws, quoted_string};

/// A `word`: an atom or a quoted string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Word<'a> {
    /// Atom text as written.
    Atom(&'a str),
    /// Quoted string with escapes resolved.
    Quoted(QuotedString),
}

impl Word<'_> {
    /// Semantic content: atom text, or the unquoted string.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Atom(text) => text,
            Self::Quoted(quoted) => quoted.as_str(),
        }
    }

    /// Canonical written form: quoted strings keep their quotes.
    #[must_use]
    pub fn canonical(&self) -> String {
        match self {
            Self::Atom(text) => (*text).to_string(),
            Self::Quoted(quoted) => quoted.to_string(),
        }
    }
}

/// Matches `atom = [CFWS] 1*atext [CFWS]` and returns the atext.
///
/// # Errors
///
/// Fails if no atom character is present.
pub fn atom(input: Cursor<'_>) -> PResult<'_, &str> {
    let ((), cursor) = opt_cfws(input)?;
    let (text, cursor) = ATEXT.parse_run(cursor).map_err(|e| e.relabel("atom"))?;
    let ((), cursor) = opt_cfws(cursor)?;
    Ok((text, cursor))
}

/// Matches `dot-atom-text = 1*atext *("." 1*atext)`.
///
/// # Errors
///
/// Fails if the text does not start with an atom character.
pub fn dot_atom_text(input: Cursor<'_>) -> PResult<'_, &str> {
    label("dot-atom", recognize(dot_atom_parts))(input)
}

fn dot_atom_parts(input: Cursor<'_>) -> PResult<'_, ()> {
    let (_, mut cursor) = ATEXT.parse_run(input)?;
    while let Ok((_, after_dot)) = literal(".")(cursor) {
        match ATEXT.parse_run(after_dot) {
            Ok((_, rest)) => cursor = rest,
            Err(e) if !e.is_recoverable() => return Err(e),
            Err(_) => break,
        }
    }
    Ok(((), cursor))
}

/// Matches `dot-atom = [CFWS] dot-atom-text [CFWS]`.
///
/// # Errors
///
/// Fails if no dot-atom text is present.
pub fn dot_atom(input: Cursor<'_>) -> PResult<'_, &str> {
    let ((), cursor) = opt_cfws(input)?;
    let (text, cursor) = dot_atom_text(cursor)?;
    let ((), cursor) = opt_cfws(cursor)?;
    Ok((text, cursor))
}

/// Matches `word = atom / quoted-string`.
///
/// # Errors
///
/// Fails if neither alternative matches.
pub fn word(input: Cursor<'_>) -> PResult<'_, Word<'_>> {
    label("word", alt((map(atom, Word::Atom), map(quoted_string, Word::Quoted))))(input)
}

enum PhrasePiece {
    Word(String),
    Dot,
}

fn phrase_piece(input: Cursor<'_>) -> PResult<'_, PhrasePiece> {
    alt((
        map(word, |w| PhrasePiece::Word(w.text().to_string())),
        obs_dot,
    ))(input)
}

fn obs_dot(input: Cursor<'_>) -> PResult<'_, PhrasePiece> {
    let (_, cursor) = literal(".")(input)?;
    let ((), cursor) = opt_cfws(cursor)?;
    Ok((PhrasePiece::Dot, cursor))
}

/// Matches a phrase, including the obsolete form with unquoted dots.
///
/// Returns the words separated by single spaces, quoted words unquoted, and
/// dots attached to the preceding word (`John Q. Public`).
///
/// # Errors
///
/// Fails if the phrase does not start with a word.
pub fn phrase(input: Cursor<'_>) -> PResult<'_, String> {
    let (first, mut cursor) = word(input).map_err(|e| e.relabel("phrase"))?;
    let mut text = first.text().to_string();
    loop {
        let (piece, rest) = match phrase_piece(cursor) {
            Ok(matched) => matched,
            Err(e) if !e.is_recoverable() => return Err(e),
            Err(_) => break,
        };
        match piece {
            PhrasePiece::Word(w) => {
                text.push(' ');
                text.push_str(&w);
            }
            PhrasePiece::Dot => text.push('.'),
        }
        cursor = rest;
    }
    Ok((text, cursor))
}

/// Matches `unstructured = *([FWS] utext) [FWS]`.
///
/// Folds are removed and leading and trailing whitespace is trimmed.
///
/// # Errors
///
/// Never fails; it may match nothing.
pub fn unstructured(input: Cursor<'_>) -> PResult<'_, String> {
    let mut text = String::new();
    let mut cursor = input;
    loop {
        let before = cursor.position();
        if let Ok((ws, rest)) = fws(cursor) {
            text.push_str(&ws);
            cursor = rest;
        }
        if let Ok((run, rest)) = UTEXT.parse_run(cursor) {
            text.push_str(run);
            cursor = rest;
        }
        if cursor.position() == before {
            break;
        }
    }
    Ok((text.trim_matches([' ', '\t']).to_string(), cursor))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_atom_skips_cfws() {
        let (text, rest) = atom(Cursor::new(" (c) john (d) <")).unwrap();
        assert_eq!(text, "john");
        assert_eq!(rest.rest(), "<");
    }

    #[test]
    fn test_dot_atom_text() {
        let (text, rest) = dot_atom_text(Cursor::new("a.b.c@x")).unwrap();
        assert_eq!(text, "a.b.c");
        assert_eq!(rest.rest(), "@x");
    }

    #[test]
    fn test_dot_atom_text_trailing_dot() {
        let (text, rest) = dot_atom_text(Cursor::new("a.b.@x")).unwrap();
        assert_eq!(text, "a.b");
        assert_eq!(rest.rest(), ".@x");
    }

    #[test]
    fn test_word_quoted() {
        let (w, _) = word(Cursor::new("\"Joe Q.\"")).unwrap();
        assert_eq!(w.text(), "Joe Q.");
        assert_eq!(w.canonical(), "\"Joe Q.\"");
    }

    #[test]
    fn test_phrase() {
        let (text, rest) = phrase(Cursor::new("Mary  Smith <")).unwrap();
        assert_eq!(text, "Mary Smith");
        assert_eq!(rest.rest(), "<");
    }

    #[test]
    fn test_obs_phrase_dot() {
        let (text, _) = phrase(Cursor::new("John Q. Public <")).unwrap();
        assert_eq!(text, "John Q. Public");
    }

    #[test]
    fn test_phrase_mixed_quoting() {
        let (text, _) = phrase(Cursor::new("\"Giant; \\\"Big\\\" Box\" Inc <")).unwrap();
        assert_eq!(text, "Giant; \"Big\" Box Inc");
    }

    #[test]
    fn test_unstructured() {
        let (text, rest) = unstructured(Cursor::new(" Hello,\r\n  world! ")).unwrap();
        assert_eq!(text, "Hello,  world!");
        assert!(rest.is_eof());
    }

    #[test]
    fn test_unstructured_stops_at_bare_break() {
        let (text, rest) = unstructured(Cursor::new("Hi\r\nTo: x")).unwrap();
        assert_eq!(text, "Hi");
        assert_eq!(rest.rest(), "\r\nTo: x");
    }
}
