//! Folding whitespace.
//!
//! ```text
//! FWS  = 1*( 1*WSP / FOLD 1*WSP )
//! FOLD = CRLF                         ; Newline::Strict
//! FOLD = CRLF / LFCR / CR / LF        ; Newline::Lenient, in that order
//! ```
//!
//! A line break is only ever consumed together with the whitespace that
//! follows it, so a bare line break that ends a header is left alone.
//! Matched whitespace is returned unfolded: the line breaks are dropped and
//! the whitespace characters are kept as written.

use crate::abnf::combinator::{alt, at_least, label, many0, map};
use crate::abnf::core_rules::{WSP, crlf};
use crate::abnf::literal::literal;
use crate::config::{Newline, ParserConfig};
use crate::cursor::{Cursor, PResult};

/// Matches one line break accepted by the configured [`Newline`] mode.
///
/// # Errors
///
/// Fails if no accepted line-break sequence starts at the cursor.
pub fn line_break(input: Cursor<'_>) -> PResult<'_, &str> {
    let matched = match input.config().newline {
        Newline::Strict => crlf(input),
        Newline::Lenient => alt((
            literal("\r\n"),
            literal("\n\r"),
            literal("\r"),
            literal("\n"),
        ))(input),
    };
    matched.map_err(|e| e.relabel("line break"))
}

/// Matches folding whitespace and returns it unfolded.
///
/// # Errors
///
/// Fails unless at least one whitespace character is present.
pub fn fws(input: Cursor<'_>) -> PResult<'_, String> {
    label("folding whitespace", map(at_least(1, whitespace_run), concat))(input)
}

/// Matches RFC 2234 `LWSP`, which may be empty.
///
/// # Errors
///
/// Never fails on well-formed cursors.
pub fn lwsp(input: Cursor<'_>) -> PResult<'_, String> {
    map(many0(whitespace_run), concat)(input)
}

/// Removes every line break that is followed by whitespace.
///
/// This is RFC 2822 unfolding (section 2.2.3); other line breaks are kept.
#[must_use]
pub fn unfold(text: &str, config: &ParserConfig) -> String {
    let mut unfolded = String::with_capacity(text.len());
    let mut cursor = Cursor::with_config(text, config);
    while let Some((c, next)) = cursor.next_char() {
        match line_break(cursor) {
            Ok((_, after)) if after.peek().is_some_and(|c| WSP.contains(c)) => {
                cursor = after;
                continue;
            }
            _ => {}
        }
        unfolded.push(c);
        cursor = next;
    }
    unfolded
}

fn whitespace_run(input: Cursor<'_>) -> PResult<'_, &str> {
    alt((plain_run, folded_run))(input)
}

fn plain_run(input: Cursor<'_>) -> PResult<'_, &str> {
    WSP.parse_run(input)
}

fn folded_run(input: Cursor<'_>) -> PResult<'_, &str> {
    let (_, rest) = line_break(input)?;
    WSP.parse_run(rest)
}

fn concat(runs: Vec<&str>) -> String {
    runs.concat()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_fws_single_line() {
        let (ws, rest) = fws(Cursor::new(" \t x")).unwrap();
        assert_eq!(ws, " \t ");
        assert_eq!(rest.rest(), "x");
    }

    #[test]
    fn test_fws_folded() {
        let (ws, rest) = fws(Cursor::new("  \r\n\tx")).unwrap();
        assert_eq!(ws, "  \t");
        assert_eq!(rest.rest(), "x");
    }

    #[test]
    fn test_fws_multiple_folds() {
        let (ws, rest) = fws(Cursor::new("\r\n \r\n  x")).unwrap();
        assert_eq!(ws, "   ");
        assert_eq!(rest.rest(), "x");
    }

    #[test]
    fn test_fws_leaves_bare_line_break() {
        let (ws, rest) = fws(Cursor::new(" \r\nNext: x")).unwrap();
        assert_eq!(ws, " ");
        assert_eq!(rest.rest(), "\r\nNext: x");
        assert!(fws(Cursor::new("\r\nNext")).is_err());
    }

    #[test]
    fn test_fws_requires_whitespace() {
        let err = fws(Cursor::new("x")).unwrap_err();
        assert_eq!(err.expected(), "folding whitespace");
        assert_eq!(err.position(), 0);
    }

    #[test]
    fn test_strict_rejects_bare_lf() {
        assert!(fws(Cursor::new("\n x")).is_err());
    }

    #[test]
    fn test_lenient_newlines() {
        let config = ParserConfig::stored();
        for text in ["\r\n x", "\n\r x", "\r x", "\n x"] {
            let (ws, rest) = fws(Cursor::with_config(text, &config)).unwrap();
            assert_eq!(ws, " ", "input {text:?}");
            assert_eq!(rest.rest(), "x");
        }
    }

    #[test]
    fn test_lwsp_may_be_empty() {
        let (ws, rest) = lwsp(Cursor::new("x")).unwrap();
        assert!(ws.is_empty());
        assert_eq!(rest.position(), 0);
    }

    #[test]
    fn test_unfold() {
        let config = ParserConfig::default();
        assert_eq!(
            unfold("Subject: hello\r\n world\r\nTo: x", &config),
            "Subject: hello world\r\nTo: x"
        );
        assert_eq!(unfold("a\n b", &config), "a\n b");
        assert_eq!(unfold("a\n b", &ParserConfig::stored()), "a b");
    }
}
