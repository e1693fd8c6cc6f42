//! Literal string matchers.
//!
//! ABNF quoted strings are case-insensitive (RFC 2234 section 2.3), so
//! [`literal_ci`] is the default for keywords such as month names and zone
//! abbreviations; [`literal`] is for punctuation and case-sensitive text.

use crate::cursor::{Cursor, PResult};

/// Matches `text` exactly.
///
/// # Errors
///
/// Fails if the input does not start with `text`.
pub fn literal<'a>(text: &'static str) -> impl Fn(Cursor<'a>) -> PResult<'a, &'a str> {
    move |input| {
        if input.rest().starts_with(text) {
            let rest = input.advance(text.len());
            Ok((rest.since(input), rest))
        } else {
            Err(input.fail(text))
        }
    }
}

/// Matches `text` ignoring ASCII case, returning the input as written.
///
/// # Errors
///
/// Fails if the input does not start with `text` in any case.
pub fn literal_ci<'a>(text: &'static str) -> impl Fn(Cursor<'a>) -> PResult<'a, &'a str> {
    move |input| match_ci(text, input).ok_or_else(|| input.fail(text))
}

/// Matches the single character `c` ignoring ASCII case.
///
/// # Errors
///
/// Fails with `label` if the next character differs.
pub fn char_ci<'a>(c: char, label: &'static str) -> impl Fn(Cursor<'a>) -> PResult<'a, char> {
    move |input| match input.next_char() {
        Some((found, rest)) if found.eq_ignore_ascii_case(&c) => Ok((found, rest)),
        _ => Err(input.fail(label)),
    }
}

/// Matches the first of `options` that the input starts with, ignoring
/// ASCII case, and returns its index.
///
/// Order matters: list longer keywords before their prefixes.
///
/// # Errors
///
/// Fails with `name` if no option matches.
pub fn one_of_ci<'a>(
    name: &'static str,
    options: &'static [&'static str],
) -> impl Fn(Cursor<'a>) -> PResult<'a, usize> {
    move |input| {
        options
            .iter()
            .enumerate()
            .find_map(|(idx, option)| match_ci(option, input).map(|(_, rest)| (idx, rest)))
            .ok_or_else(|| input.fail(name))
    }
}

fn match_ci<'a>(text: &str, input: Cursor<'a>) -> Option<(&'a str, Cursor<'a>)> {
    let candidate = input.rest().get(..text.len())?;
    if candidate.eq_ignore_ascii_case(text) {
        Some((candidate, input.advance(text.len())))
    } else {
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_is_case_sensitive() {
        assert!(literal("GMT")(Cursor::new("GMT")).is_ok());
        assert!(literal("GMT")(Cursor::new("gmt")).is_err());
    }

    #[test]
    fn test_literal_ci_keeps_original_text() {
        let (text, rest) = literal_ci("GMT")(Cursor::new("gMt+")).unwrap();
        assert_eq!(text, "gMt");
        assert_eq!(rest.rest(), "+");
    }

    #[test]
    fn test_literal_ci_multibyte_boundary() {
        assert!(literal_ci("ab")(Cursor::new("aé")).is_err());
    }

    #[test]
    fn test_char_ci() {
        let rule = char_ci('z', "zone letter");
        assert_eq!(rule(Cursor::new("Z")).unwrap().0, 'Z');
        assert_eq!(rule(Cursor::new("y")).unwrap_err().expected(), "zone letter");
        assert!(rule(Cursor::new("")).is_err());
    }

    #[test]
    fn test_one_of_ci() {
        const OPTIONS: &[&str] = &["GMT", "UT"];
        let rule = one_of_ci("zone", OPTIONS);
        assert_eq!(rule(Cursor::new("ut")).unwrap().0, 1);
        assert_eq!(rule(Cursor::new("gmt")).unwrap().0, 0);
        assert_eq!(rule(Cursor::new("EST")).unwrap_err().expected(), "zone");
    }
}
