//! Generic combinators over rules.
//!
//! A rule is any `Fn(Cursor<'a>) -> PResult<'a, T>`. Combinators take rules
//! and return new rules, so repetition and alternation are written once for
//! every value type instead of as ad hoc loops in each grammar production.
//!
//! Because cursors are immutable, a failed rule never leaks partial
//! consumption: the caller still holds the cursor it started from.

use crate::cursor::{Cursor, PResult};

/// Matches `rule` exactly `n` times in a row.
///
/// # Errors
///
/// Fails with the first failing repetition if fewer than `n` matches are
/// available.
pub fn exactly<'a, T, P>(n: usize, rule: P) -> impl Fn(Cursor<'a>) -> PResult<'a, Vec<T>>
where
    P: Fn(Cursor<'a>) -> PResult<'a, T>,
{
    move |input| repeat_exactly(n, &rule, input)
}

/// Matches `rule` at least `n` times, then as many more times as possible.
///
/// # Errors
///
/// Fails if fewer than `n` matches are available.
pub fn at_least<'a, T, P>(n: usize, rule: P) -> impl Fn(Cursor<'a>) -> PResult<'a, Vec<T>>
where
    P: Fn(Cursor<'a>) -> PResult<'a, T>,
{
    move |input| {
        let (mut items, rest) = repeat_exactly(n, &rule, input)?;
        let (more, rest) = repeat_up_to(usize::MAX, &rule, rest)?;
        items.extend(more);
        Ok((items, rest))
    }
}

/// Matches `rule` between `n` and `m` times, preferring the longest count.
///
/// Bounds with `n > m` match the empty sequence without consuming input.
///
/// # Errors
///
/// Fails if fewer than `n` matches are available.
pub fn between<'a, T, P>(n: usize, m: usize, rule: P) -> impl Fn(Cursor<'a>) -> PResult<'a, Vec<T>>
where
    P: Fn(Cursor<'a>) -> PResult<'a, T>,
{
    move |input| {
        if n > m {
            return Ok((Vec::new(), input));
        }
        if n == m {
            return repeat_exactly(n, &rule, input);
        }
        let (mut items, rest) = repeat_exactly(n, &rule, input)?;
        let (more, rest) = repeat_up_to(m - n, &rule, rest)?;
        items.extend(more);
        Ok((items, rest))
    }
}

/// Matches `rule` zero or more times.
///
/// # Errors
///
/// Only propagates unrecoverable failures.
pub fn many0<'a, T, P>(rule: P) -> impl Fn(Cursor<'a>) -> PResult<'a, Vec<T>>
where
    P: Fn(Cursor<'a>) -> PResult<'a, T>,
{
    move |input| repeat_up_to(usize::MAX, &rule, input)
}

/// Matches `rule` one or more times.
///
/// # Errors
///
/// Fails if `rule` does not match at least once.
pub fn many1<'a, T, P>(rule: P) -> impl Fn(Cursor<'a>) -> PResult<'a, Vec<T>>
where
    P: Fn(Cursor<'a>) -> PResult<'a, T>,
{
    at_least(1, rule)
}

/// Matches `rule` if possible, otherwise succeeds with `None` at the start.
///
/// # Errors
///
/// Only propagates unrecoverable failures.
pub fn opt<'a, T, P>(rule: P) -> impl Fn(Cursor<'a>) -> PResult<'a, Option<T>>
where
    P: Fn(Cursor<'a>) -> PResult<'a, T>,
{
    move |input| match rule(input) {
        Ok((value, rest)) => Ok((Some(value), rest)),
        Err(e) if !e.is_recoverable() => Err(e),
        Err(_) => Ok((None, input)),
    }
}

/// Transforms the value of a successful match.
///
/// # Errors
///
/// Propagates failures of `rule`.
pub fn map<'a, T, U, P, F>(rule: P, f: F) -> impl Fn(Cursor<'a>) -> PResult<'a, U>
where
    P: Fn(Cursor<'a>) -> PResult<'a, T>,
    F: Fn(T) -> U,
{
    move |input| rule(input).map(|(value, rest)| (f(value), rest))
}

/// Returns the text consumed by `rule` instead of its value.
///
/// # Errors
///
/// Propagates failures of `rule`.
pub fn recognize<'a, T, P>(rule: P) -> impl Fn(Cursor<'a>) -> PResult<'a, &'a str>
where
    P: Fn(Cursor<'a>) -> PResult<'a, T>,
{
    move |input| rule(input).map(|(_, rest)| (rest.since(input), rest))
}

/// Names a rule for error reporting.
///
/// The failure keeps the offset the inner rule reached.
///
/// # Errors
///
/// Propagates failures of `rule` under the new label.
pub fn label<'a, T, P>(name: &'static str, rule: P) -> impl Fn(Cursor<'a>) -> PResult<'a, T>
where
    P: Fn(Cursor<'a>) -> PResult<'a, T>,
{
    move |input| rule(input).map_err(|e| e.relabel(name))
}

/// Ordered choice between the rules of a tuple.
///
/// Each alternative is started from the same cursor; the first that matches
/// wins. If all fail, the failure that reached furthest is reported.
///
/// # Errors
///
/// Fails if no alternative matches, or as soon as one fails unrecoverably.
pub fn alt<'a, T, A>(alternatives: A) -> impl Fn(Cursor<'a>) -> PResult<'a, T>
where
    A: Alt<'a, T>,
{
    move |input| alternatives.choose(input)
}

/// A tuple of rules producing the same value type.
pub trait Alt<'a, T> {
    /// Tries each rule in order.
    ///
    /// # Errors
    ///
    /// Fails if no rule matches.
    fn choose(&self, input: Cursor<'a>) -> PResult<'a, T>;
}

macro_rules! impl_alt {
    ($($rule:ident $idx:tt),+) => {
        impl<'a, T, $($rule),+> Alt<'a, T> for ($($rule,)+)
        where
            $($rule: Fn(Cursor<'a>) -> PResult<'a, T>),+
        {
            fn choose(&self, input: Cursor<'a>) -> PResult<'a, T> {
                let mut failure = input.fail("alternative");
                $(
                    match (self.$idx)(input) {
                        Ok(matched) => return Ok(matched),
                        Err(e) if !e.is_recoverable() => return Err(e),
                        Err(e) => failure = failure.furthest(e),
                    }
                )+
                Err(failure)
            }
        }
    };
}

impl_alt!(A 0, B 1);
impl_alt!(A 0, B 1, C 2);
impl_alt!(A 0, B 1, C 2, D 3);
impl_alt!(A 0, B 1, C 2, D 3, E 4);
impl_alt!(A 0, B 1, C 2, D 3, E 4, F 5);

fn repeat_exactly<'a, T, P>(n: usize, rule: &P, input: Cursor<'a>) -> PResult<'a, Vec<T>>
where
    P: Fn(Cursor<'a>) -> PResult<'a, T>,
{
    let mut items = Vec::with_capacity(n.min(16));
    let mut cursor = input;
    for _ in 0..n {
        let (item, rest) = rule(cursor)?;
        items.push(item);
        cursor = rest;
    }
    Ok((items, cursor))
}

// Rules are pure functions of the cursor, so "try `max` matches, then
// `max - 1`, ... down to zero" accepts exactly the longest run of
// consecutive matches capped at `max`. Collecting that run directly gives
// the same result without re-running the rule for every count.
fn repeat_up_to<'a, T, P>(max: usize, rule: &P, input: Cursor<'a>) -> PResult<'a, Vec<T>>
where
    P: Fn(Cursor<'a>) -> PResult<'a, T>,
{
    let mut items = Vec::new();
    let mut cursor = input;
    while items.len() < max {
        match rule(cursor) {
            Ok((item, rest)) => {
                let progressed = rest.position() > cursor.position();
                items.push(item);
                cursor = rest;
                if !progressed {
                    break;
                }
            }
            Err(e) if !e.is_recoverable() => return Err(e),
            Err(_) => break,
        }
    }
    Ok((items, cursor))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::abnf::core_rules::{alpha, digit};

    #[test]
    fn test_exactly() {
        let (digits, rest) = exactly(2, digit)(Cursor::new("123")).unwrap();
        assert_eq!(digits, vec!['1', '2']);
        assert_eq!(rest.rest(), "3");
    }

    #[test]
    fn test_exactly_too_few() {
        let input = Cursor::new("1a");
        let err = exactly(2, digit)(input).unwrap_err();
        assert_eq!(err.position(), 1);
        assert_eq!(input.position(), 0);
    }

    #[test]
    fn test_exactly_zero() {
        let (digits, rest) = exactly(0, digit)(Cursor::new("x")).unwrap();
        assert!(digits.is_empty());
        assert_eq!(rest.position(), 0);
    }

    #[test]
    fn test_at_least() {
        let (digits, rest) = at_least(1, digit)(Cursor::new("2024-")).unwrap();
        assert_eq!(digits.len(), 4);
        assert_eq!(rest.rest(), "-");
        assert!(at_least(1, digit)(Cursor::new("-")).is_err());
    }

    #[test]
    fn test_between_longest_first() {
        let (digits, rest) = between(0, 2, digit)(Cursor::new("1234")).unwrap();
        assert_eq!(digits.len(), 2);
        assert_eq!(rest.rest(), "34");

        let (digits, _) = between(2, 4, digit)(Cursor::new("123")).unwrap();
        assert_eq!(digits.len(), 3);

        assert!(between(2, 4, digit)(Cursor::new("1x")).is_err());
    }

    #[test]
    fn test_between_equal_bounds() {
        let (digits, rest) = between(3, 3, digit)(Cursor::new("12345")).unwrap();
        assert_eq!(digits.len(), 3);
        assert_eq!(rest.rest(), "45");
    }

    #[test]
    fn test_between_inverted_bounds_is_empty() {
        let (digits, rest) = between(3, 1, digit)(Cursor::new("12345")).unwrap();
        assert!(digits.is_empty());
        assert_eq!(rest.position(), 0);
    }

    #[test]
    fn test_opt() {
        let (value, rest) = opt(digit)(Cursor::new("x")).unwrap();
        assert_eq!(value, None);
        assert_eq!(rest.position(), 0);
    }

    #[test]
    fn test_alt_ordered() {
        let rule = alt((map(digit, |_| 1), map(alpha, |_| 2)));
        assert_eq!(rule(Cursor::new("a")).unwrap().0, 2);
        assert_eq!(rule(Cursor::new("5")).unwrap().0, 1);
    }

    #[test]
    fn test_alt_reports_furthest() {
        let two_digits = exactly(2, digit);
        let rule = alt((map(&two_digits, |_| ()), map(alpha, |_| ())));
        let err = rule(Cursor::new("1-")).unwrap_err();
        assert_eq!(err.position(), 1);
    }

    #[test]
    fn test_recognize_and_label() {
        let (text, _) = recognize(many1(digit))(Cursor::new("42abc")).unwrap();
        assert_eq!(text, "42");
        let err = label("year", many1(digit))(Cursor::new("abc")).unwrap_err();
        assert_eq!(err.expected(), "year");
    }
}
