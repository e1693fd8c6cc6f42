//! Character classes.
//!
//! The RFC 2234 core rules (section 6.1) and the RFC 2822 primitive
//! classes, each as a [`CharClass`]: a pure predicate plus the label used
//! in error messages. Every class matcher consumes at most one character.

use crate::cursor::{Cursor, PResult};

/// A single-character predicate with a human-readable label.
#[derive(Clone, Copy)]
pub struct CharClass {
    label: &'static str,
    test: fn(char) -> bool,
}

impl CharClass {
    /// Creates a character class.
    #[must_use]
    pub const fn new(label: &'static str, test: fn(char) -> bool) -> Self {
        Self { label, test }
    }

    /// Label used in error messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        self.label
    }

    /// Returns true if `c` belongs to the class.
    #[must_use]
    pub fn contains(self, c: char) -> bool {
        (self.test)(c)
    }

    /// Matches one character of the class.
    ///
    /// # Errors
    ///
    /// Fails without consuming anything if the next character is not in the
    /// class or the input is exhausted.
    pub fn parse(self, input: Cursor<'_>) -> PResult<'_, char> {
        match input.next_char() {
            Some((c, rest)) if self.contains(c) => Ok((c, rest)),
            _ => Err(input.fail(self.label)),
        }
    }

    /// Matches one or more characters of the class and returns the run.
    ///
    /// # Errors
    ///
    /// Fails if not even one character matches.
    pub fn parse_run(self, input: Cursor<'_>) -> PResult<'_, &str> {
        let len = input
            .rest()
            .char_indices()
            .find(|&(_, c)| !self.contains(c))
            .map_or_else(|| input.rest().len(), |(i, _)| i);
        if len == 0 {
            return Err(input.fail(self.label));
        }
        let rest = input.advance(len);
        Ok((rest.since(input), rest))
    }
}

impl std::fmt::Debug for CharClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CharClass").field(&self.label).finish()
    }
}

const fn code(c: char) -> u32 {
    c as u32
}

const fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic()
}

const fn is_bit(c: char) -> bool {
    matches!(c, '0' | '1')
}

const fn is_char(c: char) -> bool {
    matches!(code(c), 1..=127)
}

const fn is_cr(c: char) -> bool {
    c == '\r'
}

const fn is_ctl(c: char) -> bool {
    matches!(code(c), 0..=31 | 127)
}

const fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

const fn is_dquote(c: char) -> bool {
    c == '"'
}

const fn is_hexdig(c: char) -> bool {
    c.is_ascii_hexdigit()
}

const fn is_htab(c: char) -> bool {
    c == '\t'
}

const fn is_lf(c: char) -> bool {
    c == '\n'
}

const fn is_octet(c: char) -> bool {
    matches!(code(c), 0..=255)
}

const fn is_sp(c: char) -> bool {
    c == ' '
}

const fn is_vchar(c: char) -> bool {
    matches!(code(c), 33..=126)
}

const fn is_wsp(c: char) -> bool {
    matches!(c, ' ' | '\t')
}

const fn is_no_ws_ctl(c: char) -> bool {
    matches!(code(c), 1..=8 | 11 | 12 | 14..=31 | 127)
}

const fn is_text(c: char) -> bool {
    matches!(code(c), 1..=9 | 11 | 12 | 14..=127)
}

const fn is_specials(c: char) -> bool {
    matches!(
        c,
        '(' | ')' | '<' | '>' | '[' | ']' | ':' | ';' | '@' | '\\' | ',' | '.' | '"'
    )
}

const fn is_atext(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '!' | '#'
                | '$'
                | '%'
                | '&'
                | '\''
                | '*'
                | '+'
                | '-'
                | '/'
                | '='
                | '?'
                | '^'
                | '_'
                | '`'
                | '{'
                | '|'
                | '}'
                | '~'
        )
}

const fn is_ctext(c: char) -> bool {
    is_no_ws_ctl(c) || matches!(code(c), 33..=39 | 42..=91 | 93..=126) || code(c) > 127
}

const fn is_qtext(c: char) -> bool {
    !matches!(c, '\\' | '"' | '\r' | '\n')
}

const fn is_dtext(c: char) -> bool {
    is_no_ws_ctl(c) || matches!(code(c), 33..=90 | 94..=126)
}

const fn is_utext(c: char) -> bool {
    is_no_ws_ctl(c) || matches!(code(c), 33..=126) || code(c) > 127
}

/// `ALPHA = %x41-5A / %x61-7A`
pub const ALPHA: CharClass = CharClass::new("alphabetic character", is_alpha);
/// `BIT = "0" / "1"`
pub const BIT: CharClass = CharClass::new("bit", is_bit);
/// `CHAR = %x01-7F`
pub const CHAR: CharClass = CharClass::new("7-bit character excluding NUL", is_char);
/// `CR = %x0D`
pub const CR: CharClass = CharClass::new("carriage return", is_cr);
/// `CTL = %x00-1F / %x7F`
pub const CTL: CharClass = CharClass::new("control character", is_ctl);
/// `DIGIT = %x30-39`
pub const DIGIT: CharClass = CharClass::new("digit", is_digit);
/// `DQUOTE = %x22`
pub const DQUOTE: CharClass = CharClass::new("double quote", is_dquote);
/// `HEXDIG = DIGIT / "A" / "B" / "C" / "D" / "E" / "F"`, any case.
pub const HEXDIG: CharClass = CharClass::new("hexadecimal digit", is_hexdig);
/// `HTAB = %x09`
pub const HTAB: CharClass = CharClass::new("horizontal tab", is_htab);
/// `LF = %x0A`
pub const LF: CharClass = CharClass::new("line feed", is_lf);
/// `OCTET = %x00-FF`
pub const OCTET: CharClass = CharClass::new("8-bit character", is_octet);
/// `SP = %x20`
pub const SP: CharClass = CharClass::new("space", is_sp);
/// `VCHAR = %x21-7E`
pub const VCHAR: CharClass = CharClass::new("visible character", is_vchar);
/// `WSP = SP / HTAB`
pub const WSP: CharClass = CharClass::new("whitespace", is_wsp);

/// RFC 2822 `NO-WS-CTL`: controls other than CR, LF and whitespace.
pub const NO_WS_CTL: CharClass =
    CharClass::new("non-whitespace control character", is_no_ws_ctl);
/// RFC 2822 `text`: any 7-bit character except NUL, CR and LF.
pub const TEXT: CharClass = CharClass::new("text character", is_text);
/// RFC 2822 `specials`.
pub const SPECIALS: CharClass = CharClass::new("special character", is_specials);
/// RFC 2822 `atext`.
pub const ATEXT: CharClass = CharClass::new("atom character", is_atext);
/// RFC 2822 `ctext`, plus 8-bit characters found in stored mail.
pub const CTEXT: CharClass = CharClass::new("comment character", is_ctext);
/// Quoted-string text: anything but backslash, double quote, CR and LF.
pub const QTEXT: CharClass = CharClass::new("quoted-string character", is_qtext);
/// RFC 2822 `dtext`.
pub const DTEXT: CharClass = CharClass::new("domain-literal character", is_dtext);
/// RFC 2822 `utext`, plus 8-bit characters found in stored mail.
pub const UTEXT: CharClass = CharClass::new("unstructured character", is_utext);

/// Matches `ALPHA`.
///
/// # Errors
///
/// Fails if the next character is not a letter.
pub fn alpha(input: Cursor<'_>) -> PResult<'_, char> {
    ALPHA.parse(input)
}

/// Matches `DIGIT`.
///
/// # Errors
///
/// Fails if the next character is not a decimal digit.
pub fn digit(input: Cursor<'_>) -> PResult<'_, char> {
    DIGIT.parse(input)
}

/// Matches `HEXDIG`.
///
/// # Errors
///
/// Fails if the next character is not a hexadecimal digit.
pub fn hexdig(input: Cursor<'_>) -> PResult<'_, char> {
    HEXDIG.parse(input)
}

/// Matches `WSP`.
///
/// # Errors
///
/// Fails if the next character is not a space or tab.
pub fn wsp(input: Cursor<'_>) -> PResult<'_, char> {
    WSP.parse(input)
}

/// Matches `CR`.
///
/// # Errors
///
/// Fails if the next character is not a carriage return.
pub fn cr(input: Cursor<'_>) -> PResult<'_, char> {
    CR.parse(input)
}

/// Matches `LF`.
///
/// # Errors
///
/// Fails if the next character is not a line feed.
pub fn lf(input: Cursor<'_>) -> PResult<'_, char> {
    LF.parse(input)
}

/// Matches `DQUOTE`.
///
/// # Errors
///
/// Fails if the next character is not a double quote.
pub fn dquote(input: Cursor<'_>) -> PResult<'_, char> {
    DQUOTE.parse(input)
}

/// Matches `VCHAR`.
///
/// # Errors
///
/// Fails if the next character is not visible ASCII.
pub fn vchar(input: Cursor<'_>) -> PResult<'_, char> {
    VCHAR.parse(input)
}

/// Matches RFC 2822 `text`.
///
/// # Errors
///
/// Fails on NUL, CR, LF, 8-bit characters and end of input.
pub fn text(input: Cursor<'_>) -> PResult<'_, char> {
    TEXT.parse(input)
}

/// Matches `CRLF`.
///
/// # Errors
///
/// Fails unless both CR and LF follow.
pub fn crlf(input: Cursor<'_>) -> PResult<'_, &str> {
    let (_, rest) = cr(input).map_err(|e| e.relabel("CRLF"))?;
    let (_, rest) = lf(rest).map_err(|e| e.relabel("CRLF"))?;
    Ok((rest.since(input), rest))
}
