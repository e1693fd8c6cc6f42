//! Address specification (RFC 2822 section 3.4 and obsolete forms).
//!
//! ```text
//! address      = mailbox / group
//! mailbox      = name-addr / addr-spec
//! name-addr    = [display-name] angle-addr
//! angle-addr   = [CFWS] "<" [obs-route] addr-spec ">" [CFWS]
//! group        = display-name ":" [mailbox-list / CFWS] ";" [CFWS]
//! addr-spec    = local-part "@" domain
//! local-part   = word *("." word)
//! domain       = dot-atom / domain-literal / obs-domain
//! ```
//!
//! `name-addr` is always tried before `addr-spec`: a bare local part is a
//! valid prefix of a display name, so the other order would stop early.

use std::fmt;

use crate::abnf::combinator::{alt, label, map, opt};
use crate::abnf::core_rules::{ATEXT, DTEXT};
use crate::abnf::literal::literal;
use crate::atom::{atom, phrase, word};
use crate::cursor::{Cursor, PResult};
use crate::error::Error;
use crate::folding::fws;
use crate::quoted::{QuotedString, opt_cfws, quoted_pair};

/// `local-part@domain`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AddrSpec {
    /// Local part; quoted words keep their quotes.
    pub local_part: String,
    /// Domain name, or a bracketed domain literal.
    pub domain: String,
}

impl AddrSpec {
    /// Creates an address from its parts.
    #[must_use]
    pub fn new(local_part: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            local_part: local_part.into(),
            domain: domain.into(),
        }
    }
}

impl fmt::Display for AddrSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.local_part, self.domain)
    }
}

/// A single mailbox: optional display name plus address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mailbox {
    /// Display name, unquoted.
    pub display_name: Option<String>,
    /// Address.
    pub addr_spec: AddrSpec,
}

impl Mailbox {
    /// Creates a mailbox without a display name.
    #[must_use]
    pub const fn new(addr_spec: AddrSpec) -> Self {
        Self {
            display_name: None,
            addr_spec,
        }
    }

    /// Creates a mailbox with a display name.
    #[must_use]
    pub fn with_name(display_name: impl Into<String>, addr_spec: AddrSpec) -> Self {
        Self {
            display_name: Some(display_name.into()),
            addr_spec,
        }
    }

    /// The `local-part@domain` of this mailbox.
    #[must_use]
    pub const fn address(&self) -> &AddrSpec {
        &self.addr_spec
    }

    /// Local part of the address.
    #[must_use]
    pub fn local_part(&self) -> &str {
        &self.addr_spec.local_part
    }

    /// Domain of the address.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.addr_spec.domain
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.display_name {
            Some(name) => {
                write_phrase(f, name)?;
                write!(f, " <{}>", self.addr_spec)
            }
            None => write!(f, "{}", self.addr_spec),
        }
    }
}

/// A named list of mailboxes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Group {
    /// Group label.
    pub display_name: String,
    /// Members in input order; may be empty.
    pub mailboxes: Vec<Mailbox>,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_phrase(f, &self.display_name)?;
        f.write_str(":")?;
        for (i, mailbox) in self.mailboxes.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{mailbox}")?;
        }
        f.write_str(";")
    }
}

/// An entry of an address list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Address {
    /// A single mailbox.
    Mailbox(Mailbox),
    /// A group of mailboxes.
    Group(Group),
}

impl Address {
    /// Mailboxes this address stands for: itself, or the group members.
    #[must_use]
    pub fn mailboxes(&self) -> &[Mailbox] {
        match self {
            Self::Mailbox(mailbox) => std::slice::from_ref(mailbox),
            Self::Group(group) => &group.mailboxes,
        }
    }
}

impl From<Mailbox> for Address {
    fn from(mailbox: Mailbox) -> Self {
        Self::Mailbox(mailbox)
    }
}

impl From<Group> for Address {
    fn from(group: Group) -> Self {
        Self::Group(group)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mailbox(mailbox) => fmt::Display::fmt(mailbox, f),
            Self::Group(group) => fmt::Display::fmt(group, f),
        }
    }
}

// Phrases made of atoms and single spaces are written bare, anything else
// is quoted.
fn write_phrase(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    let bare = !name.is_empty()
        && !name.starts_with(' ')
        && !name.ends_with(' ')
        && !name.contains("  ")
        && name.chars().all(|c| c == ' ' || ATEXT.contains(c));
    if bare {
        f.write_str(name)
    } else {
        write!(f, "{}", QuotedString::new(name))
    }
}

/// Matches `address = mailbox / group`.
///
/// # Errors
///
/// Fails if neither a mailbox nor a group matches.
pub fn address(input: Cursor<'_>) -> PResult<'_, Address> {
    label(
        "address",
        alt((map(mailbox, Address::Mailbox), map(group, Address::Group))),
    )(input)
}

/// Matches `mailbox = name-addr / addr-spec`.
///
/// # Errors
///
/// Fails if neither form matches.
pub fn mailbox(input: Cursor<'_>) -> PResult<'_, Mailbox> {
    label("mailbox", alt((name_addr, bare_addr_spec)))(input)
}

fn name_addr(input: Cursor<'_>) -> PResult<'_, Mailbox> {
    let (display_name, cursor) = opt(display_name)(input)?;
    let (addr_spec, cursor) = angle_addr(cursor)?;
    Ok((
        Mailbox {
            display_name,
            addr_spec,
        },
        cursor,
    ))
}

fn bare_addr_spec(input: Cursor<'_>) -> PResult<'_, Mailbox> {
    map(addr_spec, Mailbox::new)(input)
}

/// Matches `display-name = phrase`.
///
/// # Errors
///
/// Fails if no phrase is present.
pub fn display_name(input: Cursor<'_>) -> PResult<'_, String> {
    label("display name", phrase)(input)
}

/// Matches an angle-bracketed address, skipping an obsolete source route.
///
/// # Errors
///
/// Fails if the brackets or the address are missing.
pub fn angle_addr(input: Cursor<'_>) -> PResult<'_, AddrSpec> {
    let ((), cursor) = opt_cfws(input)?;
    let (_, cursor) = literal("<")(cursor).map_err(|e| e.relabel("angle address"))?;
    let (_, cursor) = opt(obs_route)(cursor)?;
    let (address, cursor) = addr_spec(cursor)?;
    let (_, cursor) = literal(">")(cursor).map_err(|e| e.relabel("closing angle bracket"))?;
    let ((), cursor) = opt_cfws(cursor)?;
    Ok((address, cursor))
}

/// Matches a `Return-Path` path: an angle address or the empty `<>`.
///
/// # Errors
///
/// Fails if neither form matches.
pub fn path(input: Cursor<'_>) -> PResult<'_, Option<AddrSpec>> {
    label("path", alt((map(angle_addr, Some), empty_path)))(input)
}

fn empty_path(input: Cursor<'_>) -> PResult<'_, Option<AddrSpec>> {
    let ((), cursor) = opt_cfws(input)?;
    let (_, cursor) = literal("<")(cursor)?;
    let ((), cursor) = opt_cfws(cursor)?;
    let (_, cursor) = literal(">")(cursor)?;
    let ((), cursor) = opt_cfws(cursor)?;
    Ok((None, cursor))
}

// obs-route = obs-domain-list ":"
// obs-domain-list = "@" domain *(*(CFWS / ",") [CFWS] "@" domain)
fn obs_route(input: Cursor<'_>) -> PResult<'_, ()> {
    let ((), cursor) = route_separators(input)?;
    let (_, cursor) = literal("@")(cursor)?;
    let (_, mut cursor) = domain(cursor)?;
    loop {
        let ((), after_separators) = route_separators(cursor)?;
        let Ok((_, after_at)) = literal("@")(after_separators) else {
            break;
        };
        match domain(after_at) {
            Ok((_, rest)) => cursor = rest,
            Err(e) if !e.is_recoverable() => return Err(e),
            Err(_) => break,
        }
    }
    let ((), cursor) = route_separators(cursor)?;
    let (_, cursor) = literal(":")(cursor)?;
    let ((), cursor) = opt_cfws(cursor)?;
    Ok(((), cursor))
}

fn route_separators(input: Cursor<'_>) -> PResult<'_, ()> {
    let mut cursor = input;
    loop {
        let ((), after_cfws) = opt_cfws(cursor)?;
        match literal(",")(after_cfws) {
            Ok((_, rest)) => cursor = rest,
            Err(_) => return Ok(((), after_cfws)),
        }
    }
}

/// Matches `group = display-name ":" [mailbox-list / CFWS] ";" [CFWS]`.
///
/// Empty groups and the obsolete list with empty elements are accepted.
///
/// # Errors
///
/// Fails if the label, colon or terminating semicolon is missing.
pub fn group(input: Cursor<'_>) -> PResult<'_, Group> {
    let (display_name, cursor) = display_name(input)?;
    let (_, cursor) = literal(":")(cursor)?;
    let (mailboxes, cursor) = list_of(mailbox, cursor)?;
    let (_, cursor) = literal(";")(cursor).map_err(|e| e.relabel("group terminator"))?;
    let ((), cursor) = opt_cfws(cursor)?;
    Ok((
        Group {
            display_name,
            mailboxes: mailboxes.items,
        },
        cursor,
    ))
}

/// Matches a comma-separated list of at least one mailbox.
///
/// # Errors
///
/// Fails if the list contains no mailbox, or an entry is malformed.
pub fn mailbox_list(input: Cursor<'_>) -> PResult<'_, Vec<Mailbox>> {
    let (list, cursor) = list_of(mailbox, input)?;
    Ok((list.non_empty(input, "mailbox list")?, cursor))
}

/// Matches a comma-separated list of at least one address.
///
/// # Errors
///
/// Fails if the list contains no address, or an entry is malformed.
pub fn address_list(input: Cursor<'_>) -> PResult<'_, Vec<Address>> {
    let (list, cursor) = list_of(address, input)?;
    Ok((list.non_empty(input, "address list")?, cursor))
}

/// Matches an address list that may also be empty, as `Bcc` allows.
///
/// # Errors
///
/// Fails only if an entry is malformed.
pub fn optional_address_list(input: Cursor<'_>) -> PResult<'_, Vec<Address>> {
    let (list, cursor) = list_of(address, input)?;
    Ok((list.items, cursor))
}

struct List<T> {
    items: Vec<T>,
    first_failure: Option<Error>,
}

impl<T> List<T> {
    fn non_empty(self, input: Cursor<'_>, name: &'static str) -> Result<Vec<T>, Error> {
        if self.items.is_empty() {
            let failure = self.first_failure.unwrap_or_else(|| input.fail(name));
            return Err(failure.relabel(name));
        }
        Ok(self.items)
    }
}

// Comma-separated entries where, as in obs-mbox-list and obs-addr-list, an
// entry may be empty. An entry that fails without consuming anything ends
// the list; one that fails part-way fails the whole list.
fn list_of<'a, T, P>(item: P, input: Cursor<'a>) -> PResult<'a, List<T>>
where
    P: Fn(Cursor<'a>) -> PResult<'a, T>,
{
    let mut list = List {
        items: Vec::new(),
        first_failure: None,
    };
    let mut cursor = input;
    loop {
        let ((), start) = opt_cfws(cursor)?;
        match item(start) {
            Ok((value, rest)) => {
                list.items.push(value);
                cursor = rest;
            }
            Err(e) if !e.is_recoverable() || e.position() > start.position() => return Err(e),
            Err(e) => {
                list.first_failure.get_or_insert(e);
                cursor = start;
            }
        }
        match literal(",")(cursor) {
            Ok((_, rest)) => cursor = rest,
            Err(_) => break,
        }
    }
    Ok((list, cursor))
}

/// Matches `addr-spec = local-part "@" domain`.
///
/// # Errors
///
/// Fails if any part is missing.
pub fn addr_spec(input: Cursor<'_>) -> PResult<'_, AddrSpec> {
    let (local_part, cursor) = local_part(input)?;
    let (_, cursor) = literal("@")(cursor)?;
    let (domain, cursor) = domain(cursor)?;
    Ok((
        AddrSpec {
            local_part,
            domain,
        },
        cursor,
    ))
}

/// Matches a local part: dot-atom, quoted string or the obsolete
/// `word *("." word)`.
///
/// # Errors
///
/// Fails if the local part does not start with a word.
pub fn local_part(input: Cursor<'_>) -> PResult<'_, String> {
    let (first, mut cursor) = word(input).map_err(|e| e.relabel("local part"))?;
    let mut text = first.canonical();
    while let Ok((_, after_dot)) = literal(".")(cursor) {
        let (next, rest) = match word(after_dot) {
            Ok(matched) => matched,
            Err(e) if !e.is_recoverable() => return Err(e),
            Err(_) => break,
        };
        text.push('.');
        text.push_str(&next.canonical());
        cursor = rest;
    }
    Ok((text, cursor))
}

/// Matches a domain: dotted atoms or a bracketed domain literal.
///
/// # Errors
///
/// Fails if neither form matches.
pub fn domain(input: Cursor<'_>) -> PResult<'_, String> {
    label("domain", alt((domain_literal, dotted_domain)))(input)
}

fn dotted_domain(input: Cursor<'_>) -> PResult<'_, String> {
    let (first, mut cursor) = atom(input)?;
    let mut text = first.to_string();
    while let Ok((_, after_dot)) = literal(".")(cursor) {
        let (part, rest) = match atom(after_dot) {
            Ok(matched) => matched,
            Err(e) if !e.is_recoverable() => return Err(e),
            Err(_) => break,
        };
        text.push('.');
        text.push_str(part);
        cursor = rest;
    }
    Ok((text, cursor))
}

/// Matches `domain-literal = [CFWS] "[" *([FWS] dcontent) [FWS] "]" [CFWS]`.
///
/// Returns the literal with its brackets; folds are removed.
///
/// # Errors
///
/// Fails if there is no opening bracket, or with `"closing bracket"`.
pub fn domain_literal(input: Cursor<'_>) -> PResult<'_, String> {
    let ((), cursor) = opt_cfws(input)?;
    let (_, mut cursor) = literal("[")(cursor)?;
    let mut text = String::from("[");
    loop {
        if let Ok((ws, rest)) = fws(cursor) {
            text.push_str(&ws);
            cursor = rest;
        }
        if let Ok((run, rest)) = DTEXT.parse_run(cursor) {
            text.push_str(run);
            cursor = rest;
        } else if let Ok((c, rest)) = quoted_pair(cursor) {
            text.push('\\');
            text.push(c);
            cursor = rest;
        } else {
            break;
        }
    }
    let (_, cursor) = literal("]")(cursor).map_err(|e| e.relabel("closing bracket"))?;
    text.push(']');
    let ((), cursor) = opt_cfws(cursor)?;
    Ok((text, cursor))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse<'a, T>(rule: impl Fn(Cursor<'a>) -> PResult<'a, T>, text: &'a str) -> T {
        let (value, rest) = rule(Cursor::new(text)).unwrap();
        assert!(rest.is_eof(), "residual input {:?}", rest.rest());
        value
    }

    #[test]
    fn test_name_addr() {
        let mb = parse(mailbox, "Mary Smith <mary@example.net>");
        assert_eq!(mb.display_name.as_deref(), Some("Mary Smith"));
        assert_eq!(mb.local_part(), "mary");
        assert_eq!(mb.domain(), "example.net");
    }

    #[test]
    fn test_bare_addr_spec() {
        let mb = parse(mailbox, "mary@example.net");
        assert_eq!(mb.display_name, None);
        assert_eq!(mb.address(), &AddrSpec::new("mary", "example.net"));
    }

    #[test]
    fn test_angle_addr_without_name() {
        let mb = parse(mailbox, "<mary@example.net>");
        assert_eq!(mb.display_name, None);
        assert_eq!(mb.local_part(), "mary");
    }

    #[test]
    fn test_dotted_local_part_is_not_a_display_name() {
        let mb = parse(mailbox, "john.q.public@example.com");
        assert_eq!(mb.display_name, None);
        assert_eq!(mb.local_part(), "john.q.public");
    }

    #[test]
    fn test_quoted_display_name() {
        let mb = parse(mailbox, "\"Joe Q. Public\" <john.q.public@example.com>");
        assert_eq!(mb.display_name.as_deref(), Some("Joe Q. Public"));
        assert_eq!(mb.to_string(), "\"Joe Q. Public\" <john.q.public@example.com>");
    }

    #[test]
    fn test_quoted_local_part() {
        let mb = parse(mailbox, "\"john doe\"@example.com");
        assert_eq!(mb.local_part(), "\"john doe\"");
        assert_eq!(mb.to_string(), "\"john doe\"@example.com");
    }

    #[test]
    fn test_comments_inside_address() {
        let mb = parse(mailbox, "Pete(A wonderful \\) chap) <pete(his account)@silly.test(his host)>");
        assert_eq!(mb.display_name.as_deref(), Some("Pete"));
        assert_eq!(mb.local_part(), "pete");
        assert_eq!(mb.domain(), "silly.test");
    }

    #[test]
    fn test_domain_literal() {
        let mb = parse(mailbox, "jdoe@[192.168.0.1]");
        assert_eq!(mb.domain(), "[192.168.0.1]");
        let err = domain_literal(Cursor::new("[1.2.3.4")).unwrap_err();
        assert_eq!(err.expected(), "closing bracket");
    }

    #[test]
    fn test_obs_route() {
        let mb = parse(mailbox, "Jo <@relay.test,@other.test:jo@example.com>");
        assert_eq!(mb.address(), &AddrSpec::new("jo", "example.com"));
    }

    #[test]
    fn test_group() {
        let addr = parse(address, "A Group:Chris Jones <c@a.test>,joe@where.test;");
        let Address::Group(group) = addr else {
            panic!("expected a group");
        };
        assert_eq!(group.display_name, "A Group");
        assert_eq!(group.mailboxes.len(), 2);
        assert_eq!(group.mailboxes[0].display_name.as_deref(), Some("Chris Jones"));
        assert_eq!(group.mailboxes[0].local_part(), "c");
        assert_eq!(group.mailboxes[1].address(), &AddrSpec::new("joe", "where.test"));
    }

    #[test]
    fn test_empty_group() {
        let addr = parse(address, "Undisclosed recipients:;");
        assert_eq!(
            addr,
            Address::Group(Group {
                display_name: "Undisclosed recipients".into(),
                mailboxes: vec![],
            })
        );
        assert_eq!(addr.to_string(), "Undisclosed recipients:;");
        let addr = parse(address, "Empty: , (nobody) ;");
        assert!(addr.mailboxes().is_empty());
    }

    #[test]
    fn test_address_list() {
        let list = parse(
            address_list,
            "Mary Smith <mary@x.test>, jdoe@example.org, Who? <one@y.test>",
        );
        assert_eq!(list.len(), 3);
        assert_eq!(list[1].mailboxes()[0].address(), &AddrSpec::new("jdoe", "example.org"));
        assert_eq!(list[2].mailboxes()[0].display_name.as_deref(), Some("Who?"));
    }

    #[test]
    fn test_obs_list_empty_entries() {
        let list = parse(mailbox_list, ", a@b.test,, c@d.test ,");
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].address(), &AddrSpec::new("c", "d.test"));
    }

    #[test]
    fn test_empty_list_fails() {
        let err = mailbox_list(Cursor::new(" , ")).unwrap_err();
        assert_eq!(err.expected(), "mailbox list");
        let (list, _) = optional_address_list(Cursor::new(" ")).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_malformed_entry_fails_list() {
        let err = mailbox_list(Cursor::new("a@b.test, Mary <mary@x.test")).unwrap_err();
        assert_eq!(err.expected(), "mailbox");
        assert_eq!(err.position(), 27);
        let err = angle_addr(Cursor::new("<mary@x.test")).unwrap_err();
        assert_eq!(err.expected(), "closing angle bracket");
    }

    #[test]
    fn test_path() {
        assert_eq!(parse(path, "<>"), None);
        assert_eq!(parse(path, " < > "), None);
        assert_eq!(
            parse(path, "<bounce@example.com>"),
            Some(AddrSpec::new("bounce", "example.com"))
        );
    }

    #[test]
    fn test_mailbox_display() {
        let mb = Mailbox::with_name("Smith, Mary", AddrSpec::new("mary", "x.test"));
        assert_eq!(mb.to_string(), "\"Smith, Mary\" <mary@x.test>");
        let mb = Mailbox::with_name("Mary Smith", AddrSpec::new("mary", "x.test"));
        assert_eq!(mb.to_string(), "Mary Smith <mary@x.test>");
    }
}
