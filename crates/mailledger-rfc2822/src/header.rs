//! Header field values.
//!
//! A field's grammar is chosen from its name; the caller supplies the raw
//! value text (everything after the colon) and gets back a typed value.
//! Splitting a message into fields is left to the caller.

use std::fmt;

use crate::abnf::combinator::{alt, label, many1, map, recognize};
use crate::abnf::core_rules::{ALPHA, DIGIT};
use crate::abnf::literal::literal;
use crate::address::{
    AddrSpec, Address, Mailbox, addr_spec, address_list, angle_addr, domain, mailbox,
    mailbox_list, optional_address_list, path,
};
use crate::atom::{phrase, unstructured};
use crate::cursor::{Cursor, PResult};
use crate::datetime::{DateTime, date_time};
use crate::msg_id::{MessageId, msg_id, references};
use crate::quoted::{cfws, opt_cfws};

/// Grammar used for a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldGrammar {
    /// `Date`, `Resent-Date`.
    DateTime,
    /// `From`, `Resent-From`.
    MailboxList,
    /// `Sender`, `Resent-Sender`.
    Mailbox,
    /// `To`, `Cc`, `Reply-To`, `Resent-To`, `Resent-Cc`.
    AddressList,
    /// `Bcc`, `Resent-Bcc`: an address list that may be empty.
    OptionalAddressList,
    /// `Message-ID`, `Resent-Message-ID`.
    MessageId,
    /// `In-Reply-To`, `References`.
    MessageIdList,
    /// `Keywords`: comma-separated phrases.
    PhraseList,
    /// `Return-Path`.
    Path,
    /// `Received`.
    Received,
    /// `Subject`, `Comments` and any unknown field.
    Unstructured,
}

impl FieldGrammar {
    /// Selects the grammar for a field name, ignoring case.
    #[must_use]
    pub fn for_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "date" | "resent-date" => Self::DateTime,
            "from" | "resent-from" => Self::MailboxList,
            "sender" | "resent-sender" => Self::Mailbox,
            "to" | "cc" | "reply-to" | "resent-to" | "resent-cc" => Self::AddressList,
            "bcc" | "resent-bcc" => Self::OptionalAddressList,
            "message-id" | "resent-message-id" => Self::MessageId,
            "in-reply-to" | "references" => Self::MessageIdList,
            "keywords" => Self::PhraseList,
            "return-path" => Self::Path,
            "received" => Self::Received,
            _ => Self::Unstructured,
        }
    }

    /// Label used in error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::DateTime => "date-time",
            Self::MailboxList => "mailbox list",
            Self::Mailbox => "mailbox",
            Self::AddressList => "address list",
            Self::OptionalAddressList => "optional address list",
            Self::MessageId => "message id",
            Self::MessageIdList => "message id list",
            Self::PhraseList => "keywords",
            Self::Path => "path",
            Self::Received => "received",
            Self::Unstructured => "unstructured text",
        }
    }

    /// Matches a value of this grammar.
    ///
    /// The match may stop before the end of the input; use
    /// [`Parser::value`](crate::Parser::value) to require the whole value.
    ///
    /// # Errors
    ///
    /// Fails if the value does not start with a match of the grammar.
    pub fn parse(self, input: Cursor<'_>) -> PResult<'_, FieldValue> {
        match self {
            Self::DateTime => map(date_time, FieldValue::DateTime)(input),
            Self::MailboxList => map(mailbox_list, FieldValue::Mailboxes)(input),
            Self::Mailbox => map(mailbox, FieldValue::Mailbox)(input),
            Self::AddressList => map(address_list, FieldValue::Addresses)(input),
            Self::OptionalAddressList => map(optional_address_list, FieldValue::Addresses)(input),
            Self::MessageId => map(msg_id, FieldValue::MessageId)(input),
            Self::MessageIdList => map(references, FieldValue::MessageIds)(input),
            Self::PhraseList => map(phrase_list, FieldValue::Phrases)(input),
            Self::Path => map(path, FieldValue::Path)(input),
            Self::Received => map(received, FieldValue::Received)(input),
            Self::Unstructured => map(unstructured, FieldValue::Unstructured)(input),
        }
    }
}

impl fmt::Display for FieldGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed field value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldValue {
    /// Date-time.
    DateTime(DateTime),
    /// Mailbox list.
    Mailboxes(Vec<Mailbox>),
    /// Single mailbox.
    Mailbox(Mailbox),
    /// Address list; empty only for `Bcc`.
    Addresses(Vec<Address>),
    /// Single message identifier.
    MessageId(MessageId),
    /// Message identifiers in order.
    MessageIds(Vec<MessageId>),
    /// Keyword phrases.
    Phrases(Vec<String>),
    /// Return path; `None` for `<>`.
    Path(Option<AddrSpec>),
    /// Trace information.
    Received(Received),
    /// Unfolded text.
    Unstructured(String),
}

/// A `Received` trace field.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Received {
    /// Name/value pairs such as `("from", "mail.example.com")`.
    pub pairs: Vec<(String, String)>,
    /// Date-time after the `;`.
    pub date: DateTime,
}

impl Received {
    /// First value recorded under `name`, ignoring case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A header field with its typed value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Field {
    /// Field name as given.
    pub name: String,
    /// Parsed value.
    pub value: FieldValue,
}

impl Field {
    /// Grammar this field's name selects.
    #[must_use]
    pub fn grammar(&self) -> FieldGrammar {
        FieldGrammar::for_name(&self.name)
    }
}

// keywords = phrase *("," phrase), with obs-phrase-list empty elements
fn phrase_list(input: Cursor<'_>) -> PResult<'_, Vec<String>> {
    let (first, mut cursor) = phrase(input)?;
    let mut phrases = vec![first];
    while let Ok((_, after_comma)) = literal(",")(cursor) {
        let ((), start) = opt_cfws(after_comma)?;
        match phrase(start) {
            Ok((next, rest)) => {
                phrases.push(next);
                cursor = rest;
            }
            Err(e) if !e.is_recoverable() || e.position() > start.position() => return Err(e),
            Err(_) => cursor = start,
        }
    }
    Ok((phrases, cursor))
}

// received = name-val-list ";" date-time
fn received(input: Cursor<'_>) -> PResult<'_, Received> {
    let ((), mut cursor) = opt_cfws(input)?;
    let mut pairs = Vec::new();
    loop {
        match name_val_pair(cursor) {
            Ok((pair, rest)) => {
                pairs.push(pair);
                cursor = rest;
            }
            Err(e) if !e.is_recoverable() || e.position() > cursor.position() => return Err(e),
            Err(_) => break,
        }
    }
    let (_, cursor) = literal(";")(cursor).map_err(|e| e.relabel("received date"))?;
    let (date, cursor) = date_time(cursor)?;
    Ok((Received { pairs, date }, cursor))
}

fn name_val_pair(input: Cursor<'_>) -> PResult<'_, (String, String)> {
    let (name, cursor) = label("item name", recognize(item_name))(input)?;
    let ((), cursor) = cfws(cursor)?;
    let (value, cursor) = item_value(cursor)?;
    let ((), cursor) = opt_cfws(cursor)?;
    Ok(((name.to_string(), value), cursor))
}

// item-name = ALPHA *(["-"] (ALPHA / DIGIT))
fn item_name(input: Cursor<'_>) -> PResult<'_, ()> {
    let (_, mut cursor) = ALPHA.parse(input)?;
    loop {
        let next = literal("-")(cursor).map_or(cursor, |(_, rest)| rest);
        match next.next_char() {
            Some((c, rest)) if ALPHA.contains(c) || DIGIT.contains(c) => cursor = rest,
            _ => break,
        }
    }
    Ok(((), cursor))
}

// item-value = 1*angle-addr / addr-spec / atom / domain / msg-id
fn item_value(input: Cursor<'_>) -> PResult<'_, String> {
    label(
        "item value",
        alt((
            angle_addrs,
            map(addr_spec, |spec| spec.to_string()),
            domain,
            map(msg_id, |id| id.to_string()),
        )),
    )(input)
}

fn angle_addrs(input: Cursor<'_>) -> PResult<'_, String> {
    map(many1(angle_addr), |addrs| {
        addrs
            .iter()
            .map(|spec| format!("<{spec}>"))
            .collect::<Vec<_>>()
            .join(" ")
    })(input)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(grammar: FieldGrammar, text: &str) -> FieldValue {
        let (value, rest) = grammar.parse(Cursor::new(text)).unwrap();
        assert!(rest.is_eof(), "residual input {:?}", rest.rest());
        value
    }

    #[test]
    fn test_for_name() {
        assert_eq!(FieldGrammar::for_name("From"), FieldGrammar::MailboxList);
        assert_eq!(FieldGrammar::for_name("RESENT-DATE"), FieldGrammar::DateTime);
        assert_eq!(FieldGrammar::for_name("reply-to"), FieldGrammar::AddressList);
        assert_eq!(FieldGrammar::for_name("Bcc"), FieldGrammar::OptionalAddressList);
        assert_eq!(FieldGrammar::for_name("X-Mailer"), FieldGrammar::Unstructured);
    }

    #[test]
    fn test_keywords() {
        let value = parse(FieldGrammar::PhraseList, "ham, \"spam eggs\" ,, toast");
        assert_eq!(
            value,
            FieldValue::Phrases(vec!["ham".into(), "spam eggs".into(), "toast".into()])
        );
    }

    #[test]
    fn test_empty_bcc() {
        assert_eq!(
            parse(FieldGrammar::OptionalAddressList, " "),
            FieldValue::Addresses(vec![])
        );
    }

    #[test]
    fn test_received() {
        let value = parse(
            FieldGrammar::Received,
            "from mail.example.com (mail [10.0.0.1])\r\n by mx.example.net with ESMTP id abc-123\r\n for <jdoe@example.net>; Fri, 21 Nov 1997 09:55:06 -0600",
        );
        let FieldValue::Received(received) = value else {
            panic!("expected received");
        };
        assert_eq!(received.get("from"), Some("mail.example.com"));
        assert_eq!(received.get("BY"), Some("mx.example.net"));
        assert_eq!(received.get("with"), Some("ESMTP"));
        assert_eq!(received.get("id"), Some("abc-123"));
        assert_eq!(received.get("for"), Some("<jdoe@example.net>"));
        assert_eq!(received.date.day, 21);
    }

    #[test]
    fn test_received_without_pairs() {
        let value = parse(FieldGrammar::Received, "; 1 Jan 2000 00:00 +0000");
        let FieldValue::Received(received) = value else {
            panic!("expected received");
        };
        assert!(received.pairs.is_empty());
    }

    #[test]
    fn test_return_path() {
        assert_eq!(parse(FieldGrammar::Path, "<>"), FieldValue::Path(None));
    }

    #[test]
    fn test_unstructured_subject() {
        assert_eq!(
            parse(FieldGrammar::Unstructured, " Saying\r\n Hello"),
            FieldValue::Unstructured("Saying Hello".into())
        );
    }
}
