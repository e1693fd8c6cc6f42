//! Whole-value entry points.
//!
//! Rules in the other modules match a prefix of their input. The methods
//! here require the rule to consume the entire text and fail with
//! `"end of input"` at the first unconsumed byte otherwise.

use crate::address::{self, Address, Mailbox};
use crate::atom;
use crate::config::ParserConfig;
use crate::cursor::{Cursor, PResult};
use crate::datetime::{self, DateTime};
use crate::error::Result;
use crate::header::{Field, FieldGrammar, FieldValue};
use crate::msg_id::{self, MessageId};
use crate::quoted::{self, QuotedString};

static DEFAULT_PARSER: Parser = Parser::new(ParserConfig::DEFAULT);

/// Parses complete header values with a fixed configuration.
///
/// `Parser` holds no state besides its configuration and can be shared
/// freely between threads.
///
/// # Example
///
/// ```ignore
/// use mailledger_rfc2822::{Parser, ParserConfig};
///
/// let parser = Parser::new(ParserConfig::stored());
/// let from = parser.mailbox_list("Mary Smith <mary@example.net>")?;
/// assert_eq!(from[0].domain(), "example.net");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Creates a parser with the given configuration.
    #[must_use]
    pub const fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Configuration used by this parser.
    #[must_use]
    pub const fn config(&self) -> &ParserConfig {
        &self.config
    }

    fn run<'a, T, P>(&'a self, rule: &'static str, text: &'a str, parse: P) -> Result<T>
    where
        P: Fn(Cursor<'a>) -> PResult<'a, T>,
    {
        tracing::trace!(rule, len = text.len(), "parsing");
        let outcome = parse(Cursor::with_config(text, &self.config)).and_then(|(value, rest)| {
            if rest.is_eof() {
                Ok(value)
            } else {
                Err(rest.fail("end of input"))
            }
        });
        if let Err(e) = &outcome {
            tracing::debug!(rule, error = %e, "parse failed");
        }
        outcome
    }

    /// Parses a date-time such as `Fri, 21 Nov 1997 09:55:06 -0600`.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a complete date-time.
    pub fn date_time(&self, text: &str) -> Result<DateTime> {
        self.run("date-time", text, datetime::date_time)
    }

    /// Parses a comma-separated list of mailboxes and groups.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a complete address list.
    pub fn address_list(&self, text: &str) -> Result<Vec<Address>> {
        self.run("address list", text, address::address_list)
    }

    /// Parses a comma-separated list of mailboxes.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a complete mailbox list.
    pub fn mailbox_list(&self, text: &str) -> Result<Vec<Mailbox>> {
        self.run("mailbox list", text, address::mailbox_list)
    }

    /// Parses a single mailbox.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not exactly one mailbox.
    pub fn mailbox(&self, text: &str) -> Result<Mailbox> {
        self.run("mailbox", text, address::mailbox)
    }

    /// Parses a single mailbox or group.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not exactly one address.
    pub fn address(&self, text: &str) -> Result<Address> {
        self.run("address", text, address::address)
    }

    /// Parses a quoted string.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not exactly one quoted string.
    pub fn quoted_string(&self, text: &str) -> Result<QuotedString> {
        self.run("quoted string", text, quoted::quoted_string)
    }

    /// Checks that the text is exactly one (possibly nested) comment.
    ///
    /// # Errors
    ///
    /// Returns an error if the comment is malformed, nested too deeply, or
    /// followed by other text.
    pub fn comment(&self, text: &str) -> Result<()> {
        self.run("comment", text, quoted::comment)
    }

    /// Parses unstructured text, removing folds.
    ///
    /// # Errors
    ///
    /// Returns an error if the text contains a line break that is not a
    /// fold.
    pub fn unstructured(&self, text: &str) -> Result<String> {
        self.run("unstructured text", text, atom::unstructured)
    }

    /// Parses a single message identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not exactly one message identifier.
    pub fn msg_id(&self, text: &str) -> Result<MessageId> {
        self.run("message id", text, msg_id::msg_id)
    }

    /// Parses a field value with the grammar its name selects.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not match that grammar.
    pub fn field(&self, name: &str, value: &str) -> Result<Field> {
        let value = self.value(FieldGrammar::for_name(name), value)?;
        Ok(Field {
            name: name.to_string(),
            value,
        })
    }

    /// Parses a field value with an explicit grammar.
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not match the grammar.
    pub fn value(&self, grammar: FieldGrammar, value: &str) -> Result<FieldValue> {
        self.run(grammar.name(), value, |cursor| grammar.parse(cursor))
    }
}

/// Parses a date-time with the strict configuration.
///
/// # Errors
///
/// See [`Parser::date_time`].
pub fn parse_date_time(text: &str) -> Result<DateTime> {
    DEFAULT_PARSER.date_time(text)
}

/// Parses an address list with the strict configuration.
///
/// # Errors
///
/// See [`Parser::address_list`].
pub fn parse_address_list(text: &str) -> Result<Vec<Address>> {
    DEFAULT_PARSER.address_list(text)
}

/// Parses a mailbox with the strict configuration.
///
/// # Errors
///
/// See [`Parser::mailbox`].
pub fn parse_mailbox(text: &str) -> Result<Mailbox> {
    DEFAULT_PARSER.mailbox(text)
}

/// Parses a quoted string with the strict configuration.
///
/// # Errors
///
/// See [`Parser::quoted_string`].
pub fn parse_quoted_string(text: &str) -> Result<QuotedString> {
    DEFAULT_PARSER.quoted_string(text)
}

/// Validates a comment with the strict configuration.
///
/// # Errors
///
/// See [`Parser::comment`].
pub fn parse_comment(text: &str) -> Result<()> {
    DEFAULT_PARSER.comment(text)
}

/// Parses a header field value with the strict configuration.
///
/// # Errors
///
/// See [`Parser::field`].
pub fn parse_field(name: &str, value: &str) -> Result<Field> {
    DEFAULT_PARSER.field(name, value)
}
