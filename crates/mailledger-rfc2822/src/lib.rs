//! # mailledger-rfc2822
//!
//! Recursive-descent parser for the Internet Message Format (RFC 2822),
//! built on the ABNF core rules of RFC 2234.
//!
//! ## Features
//!
//! - **Typed header values**: date-times, mailboxes, groups, address lists,
//!   message identifiers and unstructured text
//! - **Obsolete syntax**: two- and three-digit years, named and military
//!   zones, source routes, empty list elements and dotted display names
//! - **Comments and folding** accepted wherever RFC 2822 allows CFWS, with a
//!   configurable nesting limit
//! - **Stored-message mode**: optional acceptance of bare CR, bare LF and
//!   LFCR line breaks for mail written back with local line endings
//! - **Reusable ABNF toolkit**: character classes, repetition and choice
//!   combinators for other mail grammars
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailledger_rfc2822::{parse_address_list, parse_date_time, Address};
//!
//! let date = parse_date_time("Fri, 21 Nov 1997 09:55:06 -0600")?;
//! assert_eq!(date.offset_minutes(), -360);
//!
//! let to = parse_address_list("Mary Smith <mary@example.net>, A Group:joe@where.test;")?;
//! for address in &to {
//!     match address {
//!         Address::Mailbox(mailbox) => println!("mailbox {mailbox}"),
//!         Address::Group(group) => println!("group {}", group.display_name),
//!     }
//! }
//! ```
//!
//! ## Modules
//!
//! - [`abnf`]: character classes, combinators and literal matchers
//! - [`folding`], [`quoted`], [`atom`]: lexical building blocks
//! - [`datetime`], [`address`], [`msg_id`]: structured grammars
//! - [`header`]: field grammar selection and typed values
//! - [`parser`]: whole-value entry points

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod abnf;
pub mod address;
pub mod atom;
mod config;
mod cursor;
pub mod datetime;
mod error;
pub mod folding;
pub mod header;
pub mod msg_id;
pub mod parser;
pub mod quoted;

pub use address::{AddrSpec, Address, Group, Mailbox};
pub use config::{Newline, ParserConfig, ParserConfigBuilder};
pub use cursor::{Cursor, PResult};
pub use datetime::{DateTime, Zone};
pub use error::{Error, Result};
pub use header::{Field, FieldGrammar, FieldValue, Received};
pub use msg_id::MessageId;
pub use parser::{
    Parser, parse_address_list, parse_comment, parse_date_time, parse_field, parse_mailbox,
    parse_quoted_string,
};
pub use quoted::QuotedString;
