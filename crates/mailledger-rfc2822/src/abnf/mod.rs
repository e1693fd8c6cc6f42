//! ABNF toolkit (RFC 2234).
//!
//! Character classes, repetition and choice combinators, and literal
//! matchers. The RFC 2822 grammar in this crate is built from these, and
//! they are public so other mail grammars (e.g. RFC 2821 commands) can reuse
//! them.

pub mod combinator;
pub mod core_rules;
pub mod literal;

pub use combinator::{alt, at_least, between, exactly, label, many0, many1, map, opt, recognize};
pub use core_rules::CharClass;
pub use literal::{char_ci, literal, literal_ci, one_of_ci};
