//! Error types for grammar matching.

use thiserror::Error;

/// Result type alias for grammar operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Grammar failure.
///
/// `expected` is the label of the rule that failed and `position` is the
/// byte offset the match reached before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A rule's pattern did not match at the given position.
    #[error("failed to match {expected} at position {position}")]
    GrammarMismatch {
        /// Label of the rule that was expected.
        expected: &'static str,
        /// Byte offset where matching stopped.
        position: usize,
    },

    /// Input was exhausted in the middle of a rule.
    #[error("unexpected end of input while matching {expected} at position {position}")]
    UnexpectedEnd {
        /// Label of the rule that was expected.
        expected: &'static str,
        /// Byte offset where matching stopped.
        position: usize,
    },

    /// Comments nested deeper than the configured limit.
    #[error("comment nesting exceeds {limit} levels at position {position}")]
    NestingTooDeep {
        /// Configured maximum depth.
        limit: usize,
        /// Byte offset of the comment that crossed the limit.
        position: usize,
    },
}

impl Error {
    /// Byte offset at which matching stopped.
    #[must_use]
    pub const fn position(&self) -> usize {
        match self {
            Self::GrammarMismatch { position, .. }
            | Self::UnexpectedEnd { position, .. }
            | Self::NestingTooDeep { position, .. } => *position,
        }
    }

    /// Label of the rule that failed.
    #[must_use]
    pub const fn expected(&self) -> &'static str {
        match self {
            Self::GrammarMismatch { expected, .. } | Self::UnexpectedEnd { expected, .. } => {
                expected
            }
            Self::NestingTooDeep { .. } => "comment",
        }
    }

    /// Returns true if an enclosing alternative may try a sibling rule.
    ///
    /// Only [`Error::NestingTooDeep`] is final.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::NestingTooDeep { .. })
    }

    /// Replaces the rule label, keeping the position and kind.
    #[must_use]
    pub const fn relabel(self, expected: &'static str) -> Self {
        match self {
            Self::GrammarMismatch { position, .. } => Self::GrammarMismatch { expected, position },
            Self::UnexpectedEnd { position, .. } => Self::UnexpectedEnd { expected, position },
            other @ Self::NestingTooDeep { .. } => other,
        }
    }

    /// Picks the failure that got further into the input.
    ///
    /// Ties go to `other`, the later alternative.
    #[must_use]
    pub const fn furthest(self, other: Self) -> Self {
        if self.position() > other.position() {
            self
        } else {
            other
        }
    }
}
