//! Parser configuration.

/// Which line-break sequences may appear inside folded whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Newline {
    /// Only CRLF, as RFC 2822 requires. Use this for live messages.
    #[default]
    Strict,
    /// CRLF, LFCR, bare CR and bare LF, tried in that order.
    ///
    /// Meant for re-parsing messages that were stored and re-serialised
    /// with local line endings. **Not suitable for incoming messages.**
    Lenient,
}

/// Grammar configuration shared by every rule of a parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Accepted line-break sequences.
    pub newline: Newline,
    /// Maximum nesting depth of parenthesised comments.
    pub max_comment_depth: usize,
}

impl ParserConfig {
    /// Default comment nesting limit.
    pub const DEFAULT_MAX_COMMENT_DEPTH: usize = 64;

    /// Strict RFC 2822 configuration.
    pub const DEFAULT: Self = Self {
        newline: Newline::Strict,
        max_comment_depth: Self::DEFAULT_MAX_COMMENT_DEPTH,
    };

    /// Configuration for messages read back from a mail store.
    #[must_use]
    pub const fn stored() -> Self {
        Self {
            newline: Newline::Lenient,
            ..Self::DEFAULT
        }
    }

    /// Creates a configuration builder.
    #[must_use]
    pub const fn builder() -> ParserConfigBuilder {
        ParserConfigBuilder::new()
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Builder for [`ParserConfig`].
#[derive(Debug, Clone, Copy)]
pub struct ParserConfigBuilder {
    newline: Newline,
    max_comment_depth: usize,
}

impl ParserConfigBuilder {
    /// Creates a builder with the strict defaults.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            newline: Newline::Strict,
            max_comment_depth: ParserConfig::DEFAULT_MAX_COMMENT_DEPTH,
        }
    }

    /// Sets the accepted line breaks.
    #[must_use]
    pub const fn newline(mut self, newline: Newline) -> Self {
        self.newline = newline;
        self
    }

    /// Sets the comment nesting limit.
    ///
    /// A limit of zero rejects every comment.
    #[must_use]
    pub const fn max_comment_depth(mut self, depth: usize) -> Self {
        self.max_comment_depth = depth;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub const fn build(self) -> ParserConfig {
        ParserConfig {
            newline: self.newline,
            max_comment_depth: self.max_comment_depth,
        }
    }
}

impl Default for ParserConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_strict() {
        let config = ParserConfig::default();
        assert_eq!(config.newline, Newline::Strict);
        assert_eq!(config.max_comment_depth, 64);
    }

    #[test]
    fn test_stored_is_lenient() {
        assert_eq!(ParserConfig::stored().newline, Newline::Lenient);
    }

    #[test]
    fn test_builder() {
        let config = ParserConfig::builder()
            .newline(Newline::Lenient)
            .max_comment_depth(3)
            .build();
        assert_eq!(config.newline, Newline::Lenient);
        assert_eq!(config.max_comment_depth, 3);
    }
}
