//! Reader configuration (`spec.md` §4.2.4 / §6.5).

pub use rdn_lexer::{CommentHandling, DEFAULT_MAX_TOKEN_SIZE};

/// Default maximum container nesting depth (`spec.md` §3.3 invariant 2).
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Configuration accepted by [`crate::Reader::new`].
#[derive(Clone, Copy, Debug)]
pub struct ReaderOptions {
    /// Nesting deeper than this raises [`rdn_diagnostic::RdnError::DepthExceeded`].
    pub max_depth: usize,
    /// When `true`, one trailing `,` before any closing delimiter is
    /// tolerated instead of being a structural error.
    pub allow_trailing_commas: bool,
    /// Whether `// …` and `/* … */` are a lexical error or silently skipped.
    pub comment_handling: CommentHandling,
    /// When `true`, successive top-level values are permitted (each
    /// separated by whitespace/comments) instead of requiring exactly one
    /// value followed by end-of-input.
    pub allow_multiple_values: bool,
    /// A single token's byte span longer than this raises
    /// [`rdn_diagnostic::RdnError::LimitExceeded`] (`spec.md` §7.7).
    pub max_token_size: u32,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        ReaderOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            allow_trailing_commas: false,
            comment_handling: CommentHandling::Disallow,
            allow_multiple_values: false,
            max_token_size: DEFAULT_MAX_TOKEN_SIZE,
        }
    }
}
