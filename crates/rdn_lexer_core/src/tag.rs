//! Raw token tags produced by the byte-level scanner.
//!
//! A [`RawTag`] carries no decoded value and no span — only enough shape
//! information for the cooking layer (`rdn_lexer`) to know how to decode the
//! bytes it covers. This keeps the raw scanner reusable by tools that only
//! need token boundaries (a syntax highlighter, a formatter) without paying
//! for escape processing, numeric parsing, or error-message construction.

/// One raw lexical unit's classification. Paired with a byte length to form
/// a [`RawToken`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawTag {
    /// End of input. Always has length 0.
    Eof,
    /// A maximal run of space, tab, CR, or LF.
    Whitespace,
    /// `// …` up to but excluding the terminating newline or EOF.
    LineComment,
    /// `/* … */`. `terminated` is `false` if EOF was hit before `*/`.
    BlockComment { terminated: bool },
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Colon,
    Comma,
    /// `=>`, the Map key/value separator.
    FatArrow,
    /// A bare word: `[A-Za-z_][A-Za-z0-9_]*`, optionally prefixed with a
    /// single `-` (to cover the exact spelling `-Infinity`). Covers
    /// `true`, `false`, `null`, `NaN`, `Infinity`, `-Infinity`, the
    /// explicit `Map`/`Set` container keywords, and any other identifier
    /// the cooking layer rejects as unknown.
    Ident,
    /// `"…"`. `terminated` is `false` if EOF (or an unescaped control byte)
    /// was hit before the closing quote.
    String { terminated: bool },
    /// A JSON-grammar number: optional `-`, integer part, optional
    /// fractional part, optional exponent.
    Number,
    /// A digit run immediately followed by a bare `n`: `-?[0-9]+n`.
    BigInteger,
    /// `@` followed by a run of `[A-Za-z0-9:.\-]` — the body of a temporal
    /// literal. The cooking layer dispatches on the body's shape (§4.1.3).
    At,
    /// `b"…"` or `x"…"`. `terminated` mirrors [`String`](Self::String).
    Binary { hex: bool, terminated: bool },
    /// `/pattern/flags`. `terminated` is `false` if EOF was hit before the
    /// closing `/` that ends the pattern.
    Regex { terminated: bool },
    /// One UTF-8 character the raw scanner does not recognize as the start
    /// of any other token (e.g. a stray `#`). Length is the width of that
    /// one character, 1 to 4 bytes.
    Unknown,
}

/// One raw token: a classification plus its byte length. The scanner's
/// caller tracks the starting offset, since the scanner itself is a pure
/// `&mut Cursor -> RawToken` function with no span state of its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawToken {
    pub tag: RawTag,
    pub len: u32,
}

impl RawToken {
    pub(crate) fn new(tag: RawTag, len: u32) -> Self {
        Self { tag, len }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_token_is_small() {
        assert!(std::mem::size_of::<RawToken>() <= 12);
    }
}
