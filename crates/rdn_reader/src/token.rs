//! The reader's token stream shape (`spec.md` §4.1, token kinds list).
//!
//! This is one layer above [`rdn_lexer::Token`]: punctuation that the
//! container grammar has consumed (`:`/`,`) does not appear here at all,
//! and `{`/`}` have been resolved into the concrete container kind they
//! opened/closed.

use rdn_diagnostic::Span;
use rdn_lexer::{DurationValue, NumberValue, RegExpValue, TimeOnlyValue};

/// A resolved structural/value token, as produced by [`crate::Reader::read`].
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    /// Before the first [`crate::Reader::read`] call, and after a clean
    /// end-of-input.
    None,
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    StartTuple,
    EndTuple,
    StartSet,
    EndSet,
    StartMap,
    EndMap,
    /// An Object member's key. Distinct from [`TokenKind::String`] so a
    /// consumer walking the raw token stream can tell key position from
    /// value position without tracking the container stack itself.
    PropertyName(String),
    /// The Map `=>` separator between key and value.
    MapArrow,
    String(String),
    Number(NumberValue),
    True,
    False,
    Null,
    BigInteger(num_bigint::BigInt),
    DateTime(chrono::DateTime<chrono::Utc>),
    TimeOnly(TimeOnlyValue),
    Duration(DurationValue),
    Binary(Vec<u8>),
    RegExp(RegExpValue),
}

impl TokenKind {
    /// `true` for every `Start*` variant, used by callers that want to
    /// track depth without matching on the specific container kind.
    pub fn is_container_start(&self) -> bool {
        matches!(
            self,
            TokenKind::StartObject
                | TokenKind::StartArray
                | TokenKind::StartTuple
                | TokenKind::StartSet
                | TokenKind::StartMap
        )
    }

    /// `true` for every `End*` variant.
    pub fn is_container_end(&self) -> bool {
        matches!(
            self,
            TokenKind::EndObject
                | TokenKind::EndArray
                | TokenKind::EndTuple
                | TokenKind::EndSet
                | TokenKind::EndMap
        )
    }
}

/// One token: its kind plus the raw source span it covers.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }

    /// The sentinel pre-start/post-end token.
    pub fn none() -> Self {
        Token {
            kind: TokenKind::None,
            span: Span::DUMMY,
        }
    }
}
