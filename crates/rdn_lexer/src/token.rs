//! A cooked token: a decoded literal value (or bare punctuation) plus its
//! raw source span. One layer above [`rdn_lexer_core::RawToken`] — this is
//! what `rdn_reader` actually consumes.

use crate::value::{DurationValue, NumberValue, RegExpValue, TimeOnlyValue};
use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use rdn_diagnostic::Span;

/// A cooked token kind. Punctuation is still bare here — `rdn_reader` is
/// the layer that knows which punctuation is legal in which container.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Eof,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Colon,
    Comma,
    FatArrow,
    True,
    False,
    Null,
    /// The bare `Map` keyword, legal only immediately before `{`.
    MapKeyword,
    /// The bare `Set` keyword, legal only immediately before `{`.
    SetKeyword,
    String(String),
    Number(NumberValue),
    BigInteger(BigInt),
    DateTime(DateTime<Utc>),
    TimeOnly(TimeOnlyValue),
    Duration(DurationValue),
    Binary(Vec<u8>),
    RegExp(RegExpValue),
}

/// A cooked token: its kind plus the raw byte span it was decoded from.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}
