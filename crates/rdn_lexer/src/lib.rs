//! Cooked tokenizer for RDN.
//!
//! Sits directly on top of [`rdn_lexer_core`]: it drives the raw byte
//! scanner and turns each [`rdn_lexer_core::RawToken`] into a decoded
//! [`Token`], applying the escape/numeric/temporal/binary/regex decoding
//! rules of `spec.md` §4.1. It does not know about containers, the
//! brace-disambiguation state machine, or property-name position — that
//! grammar lives one layer up, in `rdn_reader`.

mod decode;
mod lexer;
mod token;
pub mod value;

pub use lexer::{CommentHandling, Lexer, DEFAULT_MAX_TOKEN_SIZE};
pub use token::{Token, TokenKind};
pub use value::{DurationValue, LiteralValue, NumberValue, RegExpValue, TimeOnlyValue};

pub use decode::{decode_base64, decode_hex, encode_base64, encode_hex};
