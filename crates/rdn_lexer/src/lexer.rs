//! Drives [`rdn_lexer_core::next_token`] and decodes each raw token into a
//! cooked [`Token`].
//!
//! The lexer is [`Clone`] (it is just a [`Cursor`] plus a mode flag, and
//! `Cursor` is itself `Copy`) so that `rdn_reader`'s bounded one-value
//! lookahead for brace disambiguation can snapshot a lexer, scan ahead
//! through it, and discard the snapshot without disturbing the original.

use crate::decode;
use crate::token::{Token, TokenKind};
use crate::value::NumberValue;
use rdn_diagnostic::{RdnError, Span};
use rdn_lexer_core::{Cursor, RawTag};

/// How the lexer treats `// …` and `/* … */` (`spec.md` §4.1.6).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CommentHandling {
    /// Comments are a lexical error (the default).
    #[default]
    Disallow,
    /// Comments are silently skipped, as if they were whitespace.
    Skip,
}

/// Default ceiling on a single token's byte span (`spec.md` §7.7: "a
/// parameter shared by reader/writer"). Generous enough that no legitimate
/// literal trips it; exists to bound work done on adversarial input.
pub const DEFAULT_MAX_TOKEN_SIZE: u32 = 64 * 1024 * 1024;

/// The cooked tokenizer. Owns nothing; borrows the source through its
/// [`Cursor`].
#[derive(Clone)]
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    comments: CommentHandling,
    max_token_size: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(cursor: Cursor<'a>, comments: CommentHandling) -> Self {
        Lexer {
            cursor,
            comments,
            max_token_size: DEFAULT_MAX_TOKEN_SIZE,
        }
    }

    /// Override the token-size ceiling (`spec.md` §7.7). Builder-style so
    /// existing `Lexer::new` call sites are unaffected by callers that don't
    /// care.
    #[must_use]
    pub fn with_max_token_size(mut self, max_token_size: u32) -> Self {
        self.max_token_size = max_token_size;
        self
    }

    /// Current byte offset, for frames/errors that need a position without
    /// a full token.
    pub fn pos(&self) -> u32 {
        self.cursor.pos()
    }

    /// Read the next cooked token, skipping whitespace and (per the
    /// configured mode) comments. Trivia is never returned to the caller —
    /// `rdn_reader`'s grammar never needs to see it.
    pub fn next_token(&mut self) -> Result<Token, RdnError> {
        loop {
            let start = self.cursor.pos();
            let raw = rdn_lexer_core::next_token(&mut self.cursor);
            let span = Span::new(start, self.cursor.pos());
            if span.len() > self.max_token_size {
                return Err(RdnError::LimitExceeded {
                    span,
                    message: format!(
                        "token of {} bytes exceeds the configured limit of {}",
                        span.len(),
                        self.max_token_size
                    ),
                });
            }
            let text = self.cursor.slice(start, self.cursor.pos());

            match raw.tag {
                RawTag::Whitespace => continue,
                RawTag::LineComment => {
                    self.handle_comment(span)?;
                    continue;
                }
                RawTag::BlockComment { terminated } => {
                    if !terminated {
                        return Err(RdnError::UnexpectedEndOfInput { span });
                    }
                    self.handle_comment(span)?;
                    continue;
                }
                RawTag::Eof => return Ok(Token::new(TokenKind::Eof, span)),
                RawTag::LBrace => return Ok(Token::new(TokenKind::LBrace, span)),
                RawTag::RBrace => return Ok(Token::new(TokenKind::RBrace, span)),
                RawTag::LBracket => return Ok(Token::new(TokenKind::LBracket, span)),
                RawTag::RBracket => return Ok(Token::new(TokenKind::RBracket, span)),
                RawTag::LParen => return Ok(Token::new(TokenKind::LParen, span)),
                RawTag::RParen => return Ok(Token::new(TokenKind::RParen, span)),
                RawTag::Colon => return Ok(Token::new(TokenKind::Colon, span)),
                RawTag::Comma => return Ok(Token::new(TokenKind::Comma, span)),
                RawTag::FatArrow => return Ok(Token::new(TokenKind::FatArrow, span)),
                RawTag::Ident => return self.cook_ident(text, span),
                RawTag::String { terminated } => return self.cook_string(text, span, terminated),
                RawTag::Number => return self.cook_number(text, span),
                RawTag::BigInteger => return self.cook_big_integer(text, span),
                RawTag::At => return self.cook_temporal(text, span),
                RawTag::Binary { hex, terminated } => {
                    return self.cook_binary(text, span, hex, terminated)
                }
                RawTag::Regex { terminated } => return self.cook_regex(text, span, terminated),
                RawTag::Unknown => {
                    return Err(RdnError::Lexical {
                        span,
                        message: format!("unexpected character '{text}'"),
                    })
                }
            }
        }
    }

    fn handle_comment(&self, span: Span) -> Result<(), RdnError> {
        match self.comments {
            CommentHandling::Skip => Ok(()),
            CommentHandling::Disallow => Err(RdnError::Lexical {
                span,
                message: "comments are disallowed by the current reader options".to_string(),
            }),
        }
    }

    fn cook_ident(&self, text: &str, span: Span) -> Result<Token, RdnError> {
        match text {
            "true" => Ok(Token::new(TokenKind::True, span)),
            "false" => Ok(Token::new(TokenKind::False, span)),
            "null" => Ok(Token::new(TokenKind::Null, span)),
            "Map" => Ok(Token::new(TokenKind::MapKeyword, span)),
            "Set" => Ok(Token::new(TokenKind::SetKeyword, span)),
            "NaN" => Ok(Token::new(TokenKind::Number(NumberValue::NaN), span)),
            "Infinity" => Ok(Token::new(TokenKind::Number(NumberValue::Infinity), span)),
            "-Infinity" => Ok(Token::new(
                TokenKind::Number(NumberValue::NegInfinity),
                span,
            )),
            other => Err(RdnError::Lexical {
                span,
                message: format!("unrecognized identifier '{other}'"),
            }),
        }
    }

    fn cook_string(&self, text: &str, span: Span, terminated: bool) -> Result<Token, RdnError> {
        if !terminated {
            return Err(RdnError::UnexpectedEndOfInput { span });
        }
        let inner = &text[1..text.len() - 1];
        let decoded =
            decode::decode_string_body(inner).map_err(|message| RdnError::Lexical { span, message })?;
        Ok(Token::new(TokenKind::String(decoded), span))
    }

    fn cook_number(&self, text: &str, span: Span) -> Result<Token, RdnError> {
        let decoded =
            decode::decode_number(text).map_err(|message| RdnError::Lexical { span, message })?;
        Ok(Token::new(TokenKind::Number(decoded), span))
    }

    fn cook_big_integer(&self, text: &str, span: Span) -> Result<Token, RdnError> {
        let digits = &text[..text.len() - 1]; // strip trailing 'n'
        let decoded = decode::decode_big_integer(digits)
            .map_err(|message| RdnError::Lexical { span, message })?;
        Ok(Token::new(TokenKind::BigInteger(decoded), span))
    }

    fn cook_temporal(&self, text: &str, span: Span) -> Result<Token, RdnError> {
        let body = &text[1..]; // strip leading '@'
        let decoded =
            decode::decode_temporal(body).map_err(|message| RdnError::Lexical { span, message })?;
        let kind = match decoded {
            decode::Temporal::DateTime(dt) => TokenKind::DateTime(dt),
            decode::Temporal::TimeOnly(t) => TokenKind::TimeOnly(t),
            decode::Temporal::Duration(d) => TokenKind::Duration(d),
        };
        Ok(Token::new(kind, span))
    }

    fn cook_binary(
        &self,
        text: &str,
        span: Span,
        hex: bool,
        terminated: bool,
    ) -> Result<Token, RdnError> {
        if !terminated {
            return Err(RdnError::UnexpectedEndOfInput { span });
        }
        let inner = &text[2..text.len() - 1]; // strip `b"`/`x"` prefix and closing quote
        let decoded = if hex {
            decode::decode_hex(inner)
        } else {
            decode::decode_base64(inner)
        }
        .map_err(|message| RdnError::Lexical { span, message })?;
        Ok(Token::new(TokenKind::Binary(decoded), span))
    }

    fn cook_regex(&self, text: &str, span: Span, terminated: bool) -> Result<Token, RdnError> {
        if !terminated {
            return Err(RdnError::UnexpectedEndOfInput { span });
        }
        let (pattern_raw, flags_raw) = split_regex_body(&text[1..])
            .ok_or_else(|| RdnError::Lexical {
                span,
                message: "malformed regex literal".to_string(),
            })?;
        let (source, flags) = decode::decode_regex(pattern_raw, flags_raw)
            .map_err(|message| RdnError::Lexical { span, message })?;
        Ok(Token::new(
            TokenKind::RegExp(crate::value::RegExpValue { source, flags }),
            span,
        ))
    }
}

/// Split the text after the opening `/` into `(pattern, flags)`, honoring
/// `\/` as a literal (non-terminating) slash — mirrors
/// [`Cursor::skip_to_regex_delim`].
fn split_regex_body(rest: &str) -> Option<(&str, &str)> {
    let bytes = rest.as_bytes();
    let mut i = 0;
    let mut escaped = false;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if !escaped => escaped = true,
            b'/' if !escaped => return Some((&rest[..i], &rest[i + 1..])),
            _ => escaped = false,
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdn_lexer_core::SourceBuffer;

    fn lex_all(source: &str) -> Vec<TokenKind> {
        let buf = SourceBuffer::new(source);
        let mut lexer = Lexer::new(buf.cursor(), CommentHandling::Disallow);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token().unwrap();
            let is_eof = matches!(tok.kind, TokenKind::Eof);
            out.push(tok.kind);
            if is_eof {
                break;
            }
        }
        out
    }

    #[test]
    fn keywords_and_literals() {
        let kinds = lex_all("true false null Map Set");
        assert_eq!(
            kinds,
            vec![
                TokenKind::True,
                TokenKind::False,
                TokenKind::Null,
                TokenKind::MapKeyword,
                TokenKind::SetKeyword,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unknown_identifier_is_lexical_error() {
        let buf = SourceBuffer::new("bogus");
        let mut lexer = Lexer::new(buf.cursor(), CommentHandling::Disallow);
        assert!(matches!(
            lexer.next_token(),
            Err(RdnError::Lexical { .. })
        ));
    }

    #[test]
    fn comment_disallowed_by_default() {
        let buf = SourceBuffer::new("// hi\n1");
        let mut lexer = Lexer::new(buf.cursor(), CommentHandling::Disallow);
        assert!(matches!(lexer.next_token(), Err(RdnError::Lexical { .. })));
    }

    #[test]
    fn comment_skipped_when_enabled() {
        let buf = SourceBuffer::new("/* c */ 1");
        let mut lexer = Lexer::new(buf.cursor(), CommentHandling::Skip);
        let tok = lexer.next_token().unwrap();
        assert_eq!(tok.kind, TokenKind::Number(NumberValue::Finite(1.0)));
    }

    #[test]
    fn oversized_token_is_limit_exceeded() {
        let source = format!(r#""{}""#, "a".repeat(100));
        let buf = SourceBuffer::new(&source);
        let mut lexer = Lexer::new(buf.cursor(), CommentHandling::Disallow).with_max_token_size(10);
        assert!(matches!(
            lexer.next_token(),
            Err(RdnError::LimitExceeded { .. })
        ));
    }

    #[test]
    fn string_round_trips_escapes() {
        let kinds = lex_all(r#""a\"b""#);
        assert_eq!(kinds[0], TokenKind::String("a\"b".to_string()));
    }

    #[test]
    fn regex_with_escaped_slash_and_flags() {
        let kinds = lex_all(r"/a\/b/gi");
        match &kinds[0] {
            TokenKind::RegExp(r) => {
                assert_eq!(r.source, "a/b");
                assert_eq!(r.flags, "gi");
            }
            other => panic!("expected RegExp, got {other:?}"),
        }
    }

    #[test]
    fn binary_hex_and_base64() {
        let kinds = lex_all(r#"x"48656c6c6f" b"SGVsbG8=""#);
        assert_eq!(kinds[0], TokenKind::Binary(b"Hello".to_vec()));
        assert_eq!(kinds[1], TokenKind::Binary(b"Hello".to_vec()));
    }

    #[test]
    fn lexer_clone_snapshots_position() {
        let buf = SourceBuffer::new("1 2 3");
        let mut lexer = Lexer::new(buf.cursor(), CommentHandling::Disallow);
        let first = lexer.next_token().unwrap();
        assert_eq!(first.kind, TokenKind::Number(NumberValue::Finite(1.0)));

        let mut lookahead = lexer.clone();
        let peeked = lookahead.next_token().unwrap();
        assert_eq!(peeked.kind, TokenKind::Number(NumberValue::Finite(2.0)));

        // Original lexer is untouched by the clone's advance.
        let second = lexer.next_token().unwrap();
        assert_eq!(second.kind, TokenKind::Number(NumberValue::Finite(2.0)));
    }
}
