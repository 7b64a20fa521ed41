//! The pull-style structural reader (`spec.md` §4.2).
//!
//! `Reader::read` advances to the next token and returns `true`, or
//! `false` at a clean end-of-input — mirroring the semantics the spec
//! lays out in §4.5 (a fault leaves the reader's position undefined; the
//! consumer is expected to discard it).

use crate::container::{ContainerKind, Frame, FrameState};
use crate::lookahead::{resolve_brace, Resolution};
use crate::options::ReaderOptions;
use crate::token::{Token, TokenKind};
use rdn_diagnostic::{RdnError, Span};
use rdn_lexer::{Lexer, Token as LexToken, TokenKind as LexKind};
use rdn_lexer_core::SourceBuffer;

/// Pull-style structural reader over one RDN document.
///
/// Not `Send`/`Sync` by omission of any such impl — per `spec.md` §5, a
/// reader is single-threaded-cooperative and not shareable across threads.
#[derive(Clone)]
pub struct Reader<'a> {
    lexer: Lexer<'a>,
    options: ReaderOptions,
    stack: Vec<Frame>,
    current: Token,
    produced_root: bool,
}

impl<'a> Reader<'a> {
    pub fn new(source: &'a SourceBuffer, options: ReaderOptions) -> Self {
        Reader {
            lexer: Lexer::new(source.cursor(), options.comment_handling)
                .with_max_token_size(options.max_token_size),
            options,
            stack: Vec::new(),
            current: Token::none(),
            produced_root: false,
        }
    }

    /// The token produced by the most recent [`Self::read`] call, or the
    /// pre-start/post-end sentinel if `read` has not been called yet (or
    /// last returned `false`).
    pub fn current(&self) -> &Token {
        &self.current
    }

    /// Current container nesting depth (0 at the top level).
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The next token's kind, without consuming it. A cheap clone-and-scan
    /// of the reader's own state (`spec.md` §6.2).
    pub fn peek_token(&self) -> Result<TokenKind, RdnError> {
        let mut probe = self.clone();
        probe.read()?;
        Ok(probe.current.kind)
    }

    /// Advance to the next token. Returns `true` if a token was produced,
    /// `false` at a clean end-of-input. Any `Err` leaves `self` in an
    /// undefined state — discard the reader (`spec.md` §4.5).
    pub fn read(&mut self) -> Result<bool, RdnError> {
        match self.advance()? {
            Some(tok) => {
                self.current = tok;
                Ok(true)
            }
            None => {
                self.current = Token::none();
                Ok(false)
            }
        }
    }

    fn advance(&mut self) -> Result<Option<Token>, RdnError> {
        if !self.stack.is_empty() {
            self.advance_within_container()
        } else {
            self.advance_top_level()
        }
    }

    fn advance_top_level(&mut self) -> Result<Option<Token>, RdnError> {
        if !self.produced_root {
            let tok = self.read_value()?;
            self.produced_root = true;
            return Ok(Some(tok));
        }

        if self.options.allow_multiple_values {
            let mut probe = self.lexer.clone();
            let peek = probe.next_token()?;
            if matches!(peek.kind, LexKind::Eof) {
                return Ok(None);
            }
            let tok = self.read_value()?;
            return Ok(Some(tok));
        }

        let tail = self.lexer.next_token()?;
        match tail.kind {
            LexKind::Eof => Ok(None),
            other => Err(RdnError::Structural {
                span: tail.span,
                message: format!("unexpected trailing content after the document: {other:?}"),
            }),
        }
    }

    fn read_value(&mut self) -> Result<Token, RdnError> {
        let tok = self.lexer.next_token()?;
        self.dispatch_value_token(tok)
    }

    /// Turn an already-lexed token into a reader [`Token`], opening a
    /// container frame (pushed onto `self.stack`) if it starts one.
    fn dispatch_value_token(&mut self, tok: LexToken) -> Result<Token, RdnError> {
        match tok.kind {
            LexKind::LBracket => self.open_container(ContainerKind::Array, tok.span),
            LexKind::LParen => self.open_container(ContainerKind::Tuple, tok.span),
            LexKind::LBrace => self.open_ambiguous_brace(tok.span),
            LexKind::MapKeyword => self.open_explicit(ContainerKind::Map, tok.span),
            LexKind::SetKeyword => self.open_explicit(ContainerKind::Set, tok.span),
            LexKind::String(s) => Ok(Token::new(TokenKind::String(s), tok.span)),
            LexKind::Number(n) => Ok(Token::new(TokenKind::Number(n), tok.span)),
            LexKind::True => Ok(Token::new(TokenKind::True, tok.span)),
            LexKind::False => Ok(Token::new(TokenKind::False, tok.span)),
            LexKind::Null => Ok(Token::new(TokenKind::Null, tok.span)),
            LexKind::BigInteger(b) => Ok(Token::new(TokenKind::BigInteger(b), tok.span)),
            LexKind::DateTime(d) => Ok(Token::new(TokenKind::DateTime(d), tok.span)),
            LexKind::TimeOnly(t) => Ok(Token::new(TokenKind::TimeOnly(t), tok.span)),
            LexKind::Duration(d) => Ok(Token::new(TokenKind::Duration(d), tok.span)),
            LexKind::Binary(b) => Ok(Token::new(TokenKind::Binary(b), tok.span)),
            LexKind::RegExp(r) => Ok(Token::new(TokenKind::RegExp(r), tok.span)),
            LexKind::Eof => Err(RdnError::UnexpectedEndOfInput { span: tok.span }),
            other => Err(RdnError::Structural {
                span: tok.span,
                message: format!("expected a value, found {other:?}"),
            }),
        }
    }

    fn open_container(&mut self, kind: ContainerKind, span: Span) -> Result<Token, RdnError> {
        let new_depth = self.stack.len() + 1;
        if new_depth > self.options.max_depth {
            tracing::debug!(max_depth = self.options.max_depth, "depth exceeded");
            return Err(RdnError::DepthExceeded {
                span,
                max_depth: self.options.max_depth,
            });
        }
        self.stack.push(Frame::new(kind));
        Ok(Token::new(start_kind(kind), span))
    }

    /// Resolve an ambiguous `{` via bounded one-value lookahead (`spec.md`
    /// §4.2.2), then open the resolved container kind.
    fn open_ambiguous_brace(&mut self, span: Span) -> Result<Token, RdnError> {
        let lookahead = self.lexer.clone();
        let kind = match resolve_brace(lookahead)? {
            Resolution::EmptyObject | Resolution::Object => ContainerKind::Object,
            Resolution::Map => ContainerKind::Map,
            Resolution::Set => ContainerKind::Set,
        };
        self.open_container(kind, span)
    }

    /// `Map{`/`Set{`: the keyword skips the undetermined state entirely
    /// (`spec.md` §4.2.2) and is the only way to write an empty Map/Set.
    fn open_explicit(&mut self, kind: ContainerKind, keyword_span: Span) -> Result<Token, RdnError> {
        let _ = keyword_span; // informative only; the '{' span drives the produced token
        let opener = self.lexer.next_token()?;
        match opener.kind {
            LexKind::LBrace => self.open_container(kind, opener.span),
            LexKind::Eof => Err(RdnError::UnexpectedEndOfInput { span: opener.span }),
            other => Err(RdnError::Structural {
                span: opener.span,
                message: format!(
                    "expected '{{' after the {} keyword, found {other:?}",
                    container_name(kind)
                ),
            }),
        }
    }

    fn advance_within_container(&mut self) -> Result<Option<Token>, RdnError> {
        let frame_idx = self.stack.len() - 1;
        let frame = self.stack[frame_idx];
        let tok = match frame.state {
            FrameState::Start => self.step_start(frame_idx, frame.kind)?,
            FrameState::AfterPropertyName => self.step_after_property_name(frame_idx)?,
            FrameState::AfterColon => self.step_value(frame_idx)?,
            FrameState::AfterKey => self.step_after_key(frame_idx)?,
            FrameState::AfterArrow => self.step_value(frame_idx)?,
            FrameState::AfterElement => self.step_after_element(frame_idx, frame.kind)?,
            FrameState::AfterComma => self.step_after_comma(frame_idx, frame.kind)?,
        };
        Ok(Some(tok))
    }

    fn step_start(&mut self, frame_idx: usize, kind: ContainerKind) -> Result<Token, RdnError> {
        let tok = self.lexer.next_token()?;
        if is_closer_for(kind, &tok.kind) {
            return self.close_frame(frame_idx, kind, tok.span);
        }
        match kind {
            ContainerKind::Object => self.begin_property_name(frame_idx, tok),
            ContainerKind::Map => {
                let value_tok = self.dispatch_value_token(tok)?;
                self.stack[frame_idx].state = FrameState::AfterKey;
                Ok(value_tok)
            }
            ContainerKind::Set | ContainerKind::Array | ContainerKind::Tuple => {
                let value_tok = self.dispatch_value_token(tok)?;
                self.stack[frame_idx].state = FrameState::AfterElement;
                Ok(value_tok)
            }
        }
    }

    fn begin_property_name(&mut self, frame_idx: usize, tok: LexToken) -> Result<Token, RdnError> {
        match tok.kind {
            LexKind::String(s) => {
                self.stack[frame_idx].state = FrameState::AfterPropertyName;
                Ok(Token::new(TokenKind::PropertyName(s), tok.span))
            }
            LexKind::Eof => Err(RdnError::UnexpectedEndOfInput { span: tok.span }),
            other => Err(RdnError::Structural {
                span: tok.span,
                message: format!(
                    "expected an object property name (a quoted string), found {other:?}"
                ),
            }),
        }
    }

    fn step_after_property_name(&mut self, frame_idx: usize) -> Result<Token, RdnError> {
        let colon = self.lexer.next_token()?;
        match colon.kind {
            LexKind::Colon => {}
            LexKind::Eof => return Err(RdnError::UnexpectedEndOfInput { span: colon.span }),
            other => {
                return Err(RdnError::Structural {
                    span: colon.span,
                    message: format!("expected ':' after object property name, found {other:?}"),
                })
            }
        }
        self.step_value(frame_idx)
    }

    /// Read a value token in key/value position and advance to
    /// `AfterElement`. Shared by Object-value (`AfterColon`) and Map-value
    /// (`AfterArrow`) states.
    fn step_value(&mut self, frame_idx: usize) -> Result<Token, RdnError> {
        let tok = self.lexer.next_token()?;
        let value_tok = self.dispatch_value_token(tok)?;
        self.stack[frame_idx].state = FrameState::AfterElement;
        Ok(value_tok)
    }

    fn step_after_key(&mut self, frame_idx: usize) -> Result<Token, RdnError> {
        let arrow = self.lexer.next_token()?;
        match arrow.kind {
            LexKind::FatArrow => {
                self.stack[frame_idx].state = FrameState::AfterArrow;
                Ok(Token::new(TokenKind::MapArrow, arrow.span))
            }
            LexKind::Eof => Err(RdnError::UnexpectedEndOfInput { span: arrow.span }),
            other => Err(RdnError::Structural {
                span: arrow.span,
                message: format!("expected '=>' after a map key, found {other:?}"),
            }),
        }
    }

    fn step_after_element(&mut self, frame_idx: usize, kind: ContainerKind) -> Result<Token, RdnError> {
        let tok = self.lexer.next_token()?;
        if is_closer_for(kind, &tok.kind) {
            return self.close_frame(frame_idx, kind, tok.span);
        }
        match tok.kind {
            LexKind::Comma => {
                self.stack[frame_idx].state = FrameState::AfterComma;
                self.step_after_comma(frame_idx, kind)
            }
            LexKind::Eof => Err(RdnError::UnexpectedEndOfInput { span: tok.span }),
            other => Err(RdnError::Structural {
                span: tok.span,
                message: format!("expected ',' or a closing delimiter, found {other:?}"),
            }),
        }
    }

    fn step_after_comma(&mut self, frame_idx: usize, kind: ContainerKind) -> Result<Token, RdnError> {
        if self.options.allow_trailing_commas {
            let mut probe = self.lexer.clone();
            let peek = probe.next_token()?;
            if is_closer_for(kind, &peek.kind) {
                let tok = self.lexer.next_token()?;
                return self.close_frame(frame_idx, kind, tok.span);
            }
        }

        match kind {
            ContainerKind::Object => {
                let tok = self.lexer.next_token()?;
                self.begin_property_name(frame_idx, tok)
            }
            ContainerKind::Map => {
                let tok = self.lexer.next_token()?;
                let value_tok = self.dispatch_value_token(tok)?;
                self.stack[frame_idx].state = FrameState::AfterKey;
                Ok(value_tok)
            }
            ContainerKind::Set | ContainerKind::Array | ContainerKind::Tuple => {
                let tok = self.lexer.next_token()?;
                let value_tok = self.dispatch_value_token(tok)?;
                self.stack[frame_idx].state = FrameState::AfterElement;
                Ok(value_tok)
            }
        }
    }

    fn close_frame(&mut self, frame_idx: usize, kind: ContainerKind, span: Span) -> Result<Token, RdnError> {
        debug_assert_eq!(frame_idx, self.stack.len() - 1);
        self.stack.pop();
        Ok(Token::new(end_kind(kind), span))
    }
}

fn is_closer_for(kind: ContainerKind, lex: &LexKind) -> bool {
    matches!(
        (kind, lex),
        (
            ContainerKind::Object | ContainerKind::Map | ContainerKind::Set,
            LexKind::RBrace
        ) | (ContainerKind::Array, LexKind::RBracket)
            | (ContainerKind::Tuple, LexKind::RParen)
    )
}

fn start_kind(kind: ContainerKind) -> TokenKind {
    match kind {
        ContainerKind::Object => TokenKind::StartObject,
        ContainerKind::Map => TokenKind::StartMap,
        ContainerKind::Set => TokenKind::StartSet,
        ContainerKind::Array => TokenKind::StartArray,
        ContainerKind::Tuple => TokenKind::StartTuple,
    }
}

fn end_kind(kind: ContainerKind) -> TokenKind {
    match kind {
        ContainerKind::Object => TokenKind::EndObject,
        ContainerKind::Map => TokenKind::EndMap,
        ContainerKind::Set => TokenKind::EndSet,
        ContainerKind::Array => TokenKind::EndArray,
        ContainerKind::Tuple => TokenKind::EndTuple,
    }
}

fn container_name(kind: ContainerKind) -> &'static str {
    match kind {
        ContainerKind::Object => "Object",
        ContainerKind::Map => "Map",
        ContainerKind::Set => "Set",
        ContainerKind::Array => "Array",
        ContainerKind::Tuple => "Tuple",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn read_all(source: &str, options: ReaderOptions) -> Result<Vec<TokenKind>, RdnError> {
        let buf = SourceBuffer::new(source);
        let mut reader = Reader::new(&buf, options);
        let mut out = Vec::new();
        while reader.read()? {
            out.push(reader.current().kind.clone());
        }
        Ok(out)
    }

    #[test]
    fn empty_object() {
        let kinds = read_all("{}", ReaderOptions::default()).unwrap();
        assert_eq!(kinds, vec![TokenKind::StartObject, TokenKind::EndObject]);
    }

    #[test]
    fn object_with_colon() {
        let kinds = read_all(r#"{"a": 1}"#, ReaderOptions::default()).unwrap();
        assert_eq!(
            kinds,
            vec![
                TokenKind::StartObject,
                TokenKind::PropertyName("a".to_string()),
                TokenKind::Number(rdn_lexer::NumberValue::Finite(1.0)),
                TokenKind::EndObject,
            ]
        );
    }

    #[test]
    fn implicit_map_with_arrow() {
        let kinds = read_all(r#"{"a" => 1}"#, ReaderOptions::default()).unwrap();
        assert_eq!(
            kinds,
            vec![
                TokenKind::StartMap,
                TokenKind::String("a".to_string()),
                TokenKind::MapArrow,
                TokenKind::Number(rdn_lexer::NumberValue::Finite(1.0)),
                TokenKind::EndMap,
            ]
        );
    }

    #[test]
    fn implicit_set_with_comma() {
        let kinds = read_all(r#"{"a", "b"}"#, ReaderOptions::default()).unwrap();
        assert_eq!(
            kinds,
            vec![
                TokenKind::StartSet,
                TokenKind::String("a".to_string()),
                TokenKind::String("b".to_string()),
                TokenKind::EndSet,
            ]
        );
    }

    #[test]
    fn single_bare_value_is_set() {
        let kinds = read_all(r#"{ "x" }"#, ReaderOptions::default()).unwrap();
        assert_eq!(
            kinds,
            vec![
                TokenKind::StartSet,
                TokenKind::String("x".to_string()),
                TokenKind::EndSet,
            ]
        );
    }

    #[test]
    fn explicit_empty_map_and_set() {
        assert_eq!(
            read_all("Map{}", ReaderOptions::default()).unwrap(),
            vec![TokenKind::StartMap, TokenKind::EndMap]
        );
        assert_eq!(
            read_all("Set{}", ReaderOptions::default()).unwrap(),
            vec![TokenKind::StartSet, TokenKind::EndSet]
        );
    }

    #[test]
    fn nested_array_and_tuple() {
        let kinds = read_all(r#"[1, (2, "x")]"#, ReaderOptions::default()).unwrap();
        assert_eq!(
            kinds,
            vec![
                TokenKind::StartArray,
                TokenKind::Number(rdn_lexer::NumberValue::Finite(1.0)),
                TokenKind::StartTuple,
                TokenKind::Number(rdn_lexer::NumberValue::Finite(2.0)),
                TokenKind::String("x".to_string()),
                TokenKind::EndTuple,
                TokenKind::EndArray,
            ]
        );
    }

    #[test]
    fn map_with_array_key() {
        let kinds = read_all(r#"{ [1,2] => "pair" }"#, ReaderOptions::default()).unwrap();
        assert_eq!(kinds[0], TokenKind::StartMap);
        assert_eq!(kinds[1], TokenKind::StartArray);
        assert!(kinds.contains(&TokenKind::MapArrow));
    }

    #[test]
    fn depth_exceeded() {
        let mut options = ReaderOptions::default();
        options.max_depth = 2;
        let err = read_all("[[[1]]]", options).unwrap_err();
        assert!(matches!(err, RdnError::DepthExceeded { max_depth: 2, .. }));
    }

    #[test]
    fn trailing_comma_rejected_by_default() {
        let err = read_all("[1, 2,]", ReaderOptions::default()).unwrap_err();
        assert!(matches!(err, RdnError::Structural { .. }));
    }

    #[test]
    fn trailing_comma_allowed_when_enabled() {
        let mut options = ReaderOptions::default();
        options.allow_trailing_commas = true;
        let kinds = read_all("(1, 2,)", options).unwrap();
        assert_eq!(
            kinds,
            vec![
                TokenKind::StartTuple,
                TokenKind::Number(rdn_lexer::NumberValue::Finite(1.0)),
                TokenKind::Number(rdn_lexer::NumberValue::Finite(2.0)),
                TokenKind::EndTuple,
            ]
        );
    }

    #[test]
    fn mismatched_object_key_is_structural_error() {
        let err = read_all("{1: 2}", ReaderOptions::default()).unwrap_err();
        assert!(matches!(err, RdnError::Structural { .. }));
    }

    #[test]
    fn trailing_content_without_multiple_values_fails() {
        let err = read_all("1 2", ReaderOptions::default()).unwrap_err();
        assert!(matches!(err, RdnError::Structural { .. }));
    }

    #[test]
    fn allow_multiple_values_reads_successive_documents() {
        let mut options = ReaderOptions::default();
        options.allow_multiple_values = true;
        let kinds = read_all("1 2 3", options).unwrap();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Number(rdn_lexer::NumberValue::Finite(1.0)),
                TokenKind::Number(rdn_lexer::NumberValue::Finite(2.0)),
                TokenKind::Number(rdn_lexer::NumberValue::Finite(3.0)),
            ]
        );
    }

    #[test]
    fn peek_does_not_consume() {
        let buf = SourceBuffer::new("[1, 2]");
        let mut reader = Reader::new(&buf, ReaderOptions::default());
        assert!(reader.read().unwrap());
        assert_eq!(reader.current().kind, TokenKind::StartArray);
        let peeked = reader.peek_token().unwrap();
        assert_eq!(peeked, TokenKind::Number(rdn_lexer::NumberValue::Finite(1.0)));
        assert!(reader.read().unwrap());
        assert_eq!(reader.current().kind, TokenKind::Number(rdn_lexer::NumberValue::Finite(1.0)));
    }

    #[test]
    fn comment_skip_mode() {
        let mut options = ReaderOptions::default();
        options.comment_handling = crate::options::CommentHandling::Skip;
        let kinds = read_all("[1, /* c */ 2]", options).unwrap();
        assert_eq!(
            kinds,
            vec![
                TokenKind::StartArray,
                TokenKind::Number(rdn_lexer::NumberValue::Finite(1.0)),
                TokenKind::Number(rdn_lexer::NumberValue::Finite(2.0)),
                TokenKind::EndArray,
            ]
        );
    }

    #[test]
    fn comment_disallow_mode_fails() {
        let err = read_all("[1, /* c */ 2]", ReaderOptions::default()).unwrap_err();
        assert!(matches!(err, RdnError::Lexical { .. }));
    }

    #[test]
    fn oversized_token_is_limit_exceeded() {
        let mut options = ReaderOptions::default();
        options.max_token_size = 4;
        let err = read_all(r#""much too long a string""#, options).unwrap_err();
        assert!(matches!(err, RdnError::LimitExceeded { .. }));
    }

    #[test]
    fn depth_reports_current_nesting() {
        let buf = SourceBuffer::new("[[1]]");
        let mut reader = Reader::new(&buf, ReaderOptions::default());
        reader.read().unwrap(); // StartArray
        assert_eq!(reader.depth(), 1);
        reader.read().unwrap(); // StartArray (nested)
        assert_eq!(reader.depth(), 2);
    }
}
