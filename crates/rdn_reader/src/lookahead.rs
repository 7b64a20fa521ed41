//! The brace-disambiguation state machine (`spec.md` §4.2.2).
//!
//! `{` pushes an undetermined frame. To resolve it, the reader performs
//! bounded lookahead through *exactly one value* to find the first
//! structural separator that follows it, then rewinds. This module is
//! that lookahead: it operates on a cloned [`Lexer`] (cheap — a `Lexer` is
//! just a `Copy` cursor plus a mode flag) so the real token stream is
//! never disturbed by a resolution attempt.

use rdn_diagnostic::RdnError;
use rdn_lexer::{Lexer, Token, TokenKind as LexKind};

/// What an ambiguous `{` resolved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Resolution {
    EmptyObject,
    Object,
    Map,
    Set,
}

/// Resolve an ambiguous `{` by scanning ahead through `lookahead` (a clone
/// of the reader's real lexer, positioned just past the `{`). Does not
/// mutate the caller's lexer.
pub(crate) fn resolve_brace(mut lookahead: Lexer<'_>) -> Result<Resolution, RdnError> {
    let first = lookahead.next_token()?;
    if matches!(first.kind, LexKind::RBrace) {
        return Ok(Resolution::EmptyObject);
    }
    if matches!(first.kind, LexKind::Eof) {
        return Err(RdnError::UnexpectedEndOfInput { span: first.span });
    }

    skip_rest_of_value(&mut lookahead, &first)?;

    let separator = lookahead.next_token()?;
    match separator.kind {
        LexKind::Colon => {
            // Only a quoted string may precede `:` — this is what makes
            // the Object branch self-disambiguating from Set/Map.
            if matches!(first.kind, LexKind::String(_)) {
                Ok(Resolution::Object)
            } else {
                Err(RdnError::Structural {
                    span: first.span,
                    message: "object property names must be quoted strings".to_string(),
                })
            }
        }
        LexKind::FatArrow => Ok(Resolution::Map),
        LexKind::Comma | LexKind::RBrace => Ok(Resolution::Set),
        LexKind::Eof => Err(RdnError::UnexpectedEndOfInput {
            span: separator.span,
        }),
        other => Err(RdnError::Structural {
            span: separator.span,
            message: format!(
                "expected ':', '=>', ',', or '}}' after the first element of an ambiguous '{{' \
                 container, found {other:?}"
            ),
        }),
    }
}

/// One bracket kind, tracked generically so the lookahead can detect a
/// mismatched closer (`[…)`) without knowing RDN's higher-level grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Bracket {
    Brace,
    Bracket,
    Paren,
}

/// Given the already-consumed first token of a value, consume whatever
/// remains of that value: nothing, for an atomic literal; a
/// bracket-balanced run, for a nested container (including the explicit
/// `Map{…}`/`Set{…}` forms, where the keyword is followed by the opener).
fn skip_rest_of_value(lexer: &mut Lexer<'_>, first: &Token) -> Result<(), RdnError> {
    match &first.kind {
        LexKind::LBrace => skip_balanced(lexer, Bracket::Brace),
        LexKind::LBracket => skip_balanced(lexer, Bracket::Bracket),
        LexKind::LParen => skip_balanced(lexer, Bracket::Paren),
        LexKind::MapKeyword | LexKind::SetKeyword => {
            let opener = lexer.next_token()?;
            match opener.kind {
                LexKind::LBrace => skip_balanced(lexer, Bracket::Brace),
                LexKind::Eof => Err(RdnError::UnexpectedEndOfInput { span: opener.span }),
                other => Err(RdnError::Structural {
                    span: opener.span,
                    message: format!("expected '{{' after Map/Set keyword, found {other:?}"),
                }),
            }
        }
        LexKind::String(_)
        | LexKind::Number(_)
        | LexKind::True
        | LexKind::False
        | LexKind::Null
        | LexKind::BigInteger(_)
        | LexKind::DateTime(_)
        | LexKind::TimeOnly(_)
        | LexKind::Duration(_)
        | LexKind::Binary(_)
        | LexKind::RegExp(_) => Ok(()),
        other => Err(RdnError::Structural {
            span: first.span,
            message: format!("unexpected token {other:?} at the start of a value"),
        }),
    }
}

/// Consume tokens until the bracket opened just before this call (of kind
/// `opening`) is closed, tracking nested brackets of any kind on a stack
/// so a mismatched closer is caught immediately.
fn skip_balanced(lexer: &mut Lexer<'_>, opening: Bracket) -> Result<(), RdnError> {
    let mut stack = vec![opening];
    loop {
        let tok = lexer.next_token()?;
        match tok.kind {
            LexKind::LBrace => stack.push(Bracket::Brace),
            LexKind::LBracket => stack.push(Bracket::Bracket),
            LexKind::LParen => stack.push(Bracket::Paren),
            LexKind::RBrace => pop_matching(&mut stack, Bracket::Brace, tok.span)?,
            LexKind::RBracket => pop_matching(&mut stack, Bracket::Bracket, tok.span)?,
            LexKind::RParen => pop_matching(&mut stack, Bracket::Paren, tok.span)?,
            LexKind::Eof => return Err(RdnError::UnexpectedEndOfInput { span: tok.span }),
            _ => {}
        }
        if stack.is_empty() {
            return Ok(());
        }
    }
}

fn pop_matching(
    stack: &mut Vec<Bracket>,
    expected: Bracket,
    span: rdn_diagnostic::Span,
) -> Result<(), RdnError> {
    match stack.pop() {
        Some(actual) if actual == expected => Ok(()),
        _ => Err(RdnError::Structural {
            span,
            message: "mismatched closing delimiter".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdn_lexer::CommentHandling;
    use rdn_lexer_core::SourceBuffer;

    fn resolve(source_after_brace: &str) -> Resolution {
        let buf = SourceBuffer::new(source_after_brace);
        let lexer = Lexer::new(buf.cursor(), CommentHandling::Disallow);
        resolve_brace(lexer).unwrap()
    }

    #[test]
    fn empty_is_object() {
        assert_eq!(resolve("}"), Resolution::EmptyObject);
    }

    #[test]
    fn colon_is_object() {
        assert_eq!(resolve(r#""a": 1}"#), Resolution::Object);
    }

    #[test]
    fn arrow_is_map() {
        assert_eq!(resolve(r#""a" => 1}"#), Resolution::Map);
    }

    #[test]
    fn comma_is_set() {
        assert_eq!(resolve(r#""a", "b"}"#), Resolution::Set);
    }

    #[test]
    fn single_bare_value_is_set() {
        assert_eq!(resolve("1}"), Resolution::Set);
        assert_eq!(resolve("true}"), Resolution::Set);
        assert_eq!(resolve("NaN}"), Resolution::Set);
    }

    #[test]
    fn numeric_key_is_map() {
        assert_eq!(resolve("1 => \"a\"}"), Resolution::Map);
    }

    #[test]
    fn array_key_is_map() {
        assert_eq!(resolve("[1,2] => \"pair\"}"), Resolution::Map);
    }

    #[test]
    fn nested_object_as_first_element_is_set() {
        assert_eq!(resolve(r#"{"x": 1}, "y"}"#), Resolution::Set);
    }

    #[test]
    fn bare_value_key_without_colon_rejects_non_string_object() {
        // `1:` is not legal — only quoted strings may precede `:`.
        let buf = SourceBuffer::new("1: \"x\"}");
        let lexer = Lexer::new(buf.cursor(), CommentHandling::Disallow);
        assert!(matches!(
            resolve_brace(lexer),
            Err(RdnError::Structural { .. })
        ));
    }

    #[test]
    fn mismatched_nested_brackets_is_structural_error() {
        let buf = SourceBuffer::new("[1, 2), 3}");
        let lexer = Lexer::new(buf.cursor(), CommentHandling::Disallow);
        assert!(matches!(
            resolve_brace(lexer),
            Err(RdnError::Structural { .. })
        ));
    }
}
