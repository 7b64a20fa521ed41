//! Byte-level dispatch: given a cursor, recognize the next raw token.
//!
//! The scanner is deliberately dumb: it classifies and measures, it never
//! decodes. `"A"` and `"A"` both produce `RawTag::String { terminated:
//! true }` tokens; telling them apart is the cooking layer's job
//! (`rdn_lexer`). This split mirrors a raw/cooked lexer pair: the raw layer
//! stays small and reusable, the cooked layer owns every spec-mandated
//! decoding rule.

use crate::{Cursor, RawTag, RawToken};

/// Scan the next raw token starting at the cursor's current position.
/// Leaves the cursor positioned just past the token. Returns a zero-length
/// `Eof` token without moving the cursor if already at EOF.
pub fn next_token(cursor: &mut Cursor<'_>) -> RawToken {
    if cursor.is_eof() {
        return RawToken::new(RawTag::Eof, 0);
    }

    let start = cursor.pos();
    let b = cursor.current();

    match b {
        b' ' | b'\t' | b'\r' | b'\n' => {
            cursor.eat_whitespace();
            RawToken::new(RawTag::Whitespace, cursor.pos() - start)
        }
        b'{' => single(cursor, RawTag::LBrace),
        b'}' => single(cursor, RawTag::RBrace),
        b'[' => single(cursor, RawTag::LBracket),
        b']' => single(cursor, RawTag::RBracket),
        b'(' => single(cursor, RawTag::LParen),
        b')' => single(cursor, RawTag::RParen),
        b':' => single(cursor, RawTag::Colon),
        b',' => single(cursor, RawTag::Comma),
        b'=' if cursor.peek() == b'>' => {
            cursor.advance_n(2);
            RawToken::new(RawTag::FatArrow, 2)
        }
        b'"' => string(cursor, start),
        b'/' if cursor.peek() == b'/' => line_comment(cursor, start),
        b'/' if cursor.peek() == b'*' => block_comment(cursor, start),
        b'/' => regex(cursor, start),
        b'@' => at_literal(cursor, start),
        b'b' if cursor.peek() == b'"' => {
            cursor.advance();
            binary(cursor, start, false)
        }
        b'x' if cursor.peek() == b'"' => {
            cursor.advance();
            binary(cursor, start, true)
        }
        b'-' if cursor.peek().is_ascii_digit() => number(cursor, start),
        b'-' if cursor.peek().is_ascii_alphabetic() => ident(cursor, start),
        b'0'..=b'9' => number(cursor, start),
        b'A'..=b'Z' | b'a'..=b'z' | b'_' => ident(cursor, start),
        _ => {
            cursor.advance_char();
            RawToken::new(RawTag::Unknown, cursor.pos() - start)
        }
    }
}

#[inline]
fn single(cursor: &mut Cursor<'_>, tag: RawTag) -> RawToken {
    cursor.advance();
    RawToken::new(tag, 1)
}

fn line_comment(cursor: &mut Cursor<'_>, start: u32) -> RawToken {
    cursor.advance_n(2); // "//"
    cursor.eat_until_newline_or_eof();
    RawToken::new(RawTag::LineComment, cursor.pos() - start)
}

fn block_comment(cursor: &mut Cursor<'_>, start: u32) -> RawToken {
    cursor.advance_n(2); // "/*"
    loop {
        if cursor.is_eof() {
            return RawToken::new(RawTag::BlockComment { terminated: false }, cursor.pos() - start);
        }
        if cursor.current() == b'*' && cursor.peek() == b'/' {
            cursor.advance_n(2);
            return RawToken::new(RawTag::BlockComment { terminated: true }, cursor.pos() - start);
        }
        cursor.advance_char();
    }
}

/// Bare word: optionally one leading `-` (to cover `-Infinity`), then
/// `[A-Za-z_][A-Za-z0-9_]*`.
fn ident(cursor: &mut Cursor<'_>, start: u32) -> RawToken {
    if cursor.current() == b'-' {
        cursor.advance();
    }
    cursor.eat_while(|b| b.is_ascii_alphanumeric() || b == b'_');
    RawToken::new(RawTag::Ident, cursor.pos() - start)
}

/// JSON-grammar number, with the `-?[0-9]+n` big-integer extension folded
/// in: a bare integer immediately followed by `n` (no fraction, no
/// exponent) is tagged `BigInteger` instead of `Number`.
fn number(cursor: &mut Cursor<'_>, start: u32) -> RawToken {
    if cursor.current() == b'-' {
        cursor.advance();
    }

    if cursor.current() == b'0' {
        cursor.advance();
    } else {
        cursor.eat_while(|b| b.is_ascii_digit());
    }

    if cursor.current() == b'n' {
        cursor.advance();
        return RawToken::new(RawTag::BigInteger, cursor.pos() - start);
    }

    if cursor.current() == b'.' && cursor.peek().is_ascii_digit() {
        cursor.advance();
        cursor.eat_while(|b| b.is_ascii_digit());
    }

    if matches!(cursor.current(), b'e' | b'E') {
        let checkpoint = *cursor;
        cursor.advance();
        if matches!(cursor.current(), b'+' | b'-') {
            cursor.advance();
        }
        if cursor.current().is_ascii_digit() {
            cursor.eat_while(|b| b.is_ascii_digit());
        } else {
            *cursor = checkpoint;
        }
    }

    RawToken::new(RawTag::Number, cursor.pos() - start)
}

/// `"…"` with backslash escapes skipped over (not decoded — the raw
/// scanner just needs to not stop early on an escaped quote).
fn string(cursor: &mut Cursor<'_>, start: u32) -> RawToken {
    cursor.advance(); // opening quote
    loop {
        match cursor.skip_to_string_delim() {
            0 => return RawToken::new(RawTag::String { terminated: false }, cursor.pos() - start),
            b'"' => {
                cursor.advance();
                return RawToken::new(RawTag::String { terminated: true }, cursor.pos() - start);
            }
            b'\\' => {
                cursor.advance(); // the backslash
                if cursor.is_eof() {
                    return RawToken::new(
                        RawTag::String { terminated: false },
                        cursor.pos() - start,
                    );
                }
                cursor.advance_char(); // the escaped byte/char itself
            }
            _ => unreachable!("skip_to_string_delim only stops on '\"', '\\\\', or EOF"),
        }
    }
}

/// `b"…"` (base64) or `x"…"` (hex). Same terminator search as a plain
/// string; the content is opaque to the raw layer either way.
fn binary(cursor: &mut Cursor<'_>, start: u32, hex: bool) -> RawToken {
    cursor.advance(); // opening quote; caller already consumed the 'b'/'x'
    loop {
        match cursor.skip_to_string_delim() {
            0 => {
                return RawToken::new(
                    RawTag::Binary {
                        hex,
                        terminated: false,
                    },
                    cursor.pos() - start,
                )
            }
            b'"' => {
                cursor.advance();
                return RawToken::new(
                    RawTag::Binary {
                        hex,
                        terminated: true,
                    },
                    cursor.pos() - start,
                );
            }
            b'\\' => {
                // Binary bodies do not process escapes, but a stray backslash
                // inside one is still not a quote; keep scanning past it so
                // the loop can't spin on the same byte forever.
                cursor.advance();
            }
            _ => unreachable!("skip_to_string_delim only stops on '\"', '\\\\', or EOF"),
        }
    }
}

/// `/pattern/flags`. The pattern runs to the first unescaped `/`; flags are
/// the bare-word run immediately following.
fn regex(cursor: &mut Cursor<'_>, start: u32) -> RawToken {
    cursor.advance(); // opening '/'
    let hit = cursor.skip_to_regex_delim();
    if hit != b'/' {
        return RawToken::new(RawTag::Regex { terminated: false }, cursor.pos() - start);
    }
    cursor.advance(); // closing '/'
    cursor.eat_while(|b| b.is_ascii_alphabetic());
    RawToken::new(RawTag::Regex { terminated: true }, cursor.pos() - start)
}

/// `@` followed by the temporal literal's body. The body alphabet covers
/// every form in §4.1.3: digits, `-`, `:`, `.`, and the ISO period letters
/// `PYMDTHS`, all of which are ASCII letters already admitted by the
/// alphanumeric check.
fn at_literal(cursor: &mut Cursor<'_>, start: u32) -> RawToken {
    cursor.advance(); // '@'
    if cursor.current() == b'-' {
        cursor.advance(); // leading '-' of a negative Duration
    }
    cursor.eat_while(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b':' || b == b'.');
    RawToken::new(RawTag::At, cursor.pos() - start)
}
