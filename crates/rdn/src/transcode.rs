//! Direct reader-to-writer replay (`spec.md` §8.3 scenario 5).
//!
//! [`crate::Document`] deliberately forgets whether an Array-shaped
//! container was written `[…]` or `(…)` (`spec.md` §3.1) — so reformatting
//! through a `Document` cannot reproduce Tuple syntax. This module replays
//! the reader's resolved token stream straight into a [`Writer`] instead,
//! which keeps every `StartTuple`/`EndTuple` token distinct from
//! `StartArray`/`EndArray` all the way through.

use rdn_diagnostic::RdnError;
use rdn_lexer_core::SourceBuffer;
use rdn_reader::{Reader, ReaderOptions, TokenKind};
use rdn_writer::{Writer, WriterOptions};

/// Parse `source` and re-emit it with `writer_options`, preserving Array
/// vs. Tuple and the exact Set/Map/Object/Array nesting, but not
/// whitespace, comments, or the minimized/implicit-bracket choices the
/// original author made (those follow `writer_options`).
pub fn transcode(
    source: &str,
    reader_options: ReaderOptions,
    writer_options: WriterOptions,
) -> Result<String, RdnError> {
    let buffer = SourceBuffer::new(source);
    let mut reader = Reader::new(&buffer, reader_options);
    let mut writer = Writer::new(writer_options);

    while reader.read()? {
        let tok = reader.current().clone();
        match tok.kind {
            TokenKind::StartObject => writer.begin_object()?,
            TokenKind::EndObject => writer.end_object()?,
            TokenKind::StartArray => writer.begin_array()?,
            TokenKind::EndArray => writer.end_array()?,
            TokenKind::StartTuple => writer.begin_tuple()?,
            TokenKind::EndTuple => writer.end_tuple()?,
            TokenKind::StartSet => writer.begin_set()?,
            TokenKind::EndSet => writer.end_set()?,
            TokenKind::StartMap => writer.begin_map()?,
            TokenKind::EndMap => writer.end_map()?,
            TokenKind::PropertyName(name) => writer.write_property_name(&name)?,
            TokenKind::MapArrow => {}
            TokenKind::String(s) => writer.write_str(&s)?,
            TokenKind::Number(n) => writer.write_number(n)?,
            TokenKind::True => writer.write_bool(true)?,
            TokenKind::False => writer.write_bool(false)?,
            TokenKind::Null => writer.write_null()?,
            TokenKind::BigInteger(b) => writer.write_bigint(&b)?,
            TokenKind::DateTime(d) => writer.write_datetime(d)?,
            TokenKind::TimeOnly(t) => writer.write_time(t)?,
            TokenKind::Duration(d) => writer.write_duration(d)?,
            TokenKind::Binary(b) => writer.write_binary(&b)?,
            TokenKind::RegExp(r) => writer.write_regex(&r)?,
            TokenKind::None => unreachable!("Reader::read returned a sentinel token"),
        }
    }

    Ok(writer.flush())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tuple_survives_round_trip() {
        let out = transcode(
            r#"(1, "two", true)"#,
            ReaderOptions::default(),
            WriterOptions::default(),
        )
        .unwrap();
        assert_eq!(out, r#"(1,"two",true)"#);
    }

    #[test]
    fn array_does_not_become_a_tuple() {
        let out = transcode("[1, 2]", ReaderOptions::default(), WriterOptions::default()).unwrap();
        assert_eq!(out, "[1,2]");
    }

    #[test]
    fn nested_map_and_set_round_trip() {
        let out = transcode(
            r#"{"a": Set{1, 2}, "b": Map{"x" => 1}}"#,
            ReaderOptions::default(),
            WriterOptions::default(),
        )
        .unwrap();
        assert_eq!(out, r#"{"a":{1,2},"b":{"x"=>1}}"#);
    }

    #[test]
    fn indented_round_trip_matches_scenario_two() {
        let mut options = WriterOptions::default();
        options.indented = true;
        let out = transcode(
            r#"Map{"a" => 1, "b" => 2}"#,
            ReaderOptions::default(),
            options,
        )
        .unwrap();
        assert_eq!(out, "{\n  \"a\" => 1,\n  \"b\" => 2\n}");
    }
}
