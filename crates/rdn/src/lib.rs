//! Rich Data Notation (RDN): a JSON superset with `Date`/`Duration`/
//! `BigInteger`/`Binary`/`RegExp` literals and `Set`/`Map`/`Tuple`
//! containers alongside `Array`/`Object`.
//!
//! This crate is the facade over the six lower-level crates that make up
//! the codec:
//!
//! - [`rdn_lexer_core`] — raw byte scanner (C1a)
//! - [`rdn_lexer`] — cooked tokenizer, decodes literals (C1b)
//! - [`rdn_reader`] — pull-style structural reader, brace disambiguation (C2)
//! - [`rdn_doc`] — immutable in-memory document + element view (C3/C4)
//! - [`rdn_writer`] — push-style structural writer (C5)
//! - [`rdn_diagnostic`] — shared spans and the error taxonomy (C6)
//!
//! Most consumers only need [`Document::parse`] and [`DocumentExt`] from
//! this crate; the lower-level reader/writer are exposed for streaming use
//! cases that don't want to materialize a full document.

mod document_ext;
mod transcode;

pub use document_ext::DocumentExt;
pub use transcode::transcode;

pub use rdn_diagnostic::{RdnError, Span};
pub use rdn_doc::{Document, Element, Elements, Entries, MapEntries, NodeKind};
pub use rdn_reader::{
    CommentHandling, ContainerKind as ReaderContainerKind, Reader, ReaderOptions,
    Token as ReaderToken, TokenKind as ReaderTokenKind, DEFAULT_MAX_DEPTH as DEFAULT_READER_DEPTH,
};
pub use rdn_writer::{
    IndentCharacter, NewLine, Writer, WriterOptions, DEFAULT_MAX_DEPTH as DEFAULT_WRITER_DEPTH,
};

pub use rdn_lexer::{DurationValue, LiteralValue, NumberValue, RegExpValue, TimeOnlyValue};
pub use num_bigint::BigInt;

/// Parse `source` into a [`Document`]. Shorthand for [`Document::parse`].
pub fn parse(source: &str) -> Result<Document, RdnError> {
    Document::parse(source)
}

/// Parse and re-emit `source` in minimized form, preserving Array vs.
/// Tuple syntax (`spec.md` §8.3 scenario 5). Shorthand over
/// [`transcode`] with default options.
pub fn format(source: &str) -> Result<String, RdnError> {
    transcode(source, ReaderOptions::default(), WriterOptions::default())
}

/// Parse and re-emit `source` indented, preserving Array vs. Tuple syntax.
pub fn format_pretty(source: &str) -> Result<String, RdnError> {
    let mut options = WriterOptions::default();
    options.indented = true;
    transcode(source, ReaderOptions::default(), options)
}

#[cfg(test)]
mod tests {
    //! End-to-end scenarios from `spec.md` §8.3.
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scenario_one_minimized_map() {
        assert_eq!(format(r#"Map{"a"=>1,"b"=>2}"#).unwrap(), r#"{"a"=>1,"b"=>2}"#);
    }

    #[test]
    fn scenario_two_indented_map() {
        assert_eq!(
            format_pretty(r#"Map{"a"=>1,"b"=>2}"#).unwrap(),
            "{\n  \"a\" => 1,\n  \"b\" => 2\n}"
        );
    }

    #[test]
    fn scenario_three_special_numbers_round_trip_byte_identical() {
        let input = r#"{"nan":NaN,"inf":Infinity,"negInf":-Infinity}"#;
        assert_eq!(format(input).unwrap(), input);
    }

    #[test]
    fn scenario_four_datetime_round_trip() {
        let doc = Document::parse("@2024-01-15T10:30:00.000Z").unwrap();
        assert_eq!(doc.to_rdn_string().unwrap(), "@2024-01-15T10:30:00.000Z");
    }

    #[test]
    fn scenario_five_tuple_decodes_and_re_emits_as_a_tuple() {
        let doc = Document::parse(r#"(1, "two", true)"#).unwrap();
        // Positional access through Document still works — it only forgets
        // that this was spelled with parens, not that it has 3 elements.
        assert_eq!(doc.root().get(0).unwrap().as_i64().unwrap(), 1);
        assert_eq!(doc.root().get(1).unwrap().as_str().unwrap(), "two");
        assert_eq!(doc.root().get(2).unwrap().as_bool().unwrap(), true);
        assert_eq!(format(r#"(1,"two",true)"#).unwrap(), r#"(1,"two",true)"#);
    }

    #[test]
    fn scenario_six_binary_decodes_to_raw_bytes() {
        let doc = Document::parse(r#"b"SGVsbG8=""#).unwrap();
        assert_eq!(doc.root().as_binary().unwrap(), b"Hello");
    }

    #[test]
    fn scenario_seven_regexp_source_and_flags() {
        let doc = Document::parse("/^[a-z]+$/i").unwrap();
        let re = doc.root().as_regex().unwrap();
        assert_eq!(re.source, "^[a-z]+$");
        assert_eq!(re.flags, "i");
    }

    #[test]
    fn scenario_eight_skipped_comment_vs_disallowed_comment() {
        let mut skip = ReaderOptions::default();
        skip.comment_handling = CommentHandling::Skip;
        let doc = Document::parse_with_options("[1, /* comment */ 2]", skip).unwrap();
        assert_eq!(doc.root().len(), 2);

        let disallow = ReaderOptions::default();
        assert!(Document::parse_with_options("[1, /* comment */ 2]", disallow).is_err());
    }

    #[test]
    fn scenario_nine_big_integer_round_trip() {
        let input = "123456789012345678901234567890n";
        assert_eq!(format(input).unwrap(), input);
    }

    #[test]
    fn scenario_ten_trailing_comma_policy() {
        let strict = ReaderOptions::default();
        assert!(Document::parse_with_options("(1, 2,)", strict).is_err());

        let mut lenient = ReaderOptions::default();
        lenient.allow_trailing_commas = true;
        let doc = Document::parse_with_options("(1, 2,)", lenient).unwrap();
        assert_eq!(doc.root().len(), 2);
    }

    #[test]
    fn deep_equality_ignores_object_key_order() {
        let a = Document::parse(r#"{"a": 1, "b": {"c": 2}}"#).unwrap();
        let b = Document::parse(r#"{"b": {"c": 2}, "a": 1}"#).unwrap();
        assert!(a.root().deep_eq(&b.root()));
    }
}
