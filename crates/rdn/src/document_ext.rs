//! [`Document`] → text, via [`Writer`] (`spec.md` §6.3, §6.4).
//!
//! Walks the element tree and replays it into a writer. Since
//! [`crate::Document`] does not distinguish Array from Tuple
//! (`spec.md` §3.1), this always re-emits Array-shaped containers as
//! `[…]` — use [`crate::transcode`] when Tuple fidelity matters.

use crate::Document;
use rdn_diagnostic::RdnError;
use rdn_doc::{Element, NodeKind};
use rdn_writer::{Writer, WriterOptions};

/// Formatting helpers for [`Document`].
pub trait DocumentExt {
    /// Minimized text (`spec.md` §4.4, no `indented`).
    fn to_rdn_string(&self) -> Result<String, RdnError>;

    /// Indented text using `options` (`indented` is forced to `true`
    /// regardless of what `options` sets).
    fn to_rdn_string_with(&self, options: WriterOptions) -> Result<String, RdnError>;

    /// Indented text with the writer's default indentation.
    fn to_rdn_string_pretty(&self) -> Result<String, RdnError> {
        let mut options = WriterOptions::default();
        options.indented = true;
        self.to_rdn_string_with(options)
    }
}

impl DocumentExt for Document {
    fn to_rdn_string(&self) -> Result<String, RdnError> {
        self.to_rdn_string_with(WriterOptions::default())
    }

    fn to_rdn_string_with(&self, options: WriterOptions) -> Result<String, RdnError> {
        let mut writer = Writer::new(options);
        write_element(&self.root(), &mut writer)?;
        Ok(writer.flush())
    }
}

fn write_element(el: &Element<'_>, writer: &mut Writer) -> Result<(), RdnError> {
    match el.kind() {
        NodeKind::Null => writer.write_null(),
        NodeKind::True => writer.write_bool(true),
        NodeKind::False => writer.write_bool(false),
        NodeKind::Number => writer.write_number(el.as_number()?),
        NodeKind::String => writer.write_str(el.as_str()?),
        NodeKind::BigInteger => writer.write_bigint(el.as_bigint()?),
        NodeKind::DateTime => writer.write_datetime(el.as_datetime()?),
        NodeKind::TimeOnly => writer.write_time(el.as_time()?),
        NodeKind::Duration => writer.write_duration(el.as_duration()?),
        NodeKind::Binary => writer.write_binary(el.as_binary()?),
        NodeKind::RegExp => writer.write_regex(el.as_regex()?),
        NodeKind::Array => {
            writer.begin_array()?;
            for child in el.elements() {
                write_element(&child, writer)?;
            }
            writer.end_array()
        }
        NodeKind::Set => {
            writer.begin_set()?;
            for child in el.elements() {
                write_element(&child, writer)?;
            }
            writer.end_set()
        }
        NodeKind::Object => {
            writer.begin_object()?;
            for (name, value) in el.entries() {
                writer.write_property_name(name)?;
                write_element(&value, writer)?;
            }
            writer.end_object()
        }
        NodeKind::Map => {
            writer.begin_map()?;
            for (key, value) in el.map_entries() {
                write_element(&key, writer)?;
                write_element(&value, writer)?;
            }
            writer.end_map()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn round_trips_through_the_document_model() {
        let doc = Document::parse(r#"{"a": 1, "b": [true, null]}"#).unwrap();
        assert_eq!(doc.to_rdn_string().unwrap(), r#"{"a":1,"b":[true,null]}"#);
    }

    #[test]
    fn tuple_becomes_array_through_the_document_model() {
        let doc = Document::parse(r#"(1, 2)"#).unwrap();
        assert_eq!(doc.to_rdn_string().unwrap(), "[1,2]");
    }

    #[test]
    fn pretty_printing_matches_scenario_two() {
        let doc = Document::parse(r#"Map{"a" => 1, "b" => 2}"#).unwrap();
        assert_eq!(
            doc.to_rdn_string_pretty().unwrap(),
            "{\n  \"a\" => 1,\n  \"b\" => 2\n}"
        );
    }
}
