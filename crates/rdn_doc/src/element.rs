//! Read-only navigation over a built [`crate::Document`] (`spec.md` §4.3, C4).

use crate::document::Document;
use crate::node::{NodeKind, Payload};
use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use rdn_diagnostic::{RdnError, Span};
use rdn_lexer::{DurationValue, NumberValue, RegExpValue, TimeOnlyValue};
use std::collections::BTreeSet;

/// A non-owning cursor `(document, node_index)` (`spec.md` §3.2).
#[derive(Clone, Copy)]
pub struct Element<'doc> {
    doc: &'doc Document,
    index: usize,
}

impl<'doc> Element<'doc> {
    pub(crate) fn new(doc: &'doc Document, index: usize) -> Self {
        Element { doc, index }
    }

    fn node(&self) -> &'doc crate::node::Node {
        &self.doc.nodes[self.index]
    }

    pub fn kind(&self) -> NodeKind {
        self.node().kind
    }

    /// The raw byte span this element's token(s) occupied in the source.
    pub fn span(&self) -> Span {
        self.node().span
    }

    /// Immediate child count, as stored in the table. For Array/Set this is
    /// the element count; for Object/Map it is *twice* the
    /// property/entry count (`spec.md` §3.3 invariant 1) — use [`Self::len`]
    /// for the logical count.
    pub fn child_count(&self) -> usize {
        self.node().child_count as usize
    }

    /// The logical length: element count for Array/Set, property/entry
    /// count for Object/Map. `0` for leaves.
    pub fn len(&self) -> usize {
        match self.kind() {
            NodeKind::Array | NodeKind::Set => self.child_count(),
            NodeKind::Object | NodeKind::Map => self.child_count() / 2,
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn first_child_index(&self) -> usize {
        self.index + 1
    }

    /// The index of the child that follows `from` in source order, using
    /// the `next_sibling_offset` index — an O(1) hop regardless of the
    /// size of `from`'s subtree (`spec.md` §4.3.1).
    fn next_sibling_index(&self, from: usize) -> usize {
        from + self.doc.nodes[from].next_sibling_offset as usize
    }

    /// (Array/Set) the element at position `i`, walking `i` forward
    /// siblings from the first child.
    pub fn get(&self, i: usize) -> Option<Element<'doc>> {
        if !matches!(self.kind(), NodeKind::Array | NodeKind::Set) || i >= self.len() {
            return None;
        }
        let mut idx = self.first_child_index();
        for _ in 0..i {
            idx = self.next_sibling_index(idx);
        }
        Some(Element::new(self.doc, idx))
    }

    /// (Array/Set) an iterator over elements in source order.
    pub fn elements(&self) -> Elements<'doc> {
        Elements {
            doc: self.doc,
            next: if self.len() > 0 {
                Some(self.first_child_index())
            } else {
                None
            },
            remaining: self.len(),
        }
    }

    /// (Object) the value of the property named `name`, or `None` if no
    /// such property exists. Linear scan, as `spec.md` §4.3.1 specifies;
    /// uses a raw string comparison (property names are stored decoded
    /// already, so this is a plain `&str` compare).
    pub fn property(&self, name: &str) -> Option<Element<'doc>> {
        if self.kind() != NodeKind::Object {
            return None;
        }
        self.entries().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    /// (Object) an iterator over `(property name, value)` pairs in
    /// insertion order.
    pub fn entries(&self) -> Entries<'doc> {
        Entries {
            doc: self.doc,
            next: if self.len() > 0 {
                Some(self.first_child_index())
            } else {
                None
            },
            remaining: self.len(),
        }
    }

    /// (Map) an iterator over `(key, value)` pairs in insertion order.
    /// Keyed lookup is a consumer concern (`spec.md` §4.3.1) — the core
    /// only exposes positional/sequential access.
    pub fn map_entries(&self) -> MapEntries<'doc> {
        MapEntries {
            doc: self.doc,
            next: if self.len() > 0 {
                Some(self.first_child_index())
            } else {
                None
            },
            remaining: self.len(),
        }
    }

    fn type_error(&self, expected: &str) -> RdnError {
        RdnError::InvalidValue {
            span: self.span(),
            message: format!("expected {expected}, found {:?}", self.kind()),
        }
    }

    pub fn as_bool(&self) -> Result<bool, RdnError> {
        match self.kind() {
            NodeKind::True => Ok(true),
            NodeKind::False => Ok(false),
            _ => Err(self.type_error("a boolean")),
        }
    }

    pub fn is_null(&self) -> bool {
        self.kind() == NodeKind::Null
    }

    pub fn as_str(&self) -> Result<&'doc str, RdnError> {
        match &self.node().payload {
            Payload::String(s) if self.kind() == NodeKind::String => Ok(s),
            _ => Err(self.type_error("a string")),
        }
    }

    pub fn as_number(&self) -> Result<NumberValue, RdnError> {
        match &self.node().payload {
            Payload::Number(n) if self.kind() == NodeKind::Number => Ok(*n),
            _ => Err(self.type_error("a number")),
        }
    }

    /// The number as `f64`, failing if it is not finite (`spec.md` §4.2.5).
    pub fn as_f64(&self) -> Result<f64, RdnError> {
        let n = self.as_number()?;
        match n {
            NumberValue::Finite(v) => Ok(v),
            _ => Err(self.type_error("a finite number")),
        }
    }

    /// The number as an `i64`, failing if it is not an exact integer.
    pub fn as_i64(&self) -> Result<i64, RdnError> {
        let v = self.as_f64()?;
        let truncated = v.trunc();
        if truncated == v && (i64::MIN as f64..=i64::MAX as f64).contains(&truncated) {
            Ok(truncated as i64)
        } else {
            Err(self.type_error("an integer that fits in i64"))
        }
    }

    pub fn as_bigint(&self) -> Result<&'doc BigInt, RdnError> {
        match &self.node().payload {
            Payload::BigInteger(b) if self.kind() == NodeKind::BigInteger => Ok(b),
            _ => Err(self.type_error("a big integer")),
        }
    }

    pub fn as_datetime(&self) -> Result<DateTime<Utc>, RdnError> {
        match &self.node().payload {
            Payload::DateTime(d) if self.kind() == NodeKind::DateTime => Ok(*d),
            _ => Err(self.type_error("a datetime")),
        }
    }

    pub fn as_time(&self) -> Result<TimeOnlyValue, RdnError> {
        match &self.node().payload {
            Payload::TimeOnly(t) if self.kind() == NodeKind::TimeOnly => Ok(*t),
            _ => Err(self.type_error("a time-only value")),
        }
    }

    pub fn as_duration(&self) -> Result<DurationValue, RdnError> {
        match &self.node().payload {
            Payload::Duration(d) if self.kind() == NodeKind::Duration => Ok(*d),
            _ => Err(self.type_error("a duration")),
        }
    }

    pub fn as_binary(&self) -> Result<&'doc [u8], RdnError> {
        match &self.node().payload {
            Payload::Binary(b) if self.kind() == NodeKind::Binary => Ok(b),
            _ => Err(self.type_error("a binary value")),
        }
    }

    pub fn as_regex(&self) -> Result<&'doc RegExpValue, RdnError> {
        match &self.node().payload {
            Payload::RegExp(r) if self.kind() == NodeKind::RegExp => Ok(r),
            _ => Err(self.type_error("a regular expression")),
        }
    }

    /// Deep equality per `spec.md` §4.3.2.
    pub fn deep_eq(&self, other: &Element<'_>) -> bool {
        if self.kind() != other.kind() {
            return false;
        }
        match self.kind() {
            NodeKind::Null | NodeKind::True | NodeKind::False => true,
            NodeKind::Number => self.as_number().unwrap().deep_eq(other.as_number().unwrap()),
            NodeKind::String => self.as_str().unwrap() == other.as_str().unwrap(),
            NodeKind::BigInteger => self.as_bigint().unwrap() == other.as_bigint().unwrap(),
            NodeKind::DateTime => self.as_datetime().unwrap() == other.as_datetime().unwrap(),
            NodeKind::TimeOnly => self.as_time().unwrap() == other.as_time().unwrap(),
            NodeKind::Duration => self.as_duration().unwrap() == other.as_duration().unwrap(),
            NodeKind::Binary => self.as_binary().unwrap() == other.as_binary().unwrap(),
            NodeKind::RegExp => {
                let a = self.as_regex().unwrap();
                let b = other.as_regex().unwrap();
                a.source == b.source
                    && a.flags.chars().collect::<BTreeSet<_>>()
                        == b.flags.chars().collect::<BTreeSet<_>>()
            }
            NodeKind::Array | NodeKind::Set => {
                self.len() == other.len()
                    && self
                        .elements()
                        .zip(other.elements())
                        .all(|(a, b)| a.deep_eq(&b))
            }
            NodeKind::Map => {
                self.len() == other.len()
                    && self.map_entries().zip(other.map_entries()).all(|(a, b)| {
                        a.0.deep_eq(&b.0) && a.1.deep_eq(&b.1)
                    })
            }
            NodeKind::Object => {
                if self.len() != other.len() {
                    return false;
                }
                let mut matched = vec![false; other.len()];
                self.entries().all(|(name, value)| {
                    other.entries().enumerate().any(|(i, (other_name, other_value))| {
                        !matched[i] && name == other_name && value.deep_eq(&other_value) && {
                            matched[i] = true;
                            true
                        }
                    })
                })
            }
        }
    }
}

/// Iterator over Array/Set elements in source order.
pub struct Elements<'doc> {
    doc: &'doc Document,
    next: Option<usize>,
    remaining: usize,
}

impl<'doc> Iterator for Elements<'doc> {
    type Item = Element<'doc>;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.next?;
        self.remaining = self.remaining.saturating_sub(1);
        self.next = if self.remaining > 0 {
            Some(idx + self.doc.nodes[idx].next_sibling_offset as usize)
        } else {
            None
        };
        Some(Element::new(self.doc, idx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

/// Iterator over Object `(property name, value)` pairs in insertion order.
pub struct Entries<'doc> {
    doc: &'doc Document,
    next: Option<usize>,
    remaining: usize,
}

impl<'doc> Iterator for Entries<'doc> {
    type Item = (&'doc str, Element<'doc>);

    fn next(&mut self) -> Option<Self::Item> {
        let key_idx = self.next?;
        let value_idx = key_idx + self.doc.nodes[key_idx].next_sibling_offset as usize;
        self.remaining = self.remaining.saturating_sub(1);
        self.next = if self.remaining > 0 {
            Some(value_idx + self.doc.nodes[value_idx].next_sibling_offset as usize)
        } else {
            None
        };
        let name = match &self.doc.nodes[key_idx].payload {
            Payload::String(s) => s.as_ref(),
            _ => unreachable!("object property-name nodes always carry a decoded string"),
        };
        Some((name, Element::new(self.doc, value_idx)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

/// Iterator over Map `(key, value)` pairs in insertion order.
pub struct MapEntries<'doc> {
    doc: &'doc Document,
    next: Option<usize>,
    remaining: usize,
}

impl<'doc> Iterator for MapEntries<'doc> {
    type Item = (Element<'doc>, Element<'doc>);

    fn next(&mut self) -> Option<Self::Item> {
        let key_idx = self.next?;
        let value_idx = key_idx + self.doc.nodes[key_idx].next_sibling_offset as usize;
        self.remaining = self.remaining.saturating_sub(1);
        self.next = if self.remaining > 0 {
            Some(value_idx + self.doc.nodes[value_idx].next_sibling_offset as usize)
        } else {
            None
        };
        Some((
            Element::new(self.doc, key_idx),
            Element::new(self.doc, value_idx),
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn nan_equals_nan_for_deep_eq() {
        let a = Document::parse("NaN").unwrap();
        let b = Document::parse("NaN").unwrap();
        assert!(a.root().deep_eq(&b.root()));
    }

    #[test]
    fn object_equality_is_order_insensitive() {
        let a = Document::parse(r#"{"a": 1, "b": 2}"#).unwrap();
        let b = Document::parse(r#"{"b": 2, "a": 1}"#).unwrap();
        assert!(a.root().deep_eq(&b.root()));
    }

    #[test]
    fn map_equality_is_order_sensitive() {
        let a = Document::parse(r#"Map{"a" => 1, "b" => 2}"#).unwrap();
        let b = Document::parse(r#"Map{"b" => 2, "a" => 1}"#).unwrap();
        assert!(!a.root().deep_eq(&b.root()));
    }

    #[test]
    fn array_and_set_equality_is_positional() {
        let a = Document::parse("[1, 2]").unwrap();
        let b = Document::parse("[2, 1]").unwrap();
        assert!(!a.root().deep_eq(&b.root()));
    }

    #[test]
    fn regex_flags_compare_as_a_set() {
        let a = Document::parse("/abc/gi").unwrap();
        let b = Document::parse("/abc/ig").unwrap();
        assert!(a.root().deep_eq(&b.root()));
    }

    #[test]
    fn property_lookup_and_entries_iteration() {
        let doc = Document::parse(r#"{"a": 1, "b": "x"}"#).unwrap();
        let root = doc.root();
        assert_eq!(root.property("a").unwrap().as_i64().unwrap(), 1);
        assert_eq!(root.property("b").unwrap().as_str().unwrap(), "x");
        assert!(root.property("missing").is_none());
        let names: Vec<&str> = root.entries().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn map_entries_iteration() {
        let doc = Document::parse(r#"Map{"a" => 1, 2 => "b"}"#).unwrap();
        let root = doc.root();
        let pairs: Vec<(Result<&str, _>, _)> = root
            .map_entries()
            .map(|(k, v)| (k.as_str(), v))
            .collect();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].0.unwrap(), "a");
    }

    #[test]
    fn type_mismatch_is_invalid_value() {
        let doc = Document::parse(r#""abc""#).unwrap();
        let err = doc.root().as_i64().unwrap_err();
        assert!(matches!(err, RdnError::InvalidValue { .. }));
    }
}
