//! The document builder (`spec.md` §4.3, C3) and the owning `Document` type.

use crate::element::Element;
use crate::node::{Node, NodeKind, Payload};
use rdn_diagnostic::RdnError;
use rdn_lexer_core::SourceBuffer;
use rdn_reader::{Reader, ReaderOptions, TokenKind as ReaderTokenKind};

/// An owned, immutable, parsed RDN document: the source text plus a flat
/// pre-order node table (`spec.md` §3.2).
///
/// Once built, a `Document` is read-only and freely shareable across
/// threads (`spec.md` §5) — all of its data is immutable after `parse`.
#[derive(Debug)]
pub struct Document {
    pub(crate) source: Box<str>,
    pub(crate) nodes: Vec<Node>,
}

impl Document {
    /// Parse `source` with default [`ReaderOptions`]. Succeeds only if the
    /// entire input is a single valid RDN value, with whitespace/comments
    /// permitted around it (`spec.md` §3.4).
    pub fn parse(source: &str) -> Result<Document, RdnError> {
        Self::parse_with_options(source, ReaderOptions::default())
    }

    /// Parse `source`, driving the reader with explicit `options`.
    pub fn parse_with_options(source: &str, options: ReaderOptions) -> Result<Document, RdnError> {
        tracing::debug!(bytes = source.len(), "parsing document");
        let buffer = SourceBuffer::new(source);
        let mut reader = Reader::new(&buffer, options);
        let mut nodes: Vec<Node> = Vec::new();
        let mut open_stack: Vec<usize> = Vec::new();

        while reader.read()? {
            let tok = reader.current().clone();
            match tok.kind {
                ReaderTokenKind::StartObject => {
                    open_container(&mut nodes, &mut open_stack, NodeKind::Object, tok.span)
                }
                ReaderTokenKind::StartArray | ReaderTokenKind::StartTuple => {
                    open_container(&mut nodes, &mut open_stack, NodeKind::Array, tok.span)
                }
                ReaderTokenKind::StartSet => {
                    open_container(&mut nodes, &mut open_stack, NodeKind::Set, tok.span)
                }
                ReaderTokenKind::StartMap => {
                    open_container(&mut nodes, &mut open_stack, NodeKind::Map, tok.span)
                }
                ReaderTokenKind::EndObject
                | ReaderTokenKind::EndArray
                | ReaderTokenKind::EndTuple
                | ReaderTokenKind::EndSet
                | ReaderTokenKind::EndMap => {
                    let idx = open_stack
                        .pop()
                        .expect("reader guarantees balanced Start/End tokens");
                    let offset = (nodes.len() - idx) as u32;
                    nodes[idx].next_sibling_offset = offset;
                }
                ReaderTokenKind::PropertyName(name) => push_leaf(
                    &mut nodes,
                    &open_stack,
                    NodeKind::String,
                    tok.span,
                    Payload::String(name.into_boxed_str()),
                ),
                ReaderTokenKind::MapArrow => {}
                ReaderTokenKind::String(s) => push_leaf(
                    &mut nodes,
                    &open_stack,
                    NodeKind::String,
                    tok.span,
                    Payload::String(s.into_boxed_str()),
                ),
                ReaderTokenKind::Number(n) => push_leaf(
                    &mut nodes,
                    &open_stack,
                    NodeKind::Number,
                    tok.span,
                    Payload::Number(n),
                ),
                ReaderTokenKind::True => {
                    push_leaf(&mut nodes, &open_stack, NodeKind::True, tok.span, Payload::None)
                }
                ReaderTokenKind::False => {
                    push_leaf(&mut nodes, &open_stack, NodeKind::False, tok.span, Payload::None)
                }
                ReaderTokenKind::Null => {
                    push_leaf(&mut nodes, &open_stack, NodeKind::Null, tok.span, Payload::None)
                }
                ReaderTokenKind::BigInteger(b) => push_leaf(
                    &mut nodes,
                    &open_stack,
                    NodeKind::BigInteger,
                    tok.span,
                    Payload::BigInteger(b),
                ),
                ReaderTokenKind::DateTime(d) => push_leaf(
                    &mut nodes,
                    &open_stack,
                    NodeKind::DateTime,
                    tok.span,
                    Payload::DateTime(d),
                ),
                ReaderTokenKind::TimeOnly(t) => push_leaf(
                    &mut nodes,
                    &open_stack,
                    NodeKind::TimeOnly,
                    tok.span,
                    Payload::TimeOnly(t),
                ),
                ReaderTokenKind::Duration(d) => push_leaf(
                    &mut nodes,
                    &open_stack,
                    NodeKind::Duration,
                    tok.span,
                    Payload::Duration(d),
                ),
                ReaderTokenKind::Binary(b) => push_leaf(
                    &mut nodes,
                    &open_stack,
                    NodeKind::Binary,
                    tok.span,
                    Payload::Binary(b.into_boxed_slice()),
                ),
                ReaderTokenKind::RegExp(r) => push_leaf(
                    &mut nodes,
                    &open_stack,
                    NodeKind::RegExp,
                    tok.span,
                    Payload::RegExp(r),
                ),
                ReaderTokenKind::None => unreachable!("Reader::read returned a sentinel token"),
            }
        }

        debug_assert!(open_stack.is_empty(), "reader guarantees balanced nesting");
        tracing::debug!(nodes = nodes.len(), "document built");

        Ok(Document {
            source: source.to_string().into_boxed_str(),
            nodes,
        })
    }

    /// The root element. Every non-empty `Document` has exactly one.
    pub fn root(&self) -> Element<'_> {
        Element::new(self, 0)
    }

    /// The original source text this document was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }
}

fn open_container(
    nodes: &mut Vec<Node>,
    open_stack: &mut Vec<usize>,
    kind: NodeKind,
    span: rdn_diagnostic::Span,
) {
    let idx = nodes.len();
    nodes.push(Node {
        kind,
        span,
        child_count: 0,
        next_sibling_offset: 0,
        payload: Payload::None,
    });
    if let Some(&parent) = open_stack.last() {
        nodes[parent].child_count += 1;
    }
    open_stack.push(idx);
}

fn push_leaf(
    nodes: &mut Vec<Node>,
    open_stack: &[usize],
    kind: NodeKind,
    span: rdn_diagnostic::Span,
    payload: Payload,
) {
    let idx = nodes.len();
    nodes.push(Node {
        kind,
        span,
        child_count: 0,
        next_sibling_offset: 1,
        payload,
    });
    if let Some(&parent) = open_stack.last() {
        nodes[parent].child_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_flat_array() {
        let doc = Document::parse("[1, 2, 3]").unwrap();
        let root = doc.root();
        assert_eq!(root.kind(), NodeKind::Array);
        assert_eq!(root.len(), 3);
    }

    #[test]
    fn tuple_collapses_into_array() {
        let doc = Document::parse(r#"(1, "two", true)"#).unwrap();
        assert_eq!(doc.root().kind(), NodeKind::Array);
        assert_eq!(doc.root().len(), 3);
    }

    #[test]
    fn object_children_are_flat_key_value_pairs() {
        let doc = Document::parse(r#"{"a": 1, "b": 2}"#).unwrap();
        let root = doc.root();
        assert_eq!(root.kind(), NodeKind::Object);
        // child_count counts property-name nodes and value nodes separately.
        assert_eq!(root.child_count(), 4);
    }

    #[test]
    fn nested_containers_skip_via_sibling_offset() {
        let doc = Document::parse(r#"[[1, 2], 3, [4, 5, 6]]"#).unwrap();
        let root = doc.root();
        assert_eq!(root.len(), 3);
        assert_eq!(root.get(1).unwrap().as_number().unwrap().as_f64(), 3.0);
        assert_eq!(root.get(2).unwrap().len(), 3);
    }

    #[test]
    fn rejects_trailing_garbage() {
        assert!(Document::parse("1 2").is_err());
    }
}
