//! The flat pre-order node table (`spec.md` §3.2, §4.3).
//!
//! Container nodes are followed contiguously by their descendants; each
//! carries `next_sibling_offset`, the number of table slots from itself to
//! the node immediately following its subtree. A leaf's offset is always 1.
//!
//! Deviation from a literal reading of §3.2: the spec describes a payload
//! as a *raw source span*, decoded lazily by element accessors. This table
//! instead stores the value [`crate::Reader`] already decoded while
//! building the tree (`Payload`), because re-running escape/numeric/
//! temporal decoding a second time at the accessor layer would just
//! duplicate `rdn_lexer`'s work for identical results. §9 explicitly
//! sanctions implementations that deviate from the self-referential
//! span/buffer model "as long as observable semantics are unchanged" —
//! the span is still recorded (`Node::span`) for callers that want the
//! raw source range.

use num_bigint::BigInt;
use rdn_diagnostic::Span;
use rdn_lexer::{DurationValue, NumberValue, RegExpValue, TimeOnlyValue};

/// Tuple collapses into `Array` at build time — `spec.md` §3.1's note is
/// explicit that "the document builder does not track the distinction".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Null,
    True,
    False,
    Number,
    String,
    BigInteger,
    DateTime,
    TimeOnly,
    Duration,
    Binary,
    RegExp,
    Array,
    Object,
    Set,
    Map,
}

impl NodeKind {
    pub fn is_container(self) -> bool {
        matches!(
            self,
            NodeKind::Array | NodeKind::Object | NodeKind::Set | NodeKind::Map
        )
    }
}

/// The decoded payload a leaf node carries. Containers and the three
/// payload-less leaves (`Null`/`True`/`False`) carry [`Payload::None`].
#[derive(Clone, Debug)]
pub(crate) enum Payload {
    None,
    String(Box<str>),
    Number(NumberValue),
    BigInteger(BigInt),
    DateTime(chrono::DateTime<chrono::Utc>),
    TimeOnly(TimeOnlyValue),
    Duration(DurationValue),
    Binary(Box<[u8]>),
    RegExp(RegExpValue),
}

#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub child_count: u32,
    pub next_sibling_offset: u32,
    pub payload: Payload,
}
