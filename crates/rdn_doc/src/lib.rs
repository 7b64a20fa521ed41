//! The immutable in-memory RDN document: a flat pre-order node table built
//! from a single pass over [`rdn_reader::Reader`], plus a read-only
//! [`Element`] cursor for navigating it (`spec.md` §4.3).

mod document;
mod element;
mod node;

pub use document::Document;
pub use element::{Element, Elements, Entries, MapEntries};
pub use node::NodeKind;
