//! Shared spans and error types for the RDN codec.
//!
//! Every other crate in this workspace depends on this one and nothing
//! else: it is the single place a byte range or a fatal fault is defined,
//! so the lexer, reader, writer, and document builder all speak the same
//! coordinate system and the same error taxonomy.

mod error;
mod line_col;
mod span;

pub use error::RdnError;
pub use line_col::LineOffsetTable;
pub use span::Span;
