//! Low-level byte scanner for RDN source text.
//!
//! This crate is deliberately standalone — it depends on nothing but
//! `memchr` and knows nothing about escape decoding, numeric parsing, or
//! error messages. It exists so that tools which only need token
//! boundaries (a syntax highlighter, a formatter, a linter) can sit on top
//! of it without pulling in the rest of the codec. [`rdn_lexer`] is the
//! crate that "cooks" these raw tokens into decoded values.
//!
//! # Architecture
//!
//! - [`SourceBuffer`] owns a sentinel-terminated, cache-line-aligned copy
//!   of the source so the scanner never needs a bounds check on the hot
//!   path.
//! - [`Cursor`] is a `Copy` cheap-to-snapshot view into a `SourceBuffer`,
//!   used both by the scanner internally and by `rdn_reader`'s bounded
//!   one-value lookahead for brace disambiguation.
//! - [`raw_scanner::next_token`] is the only entry point: byte cursor in,
//!   [`RawToken`] out.
//!
//! # Stability
//!
//! `RawTag`, `RawToken`, `SourceBuffer`, and `Cursor` are the crate's
//! public surface. Internal scanning helpers in `raw_scanner` are private;
//! only the dispatch function is exported.

mod cursor;
mod raw_scanner;
mod source_buffer;
mod tag;

pub use cursor::Cursor;
pub use raw_scanner::next_token;
pub use source_buffer::SourceBuffer;
pub use tag::{RawTag, RawToken};
