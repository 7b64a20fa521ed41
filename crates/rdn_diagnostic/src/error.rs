//! The error taxonomy shared by the reader, writer, and document builder.
//!
//! Mirrors `spec.md` §7 exactly: seven fatal, non-recoverable kinds. Every
//! variant that originates from scanning carries a [`Span`]; the writer-only
//! `InvalidOperation` carries a logical path instead, since the writer has no
//! source buffer to index into.

use crate::Span;

/// A fatal parse/write/access fault. All variants are terminal: the
/// producing reader/writer/document must be discarded after one of these is
/// returned (see `spec.md` §4.5).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RdnError {
    /// Malformed token: bad escape, bad number, truncated binary/regex,
    /// unknown bare identifier.
    #[error("lexical error at {span:?}: {message}")]
    Lexical { span: Span, message: String },

    /// Mismatched brackets, stray comma, missing `:`/`=>`, value in key
    /// position, key in value position, duplicate separator.
    #[error("structural error at {span:?}: {message}")]
    Structural { span: Span, message: String },

    /// Nesting exceeded the configured maximum depth.
    #[error("depth exceeded at {span:?}: nesting deeper than the configured maximum of {max_depth}")]
    DepthExceeded { span: Span, max_depth: usize },

    /// Input ended mid-token or mid-container.
    #[error("unexpected end of input at {span:?}")]
    UnexpectedEndOfInput { span: Span },

    /// A typed accessor failed against the value at `span` (e.g. `get_i32`
    /// on a string, or a big-integer literal that overflows a narrow
    /// target type).
    #[error("invalid value at {span:?}: {message}")]
    InvalidValue { span: Span, message: String },

    /// Writer-only: an operation was illegal given the writer's current
    /// container/validation state (e.g. `write_property_name` inside an
    /// array). Carries the logical container path instead of a byte span,
    /// since the writer has no source buffer.
    #[error("invalid operation at {path}: {message}")]
    InvalidOperation { path: String, message: String },

    /// A token, string, or binary payload exceeded the implementation's
    /// size ceiling.
    #[error("limit exceeded at {span:?}: {message}")]
    LimitExceeded { span: Span, message: String },
}

impl RdnError {
    /// The span of this error, if it carries one. `InvalidOperation` has no
    /// span (see the variant doc).
    pub fn span(&self) -> Option<Span> {
        match self {
            RdnError::Lexical { span, .. }
            | RdnError::Structural { span, .. }
            | RdnError::DepthExceeded { span, .. }
            | RdnError::UnexpectedEndOfInput { span }
            | RdnError::InvalidValue { span, .. }
            | RdnError::LimitExceeded { span, .. } => Some(*span),
            RdnError::InvalidOperation { .. } => None,
        }
    }

    /// Resolve this error's span into a 1-based `(line, column)` against
    /// `source`. Returns `None` for spanless variants.
    pub fn line_col(&self, source: &str) -> Option<(u32, u32)> {
        let span = self.span()?;
        let table = crate::LineOffsetTable::build(source);
        Some(table.offset_to_line_col(source, span.start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_operation_has_no_span() {
        let err = RdnError::InvalidOperation {
            path: "$.foo[2]".into(),
            message: "cannot write a property name inside an array".into(),
        };
        assert_eq!(err.span(), None);
        assert_eq!(err.line_col("irrelevant"), None);
    }

    #[test]
    fn structural_error_resolves_line_col() {
        let source = "{\n  \"a\": ,\n}";
        let bad = source.find(", ").map(|i| i as u32 + 1).unwrap_or(9);
        let err = RdnError::Structural {
            span: Span::new(bad, bad + 1),
            message: "expected a value".into(),
        };
        let (line, _col) = err.line_col(source).unwrap();
        assert_eq!(line, 2);
    }

    #[test]
    fn display_renders_message() {
        let err = RdnError::DepthExceeded {
            span: Span::new(3, 4),
            max_depth: 1000,
        };
        let rendered = err.to_string();
        assert!(rendered.contains("1000"));
    }
}
