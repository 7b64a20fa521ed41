//! The push-style structural writer (`spec.md` §4.4, §6.3).

use crate::container::{ContainerKind, Frame, FrameState};
use crate::format;
use crate::options::WriterOptions;
use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use rdn_diagnostic::RdnError;
use rdn_lexer::{encode_base64, encode_hex, DurationValue, NumberValue, RegExpValue, TimeOnlyValue};

/// Push-style structural writer. Mirrors `rdn_reader::Reader`'s grammar in
/// the write direction with its own, independent validation stack
/// (`spec.md` §2, §4.4.6).
pub struct Writer {
    options: WriterOptions,
    buffer: String,
    stack: Vec<Frame>,
}

impl Writer {
    pub fn new(options: WriterOptions) -> Self {
        Writer {
            options,
            buffer: String::new(),
            stack: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize, options: WriterOptions) -> Self {
        Writer {
            options,
            buffer: String::with_capacity(capacity),
            stack: Vec::new(),
        }
    }

    /// Current container nesting depth.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The bytes written so far, without consuming the writer.
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Consume the writer, returning everything written. `spec.md` §6.3's
    /// "flush" — there is no internal buffering beyond the `String` itself,
    /// so this is the terminal operation.
    pub fn flush(self) -> String {
        tracing::debug!(bytes = self.buffer.len(), "writer flushed");
        self.buffer
    }

    fn invalid_operation(&self, message: impl Into<String>) -> RdnError {
        RdnError::InvalidOperation {
            path: self.path(),
            message: message.into(),
        }
    }

    fn path(&self) -> String {
        let mut path = String::from("$");
        for frame in &self.stack {
            path.push('.');
            path.push_str(frame.kind.name());
        }
        path
    }

    /// `spec.md` §7.7: the token-size ceiling is shared by reader and
    /// writer. The writer has no source buffer to span, so it reports the
    /// violation at [`rdn_diagnostic::Span::DUMMY`].
    fn check_token_size(&self, len: usize) -> Result<(), RdnError> {
        if len as u64 > u64::from(self.options.max_token_size) {
            return Err(RdnError::LimitExceeded {
                span: rdn_diagnostic::Span::DUMMY,
                message: format!(
                    "payload of {len} bytes exceeds the configured limit of {}",
                    self.options.max_token_size
                ),
            });
        }
        Ok(())
    }

    fn check_depth(&self) -> Result<(), RdnError> {
        if self.stack.len() >= self.options.max_depth {
            return Err(self.invalid_operation(format!(
                "nesting deeper than the configured maximum of {}",
                self.options.max_depth
            )));
        }
        Ok(())
    }

    fn indent_unit_len(&self) -> usize {
        self.options.indent_size as usize
    }

    fn write_newline_and_indent(&mut self, depth: usize) {
        self.buffer.push_str(self.options.new_line.as_str());
        let ch = match self.options.indent_character {
            crate::options::IndentCharacter::Space => ' ',
            crate::options::IndentCharacter::Tab => '\t',
        };
        for _ in 0..(self.indent_unit_len() * depth) {
            self.buffer.push(ch);
        }
    }

    /// Emit whatever separator/deferred-opener is needed before writing a
    /// value or property name at `frame_idx`. Does not change the frame's
    /// state — callers do that based on which slot (key/value/element/
    /// property-name) they're about to fill.
    fn emit_separator(&mut self, frame_idx: usize) {
        let frame = self.stack[frame_idx];
        if frame.pending_open {
            self.buffer.push('{');
            self.stack[frame_idx].pending_open = false;
        }
        match frame.state {
            FrameState::Start => {
                if self.options.indented {
                    self.write_newline_and_indent(frame_idx + 1);
                }
            }
            FrameState::AfterElement => {
                self.buffer.push(',');
                if self.options.indented {
                    self.write_newline_and_indent(frame_idx + 1);
                }
            }
            FrameState::AfterPropertyName | FrameState::AfterKey => {
                unreachable!("emit_separator is only called in Start/AfterElement states")
            }
        }
    }

    /// Called before writing any value (leaf or container-open). Validates
    /// the current frame accepts a value here, emits the needed
    /// separator, and returns the index of the frame whose state the
    /// caller must still advance (`None` at the top level).
    fn before_value(&mut self) -> Result<Option<usize>, RdnError> {
        let Some(frame_idx) = self.stack.len().checked_sub(1) else {
            return Ok(None);
        };
        let frame = self.stack[frame_idx];
        if !self.options.skip_validation {
            match (frame.kind, frame.state) {
                (ContainerKind::Object, FrameState::Start | FrameState::AfterElement) => {
                    return Err(self.invalid_operation(
                        "expected a property name, not a value, inside an Object",
                    ));
                }
                _ => {}
            }
        }
        match frame.state {
            FrameState::Start | FrameState::AfterElement => {
                self.emit_separator(frame_idx);
            }
            FrameState::AfterPropertyName => {
                self.buffer.push(':');
                if self.options.indented {
                    self.buffer.push(' ');
                }
            }
            FrameState::AfterKey => {
                if self.options.indented {
                    self.buffer.push_str(" => ");
                } else {
                    self.buffer.push_str("=>");
                }
            }
        }
        Ok(Some(frame_idx))
    }

    fn after_value(&mut self, frame_idx: Option<usize>) {
        let Some(frame_idx) = frame_idx else { return };
        let frame = self.stack[frame_idx];
        self.stack[frame_idx].state = match (frame.kind, frame.state) {
            (ContainerKind::Map, FrameState::Start | FrameState::AfterElement) => FrameState::AfterKey,
            (ContainerKind::Map, FrameState::AfterKey) => FrameState::AfterElement,
            _ => FrameState::AfterElement,
        };
    }

    fn begin_container(
        &mut self,
        kind: ContainerKind,
        open: &str,
        pending_open: bool,
    ) -> Result<(), RdnError> {
        let frame_idx = self.before_value()?;
        self.check_depth()?;
        if !pending_open {
            self.buffer.push_str(open);
        }
        self.after_value(frame_idx);
        self.stack.push(Frame::new(kind, pending_open));
        Ok(())
    }

    fn end_container(&mut self, expected: ContainerKind) -> Result<(), RdnError> {
        let frame = self
            .stack
            .pop()
            .ok_or_else(|| self.invalid_operation("no open container to end"))?;
        if !self.options.skip_validation && frame.kind != expected {
            self.stack.push(frame);
            return Err(self.invalid_operation(format!(
                "expected to close {}, asked to close {}",
                frame.kind.name(),
                expected.name()
            )));
        }
        if !self.options.skip_validation
            && matches!(frame.kind, ContainerKind::Object | ContainerKind::Map)
            && frame.state == FrameState::AfterPropertyName
        {
            self.stack.push(frame);
            return Err(self.invalid_operation("a property name was written without a value"));
        }
        if frame.pending_open {
            self.buffer.push_str(match frame.kind {
                ContainerKind::Set => "Set{}",
                ContainerKind::Map => "Map{}",
                _ => unreachable!("only Set/Map ever defer their opening bracket"),
            });
        } else {
            if self.options.indented {
                self.write_newline_and_indent(self.stack.len());
            }
            self.buffer.push(frame.kind.closer());
        }
        Ok(())
    }

    pub fn begin_object(&mut self) -> Result<(), RdnError> {
        self.begin_container(ContainerKind::Object, "{", false)
    }

    pub fn end_object(&mut self) -> Result<(), RdnError> {
        self.end_container(ContainerKind::Object)
    }

    pub fn begin_array(&mut self) -> Result<(), RdnError> {
        self.begin_container(ContainerKind::Array, "[", false)
    }

    pub fn end_array(&mut self) -> Result<(), RdnError> {
        self.end_container(ContainerKind::Array)
    }

    pub fn begin_tuple(&mut self) -> Result<(), RdnError> {
        self.begin_container(ContainerKind::Tuple, "(", false)
    }

    pub fn end_tuple(&mut self) -> Result<(), RdnError> {
        self.end_container(ContainerKind::Tuple)
    }

    pub fn begin_set(&mut self) -> Result<(), RdnError> {
        if self.options.always_write_set_type_name {
            self.begin_container(ContainerKind::Set, "Set{", false)
        } else {
            self.begin_container(ContainerKind::Set, "", true)
        }
    }

    pub fn end_set(&mut self) -> Result<(), RdnError> {
        self.end_container(ContainerKind::Set)
    }

    pub fn begin_map(&mut self) -> Result<(), RdnError> {
        if self.options.always_write_map_type_name {
            self.begin_container(ContainerKind::Map, "Map{", false)
        } else {
            self.begin_container(ContainerKind::Map, "", true)
        }
    }

    pub fn end_map(&mut self) -> Result<(), RdnError> {
        self.end_container(ContainerKind::Map)
    }

    /// (Object members only) write the property name that precedes a
    /// value. Legal only where a property name is expected, i.e. the
    /// frame just opened or just finished a `name: value` pair.
    pub fn write_property_name(&mut self, name: &str) -> Result<(), RdnError> {
        let frame_idx = self.stack.len().checked_sub(1).ok_or_else(|| {
            self.invalid_operation("write_property_name called outside any container")
        })?;
        let frame = self.stack[frame_idx];
        if !self.options.skip_validation {
            if frame.kind != ContainerKind::Object {
                return Err(self.invalid_operation(format!(
                    "write_property_name is only legal inside an Object, found {}",
                    frame.kind.name()
                )));
            }
            if !matches!(frame.state, FrameState::Start | FrameState::AfterElement) {
                return Err(
                    self.invalid_operation("a property name is not expected in this position")
                );
            }
        }
        self.emit_separator(frame_idx);
        format::write_escaped_string(&mut self.buffer, name);
        self.stack[frame_idx].state = FrameState::AfterPropertyName;
        Ok(())
    }

    /// Write a value that has already been encoded as valid RDN text
    /// (e.g. produced by another `Writer`). Still participates in comma/
    /// colon/arrow bookkeeping, unlike a raw string concatenation.
    pub fn write_raw(&mut self, raw: &str) -> Result<(), RdnError> {
        let frame_idx = self.before_value()?;
        self.buffer.push_str(raw);
        self.after_value(frame_idx);
        Ok(())
    }

    pub fn write_null(&mut self) -> Result<(), RdnError> {
        let frame_idx = self.before_value()?;
        self.buffer.push_str("null");
        self.after_value(frame_idx);
        Ok(())
    }

    pub fn write_bool(&mut self, value: bool) -> Result<(), RdnError> {
        let frame_idx = self.before_value()?;
        self.buffer.push_str(if value { "true" } else { "false" });
        self.after_value(frame_idx);
        Ok(())
    }

    pub fn write_str(&mut self, value: &str) -> Result<(), RdnError> {
        self.check_token_size(value.len())?;
        let frame_idx = self.before_value()?;
        format::write_escaped_string(&mut self.buffer, value);
        self.after_value(frame_idx);
        Ok(())
    }

    pub fn write_number(&mut self, value: NumberValue) -> Result<(), RdnError> {
        let frame_idx = self.before_value()?;
        format::write_number(&mut self.buffer, value);
        self.after_value(frame_idx);
        Ok(())
    }

    pub fn write_f64(&mut self, value: f64) -> Result<(), RdnError> {
        self.write_number(if value.is_nan() {
            NumberValue::NaN
        } else if value.is_infinite() {
            if value > 0.0 {
                NumberValue::Infinity
            } else {
                NumberValue::NegInfinity
            }
        } else {
            NumberValue::Finite(value)
        })
    }

    pub fn write_i64(&mut self, value: i64) -> Result<(), RdnError> {
        #[allow(clippy::cast_precision_loss)]
        self.write_number(NumberValue::Finite(value as f64))
    }

    pub fn write_u64(&mut self, value: u64) -> Result<(), RdnError> {
        #[allow(clippy::cast_precision_loss)]
        self.write_number(NumberValue::Finite(value as f64))
    }

    pub fn write_bigint(&mut self, value: &BigInt) -> Result<(), RdnError> {
        self.check_token_size(value.to_string().len())?;
        let frame_idx = self.before_value()?;
        format::write_bigint(&mut self.buffer, value);
        self.after_value(frame_idx);
        Ok(())
    }

    pub fn write_datetime(&mut self, value: DateTime<Utc>) -> Result<(), RdnError> {
        let frame_idx = self.before_value()?;
        format::write_datetime(&mut self.buffer, value);
        self.after_value(frame_idx);
        Ok(())
    }

    pub fn write_time(&mut self, value: TimeOnlyValue) -> Result<(), RdnError> {
        let frame_idx = self.before_value()?;
        format::write_time(&mut self.buffer, value);
        self.after_value(frame_idx);
        Ok(())
    }

    pub fn write_duration(&mut self, value: DurationValue) -> Result<(), RdnError> {
        let frame_idx = self.before_value()?;
        format::write_duration(&mut self.buffer, value);
        self.after_value(frame_idx);
        Ok(())
    }

    /// `spec.md` §3.3 invariant 6: binary round-trips through `b"…"`
    /// (base64) by default.
    pub fn write_binary(&mut self, bytes: &[u8]) -> Result<(), RdnError> {
        self.check_token_size(bytes.len())?;
        let frame_idx = self.before_value()?;
        self.buffer.push_str("b\"");
        self.buffer.push_str(&encode_base64(bytes));
        self.buffer.push('"');
        self.after_value(frame_idx);
        Ok(())
    }

    /// Alternative binary form: `x"…"` hex, lowercase.
    pub fn write_binary_hex(&mut self, bytes: &[u8]) -> Result<(), RdnError> {
        self.check_token_size(bytes.len())?;
        let frame_idx = self.before_value()?;
        self.buffer.push_str("x\"");
        self.buffer.push_str(&encode_hex(bytes));
        self.buffer.push('"');
        self.after_value(frame_idx);
        Ok(())
    }

    pub fn write_regex(&mut self, value: &RegExpValue) -> Result<(), RdnError> {
        self.check_token_size(value.source.len() + value.flags.len())?;
        let frame_idx = self.before_value()?;
        self.buffer.push('/');
        self.buffer.push_str(&value.source.replace('/', "\\/"));
        self.buffer.push('/');
        self.buffer.push_str(&value.flags);
        self.after_value(frame_idx);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn writer(options: WriterOptions) -> Writer {
        Writer::new(options)
    }

    #[test]
    fn minimized_map_round_trip_text() {
        let mut w = writer(WriterOptions::default());
        w.begin_map().unwrap();
        w.write_str("a").unwrap();
        w.write_i64(1).unwrap();
        w.write_str("b").unwrap();
        w.write_i64(2).unwrap();
        w.end_map().unwrap();
        assert_eq!(w.flush(), r#"{"a"=>1,"b"=>2}"#);
    }

    #[test]
    fn indented_map_matches_scenario_two() {
        let mut options = WriterOptions::default();
        options.indented = true;
        options.indent_size = 2;
        let mut w = writer(options);
        w.begin_map().unwrap();
        w.write_str("a").unwrap();
        w.write_i64(1).unwrap();
        w.write_str("b").unwrap();
        w.write_i64(2).unwrap();
        w.end_map().unwrap();
        assert_eq!(w.flush(), "{\n  \"a\" => 1,\n  \"b\" => 2\n}");
    }

    #[test]
    fn empty_set_and_map_use_keyword_form() {
        let mut w = writer(WriterOptions::default());
        w.begin_set().unwrap();
        w.end_set().unwrap();
        w.begin_map().unwrap();
        w.end_map().unwrap();
        // Two top-level writes for the test's convenience only; a real
        // document never has more than one root value.
        assert_eq!(w.as_str(), "Set{}Map{}");
    }

    #[test]
    fn non_empty_set_uses_implicit_braces_by_default() {
        let mut w = writer(WriterOptions::default());
        w.begin_set().unwrap();
        w.write_str("x").unwrap();
        w.end_set().unwrap();
        assert_eq!(w.flush(), r#"{"x"}"#);
    }

    #[test]
    fn always_write_set_type_name_applies_even_when_non_empty() {
        let mut options = WriterOptions::default();
        options.always_write_set_type_name = true;
        let mut w = writer(options);
        w.begin_set().unwrap();
        w.write_str("x").unwrap();
        w.end_set().unwrap();
        assert_eq!(w.flush(), r#"Set{"x"}"#);
    }

    #[test]
    fn object_requires_property_name_before_value() {
        let mut w = writer(WriterOptions::default());
        w.begin_object().unwrap();
        let err = w.write_str("oops").unwrap_err();
        assert!(matches!(err, RdnError::InvalidOperation { .. }));
    }

    #[test]
    fn object_round_trip_text() {
        let mut w = writer(WriterOptions::default());
        w.begin_object().unwrap();
        w.write_property_name("a").unwrap();
        w.write_i64(1).unwrap();
        w.end_object().unwrap();
        assert_eq!(w.flush(), r#"{"a":1}"#);
    }

    #[test]
    fn nested_tuple_inside_array() {
        let mut w = writer(WriterOptions::default());
        w.begin_array().unwrap();
        w.write_i64(1).unwrap();
        w.begin_tuple().unwrap();
        w.write_i64(2).unwrap();
        w.write_str("x").unwrap();
        w.end_tuple().unwrap();
        w.end_array().unwrap();
        assert_eq!(w.flush(), r#"[1,(2,"x")]"#);
    }

    #[test]
    fn special_numbers_round_trip_text() {
        let mut w = writer(WriterOptions::default());
        w.begin_object().unwrap();
        w.write_property_name("nan").unwrap();
        w.write_f64(f64::NAN).unwrap();
        w.write_property_name("inf").unwrap();
        w.write_f64(f64::INFINITY).unwrap();
        w.write_property_name("negInf").unwrap();
        w.write_f64(f64::NEG_INFINITY).unwrap();
        w.end_object().unwrap();
        assert_eq!(w.flush(), r#"{"nan":NaN,"inf":Infinity,"negInf":-Infinity}"#);
    }

    #[test]
    fn binary_round_trip_text() {
        let mut w = writer(WriterOptions::default());
        w.write_binary(b"Hello").unwrap();
        assert_eq!(w.flush(), r#"b"SGVsbG8=""#);
    }

    #[test]
    fn oversized_payload_is_limit_exceeded() {
        let mut options = WriterOptions::default();
        options.max_token_size = 4;
        let mut w = writer(options);
        let err = w.write_str("much too long").unwrap_err();
        assert!(matches!(err, RdnError::LimitExceeded { .. }));
    }

    #[test]
    fn depth_exceeded_is_invalid_operation() {
        let mut options = WriterOptions::default();
        options.max_depth = 1;
        let mut w = writer(options);
        w.begin_array().unwrap();
        let err = w.begin_array().unwrap_err();
        assert!(matches!(err, RdnError::InvalidOperation { .. }));
    }

    #[test]
    fn mismatched_end_is_invalid_operation() {
        let mut w = writer(WriterOptions::default());
        w.begin_array().unwrap();
        let err = w.end_object().unwrap_err();
        assert!(matches!(err, RdnError::InvalidOperation { .. }));
    }
}
