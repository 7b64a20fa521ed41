//! Leaf encoding: string escaping (`spec.md` §4.4.2) and numeric/temporal
//! formatting (`spec.md` §4.4.3, §4.4.4).

use rdn_lexer::{DurationValue, NumberValue, TimeOnlyValue};

/// Append `s` to `out`, quoted and escaped with the canonical table: `"`,
/// `\`, and all control bytes (`< 0x20`) become `\"`, `\\`, or one of the
/// short forms (`\b \f \n \r \t`)/`\uXXXX`. `/` is left unescaped.
pub(crate) fn write_escaped_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

/// `spec.md` §4.4.3: shortest round-trip decimal for finite doubles, bare
/// identifiers for the three specials.
pub(crate) fn write_number(out: &mut String, n: NumberValue) {
    match n {
        NumberValue::Finite(v) => write_finite(out, v),
        NumberValue::NaN => out.push_str("NaN"),
        NumberValue::Infinity => out.push_str("Infinity"),
        NumberValue::NegInfinity => out.push_str("-Infinity"),
    }
}

fn write_finite(out: &mut String, v: f64) {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        // An integral value in fixed-point range: emit fixed-point, no
        // decimal point or exponent (§4.4.3: "integers that fit into the
        // target integer type: fixed-point, no exponent, no decimal").
        #[allow(clippy::cast_possible_truncation)]
        let as_i64 = v as i64;
        out.push_str(&as_i64.to_string());
        return;
    }
    let mut buf = ryu::Buffer::new();
    out.push_str(buf.format_finite(v));
}

pub(crate) fn write_bigint(out: &mut String, b: &num_bigint::BigInt) {
    out.push_str(&b.to_string());
    out.push('n');
}

/// `spec.md` §4.4.4: always UTC, always 3 fractional-second digits.
pub(crate) fn write_datetime(out: &mut String, dt: chrono::DateTime<chrono::Utc>) {
    out.push('@');
    out.push_str(&dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string());
}

/// `spec.md` §4.4.4: `HH:MM:SS` or `HH:MM:SS.mmm` if milliseconds ≠ 0.
pub(crate) fn write_time(out: &mut String, t: TimeOnlyValue) {
    out.push('@');
    out.push_str(&format!("{:02}:{:02}:{:02}", t.hour, t.minute, t.second));
    if t.millisecond != 0 {
        out.push_str(&format!(".{:03}", t.millisecond));
    }
}

/// `spec.md` §4.4.4: only non-zero components, trimmed millisecond
/// fraction, `P0D` for the zero duration, leading `-` when negative.
pub(crate) fn write_duration(out: &mut String, d: DurationValue) {
    out.push('@');
    if d.is_zero() {
        out.push_str("P0D");
        return;
    }
    if d.negative {
        out.push('-');
    }
    out.push('P');
    if d.years != 0 {
        out.push_str(&format!("{}Y", d.years));
    }
    if d.months != 0 {
        out.push_str(&format!("{}M", d.months));
    }
    if d.days != 0 {
        out.push_str(&format!("{}D", d.days));
    }
    let has_time = d.hours != 0 || d.minutes != 0 || d.seconds != 0 || d.milliseconds != 0;
    if has_time {
        out.push('T');
        if d.hours != 0 {
            out.push_str(&format!("{}H", d.hours));
        }
        if d.minutes != 0 {
            out.push_str(&format!("{}M", d.minutes));
        }
        if d.seconds != 0 || d.milliseconds != 0 {
            out.push_str(&d.seconds.to_string());
            if d.milliseconds != 0 {
                let mut frac = format!("{:03}", d.milliseconds);
                while frac.ends_with('0') {
                    frac.pop();
                }
                out.push('.');
                out.push_str(&frac);
            }
            out.push('S');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn escapes_control_and_quote_characters() {
        let mut out = String::new();
        write_escaped_string(&mut out, "a\"b\nc\u{1}d");
        assert_eq!(out, "\"a\\\"b\\nc\\u0001d\"");
    }

    #[test]
    fn integral_finite_number_has_no_decimal() {
        let mut out = String::new();
        write_number(&mut out, NumberValue::Finite(42.0));
        assert_eq!(out, "42");
    }

    #[test]
    fn fractional_finite_number_uses_shortest_round_trip() {
        let mut out = String::new();
        write_number(&mut out, NumberValue::Finite(0.1));
        assert_eq!(out, "0.1");
    }

    #[test]
    fn specials_are_bare_identifiers() {
        let mut out = String::new();
        write_number(&mut out, NumberValue::NaN);
        assert_eq!(out, "NaN");
        out.clear();
        write_number(&mut out, NumberValue::NegInfinity);
        assert_eq!(out, "-Infinity");
    }

    #[test]
    fn datetime_is_always_three_fraction_digits() {
        use chrono::TimeZone;
        let dt = chrono::Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let mut out = String::new();
        write_datetime(&mut out, dt);
        assert_eq!(out, "@2024-01-15T10:30:00.000Z");
    }

    #[test]
    fn zero_duration_is_p0d() {
        let mut out = String::new();
        write_duration(&mut out, DurationValue::ZERO);
        assert_eq!(out, "@P0D");
    }

    #[test]
    fn duration_trims_trailing_millisecond_zeros() {
        let mut out = String::new();
        write_duration(
            &mut out,
            DurationValue {
                seconds: 1,
                milliseconds: 500,
                ..DurationValue::ZERO
            },
        );
        assert_eq!(out, "@PT1.5S");
    }

    #[test]
    fn negative_duration_is_prefixed() {
        let mut out = String::new();
        write_duration(
            &mut out,
            DurationValue {
                negative: true,
                days: 3,
                ..DurationValue::ZERO
            },
        );
        assert_eq!(out, "@-P3D");
    }
}
