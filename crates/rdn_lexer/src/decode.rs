//! Decoders from a raw source span to a [`crate::value`] type.
//!
//! Every function here takes the *inner* text of a token (quotes, `@`,
//! `b`/`x` prefixes, and the trailing `n` bigint suffix already stripped by
//! the caller) and either returns the decoded value or a plain `String`
//! reason, which [`crate::Lexer`] wraps into an [`rdn_diagnostic::RdnError`]
//! with the token's span.

use crate::value::{DurationValue, NumberValue, TimeOnlyValue};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use num_bigint::BigInt;

/// Decode a JSON-style string body (between the quotes) into its escaped
/// form, per §4.1.1. `/` is accepted unescaped and escaped alike.
pub fn decode_string_body(body: &str) -> Result<String, String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if (c as u32) < 0x20 {
            return Err(format!("embedded control byte 0x{:02x} at offset {i}", c as u32));
        }
        if c != '\\' {
            out.push(c);
            continue;
        }

        let Some((_, esc)) = chars.next() else {
            return Err("trailing backslash with no escape character".to_string());
        };

        match esc {
            '"' => out.push('"'),
            '\\' => out.push('\\'),
            '/' => out.push('/'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'u' => {
                let high = decode_hex4(&mut chars)?;
                if (0xD800..=0xDBFF).contains(&high) {
                    // High surrogate: must be followed by \uXXXX low surrogate.
                    let (_, bs) = chars
                        .next()
                        .filter(|&(_, c)| c == '\\')
                        .ok_or_else(|| "unpaired high surrogate".to_string())?;
                    debug_assert_eq!(bs, '\\');
                    let (_, u) = chars
                        .next()
                        .filter(|&(_, c)| c == 'u')
                        .ok_or_else(|| "unpaired high surrogate".to_string())?;
                    debug_assert_eq!(u, 'u');
                    let low = decode_hex4(&mut chars)?;
                    if !(0xDC00..=0xDFFF).contains(&low) {
                        return Err("invalid low surrogate in pair".to_string());
                    }
                    let combined =
                        0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                    let ch = char::from_u32(combined)
                        .ok_or_else(|| "surrogate pair decodes to invalid scalar".to_string())?;
                    out.push(ch);
                } else if (0xDC00..=0xDFFF).contains(&high) {
                    return Err("unpaired low surrogate".to_string());
                } else {
                    let ch = char::from_u32(high)
                        .ok_or_else(|| "invalid unicode scalar in \\u escape".to_string())?;
                    out.push(ch);
                }
            }
            other => return Err(format!("unrecognized escape '\\{other}'")),
        }
    }

    Ok(out)
}

fn decode_hex4(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
) -> Result<u32, String> {
    let mut value = 0u32;
    for _ in 0..4 {
        let (_, c) = chars
            .next()
            .ok_or_else(|| "truncated \\u escape".to_string())?;
        let digit = c
            .to_digit(16)
            .ok_or_else(|| format!("invalid hex digit '{c}' in \\u escape"))?;
        value = (value << 4) | digit;
    }
    Ok(value)
}

/// Parse a JSON-grammar number body (already validated shape-wise by the
/// raw scanner) into an `f64`.
pub fn decode_number(text: &str) -> Result<NumberValue, String> {
    match text {
        "NaN" => return Ok(NumberValue::NaN),
        "Infinity" => return Ok(NumberValue::Infinity),
        "-Infinity" => return Ok(NumberValue::NegInfinity),
        _ => {}
    }
    text.parse::<f64>()
        .map(NumberValue::Finite)
        .map_err(|_| format!("malformed number literal '{text}'"))
}

/// Parse a `-?[0-9]+` body (the `n` suffix already stripped) into a
/// [`BigInt`].
pub fn decode_big_integer(digits: &str) -> Result<BigInt, String> {
    digits
        .parse::<BigInt>()
        .map_err(|_| format!("malformed big integer literal '{digits}n'"))
}

const BASE64_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

fn base64_value(byte: u8) -> Option<u8> {
    BASE64_ALPHABET.iter().position(|&b| b == byte).map(|i| i as u8)
}

/// Decode a `b"…"` body: standard (not URL-safe) base64, alphabet
/// `A-Za-z0-9+/`, padding `=` allowed only as a trailing suffix of length
/// 0, 1, or 2 (§4.1.4).
pub fn decode_base64(body: &str) -> Result<Vec<u8>, String> {
    let bytes = body.as_bytes();
    let pad_len = bytes.iter().rev().take_while(|&&b| b == b'=').count();
    if pad_len > 2 {
        return Err("base64 padding longer than 2 characters".to_string());
    }
    let data = &bytes[..bytes.len() - pad_len];
    if data.iter().any(|&b| b == b'=') {
        return Err("base64 padding character appears before the trailing suffix".to_string());
    }
    if data.len() % 4 == 1 {
        return Err("base64 body has an invalid length".to_string());
    }

    let mut out = Vec::with_capacity(data.len() * 3 / 4 + 3);
    let mut acc: u32 = 0;
    let mut bits = 0u32;
    for &b in data {
        let v = base64_value(b).ok_or_else(|| format!("invalid base64 character '{}'", b as char))?;
        acc = (acc << 6) | u32::from(v);
        bits += 6;
        if bits >= 8 {
            bits -= 8;
            out.push((acc >> bits) as u8);
        }
    }
    Ok(out)
}

/// Encode bytes as standard base64 with `=` padding, the writer's default
/// Binary emission form (§3.3 invariant 6).
pub fn encode_base64(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len().div_ceil(3) * 4);
    for chunk in bytes.chunks(3) {
        let b0 = chunk[0];
        let b1 = chunk.get(1).copied();
        let b2 = chunk.get(2).copied();

        let n = (u32::from(b0) << 16) | (u32::from(b1.unwrap_or(0)) << 8) | u32::from(b2.unwrap_or(0));

        out.push(BASE64_ALPHABET[((n >> 18) & 0x3F) as usize] as char);
        out.push(BASE64_ALPHABET[((n >> 12) & 0x3F) as usize] as char);
        out.push(if b1.is_some() {
            BASE64_ALPHABET[((n >> 6) & 0x3F) as usize] as char
        } else {
            '='
        });
        out.push(if b2.is_some() {
            BASE64_ALPHABET[(n & 0x3F) as usize] as char
        } else {
            '='
        });
    }
    out
}

/// Decode an `x"…"` body: hex, either case, even length required (§4.1.4).
pub fn decode_hex(body: &str) -> Result<Vec<u8>, String> {
    let bytes = body.as_bytes();
    if bytes.len() % 2 != 0 {
        return Err("hex binary literal has an odd number of digits".to_string());
    }
    let mut out = Vec::with_capacity(bytes.len() / 2);
    for pair in bytes.chunks(2) {
        let hi = (pair[0] as char)
            .to_digit(16)
            .ok_or_else(|| format!("invalid hex digit '{}'", pair[0] as char))?;
        let lo = (pair[1] as char)
            .to_digit(16)
            .ok_or_else(|| format!("invalid hex digit '{}'", pair[1] as char))?;
        out.push(((hi << 4) | lo) as u8);
    }
    Ok(out)
}

/// Encode bytes as lowercase hex, the form used when the writer chooses
/// `x"…"` binary (minimized doubles as the canonical writer choice remains
/// `b"…"`; this is exposed for producers that prefer hex).
pub fn encode_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// Split a `pattern/flags` body (the scanner has already confirmed the
/// closing `/`) and validate the flag set (§4.1.5): subset of `dgimsuvy`,
/// no duplicates.
pub fn decode_regex(pattern_raw: &str, flags_raw: &str) -> Result<(String, String), String> {
    if pattern_raw.is_empty() {
        return Err("empty regex pattern".to_string());
    }

    let mut pattern = String::with_capacity(pattern_raw.len());
    let mut chars = pattern_raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('/') => pattern.push('/'),
                Some(other) => {
                    pattern.push('\\');
                    pattern.push(other);
                }
                None => return Err("trailing backslash in regex pattern".to_string()),
            }
        } else {
            pattern.push(c);
        }
    }

    let mut seen = 0u32;
    for c in flags_raw.chars() {
        let bit = match c {
            'd' => 1 << 0,
            'g' => 1 << 1,
            'i' => 1 << 2,
            'm' => 1 << 3,
            's' => 1 << 4,
            'u' => 1 << 5,
            'v' => 1 << 6,
            'y' => 1 << 7,
            other => return Err(format!("unrecognized regex flag '{other}'")),
        };
        if seen & bit != 0 {
            return Err(format!("duplicate regex flag '{c}'"));
        }
        seen |= bit;
    }

    Ok((pattern, flags_raw.to_string()))
}

/// Dispatch on a temporal literal's body (the `@` already stripped) per
/// §4.1.3 and decode it into one of the three temporal value shapes.
pub enum Temporal {
    DateTime(DateTime<Utc>),
    TimeOnly(TimeOnlyValue),
    Duration(DurationValue),
}

pub fn decode_temporal(body: &str) -> Result<Temporal, String> {
    if body.starts_with('P') || body.starts_with("-P") {
        return decode_duration(body).map(Temporal::Duration);
    }

    if body.len() >= 5 && body.as_bytes()[4] == b'-' && body.as_bytes()[..4].iter().all(u8::is_ascii_digit) {
        return decode_date_or_datetime(body).map(Temporal::DateTime);
    }

    if let Some(colon) = body.find(':') {
        if body[..colon].bytes().all(|b| b.is_ascii_digit()) {
            return decode_time_only(body).map(Temporal::TimeOnly);
        }
    }

    if body.bytes().all(|b| b.is_ascii_digit()) && !body.is_empty() {
        let millis: i64 = if body.len() <= 10 {
            body.parse::<i64>().map_err(|_| "unix timestamp overflow".to_string())? * 1000
        } else {
            body.parse::<i64>().map_err(|_| "unix timestamp overflow".to_string())?
        };
        return Ok(Temporal::DateTime(
            Utc.timestamp_millis_opt(millis)
                .single()
                .ok_or_else(|| "unix timestamp out of range".to_string())?,
        ));
    }

    Err(format!("unrecognized temporal literal body '@{body}'"))
}

fn decode_date_or_datetime(body: &str) -> Result<DateTime<Utc>, String> {
    if let Some(t_pos) = body.find('T') {
        let (date_part, time_part) = body.split_at(t_pos);
        let time_part = &time_part[1..];
        let time_part = time_part.strip_suffix('Z').unwrap_or(time_part);

        let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .map_err(|e| format!("invalid date '{date_part}': {e}"))?;

        let fmt = if time_part.contains('.') {
            "%H:%M:%S%.f"
        } else {
            "%H:%M:%S"
        };
        let time = chrono::NaiveTime::parse_from_str(time_part, fmt)
            .map_err(|e| format!("invalid time '{time_part}': {e}"))?;

        let naive = NaiveDateTime::new(date, time);
        Ok(Utc.from_utc_datetime(&naive))
    } else {
        let date = NaiveDate::parse_from_str(body, "%Y-%m-%d")
            .map_err(|e| format!("invalid date '{body}': {e}"))?;
        let naive = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| "invalid midnight".to_string())?;
        Ok(Utc.from_utc_datetime(&naive))
    }
}

fn decode_time_only(body: &str) -> Result<TimeOnlyValue, String> {
    let fmt = if body.contains('.') { "%H:%M:%S%.f" } else { "%H:%M:%S" };
    let time = chrono::NaiveTime::parse_from_str(body, fmt)
        .map_err(|e| format!("invalid time '{body}': {e}"))?;
    Ok(TimeOnlyValue {
        hour: time.format("%H").to_string().parse().unwrap_or(0),
        minute: time.format("%M").to_string().parse().unwrap_or(0),
        second: time.format("%S").to_string().parse().unwrap_or(0),
        millisecond: (time.format("%3f").to_string().parse().unwrap_or(0u32)) as u16,
    })
}

/// Parse `[-]P[nY][nM][nD][T[nH][nM][n(.n)?S]]` (§4.1.3).
fn decode_duration(body: &str) -> Result<DurationValue, String> {
    let (negative, rest) = match body.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, body),
    };
    let rest = rest
        .strip_prefix('P')
        .ok_or_else(|| "duration must start with 'P'".to_string())?;
    if rest.is_empty() {
        return Err("empty duration body after 'P'".to_string());
    }

    let (date_part, time_part) = match rest.find('T') {
        Some(t) => (&rest[..t], Some(&rest[t + 1..])),
        None => (rest, None),
    };

    let mut out = DurationValue {
        negative,
        ..DurationValue::ZERO
    };

    let mut cursor = date_part;
    cursor = consume_component(cursor, 'Y', &mut out.years)?;
    cursor = consume_component(cursor, 'M', &mut out.months)?;
    let cursor = consume_component(cursor, 'D', &mut out.days)?;
    if !cursor.is_empty() {
        return Err(format!("unexpected trailing characters '{cursor}' in duration date part"));
    }

    if let Some(time_part) = time_part {
        if time_part.is_empty() {
            return Err("empty time part after 'T' in duration".to_string());
        }
        let mut cursor = time_part;
        cursor = consume_component(cursor, 'H', &mut out.hours)?;
        cursor = consume_component(cursor, 'M', &mut out.minutes)?;
        let cursor = consume_seconds(cursor, &mut out.seconds, &mut out.milliseconds)?;
        if !cursor.is_empty() {
            return Err(format!("unexpected trailing characters '{cursor}' in duration time part"));
        }
    }

    Ok(out)
}

fn consume_component<'a>(input: &'a str, unit: char, out: &mut u32) -> Result<&'a str, String> {
    let digits: String = input.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Ok(input);
    }
    let rest = &input[digits.len()..];
    // This component may be absent (e.g. "3D" with no preceding "nY"/"nM"):
    // only commit the digits just scanned if they're actually followed by
    // `unit`; otherwise leave `input` untouched for the next consumer.
    let Some(rest) = rest.strip_prefix(unit) else {
        return Ok(input);
    };
    *out = digits
        .parse()
        .map_err(|_| format!("duration component '{digits}' overflows"))?;
    Ok(rest)
}

fn consume_seconds<'a>(input: &'a str, seconds: &mut u32, millis: &mut u16) -> Result<&'a str, String> {
    let digits: String = input
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if digits.is_empty() {
        return Ok(input);
    }
    let rest = &input[digits.len()..];
    let rest = rest
        .strip_prefix('S')
        .ok_or_else(|| format!("expected unit 'S' after '{digits}' in duration"))?;

    if let Some((whole, frac)) = digits.split_once('.') {
        *seconds = whole.parse().map_err(|_| "duration seconds overflow".to_string())?;
        let mut frac = frac.to_string();
        frac.truncate(3);
        while frac.len() < 3 {
            frac.push('0');
        }
        *millis = frac.parse().map_err(|_| "duration millisecond overflow".to_string())?;
    } else {
        *seconds = digits.parse().map_err(|_| "duration seconds overflow".to_string())?;
    }
    Ok(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_escapes_roundtrip() {
        assert_eq!(decode_string_body(r#"a\"b\\c\/d"#).unwrap(), "a\"b\\c/d");
        assert_eq!(decode_string_body(r"\n\t\r\b\f").unwrap(), "\n\t\r\u{8}\u{c}");
    }

    #[test]
    fn string_rejects_control_byte() {
        assert!(decode_string_body("a\tb").is_err());
    }

    #[test]
    fn string_surrogate_pair() {
        // U+1F600 GRINNING FACE, encoded as a UTF-16 surrogate pair.
        assert_eq!(decode_string_body(r"😀").unwrap(), "\u{1F600}");
    }

    #[test]
    fn string_unpaired_surrogate_fails() {
        assert!(decode_string_body(r"\ud83d").is_err());
    }

    #[test]
    fn number_specials() {
        assert_eq!(decode_number("NaN").unwrap(), NumberValue::NaN);
        assert_eq!(decode_number("Infinity").unwrap(), NumberValue::Infinity);
        assert_eq!(decode_number("-Infinity").unwrap(), NumberValue::NegInfinity);
        assert_eq!(decode_number("-12.5e3").unwrap(), NumberValue::Finite(-12500.0));
    }

    #[test]
    fn base64_roundtrip() {
        let bytes = b"Hello";
        let encoded = encode_base64(bytes);
        assert_eq!(encoded, "SGVsbG8=");
        assert_eq!(decode_base64(&encoded).unwrap(), bytes);
    }

    #[test]
    fn base64_rejects_interior_padding() {
        assert!(decode_base64("SG=sbG8=").is_err());
    }

    #[test]
    fn hex_roundtrip() {
        let bytes = [0x48, 0x65, 0x6c, 0x6c, 0x6f];
        let encoded = encode_hex(&bytes);
        assert_eq!(encoded, "48656c6c6f");
        assert_eq!(decode_hex(&encoded).unwrap(), bytes);
    }

    #[test]
    fn hex_rejects_odd_length() {
        assert!(decode_hex("abc").is_err());
    }

    #[test]
    fn regex_unescapes_slash() {
        let (pattern, flags) = decode_regex(r"^[a-z]+$", "i").unwrap();
        assert_eq!(pattern, "^[a-z]+$");
        assert_eq!(flags, "i");

        let (pattern, _) = decode_regex(r"a\/b", "").unwrap();
        assert_eq!(pattern, "a/b");
    }

    #[test]
    fn regex_rejects_duplicate_flags() {
        assert!(decode_regex("a", "ii").is_err());
    }

    #[test]
    fn datetime_with_milliseconds() {
        match decode_temporal("2024-01-15T10:30:00.000Z").unwrap() {
            Temporal::DateTime(dt) => {
                assert_eq!(dt.to_rfc3339(), "2024-01-15T10:30:00+00:00");
            }
            _ => panic!("expected DateTime"),
        }
    }

    #[test]
    fn date_only_is_midnight_utc() {
        match decode_temporal("2024-01-15").unwrap() {
            Temporal::DateTime(dt) => {
                assert_eq!(dt.format("%H:%M:%S").to_string(), "00:00:00");
            }
            _ => panic!("expected DateTime"),
        }
    }

    #[test]
    fn time_only_literal() {
        match decode_temporal("10:30:00.500").unwrap() {
            Temporal::TimeOnly(t) => {
                assert_eq!(t.hour, 10);
                assert_eq!(t.minute, 30);
                assert_eq!(t.second, 0);
                assert_eq!(t.millisecond, 500);
            }
            _ => panic!("expected TimeOnly"),
        }
    }

    #[test]
    fn unix_seconds_vs_milliseconds_threshold() {
        // 10 digits -> seconds
        match decode_temporal("1700000000").unwrap() {
            Temporal::DateTime(dt) => assert_eq!(dt.timestamp(), 1_700_000_000),
            _ => panic!("expected DateTime"),
        }
        // 11 digits -> milliseconds
        match decode_temporal("17000000000").unwrap() {
            Temporal::DateTime(dt) => assert_eq!(dt.timestamp_millis(), 17_000_000_000),
            _ => panic!("expected DateTime"),
        }
    }

    #[test]
    fn duration_full_form() {
        let d = decode_duration("P1Y2M3DT4H5M6.5S").unwrap();
        assert_eq!(
            d,
            DurationValue {
                negative: false,
                years: 1,
                months: 2,
                days: 3,
                hours: 4,
                minutes: 5,
                seconds: 6,
                milliseconds: 500,
            }
        );
    }

    #[test]
    fn duration_zero() {
        let d = decode_duration("P0D").unwrap();
        assert!(d.is_zero());
    }

    #[test]
    fn duration_negative() {
        let d = decode_duration("-P1D").unwrap();
        assert!(d.negative);
        assert_eq!(d.days, 1);
    }

    #[test]
    fn duration_empty_body_fails() {
        assert!(decode_duration("P").is_err());
    }

    #[test]
    fn duration_component_not_first_in_order() {
        // None of these have a preceding "nY"/"nM" (date part) or "nH"/"nM"
        // (time part); the missing components must be treated as absent
        // rather than failing to match the wrong unit letter.
        let d = decode_duration("P3D").unwrap();
        assert_eq!(d.years, 0);
        assert_eq!(d.months, 0);
        assert_eq!(d.days, 3);

        let d = decode_duration("P2M").unwrap();
        assert_eq!(d.years, 0);
        assert_eq!(d.months, 2);
        assert_eq!(d.days, 0);

        let d = decode_duration("PT30S").unwrap();
        assert_eq!(d.hours, 0);
        assert_eq!(d.minutes, 0);
        assert_eq!(d.seconds, 30);

        let d = decode_duration("PT1.5S").unwrap();
        assert_eq!(d.seconds, 1);
        assert_eq!(d.milliseconds, 500);
    }
}
