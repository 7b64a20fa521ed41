//! Decoded literal payloads. These are the shapes a [`crate::Token`] carries
//! once the raw byte span has been interpreted — the types a consumer
//! (`rdn_reader`'s typed accessors, `rdn_doc`'s element view) ultimately
//! hands back.

use chrono::{DateTime, Utc};
use num_bigint::BigInt;

/// A decoded `Number` literal: either a finite IEEE-754 double or one of
/// the three bare-identifier specials (§4.1.2).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NumberValue {
    Finite(f64),
    NaN,
    Infinity,
    NegInfinity,
}

impl NumberValue {
    /// Widens this value to `f64`, the canonical numeric representation
    /// used for deep equality (§4.3.2: `NaN == NaN` is true for that
    /// purpose, unlike IEEE-754 `==`).
    pub fn as_f64(self) -> f64 {
        match self {
            NumberValue::Finite(v) => v,
            NumberValue::NaN => f64::NAN,
            NumberValue::Infinity => f64::INFINITY,
            NumberValue::NegInfinity => f64::NEG_INFINITY,
        }
    }

    /// Deep-equality comparison per §4.3.2: bitwise-NaN compares equal to
    /// any other NaN, everything else is ordinary float equality.
    pub fn deep_eq(self, other: NumberValue) -> bool {
        let (a, b) = (self.as_f64(), other.as_f64());
        if a.is_nan() && b.is_nan() {
            true
        } else {
            a == b
        }
    }
}

/// A decoded `TimeOnly` literal: `@HH:MM:SS[.mmm]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeOnlyValue {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub millisecond: u16,
}

/// A decoded `Duration` literal: a sign-bearing ISO-8601 period.
///
/// Components are stored un-normalized (no carrying between units — `P90D`
/// stays 90 days, it is not folded into months) because ISO-8601 period
/// components are not interchangeable without a calendar reference point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct DurationValue {
    pub negative: bool,
    pub years: u32,
    pub months: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub milliseconds: u16,
}

impl DurationValue {
    /// The canonical zero duration, written `P0D` (§3.3 invariant 5).
    pub const ZERO: DurationValue = DurationValue {
        negative: false,
        years: 0,
        months: 0,
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
        milliseconds: 0,
    };

    pub fn is_zero(&self) -> bool {
        self.years == 0
            && self.months == 0
            && self.days == 0
            && self.hours == 0
            && self.minutes == 0
            && self.seconds == 0
            && self.milliseconds == 0
    }
}

/// A decoded `RegExp` literal: pattern source plus a de-duplicated flag set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegExpValue {
    pub source: String,
    pub flags: String,
}

/// Every decoded literal value a token may carry.
#[derive(Clone, Debug, PartialEq)]
pub enum LiteralValue {
    String(String),
    Number(NumberValue),
    BigInteger(BigInt),
    DateTime(DateTime<Utc>),
    TimeOnly(TimeOnlyValue),
    Duration(DurationValue),
    Binary(Vec<u8>),
    RegExp(RegExpValue),
}
