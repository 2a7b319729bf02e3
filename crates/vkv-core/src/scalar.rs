//! Scalar values and the type cascade.
//!
//! KeyValues text carries no type tags. Every value token is run through a fixed
//! sequence of parse attempts and the first one that succeeds decides the type:
//!
//! 1. boolean (`t`/`true`/`1`/`y`/`yes`, `f`/`false`/`0`/`n`/`no`, case-insensitive)
//! 2. integers, narrowest first: `i8`, `u8`, `i16`, `u16`, `i32`, `u32`, `i64`, `u64`,
//!    `i128`, `u128`, then `isize`, `usize`
//! 3. floats, narrowest first: `f16`, `f32`, `f64`
//! 4. a single character
//! 5. date, date-time, date-time with offset, GUID, time of day, time span
//! 6. otherwise the text itself
//!
//! The order is observable by every consumer. `"1"` is a boolean, not an integer, and
//! `"123"` is an `i8`, not an `i32` or a float.
//!
//! A float width is only chosen when it holds the written value: the width's shortest
//! rendering must denote the same number as the token. `"0.5"` is an `f16`, `"3.14"`
//! an `f32`, `"0.1234567891234"` an `f64`.

use std::fmt;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use half::f16;
use uuid::Uuid;

const TRUE_TOKENS: [&str; 5] = ["t", "true", "1", "y", "yes"];
const FALSE_TOKENS: [&str; 5] = ["f", "false", "0", "n", "no"];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f %:z", "%Y-%m-%d %H:%M:%S%.f%:z"];
const TIME_FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];

const NANOS_PER_SECOND: i128 = 1_000_000_000;

/// A typed leaf value.
///
/// One variant per type the cascade can produce. `String` is the fallback for text
/// that no other parser accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    I128(i128),
    U128(u128),
    Isize(isize),
    Usize(usize),
    F16(f16),
    F32(f32),
    F64(f64),
    Char(char),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    DateTimeOffset(DateTime<FixedOffset>),
    Guid(Uuid),
    Time(NaiveTime),
    TimeSpan(Duration),
    String(String),
}

/// Run the type cascade over `text` and return the first type that accepts it.
///
/// Two stages behave in ways worth knowing:
///
/// - Booleans come first, so `"1"` and `"0"` read as `true` and `false`, never as
///   integers.
/// - The float stages pick the narrowest width whose own text form reads back as the
///   same `f64` as the input. `"0.5"` is an `f16`, `"1.23"` an `f32`, and
///   `"0.1234567891234"` needs `f64`. A width that would visibly round the value is
///   never chosen, even when the number is in its range.
///
/// Use [`decode_raw_named`](crate::decode_raw_named) to read leaves without the
/// cascade.
///
/// ```
/// use vkv_core::{parse_all, Scalar};
///
/// assert_eq!(parse_all("123"), Scalar::I8(123));
/// assert_eq!(parse_all("1"), Scalar::Bool(true));
/// assert_eq!(parse_all("300"), Scalar::I16(300));
/// assert_eq!(parse_all("0.5"), Scalar::F16(half::f16::from_f32(0.5)));
/// assert_eq!(parse_all("1.23"), Scalar::F32(1.23));
/// assert!(matches!(parse_all("0.1234567891234"), Scalar::F64(_)));
/// assert_eq!(parse_all("hello"), Scalar::String("hello".to_string()));
/// ```
pub fn parse_all(text: &str) -> Scalar {
    if let Some(v) = parse_bool(text) {
        return Scalar::Bool(v);
    }
    if let Some(v) = parse_integer(text) {
        return v;
    }
    if let Some(v) = parse_float(text) {
        return v;
    }
    if let Some(v) = single_char(text) {
        return Scalar::Char(v);
    }
    if let Some(v) = parse_date(text) {
        return Scalar::Date(v);
    }
    if let Some(v) = parse_date_time(text) {
        return Scalar::DateTime(v);
    }
    if let Some(v) = parse_date_time_offset(text) {
        return Scalar::DateTimeOffset(v);
    }
    if let Ok(v) = Uuid::parse_str(text) {
        return Scalar::Guid(v);
    }
    if let Some(v) = parse_time(text) {
        return Scalar::Time(v);
    }
    if let Some(v) = parse_time_span(text) {
        return Scalar::TimeSpan(v);
    }
    Scalar::String(text.to_string())
}

/// Boolean stage of the cascade. Surrounding whitespace and case are ignored.
pub fn parse_bool(text: &str) -> Option<bool> {
    let lowered = text.trim().to_ascii_lowercase();
    if TRUE_TOKENS.contains(&lowered.as_str()) {
        Some(true)
    } else if FALSE_TOKENS.contains(&lowered.as_str()) {
        Some(false)
    } else {
        None
    }
}

fn parse_integer(text: &str) -> Option<Scalar> {
    if let Ok(v) = text.parse() {
        return Some(Scalar::I8(v));
    }
    if let Ok(v) = text.parse() {
        return Some(Scalar::U8(v));
    }
    if let Ok(v) = text.parse() {
        return Some(Scalar::I16(v));
    }
    if let Ok(v) = text.parse() {
        return Some(Scalar::U16(v));
    }
    if let Ok(v) = text.parse() {
        return Some(Scalar::I32(v));
    }
    if let Ok(v) = text.parse() {
        return Some(Scalar::U32(v));
    }
    if let Ok(v) = text.parse() {
        return Some(Scalar::I64(v));
    }
    if let Ok(v) = text.parse() {
        return Some(Scalar::U64(v));
    }
    if let Ok(v) = text.parse() {
        return Some(Scalar::I128(v));
    }
    if let Ok(v) = text.parse() {
        return Some(Scalar::U128(v));
    }
    // Never wider than the 128-bit stages above; kept so the stage order stays complete.
    if let Ok(v) = text.parse() {
        return Some(Scalar::Isize(v));
    }
    if let Ok(v) = text.parse() {
        return Some(Scalar::Usize(v));
    }
    None
}

fn parse_float(text: &str) -> Option<Scalar> {
    let wide: f64 = text.parse().ok()?;
    if let Ok(v) = text.parse::<f16>() {
        if denotes(&render_f16(v), wide) {
            return Some(Scalar::F16(v));
        }
    }
    if let Ok(v) = text.parse::<f32>() {
        if denotes(&format!("{v:?}"), wide) {
            return Some(Scalar::F32(v));
        }
    }
    Some(Scalar::F64(wide))
}

/// Does `rendered` parse back to exactly `wide`?
fn denotes(rendered: &str, wide: f64) -> bool {
    match rendered.parse::<f64>() {
        Ok(back) => back == wide || (back.is_nan() && wide.is_nan()),
        Err(_) => false,
    }
}

fn render_f16(v: f16) -> String {
    format!("{:?}", v.to_f32())
}

fn single_char(text: &str) -> Option<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

fn parse_date_time_offset(text: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(text).ok().or_else(|| {
        OFFSET_FORMATS
            .iter()
            .find_map(|format| DateTime::parse_from_str(text, format).ok())
    })
}

fn parse_time(text: &str) -> Option<NaiveTime> {
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(text, format).ok())
}

/// Parse `[-][d.]hh:mm[:ss[.fffffffff]]`.
fn parse_time_span(text: &str) -> Option<Duration> {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let mut parts = rest.split(':');
    let head = parts.next()?;
    let minutes = digits(parts.next()?)?;
    let seconds_part = parts.next();
    if parts.next().is_some() {
        return None;
    }

    let (days, hours) = match head.split_once('.') {
        Some((days, hours)) => (digits(days)?, digits(hours)?),
        None => (0, digits(head)?),
    };
    let (seconds, nanos) = match seconds_part {
        None => (0, 0),
        Some(part) => match part.split_once('.') {
            Some((whole, fraction)) => (digits(whole)?, fraction_nanos(fraction)?),
            None => (digits(part)?, 0),
        },
    };
    if hours > 23 || minutes > 59 || seconds > 59 {
        return None;
    }

    let whole_seconds = ((days * 24 + hours) * 60 + minutes) * 60 + seconds;
    let total = whole_seconds.checked_mul(NANOS_PER_SECOND)?.checked_add(nanos)?;
    let total = if negative { -total } else { total };
    i64::try_from(total).ok().map(Duration::nanoseconds)
}

fn digits(text: &str) -> Option<i128> {
    if text.is_empty() || text.len() > 20 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn fraction_nanos(text: &str) -> Option<i128> {
    if text.is_empty() || text.len() > 9 {
        return None;
    }
    let value = digits(text)?;
    Some(value * 10i128.pow(9 - text.len() as u32))
}

fn write_time_span(span: &Duration, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let total = span
        .num_nanoseconds()
        .map(i128::from)
        .unwrap_or_else(|| i128::from(span.num_milliseconds()) * 1_000_000);
    if total < 0 {
        f.write_str("-")?;
    }
    let total = total.abs();
    let nanos = total % NANOS_PER_SECOND;
    let seconds = total / NANOS_PER_SECOND;
    let days = seconds / 86_400;
    if days > 0 {
        write!(f, "{days}.")?;
    }
    write!(
        f,
        "{:02}:{:02}:{:02}",
        seconds / 3_600 % 24,
        seconds / 60 % 60,
        seconds % 60
    )?;
    if nanos > 0 {
        let fraction = format!("{nanos:09}");
        write!(f, ".{}", fraction.trim_end_matches('0'))?;
    }
    Ok(())
}

impl Scalar {
    /// Short type name used in mapping error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Scalar::Bool(_) => "bool",
            Scalar::I8(_) => "i8",
            Scalar::U8(_) => "u8",
            Scalar::I16(_) => "i16",
            Scalar::U16(_) => "u16",
            Scalar::I32(_) => "i32",
            Scalar::U32(_) => "u32",
            Scalar::I64(_) => "i64",
            Scalar::U64(_) => "u64",
            Scalar::I128(_) => "i128",
            Scalar::U128(_) => "u128",
            Scalar::Isize(_) => "isize",
            Scalar::Usize(_) => "usize",
            Scalar::F16(_) => "f16",
            Scalar::F32(_) => "f32",
            Scalar::F64(_) => "f64",
            Scalar::Char(_) => "char",
            Scalar::Date(_) => "date",
            Scalar::DateTime(_) => "date-time",
            Scalar::DateTimeOffset(_) => "date-time with offset",
            Scalar::Guid(_) => "guid",
            Scalar::Time(_) => "time",
            Scalar::TimeSpan(_) => "time span",
            Scalar::String(_) => "string",
        }
    }

    /// The fallback text, if no cascade stage claimed this value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view. Booleans count as 0/1, chars as their code point, and floats
    /// round half-to-even.
    pub(crate) fn to_i128(&self) -> Option<i128> {
        match *self {
            Scalar::Bool(v) => Some(i128::from(v)),
            Scalar::I8(v) => Some(i128::from(v)),
            Scalar::U8(v) => Some(i128::from(v)),
            Scalar::I16(v) => Some(i128::from(v)),
            Scalar::U16(v) => Some(i128::from(v)),
            Scalar::I32(v) => Some(i128::from(v)),
            Scalar::U32(v) => Some(i128::from(v)),
            Scalar::I64(v) => Some(i128::from(v)),
            Scalar::U64(v) => Some(i128::from(v)),
            Scalar::I128(v) => Some(v),
            Scalar::U128(v) => i128::try_from(v).ok(),
            Scalar::Isize(v) => i128::try_from(v).ok(),
            Scalar::Usize(v) => i128::try_from(v).ok(),
            Scalar::F16(v) => round_to_i128(v.to_f64()),
            Scalar::F32(v) => round_to_i128(f64::from(v)),
            Scalar::F64(v) => round_to_i128(v),
            Scalar::Char(c) => Some(i128::from(u32::from(c))),
            _ => None,
        }
    }

    pub(crate) fn to_u128(&self) -> Option<u128> {
        match *self {
            Scalar::U128(v) => Some(v),
            _ => self.to_i128().and_then(|v| u128::try_from(v).ok()),
        }
    }

    pub(crate) fn to_f64(&self) -> Option<f64> {
        match *self {
            Scalar::F16(v) => Some(v.to_f64()),
            Scalar::F32(v) => Some(f64::from(v)),
            Scalar::F64(v) => Some(v),
            Scalar::U128(v) => Some(v as f64),
            Scalar::Char(_) => None,
            _ => self.to_i128().map(|v| v as f64),
        }
    }
}

fn round_to_i128(v: f64) -> Option<i128> {
    if !v.is_finite() {
        return None;
    }
    let rounded = v.round_ties_even();
    if rounded < i128::MIN as f64 || rounded >= i128::MAX as f64 {
        return None;
    }
    Some(rounded as i128)
}

/// The text form written to KeyValues output.
///
/// Every rendering is chosen so the cascade reads it back as the same variant: floats
/// always carry a decimal point or exponent, date-times use `T` instead of a space.
/// Zero-day positive time spans are the exception, they read back as times of day.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(v) => f.write_str(if *v { "true" } else { "false" }),
            Scalar::I8(v) => write!(f, "{v}"),
            Scalar::U8(v) => write!(f, "{v}"),
            Scalar::I16(v) => write!(f, "{v}"),
            Scalar::U16(v) => write!(f, "{v}"),
            Scalar::I32(v) => write!(f, "{v}"),
            Scalar::U32(v) => write!(f, "{v}"),
            Scalar::I64(v) => write!(f, "{v}"),
            Scalar::U64(v) => write!(f, "{v}"),
            Scalar::I128(v) => write!(f, "{v}"),
            Scalar::U128(v) => write!(f, "{v}"),
            Scalar::Isize(v) => write!(f, "{v}"),
            Scalar::Usize(v) => write!(f, "{v}"),
            Scalar::F16(v) => f.write_str(&render_f16(*v)),
            Scalar::F32(v) => write!(f, "{v:?}"),
            Scalar::F64(v) => write!(f, "{v:?}"),
            Scalar::Char(v) => write!(f, "{v}"),
            Scalar::Date(v) => write!(f, "{}", v.format(DATE_FORMATS[0])),
            Scalar::DateTime(v) => write!(f, "{}", v.format(DATE_TIME_FORMATS[0])),
            Scalar::DateTimeOffset(v) => f.write_str(&v.to_rfc3339()),
            Scalar::Guid(v) => write!(f, "{v}"),
            Scalar::Time(v) => write!(f, "{}", v.format(TIME_FORMATS[0])),
            Scalar::TimeSpan(v) => write_time_span(v, f),
            Scalar::String(v) => f.write_str(v),
        }
    }
}

macro_rules! scalar_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(v: $ty) -> Self {
                    Scalar::$variant(v)
                }
            }
        )*
    };
}

scalar_from! {
    bool => Bool,
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    i128 => I128,
    u128 => U128,
    isize => Isize,
    usize => Usize,
    f16 => F16,
    f32 => F32,
    f64 => F64,
    char => Char,
    NaiveDate => Date,
    NaiveDateTime => DateTime,
    DateTime<FixedOffset> => DateTimeOffset,
    Uuid => Guid,
    NaiveTime => Time,
    Duration => TimeSpan,
    String => String,
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::String(v.to_string())
    }
}
