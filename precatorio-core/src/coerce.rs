//! Value coercion from raw wire values to typed record fields.
//!
//! The source publishes numbers and dates in several shapes (Brazilian and
//! US separators, PowerBI literal suffixes, tuple-style dates, epochs,
//! spreadsheet serials). Every coercion is total: input that cannot be read
//! yields the type's default and a fallback reason, never an error.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Placeholder stored for empty text fields.
pub const TEXT_SENTINEL: &str = "-";

/// Width numeric process identifiers are zero-padded to.
pub const IDENTIFIER_WIDTH: usize = 20;

/// Numbers above this are read as epoch milliseconds (31/12/9999 in seconds).
const EPOCH_MILLIS_THRESHOLD: f64 = 253_402_300_799.0;

/// First value past the last spreadsheet serial day (31/12/9999).
/// Smaller numbers are serial dates, larger ones epoch seconds.
const SERIAL_DAY_LIMIT: f64 = 2_958_466.0;

static DATETIME_TUPLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^datetime\(\s*(\d{1,4})\s*,\s*(\d{1,2})\s*,\s*(\d{1,2})(?:\s*,\s*(\d{1,2}))?(?:\s*,\s*(\d{1,2}))?(?:\s*,\s*(\d{1,2}))?\s*\)$",
    )
    .expect("Invalid datetime tuple regex")
});

// ============================================================================
// TYPES
// ============================================================================

/// Declared type of a canonical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Integer,
    Decimal,
    Date,
    /// Case/process number.
    Identifier,
    Text,
}

impl FieldType {
    /// Value used when the wire value is absent or unreadable.
    pub fn default_value(&self) -> FieldValue {
        match self {
            FieldType::Integer => FieldValue::Integer(0),
            FieldType::Decimal => FieldValue::Decimal(Decimal::new(0, 2)),
            FieldType::Date => FieldValue::Date(None),
            FieldType::Identifier => FieldValue::Identifier(TEXT_SENTINEL.to_string()),
            FieldType::Text => FieldValue::Text(TEXT_SENTINEL.to_string()),
        }
    }
}

/// A coerced, typed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldValue {
    Integer(i64),
    Decimal(Decimal),
    Date(Option<DateTime<Utc>>),
    Identifier(String),
    Text(String),
}

/// Result of one coercion. `fallback` is set when the input was present but
/// unreadable and the default was substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coerced {
    pub value: FieldValue,
    pub fallback: Option<String>,
}

impl Coerced {
    fn ok(value: FieldValue) -> Self {
        Self {
            value,
            fallback: None,
        }
    }

    fn fallback(ty: FieldType, raw: &Value) -> Self {
        Self {
            value: ty.default_value(),
            fallback: Some(format!("cannot read {} as {:?}", raw, ty)),
        }
    }
}

// ============================================================================
// COERCER
// ============================================================================

/// Converts raw wire values into typed field values.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueCoercer;

impl ValueCoercer {
    /// Coerce `raw` to `ty`.
    ///
    /// # Arguments
    /// * `ty` - Declared type of the target field
    /// * `raw` - Literal or dictionary-resolved wire value
    ///
    /// # Returns
    /// The typed value, with a fallback reason if the default was used.
    pub fn coerce(&self, ty: FieldType, raw: &Value) -> Coerced {
        if is_blank(raw) {
            return Coerced::ok(ty.default_value());
        }
        match ty {
            FieldType::Integer => match integer_from_value(raw) {
                Some(v) => Coerced::ok(FieldValue::Integer(v)),
                None => Coerced::fallback(ty, raw),
            },
            FieldType::Decimal => match decimal_from_value(raw) {
                Some(v) => Coerced::ok(FieldValue::Decimal(v)),
                None => Coerced::fallback(ty, raw),
            },
            FieldType::Date => match date_from_value(raw) {
                Some(v) => Coerced::ok(FieldValue::Date(Some(v))),
                None => Coerced::fallback(ty, raw),
            },
            FieldType::Identifier => match identifier_from_value(raw) {
                Some(v) => Coerced::ok(FieldValue::Identifier(v)),
                None => Coerced::fallback(ty, raw),
            },
            FieldType::Text => match text_from_value(raw) {
                Some(v) => Coerced::ok(FieldValue::Text(v)),
                None => Coerced::fallback(ty, raw),
            },
        }
    }
}

/// Null, empty strings and the `-` placeholder all mean "no value".
fn is_blank(raw: &Value) -> bool {
    match raw {
        Value::Null => true,
        Value::String(s) => {
            let s = s.trim();
            s.is_empty() || s == TEXT_SENTINEL
        }
        _ => false,
    }
}

// ============================================================================
// NUMBERS
// ============================================================================

/// Normalize a human/PowerBI formatted number to a plain `[-]digits[.digits]`
/// string.
///
/// Exactly one comma after the last dot makes the comma the decimal mark;
/// otherwise the dot is, and the remaining separators are thousands marks.
pub fn normalize_number(input: &str) -> Option<String> {
    let mut s: String = input
        .replace("R$", "")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '$')
        .collect();

    if s.len() > 1 && s.ends_with(['L', 'l', 'D', 'd', 'M', 'm']) {
        let before = s.as_bytes()[s.len() - 2];
        if before.is_ascii_digit() || before == b'.' {
            s.pop();
        }
    }
    if s.is_empty() {
        return None;
    }
    if !s
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-' | '+'))
    {
        return None;
    }

    let commas = s.matches(',').count();
    let dots = s.matches('.').count();
    let comma_is_decimal = commas == 1 && s.rfind(',') > s.rfind('.');

    let normalized = if comma_is_decimal {
        s.replace('.', "").replace(',', ".")
    } else if dots > 1 {
        s.replace([',', '.'], "")
    } else {
        s.replace(',', "")
    };

    if normalized.chars().any(|c| c.is_ascii_digit()) {
        Some(normalized)
    } else {
        None
    }
}

/// Parse a formatted number into a decimal.
pub fn parse_decimal(input: &str) -> Option<Decimal> {
    let normalized = normalize_number(input)?;
    Decimal::from_str(&normalized).ok()
}

/// Parse a formatted number and truncate it to an integer.
pub fn parse_integer(input: &str) -> Option<i64> {
    let normalized = normalize_number(input)?;
    let value = f64::from_str(&normalized).ok()?;
    truncate_to_i64(value)
}

fn truncate_to_i64(value: f64) -> Option<i64> {
    if !value.is_finite() || value.abs() >= i64::MAX as f64 {
        return None;
    }
    Some(value.trunc() as i64)
}

fn integer_from_value(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate_to_i64)),
        Value::String(s) => parse_integer(s),
        _ => None,
    }
}

fn decimal_from_value(raw: &Value) -> Option<Decimal> {
    match raw {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(Decimal::from(i)),
            None => n.as_f64().and_then(Decimal::from_f64),
        },
        Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

// ============================================================================
// DATES
// ============================================================================

/// Parse a textual date: tuple form, then ISO 8601, then a numeric string.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(caps) = DATETIME_TUPLE.captures(s) {
        let part = |i: usize| -> Option<u32> {
            caps.get(i).map_or(Some(0), |m| m.as_str().parse().ok())
        };
        let year: i32 = caps.get(1)?.as_str().parse().ok()?;
        let date = NaiveDate::from_ymd_opt(year, part(2)?, part(3)?)?;
        let datetime = date.and_hms_opt(part(4)?, part(5)?, part(6)?)?;
        return Some(Utc.from_utc_datetime(&datetime));
    }
    if let Some(parsed) = parse_iso8601(s) {
        return Some(parsed);
    }
    match f64::from_str(s) {
        Ok(n) => date_from_number(n),
        Err(_) => None,
    }
}

fn parse_iso8601(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Interpret a number as epoch milliseconds, epoch seconds or a spreadsheet
/// serial day, by magnitude.
pub fn date_from_number(n: f64) -> Option<DateTime<Utc>> {
    if !n.is_finite() {
        return None;
    }
    if n.abs() > EPOCH_MILLIS_THRESHOLD {
        return DateTime::from_timestamp_millis(n.trunc() as i64);
    }
    if n.abs() >= SERIAL_DAY_LIMIT {
        let secs = n.trunc() as i64;
        let nanos = ((n - n.trunc()).abs() * 1e9) as u32;
        return DateTime::from_timestamp(secs, nanos);
    }
    if n < 0.0 {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let days = n.trunc() as i64;
    let seconds = ((n - n.trunc()) * 86_400.0).round() as i64;
    let naive = base
        .checked_add_signed(Duration::days(days))?
        .checked_add_signed(Duration::seconds(seconds))?;
    Some(Utc.from_utc_datetime(&naive))
}

fn date_from_value(raw: &Value) -> Option<DateTime<Utc>> {
    match raw {
        Value::Number(n) => n.as_f64().and_then(date_from_number),
        Value::String(s) => parse_date(s),
        _ => None,
    }
}

// ============================================================================
// STRINGS
// ============================================================================

fn identifier_from_value(raw: &Value) -> Option<String> {
    match raw {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Some(format!("{:0width$}", u, width = IDENTIFIER_WIDTH))
            } else if let Some(i) = n.as_i64() {
                Some(format!("{:0width$}", i, width = IDENTIFIER_WIDTH))
            } else {
                let f = n.as_f64()?;
                if f.is_finite() && f.fract() == 0.0 && f.abs() < u64::MAX as f64 {
                    Some(format!("{:0width$.0}", f, width = IDENTIFIER_WIDTH))
                } else {
                    Some(f.to_string())
                }
            }
        }
        Value::String(s) => Some(s.trim().to_string()),
        _ => None,
    }
}

fn text_from_value(raw: &Value) -> Option<String> {
    let text = match raw {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        Some(TEXT_SENTINEL.to_string())
    } else {
        Some(text)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn coerce(ty: FieldType, raw: Value) -> Coerced {
        ValueCoercer.coerce(ty, &raw)
    }

    #[test]
    fn test_decimal_brazilian_separators() {
        assert_eq!(parse_decimal("1.234,56"), Some(dec("1234.56")));
        assert_eq!(parse_decimal("R$ 1.234.567,89"), Some(dec("1234567.89")));
        assert_eq!(parse_decimal("1234,5"), Some(dec("1234.5")));
    }

    #[test]
    fn test_decimal_us_separators() {
        assert_eq!(parse_decimal("1,234.56"), Some(dec("1234.56")));
        assert_eq!(parse_decimal("1,234,567.89"), Some(dec("1234567.89")));
        assert_eq!(parse_decimal("1,234,567"), Some(dec("1234567")));
    }

    #[test]
    fn test_decimal_empty_is_zero() {
        let result = coerce(FieldType::Decimal, json!(""));
        assert_eq!(result.value, FieldValue::Decimal(dec("0.00")));
        assert!(result.fallback.is_none());
    }

    #[test]
    fn test_decimal_garbage_falls_back() {
        let result = coerce(FieldType::Decimal, json!("abc"));
        assert_eq!(result.value, FieldValue::Decimal(dec("0.00")));
        assert!(result.fallback.is_some());
    }

    #[test]
    fn test_decimal_from_json_number_and_suffix() {
        assert_eq!(
            coerce(FieldType::Decimal, json!(1234.5)).value,
            FieldValue::Decimal(dec("1234.5"))
        );
        assert_eq!(parse_decimal("98765.43M"), Some(dec("98765.43")));
    }

    #[test]
    fn test_integer_truncates_and_strips() {
        assert_eq!(parse_integer("123.45"), Some(123));
        assert_eq!(parse_integer("2024L"), Some(2024));
        assert_eq!(parse_integer("R$ 1.500,99"), Some(1500));
        assert_eq!(coerce(FieldType::Integer, json!(2023.9)).value, FieldValue::Integer(2023));
    }

    #[test]
    fn test_integer_unparseable_is_zero() {
        let result = coerce(FieldType::Integer, json!("abc"));
        assert_eq!(result.value, FieldValue::Integer(0));
        assert!(result.fallback.is_some());
    }

    #[test]
    fn test_date_tuple_form() {
        let result = coerce(FieldType::Date, json!("datetime(2022,1,15,0,0,0)"));
        assert_eq!(
            result.value,
            FieldValue::Date(Some(Utc.with_ymd_and_hms(2022, 1, 15, 0, 0, 0).unwrap()))
        );
        assert_eq!(
            parse_date("datetime(2021, 12, 3)"),
            Some(Utc.with_ymd_and_hms(2021, 12, 3, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_date_epoch_millis() {
        let result = coerce(FieldType::Date, json!(1_700_000_000_000i64));
        assert_eq!(
            result.value,
            FieldValue::Date(Some(Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap()))
        );
        assert_eq!(
            parse_date("1700000000000"),
            Some(Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap())
        );
    }

    #[test]
    fn test_date_epoch_seconds() {
        assert_eq!(
            date_from_number(1_700_000_000.0),
            Some(Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap())
        );
    }

    #[test]
    fn test_date_iso8601() {
        assert_eq!(
            parse_date("2023-05-10T12:30:00Z"),
            Some(Utc.with_ymd_and_hms(2023, 5, 10, 12, 30, 0).unwrap())
        );
        assert_eq!(
            parse_date("2023-05-10T12:30:00-03:00"),
            Some(Utc.with_ymd_and_hms(2023, 5, 10, 15, 30, 0).unwrap())
        );
        assert_eq!(
            parse_date("2023-05-10"),
            Some(Utc.with_ymd_and_hms(2023, 5, 10, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_date_spreadsheet_serial() {
        assert_eq!(
            date_from_number(45_000.5),
            Some(Utc.with_ymd_and_hms(2023, 3, 15, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_date_unparseable_is_null() {
        let result = coerce(FieldType::Date, json!("abc"));
        assert_eq!(result.value, FieldValue::Date(None));
        assert!(result.fallback.is_some());
        assert_eq!(parse_date("datetime(2022,13,40)"), None);
    }

    #[test]
    fn test_identifier_numeric_is_zero_padded() {
        assert_eq!(
            coerce(FieldType::Identifier, json!(123456)).value,
            FieldValue::Identifier("00000000000000123456".to_string())
        );
    }

    #[test]
    fn test_identifier_string_is_trimmed() {
        assert_eq!(
            coerce(FieldType::Identifier, json!("  0001234-56.2020.8.06.0001 ")).value,
            FieldValue::Identifier("0001234-56.2020.8.06.0001".to_string())
        );
        assert_eq!(
            coerce(FieldType::Identifier, json!("")).value,
            FieldValue::Identifier("-".to_string())
        );
    }

    #[test]
    fn test_text_trims_and_uses_sentinel() {
        assert_eq!(
            coerce(FieldType::Text, json!("  FORTALEZA ")).value,
            FieldValue::Text("FORTALEZA".to_string())
        );
        assert_eq!(
            coerce(FieldType::Text, json!("   ")).value,
            FieldValue::Text("-".to_string())
        );
        assert_eq!(
            coerce(FieldType::Text, Value::Null).value,
            FieldValue::Text("-".to_string())
        );
    }

    #[test]
    fn test_text_rejects_structures() {
        let result = coerce(FieldType::Text, json!({"a": 1}));
        assert_eq!(result.value, FieldValue::Text("-".to_string()));
        assert!(result.fallback.is_some());
    }
}

// ============================================================================
// PROPERTY-BASED TESTS
// ============================================================================
