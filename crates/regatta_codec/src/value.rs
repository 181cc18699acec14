//! Field values and their textual XML forms.

use crate::error::{CodecError, CodecResult};
use chrono::{NaiveDate, NaiveDateTime};
use std::borrow::Cow;
use std::fmt;

/// Date-time format written into documents: fixed width, microsecond
/// fraction, literal `Z` suffix.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// A single field value.
///
/// Values decoded from a document are always [`FieldValue::Text`]; the typed
/// variants are produced by record builders and formatted on encode.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Free text or an enumerated code.
    Text(String),
    /// Signed integer.
    Integer(i64),
    /// Decimal number (handicap allowances, lengths).
    Float(f64),
    /// Boolean, written as `true`/`false`.
    Bool(bool),
    /// Date-time, written with [`DATETIME_FORMAT`].
    DateTime(NaiveDateTime),
}

impl FieldValue {
    /// Returns the text written into the document for this value.
    #[must_use]
    pub fn to_xml_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(s) => Cow::Borrowed(s.as_str()),
            Self::Integer(i) => Cow::Owned(i.to_string()),
            Self::Float(f) => Cow::Owned(f.to_string()),
            Self::Bool(true) => Cow::Borrowed("true"),
            Self::Bool(false) => Cow::Borrowed("false"),
            Self::DateTime(dt) => Cow::Owned(dt.format(DATETIME_FORMAT).to_string()),
        }
    }

    /// Returns the raw text if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Coerces the value to an integer.
    pub fn to_integer(&self, field: &str) -> CodecResult<i64> {
        match self {
            Self::Integer(i) => Ok(*i),
            other => parse_integer(field, &other.to_xml_text()),
        }
    }

    /// Coerces the value to a float.
    pub fn to_float(&self, field: &str) -> CodecResult<f64> {
        match self {
            Self::Float(f) => Ok(*f),
            Self::Integer(i) => Ok(*i as f64),
            other => parse_float(field, &other.to_xml_text()),
        }
    }

    /// Coerces the value to a boolean.
    pub fn to_bool(&self, field: &str) -> CodecResult<bool> {
        match self {
            Self::Bool(b) => Ok(*b),
            other => parse_bool(field, &other.to_xml_text()),
        }
    }

    /// Coerces the value to a date-time.
    pub fn to_datetime(&self, field: &str) -> CodecResult<NaiveDateTime> {
        match self {
            Self::DateTime(dt) => Ok(*dt),
            other => parse_datetime(field, &other.to_xml_text()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_xml_text())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

/// Parses a raw integer field.
pub fn parse_integer(field: &str, raw: &str) -> CodecResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| CodecError::invalid_value(field, raw, "integer"))
}

/// Parses a raw decimal field.
pub fn parse_float(field: &str, raw: &str) -> CodecResult<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CodecError::invalid_value(field, raw, "number"))
}

/// Parses a raw boolean field. Accepts `true`/`false` in any case.
pub fn parse_bool(field: &str, raw: &str) -> CodecResult<bool> {
    match raw.trim() {
        s if s.eq_ignore_ascii_case("true") => Ok(true),
        s if s.eq_ignore_ascii_case("false") => Ok(false),
        _ => Err(CodecError::invalid_value(field, raw, "boolean")),
    }
}

/// Parses a raw date-time field.
///
/// Accepts the document format with or without fraction and `Z`, and plain
/// `YYYY-MM-DD` dates (read as midnight).
pub fn parse_datetime(field: &str, raw: &str) -> CodecResult<NaiveDateTime> {
    let trimmed = raw.trim();
    let body = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    if let Ok(dt) = NaiveDateTime::parse_from_str(body, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(body, "%Y-%m-%dT%H:%M") {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(body, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| CodecError::invalid_value(field, raw, "date-time"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn booleans_are_lowercase_literals() {
        assert_eq!(FieldValue::Bool(true).to_xml_text(), "true");
        assert_eq!(FieldValue::Bool(false).to_xml_text(), "false");
    }

    #[test]
    fn datetime_has_fraction_and_zulu_suffix() {
        let value = FieldValue::DateTime(at(2024, 3, 15, 11, 42));
        assert_eq!(value.to_xml_text(), "2024-03-15T11:42:00.000000Z");
    }

    #[test]
    fn datetime_parses_document_format() {
        let dt = parse_datetime("StartTime", "2024-03-15T11:42:00.000000Z").unwrap();
        assert_eq!(dt, at(2024, 3, 15, 11, 42));
    }

    #[test]
    fn datetime_parses_plain_date() {
        let dt = parse_datetime("StartDate", "2024-01-02").unwrap();
        assert_eq!(dt, at(2024, 1, 2, 0, 0));
    }

    #[test]
    fn malformed_integer_surfaces_on_coercion() {
        let value = FieldValue::from("abc");
        let err = value.to_integer("RaceId").unwrap_err();
        assert!(matches!(err, CodecError::InvalidValue { expected: "integer", .. }));
    }

    #[test]
    fn text_coerces_to_typed_values() {
        assert_eq!(FieldValue::from(" 17 ").to_integer("YID").unwrap(), 17);
        assert!(FieldValue::from("TRUE").to_bool("Discardable").unwrap());
        assert_eq!(FieldValue::from("612.5").to_float("GPH").unwrap(), 612.5);
    }

    #[test]
    fn float_rejects_non_finite() {
        assert!(parse_float("GPH", "NaN").is_err());
        assert!(parse_float("GPH", "inf").is_err());
    }
}
