//! Field decoders for the loosely typed JSON the API returns.
//!
//! The API is not consistent about scalar types: ids and counters show up as
//! numbers or numeric strings, flags as `0`/`1`, booleans or strings. These
//! helpers accept every observed shape and reject anything else. They are used
//! through `#[serde(deserialize_with = ...)]`, which also means a missing key
//! is an error even for `Option` fields.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use crate::params::is_truthy;

enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Bool(b) => Ok(Scalar::Bool(b)),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Ok(Scalar::Int(i)),
                (None, Some(f)) => Ok(Scalar::Float(f)),
                (None, None) => Err(de::Error::custom(format!("number out of range: {}", n))),
            },
            Value::String(s) => Ok(Scalar::Text(s)),
            other => Err(de::Error::custom(format!(
                "expected a number or a string, got {}",
                other
            ))),
        }
    }
}

fn to_integer<E: de::Error>(scalar: Scalar) -> Result<i64, E> {
    match scalar {
        Scalar::Int(n) => Ok(n),
        Scalar::Float(f) if f.fract() == 0.0 => Ok(f as i64),
        Scalar::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| E::custom(format!("expected an integer, got {:?}", s))),
        Scalar::Float(f) => Err(E::custom(format!("expected an integer, got {}", f))),
        Scalar::Bool(b) => Err(E::custom(format!("expected an integer, got {}", b))),
    }
}

fn to_text<E: de::Error>(scalar: Scalar) -> Result<String, E> {
    match scalar {
        Scalar::Text(s) => Ok(s),
        Scalar::Int(n) => Ok(n.to_string()),
        Scalar::Float(f) => Ok(f.to_string()),
        Scalar::Bool(b) => Err(E::custom(format!("expected text, got {}", b))),
    }
}

/// Integer given as a JSON number or a numeric string.
pub(crate) fn integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    to_integer(Scalar::deserialize(deserializer)?)
}

pub(crate) fn optional_integer<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<i64>, D::Error> {
    Option::<Scalar>::deserialize(deserializer)?
        .map(to_integer)
        .transpose()
}

/// Text given as a string or a bare number; `null` is kept as `None`.
pub(crate) fn optional_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Option::<Scalar>::deserialize(deserializer)?
        .map(to_text)
        .transpose()
}

pub(crate) fn optional_decimal<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<f64>, D::Error> {
    match Option::<Scalar>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Scalar::Int(n)) => Ok(Some(n as f64)),
        Some(Scalar::Float(f)) => Ok(Some(f)),
        Some(Scalar::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("expected a number, got {:?}", s))),
        Some(Scalar::Bool(b)) => Err(de::Error::custom(format!("expected a number, got {}", b))),
    }
}

/// Flag cast to an integer, then read as a boolean (non-zero is `true`).
pub(crate) fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match Option::<Scalar>::deserialize(deserializer)? {
        None => Ok(false),
        Some(Scalar::Bool(b)) => Ok(b),
        Some(Scalar::Int(n)) => Ok(n != 0),
        Some(Scalar::Float(f)) => Ok(f != 0.0),
        Some(Scalar::Text(s)) => match s.trim() {
            "" | "false" => Ok(false),
            "true" => Ok(true),
            other => other
                .parse::<i64>()
                .map(|n| n != 0)
                .map_err(|_| de::Error::custom(format!("expected a flag, got {:?}", s))),
        },
    }
}

/// Timestamp string, read as UTC.
pub(crate) fn utc_datetime<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_utc(&raw).map_err(de::Error::custom)
}

/// Timestamp that may be falsy (`null`, `false`, `0`, `""`, `"0"`), in which
/// case it is treated as unset.
pub(crate) fn optional_utc_datetime<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    if !is_truthy(&value) {
        return Ok(None);
    }
    match value {
        Value::String(raw) => parse_utc(&raw).map(Some).map_err(de::Error::custom),
        other => Err(de::Error::custom(format!("expected a timestamp, got {}", other))),
    }
}

/// Parses an API timestamp.
///
/// Zone-less values (`2020-01-15 10:30:00`) are taken as UTC whatever the host
/// timezone is; values carrying an offset are converted to UTC.
pub(crate) fn parse_utc(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%:z") {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }

    Err(format!("invalid timestamp {:?}", raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "integer")]
        id: i64,
        #[serde(deserialize_with = "optional_text")]
        label: Option<String>,
        #[serde(deserialize_with = "flag")]
        on: bool,
        #[serde(deserialize_with = "optional_utc_datetime")]
        at: Option<DateTime<Utc>>,
    }

    fn sample(value: Value) -> Result<Sample, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        let p = sample(json!({"id": "42", "label": 1001, "on": "1", "at": null})).unwrap();
        assert_eq!(p.id, 42);
        assert_eq!(p.label.as_deref(), Some("1001"));
        assert!(p.on);
        assert!(p.at.is_none());
    }

    #[test]
    fn null_text_is_kept_as_none() {
        let p = sample(json!({"id": 1, "label": null, "on": 0, "at": null})).unwrap();
        assert!(p.label.is_none());
    }

    #[test]
    fn wrong_scalar_shape_is_described() {
        let err = sample(json!({"id": [1], "label": "x", "on": 0, "at": null})).unwrap_err();
        assert!(err.to_string().contains("expected a number or a string, got [1]"));
    }

    #[test]
    fn flag_casts_through_integer() {
        for (raw, expected) in [
            (json!(0), false),
            (json!(1), true),
            (json!(2), true),
            (json!("0"), false),
            (json!(true), true),
            (json!(null), false),
        ] {
            let p = sample(json!({"id": 1, "label": "x", "on": raw, "at": ""})).unwrap();
            assert_eq!(p.on, expected);
        }
    }

    #[test]
    fn missing_key_is_an_error_even_for_options() {
        let err = sample(json!({"id": 1, "label": "x", "on": 0})).unwrap_err();
        assert!(err.to_string().contains("missing field `at`"));
    }

    #[test]
    fn non_numeric_id_is_rejected() {
        assert!(sample(json!({"id": "abc", "label": "x", "on": 0, "at": null})).is_err());
    }

    #[test]
    fn falsy_timestamps_are_unset() {
        for raw in [json!(null), json!(false), json!(0), json!(""), json!("0")] {
            let p = sample(json!({"id": 1, "label": "x", "on": 0, "at": raw})).unwrap();
            assert!(p.at.is_none());
        }
    }

    #[test]
    fn zoneless_timestamp_is_utc() {
        let parsed = parse_utc("2020-01-15 10:30:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2020, 1, 15, 10, 30, 0).unwrap());
    }

    #[test]
    fn offset_timestamp_is_converted() {
        let parsed = parse_utc("2020-01-15T12:30:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2020, 1, 15, 10, 30, 0).unwrap());
    }

    #[test]
    fn date_only_is_midnight() {
        let parsed = parse_utc("2020-01-15").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2020, 1, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn garbage_timestamp_is_rejected() {
        assert!(parse_utc("yesterday").is_err());
    }
}
