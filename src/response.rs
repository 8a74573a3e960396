//! Response parsing: JSON decoding, API error detection and the typed
//! envelopes of each endpoint.

use std::io;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::ser::{CompactFormatter, Formatter};
use serde_json::Value;

use crate::models::CustomerRecord;
use crate::{de, Error, Result};

/// Decodes a raw response body.
///
/// A body whose top-level object has a non-null `errors` value is turned into
/// [`Error::ApiCall`], carrying the JSON encoding of that value (with `/` and
/// non-ASCII characters escaped). Bodies that are not JSON at all fail with
/// [`Error::DeserializationFailed`].
///
/// # Examples
///
/// ```
/// use freespee::{response, Error};
///
/// let err = response::parse(r#"{"errors":["bad request"]}"#).unwrap_err();
/// assert!(matches!(err, Error::ApiCall { ref payload } if payload == r#"["bad request"]"#));
///
/// let value = response::parse(r#"{"total": 3}"#).unwrap();
/// assert_eq!(value["total"], 3);
/// ```
pub fn parse(raw: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(raw).map_err(|e| {
        tracing::error!(error = %e, raw_response = %raw, "Failed to decode response");
        Error::deserialization(raw, e)
    })?;

    if let Some(errors) = value.get("errors").filter(|errors| !errors.is_null()) {
        let payload = encode_escaped(errors)?;
        tracing::warn!(payload = %payload, "API returned errors");
        return Err(Error::ApiCall { payload });
    }

    Ok(value)
}

/// Compact JSON with `/` written as `\/` and every non-ASCII character as
/// lowercase `\uXXXX` UTF-16 units.
fn encode_escaped(value: &Value) -> Result<String> {
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, EscapingFormatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| Error::deserialization(value.to_string(), e))?;
    // Only ASCII is ever written.
    Ok(out.into_iter().map(char::from).collect())
}

struct EscapingFormatter;

impl Formatter for EscapingFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (index, ch) in fragment.char_indices() {
            if ch.is_ascii() && ch != '/' {
                continue;
            }
            CompactFormatter.write_string_fragment(writer, &fragment[start..index])?;
            if ch == '/' {
                writer.write_all(b"\\/")?;
            } else {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
            start = index + ch.len_utf8();
        }
        CompactFormatter.write_string_fragment(writer, &fragment[start..])
    }
}

/// Converts a parsed response into an endpoint's typed envelope.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    T::deserialize(&value).map_err(|e| {
        tracing::error!(error = %e, "Response does not match the expected schema");
        Error::deserialization(value.to_string(), e)
    })
}

/// Body of `GET /customers` with a `page` filter.
#[derive(Debug, Deserialize)]
pub(crate) struct CustomersResponse {
    pub(crate) customers: Vec<CustomerRecord>,
}

/// Body of `GET /customers` without parameters.
#[derive(Debug, Deserialize)]
pub(crate) struct CustomerCountResponse {
    /// Kept as sent; a missing key is still an error.
    pub(crate) total: Value,
}

/// Body of `GET /statistics/cdrs`.
///
/// Records stay as raw JSON here; which fields they must carry depends on
/// whether the request was `extended`.
#[derive(Debug, Deserialize)]
pub(crate) struct CdrsResponse {
    #[serde(deserialize_with = "de::integer")]
    pub(crate) total: i64,
    #[serde(deserialize_with = "de::integer")]
    pub(crate) page: i64,
    #[serde(rename = "pagesize", deserialize_with = "de::integer")]
    pub(crate) page_size: i64,
    #[serde(rename = "numpages", deserialize_with = "de::integer")]
    pub(crate) number_of_pages: i64,
    pub(crate) cdrs: Vec<Value>,
}
