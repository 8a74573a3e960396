//! Error types for Freespee API calls.
//!
//! Every failure an operation can hit is a variant of [`Error`]. A customer
//! lookup that matches nothing is not an error: [`Client::find_customer`]
//! returns `Ok(None)` for that case.
//!
//! [`Client::find_customer`]: crate::Client::find_customer

/// The main error type for Freespee API calls.
///
/// # Examples
///
/// ```no_run
/// use freespee::{ApiOptions, Client, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::with_http(ApiOptions::from_json(r#"{"api_url":"https://api.freespee.com/1.0"}"#)?)?;
///
/// match client.find_customer(42).await {
///     Ok(Some(customer)) => println!("Found {:?}", customer.name),
///     Ok(None) => println!("No such customer"),
///     Err(Error::Credentials) => eprintln!("Set a username and password first"),
///     Err(Error::ApiCall { payload }) => eprintln!("Rejected by the API: {}", payload),
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The username or the password was not set when the call was made.
    ///
    /// Raised before the transport is invoked.
    #[error("Please provide your freespee credentials")]
    Credentials,

    /// The API answered with an `errors` payload.
    ///
    /// `payload` is the JSON encoding of the `errors` value, exactly as the
    /// API sent it.
    #[error("Freespee API Error: {payload}")]
    ApiCall {
        /// JSON-encoded `errors` value
        payload: String,
    },

    /// The response body was not valid JSON, or did not match the schema the
    /// endpoint is expected to return (missing key, wrong type, bad timestamp).
    #[error("Failed to deserialize response: {serde_error}")]
    DeserializationFailed {
        /// The raw response body (or the offending JSON fragment)
        raw_response: String,
        /// The serde error message
        serde_error: String,
    },

    /// A network-level error occurred in the HTTP transport.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Invalid transport configuration, such as a bad header value.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl Error {
    /// Returns `true` if the API itself rejected the request.
    pub fn is_api_error(&self) -> bool {
        matches!(self, Error::ApiCall { .. })
    }

    /// Returns the payload that failed to decode, if this error carries one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::DeserializationFailed { raw_response, .. } => Some(raw_response),
            Error::ApiCall { payload } => Some(payload),
            _ => None,
        }
    }

    pub(crate) fn deserialization(raw_response: impl Into<String>, err: serde_json::Error) -> Self {
        Error::DeserializationFailed {
            raw_response: raw_response.into(),
            serde_error: err.to_string(),
        }
    }
}

/// A specialized `Result` type for Freespee API calls.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_call_message_embeds_payload() {
        let err = Error::ApiCall {
            payload: r#"["bad request"]"#.to_string(),
        };
        assert_eq!(err.to_string(), r#"Freespee API Error: ["bad request"]"#);
        assert!(err.is_api_error());
        assert_eq!(err.raw_response(), Some(r#"["bad request"]"#));
    }

    #[test]
    fn credentials_error_has_no_payload() {
        let err = Error::Credentials;
        assert!(!err.is_api_error());
        assert!(err.raw_response().is_none());
    }

    #[test]
    fn deserialization_keeps_raw_body() {
        let serde_err = serde_json::from_str::<serde_json::Value>("nope").unwrap_err();
        let err = Error::deserialization("nope", serde_err);
        assert_eq!(err.raw_response(), Some("nope"));
        assert!(err.to_string().starts_with("Failed to deserialize response"));
    }
}
