//! API options and credentials.

use serde_json::{Map, Value};
use std::fmt;

use crate::{Error, Result};

/// Raw configuration mapping the client is built from.
///
/// Recognised keys are `api_url`, `username` and `password`; anything else is
/// carried along untouched. Nothing is validated here. A missing username or
/// password only surfaces when a request is attempted.
///
/// # Examples
///
/// ```
/// use freespee::ApiOptions;
///
/// let options = ApiOptions::from_json(
///     r#"{"api_url": "https://api.freespee.com/1.0", "username": "me", "password": "secret"}"#,
/// )
/// .unwrap();
///
/// assert_eq!(options.get_str("username"), Some("me"));
/// assert!(options.get("missing").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiOptions {
    values: Map<String, Value>,
}

impl ApiOptions {
    pub fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    /// Parses options from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeserializationFailed`] if `json` is not a JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        let values = serde_json::from_str(json).map_err(|e| Error::deserialization(json, e))?;
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Returns the value under `key` if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    pub(crate) fn api_url(&self) -> String {
        self.get_str("api_url").unwrap_or_default().to_string()
    }

    pub(crate) fn credentials(&self) -> Credentials {
        Credentials {
            username: self.get_text("username"),
            password: self.get_text("password"),
        }
    }

    /// Scalar under `key` as text; absent or `null` is `None`.
    fn get_text(&self, key: &str) -> Option<String> {
        match self.values.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ApiOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Username and password used for every request.
///
/// Either part may be unset; requests fail with [`Error::Credentials`] until
/// both are present.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    /// Joins the credentials as `username:password` for the transport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Credentials`] if either part is missing.
    pub fn transport_string(&self) -> Result<String> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Ok(format!("{}:{}", username, password)),
            _ => Err(Error::Credentials),
        }
    }
}

// Keep the password out of logs and panic messages.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_known_keys() {
        let options: ApiOptions = [
            ("api_url", json!("https://api.example.com")),
            ("username", json!("user")),
            ("password", json!("pass")),
        ]
        .into_iter()
        .collect();

        assert_eq!(options.api_url(), "https://api.example.com");
        assert_eq!(options.credentials(), Credentials::new("user", "pass"));
    }

    #[test]
    fn missing_keys_are_not_validated_up_front() {
        let options = ApiOptions::default();
        assert_eq!(options.api_url(), "");

        let credentials = options.credentials();
        assert!(credentials.username.is_none());
        assert!(matches!(credentials.transport_string(), Err(Error::Credentials)));
    }

    #[test]
    fn null_credentials_count_as_missing() {
        let options = ApiOptions::from_json(r#"{"username": null, "password": "x"}"#).unwrap();
        assert!(matches!(
            options.credentials().transport_string(),
            Err(Error::Credentials)
        ));
    }

    #[test]
    fn numeric_credentials_are_stringified() {
        let options = ApiOptions::from_json(r#"{"username": "user", "password": 1234}"#).unwrap();
        assert_eq!(options.credentials().transport_string().unwrap(), "user:1234");
    }

    #[test]
    fn transport_string_is_colon_joined() {
        let credentials = Credentials::new("user", "p@ss:word");
        assert_eq!(credentials.transport_string().unwrap(), "user:p@ss:word");
    }

    #[test]
    fn debug_hides_password() {
        let rendered = format!("{:?}", Credentials::new("user", "secret"));
        assert!(rendered.contains("user"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn from_json_rejects_non_objects() {
        assert!(matches!(
            ApiOptions::from_json("[1, 2]"),
            Err(Error::DeserializationFailed { .. })
        ));
    }

    #[test]
    fn set_overrides_value() {
        let mut options = ApiOptions::default();
        options.set("api_url", "https://a");
        options.set("api_url", "https://b");
        assert_eq!(options.get_str("api_url"), Some("https://b"));
    }
}
