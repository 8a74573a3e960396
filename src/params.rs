//! Ordered query parameters for API requests.

use serde_json::Value;
use url::form_urlencoded;

/// Query parameters for a single request.
///
/// Keys keep their insertion order. Re-inserting an existing key replaces its
/// value without moving it, so the query string always lists keys in the
/// order they were first added.
///
/// # Examples
///
/// ```
/// use freespee::Params;
///
/// let params = Params::new()
///     .with("a", 1)
///     .with("b", "two words");
///
/// assert_eq!(params.to_query_string(), "a=1&b=two+words");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, Value)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, returning the updated set.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets a parameter, replacing the value in place if the key exists.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Returns `true` if `key` is present with a truthy value.
    ///
    /// `null`, `false`, `0`, `""`, `"0"` and empty arrays are falsy.
    pub fn is_truthy(&self, key: &str) -> bool {
        self.get(key).is_some_and(is_truthy)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Form-encodes the parameters (`application/x-www-form-urlencoded`).
    ///
    /// Spaces become `+` and reserved characters are percent-encoded.
    /// Booleans are sent as `1`/`0`, `null` values are left out, and arrays or
    /// objects are sent as their JSON text.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.entries {
            if let Some(value) = query_value(value) {
                serializer.append_pair(key, &value);
            }
        }
        serializer.finish()
    }

    /// Renders each parameter as `key:value`, in insertion order.
    pub fn format_parameters(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(key, value)| format!("{}:{}", key, query_value(value).unwrap_or_default()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some("0".to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(a) => !a.is_empty(),
        Value::Object(_) => true,
    }
}
