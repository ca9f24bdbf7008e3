//! Record model: dynamic field values keyed by name.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A dynamic field value.
///
/// Deserializes from plain JSON scalars, so a JSON object maps directly onto
/// a [`Record`]. Nested arrays and objects are kept as raw JSON.
///
/// # Example
///
/// ```
/// use selector::Value;
///
/// let name = Value::from("Belgium");
/// let code = Value::from(32i64);
/// assert_eq!(code.to_string(), "32");
/// assert!(Value::Null.to_string().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null/empty value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// String value.
    String(String),
    /// Any other JSON shape (arrays, objects).
    Json(serde_json::Value),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Loose truthiness: null, `false`, zero, NaN and "" are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0 && !f.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Json(_) => true,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::String(s) => f.write_str(s),
            Value::Json(v) => write!(f, "{v}"),
        }
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// One item of a bound collection.
///
/// # Example
///
/// ```
/// use selector::Record;
///
/// let record = Record::new().set("key", 1).set("value", "One");
/// assert_eq!(record.get("value").and_then(|v| v.as_str()), Some("One"));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: HashMap<String, Value>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Field value, `Null` when absent.
    pub fn get_or_null(&self, field: &str) -> Value {
        self.get(field).cloned().unwrap_or_default()
    }

    /// Returns `true` if the record contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> &HashMap<String, Value> {
        &self.fields
    }

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Inserts a field value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Whether the record asks to be shown as a non-interactive option.
    pub fn is_disabled(&self) -> bool {
        self.get("disabled").is_some_and(Value::is_truthy)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Int(-3).to_string(), "-3");
        assert_eq!(Value::Float(1.0).to_string(), "1");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::from("x").to_string(), "x");
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::Float(f64::NAN).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(Value::from("disabled").is_truthy());
        assert!(Value::Int(1).is_truthy());
    }

    #[test]
    fn test_record_from_json() {
        let record: Record =
            serde_json::from_str(r#"{"key": 7, "value": "Seven", "ratio": 0.5, "gone": null}"#)
                .unwrap();
        assert_eq!(record.get("key"), Some(&Value::Int(7)));
        assert_eq!(record.get("ratio"), Some(&Value::Float(0.5)));
        assert_eq!(record.get("gone"), Some(&Value::Null));
        assert_eq!(record.get_or_null("missing"), Value::Null);
    }

    #[test]
    fn test_record_with_nested_fields() {
        let record: Record = serde_json::from_str(
            r#"{"key": 1, "value": "x", "tags": ["a"], "meta": {"region": "EU"}}"#,
        )
        .unwrap();
        assert_eq!(record.get("key"), Some(&Value::Int(1)));
        assert_eq!(record.get("value").and_then(Value::as_str), Some("x"));
        assert_eq!(record.get_or_null("tags").to_string(), r#"["a"]"#);
        assert!(record.get_or_null("meta").is_truthy());
        assert!(record.get("meta").and_then(Value::as_str).is_none());
    }

    #[test]
    fn test_disabled_flag() {
        assert!(Record::new().set("disabled", true).is_disabled());
        assert!(!Record::new().set("disabled", false).is_disabled());
        assert!(!Record::new().is_disabled());
    }
}
