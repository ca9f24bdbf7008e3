//! Key and label resolution for records.
//!
//! Stateless helpers turning a record plus an [`AttributeSpec`] into the value
//! an option submits (its key) or displays (its label).

use serde::{Deserialize, Serialize};

use crate::model::{Record, Value};

/// Field holding the key when no key spec is configured.
pub const DEFAULT_KEY_FIELD: &str = "key";

/// Field holding the label when no value spec is configured.
pub const DEFAULT_VALUE_FIELD: &str = "value";

/// Separator between the parts of a composite attribute.
pub const COMPOSITE_SEPARATOR: &str = " - ";

/// Which record field(s) produce a key or label.
///
/// Deserializes from either a string or an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeSpec {
    /// A single field, returned as-is.
    Single(String),
    /// Several fields, joined into one string.
    Composite(Vec<String>),
}

impl AttributeSpec {
    /// Field name when this is a single-field spec.
    pub fn as_single(&self) -> Option<&str> {
        match self {
            AttributeSpec::Single(name) => Some(name),
            AttributeSpec::Composite(_) => None,
        }
    }
}

impl From<&str> for AttributeSpec {
    fn from(name: &str) -> Self {
        AttributeSpec::Single(name.to_string())
    }
}

impl From<String> for AttributeSpec {
    fn from(name: String) -> Self {
        AttributeSpec::Single(name)
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for AttributeSpec {
    fn from(names: [S; N]) -> Self {
        AttributeSpec::Composite(names.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> From<Vec<S>> for AttributeSpec {
    fn from(names: Vec<S>) -> Self {
        AttributeSpec::Composite(names.into_iter().map(Into::into).collect())
    }
}

/// Key of `record`, from `spec` or the `"key"` field.
pub fn resolve_key(record: &Record, spec: Option<&AttributeSpec>) -> Value {
    match spec {
        Some(spec) => resolve_attribute(record, spec),
        None => record.get_or_null(DEFAULT_KEY_FIELD),
    }
}

/// Label of `record`, from `spec` or the `"value"` field.
pub fn resolve_value(record: &Record, spec: Option<&AttributeSpec>) -> Value {
    match spec {
        Some(spec) => resolve_attribute(record, spec),
        None => record.get_or_null(DEFAULT_VALUE_FIELD),
    }
}

/// Resolve `spec` against `record`.
///
/// A single field yields the raw value (`Null` if missing). A composite spec
/// yields a string of the non-null parts joined by `" - "`; null or missing
/// parts are skipped, and nothing resolving gives `""`.
pub fn resolve_attribute(record: &Record, spec: &AttributeSpec) -> Value {
    match spec {
        AttributeSpec::Single(name) => record.get_or_null(name),
        AttributeSpec::Composite(names) => {
            let parts: Vec<String> = names
                .iter()
                .filter_map(|name| record.get(name))
                .filter(|value| !value.is_null())
                .map(Value::to_string)
                .collect();
            Value::String(parts.join(COMPOSITE_SEPARATOR))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> Record {
        Record::new()
            .set("key", 4)
            .set("value", "Ada")
            .set("first", "Ada")
            .set("last", "Lovelace")
            .set("title", Value::Null)
    }

    #[test]
    fn test_defaults() {
        let record = person();
        assert_eq!(resolve_key(&record, None), Value::Int(4));
        assert_eq!(resolve_value(&record, None), Value::from("Ada"));
    }

    #[test]
    fn test_single_returns_raw_value() {
        let record = person();
        assert_eq!(
            resolve_key(&record, Some(&"key".into())),
            Value::Int(4)
        );
        assert_eq!(
            resolve_attribute(&record, &"missing".into()),
            Value::Null
        );
    }

    #[test]
    fn test_composite_joins_parts() {
        let record = person();
        let spec = AttributeSpec::from(["first", "last"]);
        assert_eq!(
            resolve_value(&record, Some(&spec)),
            Value::from("Ada - Lovelace")
        );
    }

    #[test]
    fn test_composite_skips_null_and_missing_parts() {
        let record = person();
        let spec = AttributeSpec::from(["title", "first", "nickname", "last"]);
        assert_eq!(
            resolve_attribute(&record, &spec),
            Value::from("Ada - Lovelace")
        );
    }

    #[test]
    fn test_composite_with_nothing_resolving_is_empty() {
        let record = person();
        let spec = AttributeSpec::from(["title", "nickname"]);
        assert_eq!(resolve_attribute(&record, &spec), Value::from(""));
    }

    #[test]
    fn test_composite_stringifies_numbers() {
        let record = person();
        let spec = AttributeSpec::from(vec!["key", "last"]);
        assert_eq!(
            resolve_attribute(&record, &spec),
            Value::from("4 - Lovelace")
        );
    }

    #[test]
    fn test_spec_deserializes_from_string_or_list() {
        let single: AttributeSpec = serde_json::from_str(r#""code""#).unwrap();
        assert_eq!(single, AttributeSpec::from("code"));

        let composite: AttributeSpec = serde_json::from_str(r#"["code", "name"]"#).unwrap();
        assert_eq!(composite, AttributeSpec::from(["code", "name"]));
    }
}
