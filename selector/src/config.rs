//! Selector configuration.

use serde::{Deserialize, Deserializer};

use crate::error::SelectorError;
use crate::model::Value;
use crate::resolve::AttributeSpec;

/// Record fields that produce each option's key and label.
///
/// `None` falls back to the `"key"` / `"value"` fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ModelAttributes {
    pub key: Option<AttributeSpec>,
    pub value: Option<AttributeSpec>,
}

/// Per-selector configuration.
///
/// Every field is optional when read from JSON.
///
/// # Example
///
/// ```
/// use selector::SelectorOptions;
///
/// let options = SelectorOptions::from_json(
///     r#"{"group_by_attribute": "region", "selected_id": 32, "base_url": "/api"}"#,
/// )
/// .unwrap();
/// assert_eq!(options.selected_id.as_deref(), Some("32"));
/// assert!(options.single_option_as_text);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SelectorOptions {
    /// Fields used for option keys and labels.
    pub model_attributes: ModelAttributes,

    /// Group options under `<optgroup>`s by this field.
    pub group_by_attribute: Option<String>,

    /// Replace the control with static text when exactly one record exists.
    pub single_option_as_text: bool,

    /// Populate as soon as the selector is built.
    pub auto_populate: bool,

    /// Value to select on the first multi-record population only.
    #[serde(deserialize_with = "stringified")]
    pub selected_id: Option<String>,

    /// Records are already in the collection; populate without fetching.
    pub data_provided: bool,

    /// Prefix for [`Selector::populate_from`](crate::Selector::populate_from).
    pub base_url: String,
}

impl Default for SelectorOptions {
    fn default() -> Self {
        Self {
            model_attributes: ModelAttributes::default(),
            group_by_attribute: None,
            single_option_as_text: true,
            auto_populate: false,
            selected_id: None,
            data_provided: false,
            base_url: String::new(),
        }
    }
}

impl SelectorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate options from JSON.
    pub fn from_json(json: &str) -> Result<Self, SelectorError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Reject specs that can never resolve to anything.
    pub fn validate(&self) -> Result<(), SelectorError> {
        let specs = [
            ("key", &self.model_attributes.key),
            ("value", &self.model_attributes.value),
        ];
        for (name, spec) in specs {
            match spec {
                Some(AttributeSpec::Composite(names)) if names.is_empty() => {
                    return Err(SelectorError::InvalidOptions(format!(
                        "model attribute '{name}' lists no fields"
                    )));
                }
                Some(AttributeSpec::Single(field)) if field.is_empty() => {
                    return Err(SelectorError::InvalidOptions(format!(
                        "model attribute '{name}' names an empty field"
                    )));
                }
                _ => {}
            }
        }
        if self.group_by_attribute.as_deref() == Some("") {
            return Err(SelectorError::InvalidOptions(
                "group_by_attribute is empty".into(),
            ));
        }
        Ok(())
    }

    /// Set the key spec.
    pub fn key(mut self, spec: impl Into<AttributeSpec>) -> Self {
        self.model_attributes.key = Some(spec.into());
        self
    }

    /// Set the label spec.
    pub fn value(mut self, spec: impl Into<AttributeSpec>) -> Self {
        self.model_attributes.value = Some(spec.into());
        self
    }

    pub fn group_by(mut self, attribute: impl Into<String>) -> Self {
        self.group_by_attribute = Some(attribute.into());
        self
    }

    pub fn single_option_as_text(mut self, enabled: bool) -> Self {
        self.single_option_as_text = enabled;
        self
    }

    pub fn auto_populate(mut self) -> Self {
        self.auto_populate = true;
        self
    }

    pub fn selected_id(mut self, id: impl ToString) -> Self {
        self.selected_id = Some(id.to_string());
        self
    }

    pub fn data_provided(mut self) -> Self {
        self.data_provided = true;
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Accept a string, number or bool and keep its string form.
fn stringified<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .filter(|v| !v.is_null())
        .map(|v| v.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SelectorOptions::from_json("{}").unwrap();
        assert_eq!(options, SelectorOptions::default());
        assert!(options.single_option_as_text);
        assert!(!options.auto_populate);
        assert!(!options.data_provided);
    }

    #[test]
    fn test_full_json() {
        let options = SelectorOptions::from_json(
            r#"{
                "model_attributes": {"key": "code", "value": ["code", "name"]},
                "group_by_attribute": "region",
                "single_option_as_text": false,
                "auto_populate": true,
                "selected_id": "be",
                "data_provided": true,
                "base_url": "/api"
            }"#,
        )
        .unwrap();
        assert_eq!(
            options,
            SelectorOptions::new()
                .key("code")
                .value(["code", "name"])
                .group_by("region")
                .single_option_as_text(false)
                .auto_populate()
                .selected_id("be")
                .data_provided()
                .base_url("/api")
        );
    }

    #[test]
    fn test_selected_id_null() {
        let options = SelectorOptions::from_json(r#"{"selected_id": null}"#).unwrap();
        assert_eq!(options.selected_id, None);
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            SelectorOptions::from_json(r#"{"model_attributes": {"value": []}}"#),
            Err(SelectorError::InvalidOptions(_))
        ));
        assert!(matches!(
            SelectorOptions::from_json(r#"{"group_by_attribute": ""}"#),
            Err(SelectorError::InvalidOptions(_))
        ));
        assert!(matches!(
            SelectorOptions::from_json(r#"{"auto_populate": "yes"}"#),
            Err(SelectorError::Json(_))
        ));
    }
}
