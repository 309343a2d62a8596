use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single stored attribute value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Attribute {
    Bool(bool),
    Number(f64),
    String(String),
}

impl From<bool> for Attribute {
    fn from(value: bool) -> Self {
        Attribute::Bool(value)
    }
}

impl From<f64> for Attribute {
    fn from(value: f64) -> Self {
        Attribute::Number(value)
    }
}

impl From<&str> for Attribute {
    fn from(value: &str) -> Self {
        Attribute::String(value.to_string())
    }
}

impl From<String> for Attribute {
    fn from(value: String) -> Self {
        Attribute::String(value)
    }
}

/// Per-instance configuration as persisted with the project: a flat bag of named attributes.
///
/// Getters are lenient the way the project file is: a boolean stored as `"true"` or a
/// number stored as `"12"` still reads back as the typed value. Anything that cannot be
/// read as the requested type yields the caller's default.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SerializedContent {
    attributes: BTreeMap<String, Attribute>,
}

impl SerializedContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_attribute(&mut self, name: &str, value: impl Into<Attribute>) {
        self.attributes.insert(name.to_string(), value.into());
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn get_bool_attribute(&self, name: &str, default: bool) -> bool {
        match self.attributes.get(name) {
            Some(Attribute::Bool(b)) => *b,
            Some(Attribute::Number(n)) => *n != 0.0,
            Some(Attribute::String(s)) => match s.as_str() {
                "true" | "1" => true,
                "false" | "0" => false,
                _ => default,
            },
            None => default,
        }
    }

    pub fn get_double_attribute(&self, name: &str, default: f64) -> f64 {
        match self.attributes.get(name) {
            Some(Attribute::Number(n)) => *n,
            Some(Attribute::String(s)) => super::value::parse_number_or(s, default),
            _ => default,
        }
    }

    pub fn get_string_attribute(&self, name: &str, default: &str) -> String {
        match self.attributes.get(name) {
            Some(Attribute::String(s)) => s.clone(),
            Some(Attribute::Bool(b)) => super::value::bool_to_string(*b),
            Some(Attribute::Number(n)) => super::value::number_to_string(*n),
            None => default.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_getters_fall_back_to_defaults() {
        let content = SerializedContent::new();
        assert!(content.get_bool_attribute("missing", true));
        assert_eq!(content.get_double_attribute("missing", 4.0), 4.0);
        assert_eq!(content.get_string_attribute("missing", "x"), "x");
    }

    #[test]
    fn string_attributes_read_as_typed_values() {
        let mut content = SerializedContent::new();
        content.set_attribute("flag", "true");
        content.set_attribute("size", "12");
        content.set_attribute("broken", "twelve");
        assert!(content.get_bool_attribute("flag", false));
        assert_eq!(content.get_double_attribute("size", 0.0), 12.0);
        assert_eq!(content.get_double_attribute("broken", 3.0), 3.0);
    }

    #[test]
    fn round_trips_through_json_as_flat_object() {
        let mut content = SerializedContent::new();
        content.set_attribute("followRotation", true);
        content.set_attribute("customSize", 8.0);
        content.set_attribute("markerType", "Enemy");

        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"customSize": 8.0, "followRotation": true, "markerType": "Enemy"})
        );
        let back: SerializedContent = serde_json::from_value(json).unwrap();
        assert_eq!(back, content);
    }
}
