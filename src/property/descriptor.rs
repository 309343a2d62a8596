use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    Boolean,
    Number,
    String,
    Choice,
    Color,
    Resource,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementUnit {
    Pixel,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PropertyChoice {
    pub value: String,
    pub label: String,
}

/// One entry of the property schema shown by the editor, with the instance's current value.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    pub name: String,
    pub value: String,
    pub property_type: PropertyType,
    pub label: String,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub group: String, // empty = ungrouped
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<PropertyChoice>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra_info: Vec<String>, // e.g. the resource kind for Resource properties
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measurement_unit: Option<MeasurementUnit>,
}

impl PropertyDescriptor {
    pub fn new(name: &str, property_type: PropertyType, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
            property_type,
            label: name.to_string(),
            description: None,
            group: String::new(),
            choices: Vec::new(),
            extra_info: Vec::new(),
            measurement_unit: None,
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_group(mut self, group: &str) -> Self {
        self.group = group.to_string();
        self
    }

    pub fn with_choice(mut self, value: &str, label: &str) -> Self {
        self.choices.push(PropertyChoice {
            value: value.to_string(),
            label: label.to_string(),
        });
        self
    }

    pub fn with_extra_info(mut self, info: &str) -> Self {
        self.extra_info.push(info.to_string());
        self
    }

    pub fn with_measurement_unit(mut self, unit: MeasurementUnit) -> Self {
        self.measurement_unit = Some(unit);
        self
    }
}

pub fn find<'a>(
    properties: &'a [PropertyDescriptor],
    name: &str,
) -> Option<&'a PropertyDescriptor> {
    properties.iter().find(|p| p.name == name)
}
