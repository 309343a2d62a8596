// Declarations the host editor reads to list objects, behaviors and their instructions.
pub mod map;
pub mod sticker;

use std::fs;

use serde::{Deserialize, Serialize};

use crate::behavior::BehaviorKind;
use crate::error::ConfigError;
use crate::object::MapConfig;
use crate::property::{Configurable, PropertyDescriptor, SerializedContent};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionKind {
    Action,
    Condition,
    Expression,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ParameterMetadata {
    pub parameter_type: String, // "object", "behavior", "expression", "string", "yesorno", ...
    pub description: String,
    pub extra_info: String,
    pub optional: bool,
    pub default_value: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InstructionMetadata {
    pub name: String,
    pub kind: InstructionKind,
    pub full_name: String,
    pub description: String,
    pub sentence: String, // empty for expressions
    pub group: String,
    pub icon: String,
    pub parameters: Vec<ParameterMetadata>,
    pub function_name: String,
    pub include_files: Vec<String>,
}

impl InstructionMetadata {
    pub fn new(
        kind: InstructionKind,
        name: &str,
        full_name: &str,
        description: &str,
        sentence: &str,
        group: &str,
        icon: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            kind,
            full_name: full_name.to_string(),
            description: description.to_string(),
            sentence: sentence.to_string(),
            group: group.to_string(),
            icon: icon.to_string(),
            parameters: Vec::new(),
            function_name: String::new(),
            include_files: Vec::new(),
        }
    }

    pub fn parameter(mut self, parameter_type: &str, description: &str, extra_info: &str) -> Self {
        self.parameters.push(ParameterMetadata {
            parameter_type: parameter_type.to_string(),
            description: description.to_string(),
            extra_info: extra_info.to_string(),
            optional: false,
            default_value: None,
        });
        self
    }

    pub fn optional_parameter(
        mut self,
        parameter_type: &str,
        description: &str,
        default_value: &str,
    ) -> Self {
        self.parameters.push(ParameterMetadata {
            parameter_type: parameter_type.to_string(),
            description: description.to_string(),
            extra_info: String::new(),
            optional: true,
            default_value: Some(default_value.to_string()),
        });
        self
    }

    pub fn function(mut self, function_name: &str) -> Self {
        self.function_name = function_name.to_string();
        self
    }

    pub fn include_file(mut self, path: &str) -> Self {
        self.include_files.push(path.to_string());
        self
    }

    /// Parameters the host fills in from the call site rather than from the event sheet.
    pub fn implicit_parameter_count(&self) -> usize {
        self.parameters
            .iter()
            .take_while(|p| p.parameter_type == "object" || p.parameter_type == "behavior")
            .count()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ObjectMetadata {
    pub name: String, // fully qualified, e.g. "Map::Map"
    pub full_name: String,
    pub description: String,
    pub category: String,
    pub icon: String,
    pub properties: Vec<PropertyDescriptor>,
    pub instructions: Vec<InstructionMetadata>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BehaviorMetadata {
    pub name: String, // fully qualified, e.g. "Map::MapMarker"
    pub full_name: String,
    pub default_name: String,
    pub description: String,
    pub group: String,
    pub icon: String,
    pub properties: Vec<PropertyDescriptor>,
    pub instructions: Vec<InstructionMetadata>,
}

impl BehaviorMetadata {
    /// Metadata for a registered behavior, with the property schema of its default configuration.
    pub fn for_kind(
        kind: BehaviorKind,
        full_name: &str,
        default_name: &str,
        description: &str,
        group: &str,
        icon: &str,
    ) -> Self {
        let schema = kind.schema();
        let mut content = SerializedContent::new();
        (schema.initialize_content)(&mut content);
        Self {
            name: kind.type_name().to_string(),
            full_name: full_name.to_string(),
            default_name: default_name.to_string(),
            description: description.to_string(),
            group: group.to_string(),
            icon: icon.to_string(),
            properties: (schema.get_properties)(&content),
            instructions: Vec::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExtensionMetadata {
    pub name: String,
    pub full_name: String,
    pub description: String,
    pub author: String,
    pub license: String,
    pub help_path: String,
    pub category: String,
    pub tags: Vec<String>,
    pub objects: Vec<ObjectMetadata>,
    pub behaviors: Vec<BehaviorMetadata>,
}

impl ExtensionMetadata {
    pub fn instructions(&self) -> impl Iterator<Item = &InstructionMetadata> {
        self.objects
            .iter()
            .flat_map(|o| o.instructions.iter())
            .chain(self.behaviors.iter().flat_map(|b| b.instructions.iter()))
    }
}

pub fn all_extensions() -> Vec<ExtensionMetadata> {
    vec![map::declare(), sticker::declare()]
}

pub fn map_object_properties() -> Vec<PropertyDescriptor> {
    MapConfig::default().properties()
}

pub fn save_to_file(path: &str) -> Result<(), ConfigError> {
    let json = serde_json::to_string_pretty(&all_extensions())?;
    fs::write(path, json)?;
    Ok(())
}
