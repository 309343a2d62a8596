use thiserror::Error;

use crate::behavior::BehaviorKind;
use crate::entity::EntityId;

/// Rejected property updates. The prior value is always kept when one of these is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropertyError {
    #[error("unknown property: {0}")]
    UnknownProperty(String),
    #[error("invalid value {value:?} for property {property}")]
    InvalidChoice { property: String, value: String },
    #[error("invalid color {0:?}, expected \"R;G;B\"")]
    InvalidColor(String),
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("no entity {0:?} in the scene")]
    NoSuchEntity(EntityId),
    #[error("entity {entity:?} has no {kind:?} behavior")]
    MissingBehavior { entity: EntityId, kind: BehaviorKind },
    #[error("no map object at index {0}")]
    NoSuchMap(usize),
    #[error(transparent)]
    Property(#[from] PropertyError),
}

#[derive(Debug, Error)]
pub enum InstructionError {
    #[error("unknown function: {0}")]
    UnknownFunction(String),
    #[error("function {function} expects an argument at position {index}")]
    MissingArgument { function: String, index: usize },
    #[error("function {function} got a wrong argument at position {index}")]
    WrongArgument { function: String, index: usize },
    #[error(transparent)]
    Scene(#[from] SceneError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read or write config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("failed to serialize json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown behavior type: {0}")]
    UnknownBehavior(String),
    #[error("unknown entity name: {0}")]
    UnknownEntity(String),
}
