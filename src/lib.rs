pub mod behavior;
pub mod config;
pub mod entity;
pub mod error;
pub mod instruction;
pub mod math;
pub mod metadata;
pub mod object;
pub mod property;
pub mod scene;
