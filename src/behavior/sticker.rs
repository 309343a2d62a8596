use std::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::BehaviorConfig;
use crate::entity::EntityId;
use crate::error::PropertyError;
use crate::math::{inverse_rotate_offset, rotate_offset, Transform};
use crate::property::value::{bool_to_string, parse_bool};
use crate::property::{Configurable, PropertyDescriptor, PropertyType, SerializedContent};

/// Reference frame the stored offset is expressed in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OffsetMode {
    /// Fixed delta in world axes; parent rotation does not move the child.
    #[default]
    World,
    /// Delta in the parent's local axes; the child orbits as the parent rotates.
    Local,
}

impl OffsetMode {
    pub const ALL: [OffsetMode; 2] = [OffsetMode::World, OffsetMode::Local];

    pub fn as_str(self) -> &'static str {
        match self {
            OffsetMode::World => "World",
            OffsetMode::Local => "Local",
        }
    }
}

impl FromStr for OffsetMode {
    type Err = PropertyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OffsetMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| PropertyError::InvalidChoice {
                property: "offsetMode".to_string(),
                value: s.to_string(),
            })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StickerConfig {
    pub follow_rotation: bool,
    pub destroy_with_parent: bool,
    pub offset_mode: OffsetMode,
}

impl Default for StickerConfig {
    fn default() -> Self {
        Self {
            follow_rotation: true,
            destroy_with_parent: false,
            offset_mode: OffsetMode::World,
        }
    }
}

impl Configurable for StickerConfig {
    fn properties(&self) -> Vec<PropertyDescriptor> {
        let mut offset_mode = PropertyDescriptor::new(
            "offsetMode",
            PropertyType::Choice,
            self.offset_mode.as_str(),
        )
        .with_label("Offset mode")
        .with_description(
            "World keeps the offset along the scene axes. Local keeps it relative to the \
             orientation of the 3D object it is stuck to.",
        );
        for mode in OffsetMode::ALL {
            offset_mode = offset_mode.with_choice(mode.as_str(), mode.as_str());
        }

        vec![
            PropertyDescriptor::new(
                "followRotation",
                PropertyType::Boolean,
                bool_to_string(self.follow_rotation),
            )
            .with_label("Follow rotation")
            .with_description(
                "If enabled, the 3D object will also follow the rotation \
                 of the stuck-to 3D object.",
            ),
            PropertyDescriptor::new(
                "destroyWithStuckToObject",
                PropertyType::Boolean,
                bool_to_string(self.destroy_with_parent),
            )
            .with_label("Destroy when the 3D object it's stuck on is destroyed")
            .with_description(
                "If enabled, this 3D object will be automatically destroyed when the stuck-to \
                 3D object is destroyed.",
            ),
            offset_mode,
        ]
    }

    fn set_property(&mut self, name: &str, value: &str) -> Result<(), PropertyError> {
        match name {
            "followRotation" => self.follow_rotation = parse_bool(value),
            "destroyWithStuckToObject" => self.destroy_with_parent = parse_bool(value),
            "offsetMode" => self.offset_mode = value.parse()?,
            _ => return Err(PropertyError::UnknownProperty(name.to_string())),
        }
        Ok(())
    }
}

impl BehaviorConfig for StickerConfig {
    fn from_content(content: &SerializedContent) -> Self {
        let defaults = Self::default();
        Self {
            follow_rotation: content.get_bool_attribute("followRotation", defaults.follow_rotation),
            destroy_with_parent: content
                .get_bool_attribute("destroyWithStuckToObject", defaults.destroy_with_parent),
            offset_mode: content
                .get_string_attribute("offsetMode", defaults.offset_mode.as_str())
                .parse()
                .unwrap_or(defaults.offset_mode),
        }
    }

    fn write_content(&self, content: &mut SerializedContent) {
        content.set_attribute("followRotation", self.follow_rotation);
        content.set_attribute("destroyWithStuckToObject", self.destroy_with_parent);
        content.set_attribute("offsetMode", self.offset_mode.as_str());
    }
}

/// Runtime state of the sticker behavior on one child object.
///
/// The parent is held as an [`EntityId`], never as an owning reference: it may be
/// destroyed at any time and is re-validated against the entity table every tick.
/// While no parent is set the offset and flags are kept but have no effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StickerRelationship {
    pub config: StickerConfig,
    parent: Option<EntityId>,
    offset: Vec3,
}

impl StickerRelationship {
    pub fn new(config: StickerConfig) -> Self {
        Self {
            config,
            parent: None,
            offset: Vec3::ZERO,
        }
    }

    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// Sticks to `parent`, capturing the current relative position as the offset.
    pub fn attach(&mut self, parent: EntityId, parent_transform: &Transform, child: &Transform) {
        self.parent = Some(parent);
        self.offset = initial_offset(self.config.offset_mode, parent_transform, child);
    }

    /// Forgets the parent. The offset is kept for a later re-attach or inspection.
    pub fn detach(&mut self) {
        self.parent = None;
    }

    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    pub fn offset_component(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.offset.x,
            Axis::Y => self.offset.y,
            Axis::Z => self.offset.z,
        }
    }

    pub fn set_offset_component(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::X => self.offset.x = value,
            Axis::Y => self.offset.y = value,
            Axis::Z => self.offset.z = value,
        }
    }

    pub fn follows_rotation(&self) -> bool {
        self.config.follow_rotation
    }

    pub fn set_follow_rotation(&mut self, follow: bool) {
        self.config.follow_rotation = follow;
    }

    pub fn offset_mode(&self) -> OffsetMode {
        self.config.offset_mode
    }

    /// Changes how the stored offset is interpreted. The offset value itself is not converted.
    pub fn set_offset_mode(&mut self, mode: OffsetMode) {
        self.config.offset_mode = mode;
    }

    /// Where the child must be this tick, given the parent's finalized transform.
    pub fn follow(&self, parent: &Transform, child: &Transform) -> Transform {
        let delta = match self.config.offset_mode {
            OffsetMode::World => self.offset,
            OffsetMode::Local => rotate_offset(self.offset, parent.rotation),
        };
        let rotation = if self.config.follow_rotation {
            parent.rotation
        } else {
            child.rotation
        };
        Transform::new(parent.position + delta, rotation)
    }
}

pub fn initial_offset(mode: OffsetMode, parent: &Transform, child: &Transform) -> Vec3 {
    let delta = child.position - parent.position;
    match mode {
        OffsetMode::World => delta,
        OffsetMode::Local => inverse_rotate_offset(delta, parent.rotation),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[rstest]
    #[case("1", true)]
    #[case("true", true)]
    #[case("0", false)]
    #[case("anything", false)]
    fn boolean_properties_accept_host_spellings(#[case] value: &str, #[case] expected: bool) {
        let mut config = StickerConfig::default();
        assert!(config.update_property("followRotation", value));
        assert_eq!(config.follow_rotation, expected);
    }

    #[test]
    fn unknown_offset_mode_keeps_previous() {
        let mut config = StickerConfig::default();
        assert!(config.update_property("offsetMode", "Local"));
        assert!(!config.update_property("offsetMode", "Sideways"));
        assert_eq!(config.offset_mode, OffsetMode::Local);
    }

    #[test]
    fn content_round_trip_keeps_every_field() {
        let config = StickerConfig {
            follow_rotation: false,
            destroy_with_parent: true,
            offset_mode: OffsetMode::Local,
        };
        let mut content = SerializedContent::new();
        config.write_content(&mut content);
        assert_eq!(StickerConfig::from_content(&content), config);
    }

    #[test]
    fn world_offset_ignores_parent_rotation() {
        let mut sticker = StickerRelationship::new(StickerConfig {
            follow_rotation: false,
            ..StickerConfig::default()
        });
        let parent = Transform::from_position(Vec3::new(10.0, 0.0, 0.0));
        let child = Transform::from_position(Vec3::new(12.0, 1.0, 0.0));
        sticker.attach(EntityId::new(0, 0), &parent, &child);
        assert!(close(sticker.offset(), Vec3::new(2.0, 1.0, 0.0)));

        let turned = Transform::new(Vec3::new(20.0, 5.0, 0.0), Vec3::new(0.0, 0.0, 90.0));
        let next = sticker.follow(&turned, &child);
        assert!(close(next.position, Vec3::new(22.0, 6.0, 0.0)));
        assert_eq!(next.rotation, child.rotation);
    }

    #[test]
    fn local_offset_rotates_with_parent() {
        let mut sticker = StickerRelationship::new(StickerConfig {
            offset_mode: OffsetMode::Local,
            ..StickerConfig::default()
        });
        let parent = Transform::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 90.0));
        let child = Transform::from_position(Vec3::new(0.0, 5.0, 0.0));
        sticker.attach(EntityId::new(0, 0), &parent, &child);
        // five units along the parent's own X axis
        assert!(close(sticker.offset(), Vec3::new(5.0, 0.0, 0.0)));

        let unturned = Transform::from_position(Vec3::new(1.0, 1.0, 1.0));
        let next = sticker.follow(&unturned, &child);
        assert!(close(next.position, Vec3::new(6.0, 1.0, 1.0)));
        assert_eq!(next.rotation, Vec3::ZERO);
    }

    #[test]
    fn detach_keeps_offset() {
        let mut sticker = StickerRelationship::new(StickerConfig::default());
        sticker.set_offset_component(Axis::Z, 3.5);
        sticker.attach(
            EntityId::new(1, 0),
            &Transform::default(),
            &Transform::from_position(Vec3::new(0.0, 0.0, 4.0)),
        );
        sticker.detach();
        assert_eq!(sticker.parent(), None);
        assert_eq!(sticker.offset_component(Axis::Z), 4.0);
    }
}
