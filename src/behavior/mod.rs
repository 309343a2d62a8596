// Behaviors that can be attached to scene objects, and the registry the host dispatches through.
pub mod marker;
pub mod sticker;

use serde::{Deserialize, Serialize};

use crate::property::{Configurable, PropertyDescriptor, SerializedContent};

pub use marker::{MarkerConfig, MarkerType, TrackedMarker};
pub use sticker::{OffsetMode, StickerConfig, StickerRelationship};

/// A typed behavior configuration that is persisted as a [`SerializedContent`] bag.
pub trait BehaviorConfig: Configurable + Default {
    /// Reads the configuration, using defaults for anything missing or malformed.
    fn from_content(content: &SerializedContent) -> Self;

    fn write_content(&self, content: &mut SerializedContent);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BehaviorKind {
    Sticker3D,
    MapMarker,
}

impl BehaviorKind {
    pub const ALL: [BehaviorKind; 2] = [BehaviorKind::Sticker3D, BehaviorKind::MapMarker];

    /// The fully qualified type name the host knows the behavior by.
    pub fn type_name(self) -> &'static str {
        match self {
            BehaviorKind::Sticker3D => "Sticker3DBehavior::Sticker3DBehavior",
            BehaviorKind::MapMarker => "Map::MapMarker",
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "Sticker3DBehavior::Sticker3DBehavior" | "Sticker3DBehavior" => {
                Some(BehaviorKind::Sticker3D)
            }
            // older projects still reference the minimap-only marker
            "Map::MapMarker" | "MapMarker" | "Minimap::MinimapMarker" => {
                Some(BehaviorKind::MapMarker)
            }
            _ => None,
        }
    }

    pub fn schema(self) -> BehaviorSchema {
        match self {
            BehaviorKind::Sticker3D => BehaviorSchema::of::<StickerConfig>(),
            BehaviorKind::MapMarker => BehaviorSchema::of::<MarkerConfig>(),
        }
    }
}

/// The function bundle the host calls to manage a behavior's stored configuration.
#[derive(Clone, Copy)]
pub struct BehaviorSchema {
    pub initialize_content: fn(&mut SerializedContent),
    pub get_properties: fn(&SerializedContent) -> Vec<PropertyDescriptor>,
    pub update_property: fn(&mut SerializedContent, &str, &str) -> bool,
}

impl BehaviorSchema {
    pub fn of<C: BehaviorConfig>() -> Self {
        Self {
            initialize_content: initialize_content::<C>,
            get_properties: get_properties::<C>,
            update_property: update_property::<C>,
        }
    }
}

fn initialize_content<C: BehaviorConfig>(content: &mut SerializedContent) {
    C::default().write_content(content);
}

fn get_properties<C: BehaviorConfig>(content: &SerializedContent) -> Vec<PropertyDescriptor> {
    C::from_content(content).properties()
}

fn update_property<C: BehaviorConfig>(
    content: &mut SerializedContent,
    name: &str,
    value: &str,
) -> bool {
    let mut config = C::from_content(content);
    if !config.update_property(name, value) {
        return false;
    }
    config.write_content(content);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names_round_trip() {
        for kind in BehaviorKind::ALL {
            assert_eq!(BehaviorKind::from_type_name(kind.type_name()), Some(kind));
        }
        assert_eq!(
            BehaviorKind::from_type_name("Minimap::MinimapMarker"),
            Some(BehaviorKind::MapMarker)
        );
        assert_eq!(BehaviorKind::from_type_name("Platformer::Character"), None);
    }

    #[test]
    fn schema_initializes_then_updates_content() {
        let schema = BehaviorKind::Sticker3D.schema();
        let mut content = SerializedContent::new();
        (schema.initialize_content)(&mut content);
        assert!(content.get_bool_attribute("followRotation", false));
        assert!(!content.get_bool_attribute("destroyWithStuckToObject", true));

        assert!((schema.update_property)(&mut content, "destroyWithStuckToObject", "1"));
        assert!(content.get_bool_attribute("destroyWithStuckToObject", false));
        assert!(!(schema.update_property)(&mut content, "bogus", "1"));
    }

    #[test]
    fn rejected_update_leaves_content_untouched() {
        let schema = BehaviorKind::MapMarker.schema();
        let mut content = SerializedContent::new();
        (schema.initialize_content)(&mut content);
        (schema.update_property)(&mut content, "markerType", "Enemy");
        let before = content.clone();

        assert!(!(schema.update_property)(&mut content, "markerType", "Dragon"));
        assert_eq!(content, before);

        let properties = (schema.get_properties)(&content);
        let marker_type = crate::property::descriptor::find(&properties, "markerType").unwrap();
        assert_eq!(marker_type.value, "Enemy");
    }
}
