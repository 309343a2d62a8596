use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::BehaviorConfig;
use crate::error::PropertyError;
use crate::property::value::{bool_to_string, number_to_string, parse_bool, parse_number_or};
use crate::property::{Color, Configurable, PropertyDescriptor, PropertyType, SerializedContent};

/// Markers blink on and off at this period while flashing.
pub const FLASH_INTERVAL_SECONDS: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerType {
    Player,
    Enemy,
    Ally,
    Item,
    Obstacle,
    Objective,
    Waypoint,
    Neutral,
    Custom,
}

impl MarkerType {
    pub const ALL: [MarkerType; 9] = [
        MarkerType::Player,
        MarkerType::Enemy,
        MarkerType::Ally,
        MarkerType::Item,
        MarkerType::Obstacle,
        MarkerType::Objective,
        MarkerType::Waypoint,
        MarkerType::Neutral,
        MarkerType::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MarkerType::Player => "Player",
            MarkerType::Enemy => "Enemy",
            MarkerType::Ally => "Ally",
            MarkerType::Item => "Item",
            MarkerType::Obstacle => "Obstacle",
            MarkerType::Objective => "Objective",
            MarkerType::Waypoint => "Waypoint",
            MarkerType::Neutral => "Neutral",
            MarkerType::Custom => "Custom",
        }
    }
}

impl FromStr for MarkerType {
    type Err = PropertyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MarkerType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| PropertyError::InvalidChoice {
                property: "markerType".to_string(),
                value: s.to_string(),
            })
    }
}

/// Stored configuration of the map marker behavior.
///
/// The `custom_*` fields are overrides; `None` means the map's default for the marker type is used.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerConfig {
    pub marker_type: MarkerType,
    pub custom_color: Option<Color>,
    pub custom_size: Option<f64>,
    pub custom_icon: Option<String>,
    pub show_rotation: bool,
    pub visible: bool,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            marker_type: MarkerType::Player,
            custom_color: None,
            custom_size: None,
            custom_icon: None,
            show_rotation: false,
            visible: true,
        }
    }
}

/// Sizes of zero or less mean "use the map default".
fn size_override(size: f64) -> Option<f64> {
    (size > 0.0).then_some(size)
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

impl Configurable for MarkerConfig {
    fn properties(&self) -> Vec<PropertyDescriptor> {
        let mut marker_type =
            PropertyDescriptor::new("markerType", PropertyType::Choice, self.marker_type.as_str())
                .with_label("Marker type")
                .with_group("Configuration");
        for t in MarkerType::ALL {
            marker_type = marker_type.with_choice(t.as_str(), t.as_str());
        }

        vec![
            marker_type,
            PropertyDescriptor::new(
                "customColor",
                PropertyType::Color,
                self.custom_color.map(|c| c.to_string()).unwrap_or_default(),
            )
            .with_label("Custom color (empty = use default)")
            .with_group("Custom Appearance"),
            PropertyDescriptor::new(
                "customSize",
                PropertyType::Number,
                number_to_string(self.custom_size.unwrap_or(0.0)),
            )
            .with_label("Custom size (0 = use default)")
            .with_group("Custom Appearance"),
            PropertyDescriptor::new(
                "customIcon",
                PropertyType::Resource,
                self.custom_icon.clone().unwrap_or_default(),
            )
            .with_extra_info("image")
            .with_label("Custom icon")
            .with_group("Custom Appearance"),
            PropertyDescriptor::new(
                "showRotation",
                PropertyType::Boolean,
                bool_to_string(self.show_rotation),
            )
            .with_label("Show rotation")
            .with_group("Display Options"),
            PropertyDescriptor::new(
                "visibleOnMap",
                PropertyType::Boolean,
                bool_to_string(self.visible),
            )
            .with_label("Visible on map")
            .with_group("Display Options"),
        ]
    }

    fn set_property(&mut self, name: &str, value: &str) -> Result<(), PropertyError> {
        match name {
            "markerType" => self.marker_type = value.parse()?,
            "customColor" => {
                self.custom_color = if value.trim().is_empty() {
                    None
                } else {
                    Some(value.parse()?)
                }
            }
            "customSize" => {
                let previous = self.custom_size.unwrap_or(0.0);
                self.custom_size = size_override(parse_number_or(value, previous));
            }
            "customIcon" => self.custom_icon = non_empty(value),
            "showRotation" => self.show_rotation = parse_bool(value),
            "visibleOnMap" | "visibleOnMinimap" => self.visible = parse_bool(value),
            _ => return Err(PropertyError::UnknownProperty(name.to_string())),
        }
        Ok(())
    }
}

impl BehaviorConfig for MarkerConfig {
    fn from_content(content: &SerializedContent) -> Self {
        let defaults = Self::default();
        let visible_key = if content.has_attribute("visibleOnMap") {
            "visibleOnMap"
        } else {
            "visibleOnMinimap"
        };
        Self {
            marker_type: content
                .get_string_attribute("markerType", defaults.marker_type.as_str())
                .parse()
                .unwrap_or(defaults.marker_type),
            custom_color: content.get_string_attribute("customColor", "").parse().ok(),
            custom_size: size_override(content.get_double_attribute("customSize", 0.0)),
            custom_icon: non_empty(&content.get_string_attribute("customIcon", "")),
            show_rotation: content.get_bool_attribute("showRotation", defaults.show_rotation),
            visible: content.get_bool_attribute(visible_key, defaults.visible),
        }
    }

    fn write_content(&self, content: &mut SerializedContent) {
        content.set_attribute("markerType", self.marker_type.as_str());
        content.set_attribute(
            "customColor",
            self.custom_color.map(|c| c.to_string()).unwrap_or_default(),
        );
        content.set_attribute("customSize", self.custom_size.unwrap_or(0.0));
        content.set_attribute("customIcon", self.custom_icon.clone().unwrap_or_default());
        content.set_attribute("showRotation", self.show_rotation);
        content.set_attribute("visibleOnMap", self.visible);
    }
}

/// A flash request: the renderer blinks the marker from `started_at` for `duration` seconds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Flash {
    pub started_at: f64,
    pub duration: f64,
}

impl Flash {
    pub fn is_active(&self, now: f64) -> bool {
        now - self.started_at < self.duration
    }
}

/// Runtime state of the map marker behavior on one tracked object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackedMarker {
    pub config: MarkerConfig,
    flash: Option<Flash>,
}

impl TrackedMarker {
    pub fn new(config: MarkerConfig) -> Self {
        Self { config, flash: None }
    }

    pub fn show(&mut self) {
        self.config.visible = true;
    }

    pub fn hide(&mut self) {
        self.config.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.config.visible
    }

    pub fn marker_type(&self) -> MarkerType {
        self.config.marker_type
    }

    /// Only the closed set of marker type names is accepted; anything else keeps the current type.
    pub fn set_marker_type(&mut self, marker_type: &str) -> Result<(), PropertyError> {
        self.config.marker_type = marker_type.parse()?;
        Ok(())
    }

    pub fn marker_type_is(&self, marker_type: &str) -> bool {
        self.config.marker_type.as_str() == marker_type
    }

    pub fn set_custom_color(&mut self, color: &str) -> Result<(), PropertyError> {
        self.config.set_property("customColor", color)
    }

    pub fn custom_color(&self) -> Option<Color> {
        self.config.custom_color
    }

    pub fn set_custom_size(&mut self, size: f64) {
        self.config.custom_size = size_override(size);
    }

    pub fn custom_size(&self) -> Option<f64> {
        self.config.custom_size
    }

    pub fn set_custom_icon(&mut self, icon: &str) {
        self.config.custom_icon = non_empty(icon);
    }

    pub fn custom_icon(&self) -> Option<&str> {
        self.config.custom_icon.as_deref()
    }

    pub fn set_show_rotation(&mut self, show: bool) {
        self.config.show_rotation = show;
    }

    pub fn shows_rotation(&self) -> bool {
        self.config.show_rotation
    }

    /// Records a flash request. The animation itself belongs to the renderer.
    pub fn flash(&mut self, now: f64, duration: f64) {
        self.flash = Some(Flash {
            started_at: now,
            duration: duration.max(0.0),
        });
    }

    pub fn is_flashing(&self, now: f64) -> bool {
        self.flash.is_some_and(|f| f.is_active(now))
    }

    /// Whether the marker is in the "on" half of its blink cycle. Always true when not flashing.
    pub fn should_show_flash(&self, now: f64) -> bool {
        match self.flash {
            Some(flash) if flash.is_active(now) => {
                let cycle = ((now - flash.started_at) / FLASH_INTERVAL_SECONDS).floor() as i64;
                cycle % 2 == 0
            }
            _ => true,
        }
    }

    /// Drops a finished flash request. Returns true when one expired.
    pub fn expire_flash(&mut self, now: f64) -> bool {
        match self.flash {
            Some(flash) if !flash.is_active(now) => {
                self.flash = None;
                true
            }
            _ => false,
        }
    }
}
