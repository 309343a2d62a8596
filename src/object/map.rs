use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::behavior::{MarkerConfig, MarkerType};
use crate::error::PropertyError;
use crate::math::Bounds;
use crate::property::value::{bool_to_string, number_to_string, parse_bool, parse_number_or};
use crate::property::{Color, Configurable, MeasurementUnit, PropertyDescriptor, PropertyType};

pub const MIN_ZOOM: f64 = 0.01;
pub const MAX_ZOOM: f64 = 1.0;
pub const ZOOM_STEP: f64 = 0.05;
pub const MIN_SIZE: f64 = 50.0;
/// Margin added around auto-detected level bounds.
pub const BOUNDS_PADDING: f32 = 100.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapMode {
    #[default]
    Minimap,
    WorldMap,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapShape {
    #[default]
    Rectangle,
    Circle,
}

macro_rules! choice_enum {
    ($ty:ty, $property:literal, [$($variant:ident),+]) => {
        impl $ty {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)+
                }
            }

            pub fn choices() -> &'static [&'static str] {
                &[$(stringify!($variant)),+]
            }
        }

        impl FromStr for $ty {
            type Err = PropertyError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($variant) => Ok(Self::$variant),)+
                    _ => Err(PropertyError::InvalidChoice {
                        property: $property.to_string(),
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

choice_enum!(MapMode, "mode", [Minimap, WorldMap]);
choice_enum!(MapShape, "shape", [Rectangle, Circle]);

/// Stored configuration of a map object, as serialized with the project.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapConfig {
    // Layout
    pub default_width: f64,
    pub default_height: f64,
    pub zoom: f64,
    pub stay_on_screen: bool,
    // Visual
    pub background_image: String,
    pub frame_image: String,
    pub background_color: Color,
    pub background_opacity: f64,
    pub border_color: Color,
    pub border_width: f64,
    // Per-type marker defaults
    pub player_marker_image: String,
    pub player_color: Color,
    pub player_size: f64,
    pub enemy_marker_image: String,
    pub enemy_color: Color,
    pub enemy_size: f64,
    pub item_marker_image: String,
    pub item_color: Color,
    pub item_size: f64,
    // Obstacles
    pub show_obstacles: bool,
    pub obstacle_color: Color,
    pub obstacle_opacity: f64,
    pub use_object_shape: bool,
    // Advanced
    pub auto_detect_bounds: bool,
    pub mode: MapMode,
    pub shape: MapShape,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_width: 200.0,
            default_height: 200.0,
            zoom: 0.1,
            stay_on_screen: true,
            background_image: String::new(),
            frame_image: String::new(),
            background_color: Color::BLACK,
            background_opacity: 0.7,
            border_color: Color::WHITE,
            border_width: 2.0,
            player_marker_image: String::new(),
            player_color: Color::new(0, 255, 0),
            player_size: 12.0,
            enemy_marker_image: String::new(),
            enemy_color: Color::new(255, 0, 0),
            enemy_size: 8.0,
            item_marker_image: String::new(),
            item_color: Color::new(255, 255, 0),
            item_size: 6.0,
            show_obstacles: true,
            obstacle_color: Color::new(128, 128, 128),
            obstacle_opacity: 0.5,
            use_object_shape: true,
            auto_detect_bounds: true,
            mode: MapMode::Minimap,
            shape: MapShape::Rectangle,
        }
    }
}

fn number(name: &str, value: f64, label: &str, group: &str) -> PropertyDescriptor {
    PropertyDescriptor::new(name, PropertyType::Number, number_to_string(value))
        .with_label(label)
        .with_group(group)
}

fn boolean(name: &str, value: bool, label: &str, group: &str) -> PropertyDescriptor {
    PropertyDescriptor::new(name, PropertyType::Boolean, bool_to_string(value))
        .with_label(label)
        .with_group(group)
}

fn color(name: &str, value: Color, label: &str, group: &str) -> PropertyDescriptor {
    PropertyDescriptor::new(name, PropertyType::Color, value.to_string())
        .with_label(label)
        .with_group(group)
}

fn image(name: &str, value: &str, label: &str, group: &str) -> PropertyDescriptor {
    PropertyDescriptor::new(name, PropertyType::Resource, value)
        .with_extra_info("image")
        .with_label(label)
        .with_group(group)
}

fn choice(name: &str, value: &str, choices: &[&str], label: &str) -> PropertyDescriptor {
    choices.iter().fold(
        PropertyDescriptor::new(name, PropertyType::Choice, value).with_label(label),
        |descriptor, c| descriptor.with_choice(c, c),
    )
}

impl Configurable for MapConfig {
    fn properties(&self) -> Vec<PropertyDescriptor> {
        vec![
            number("width", self.default_width, "Default width (in pixels)", "")
                .with_measurement_unit(MeasurementUnit::Pixel),
            number("height", self.default_height, "Default height (in pixels)", "")
                .with_measurement_unit(MeasurementUnit::Pixel),
            number("zoom", self.zoom, "Zoom level", ""),
            boolean("stayOnScreen", self.stay_on_screen, "Stay on screen (fixed position)", ""),
            choice("mode", self.mode.as_str(), MapMode::choices(), "Mode"),
            choice("shape", self.shape.as_str(), MapShape::choices(), "Shape"),
            image("backgroundImage", &self.background_image, "Background image", "Visual"),
            image("frameImage", &self.frame_image, "Frame image", "Visual"),
            color("backgroundColor", self.background_color, "Background color", "Visual"),
            number(
                "backgroundOpacity",
                self.background_opacity,
                "Background opacity (0-1)",
                "Visual",
            ),
            color("borderColor", self.border_color, "Border color", "Visual"),
            number("borderWidth", self.border_width, "Border width", "Visual"),
            image(
                "playerMarkerImage",
                &self.player_marker_image,
                "Player marker image",
                "Player marker",
            ),
            color("playerColor", self.player_color, "Player color", "Player marker"),
            number("playerSize", self.player_size, "Player marker size", "Player marker"),
            image(
                "enemyMarkerImage",
                &self.enemy_marker_image,
                "Enemy marker image",
                "Enemy marker",
            ),
            color("enemyColor", self.enemy_color, "Enemy color", "Enemy marker"),
            number("enemySize", self.enemy_size, "Enemy marker size", "Enemy marker"),
            image("itemMarkerImage", &self.item_marker_image, "Item marker image", "Item marker"),
            color("itemColor", self.item_color, "Item color", "Item marker"),
            number("itemSize", self.item_size, "Item marker size", "Item marker"),
            boolean("showObstacles", self.show_obstacles, "Show obstacles", "Obstacles"),
            color("obstacleColor", self.obstacle_color, "Obstacle color", "Obstacles"),
            boolean(
                "useObjectShape",
                self.use_object_shape,
                "Use object shape for obstacles",
                "Obstacles",
            ),
            number("obstacleOpacity", self.obstacle_opacity, "Obstacle opacity (0-1)", "Obstacles"),
            boolean("autoDetectBounds", self.auto_detect_bounds, "Auto-detect level bounds", ""),
        ]
    }

    fn set_property(&mut self, name: &str, value: &str) -> Result<(), PropertyError> {
        match name {
            "width" => self.default_width = parse_number_or(value, self.default_width),
            "height" => self.default_height = parse_number_or(value, self.default_height),
            "zoom" => self.zoom = parse_number_or(value, self.zoom),
            "stayOnScreen" => self.stay_on_screen = parse_bool(value),
            "mode" => self.mode = value.parse()?,
            "shape" => self.shape = value.parse()?,
            "backgroundImage" => self.background_image = value.to_string(),
            "frameImage" => self.frame_image = value.to_string(),
            "backgroundColor" => self.background_color = value.parse()?,
            "backgroundOpacity" => {
                self.background_opacity = parse_number_or(value, self.background_opacity)
            }
            "borderColor" => self.border_color = value.parse()?,
            "borderWidth" => self.border_width = parse_number_or(value, self.border_width),
            "playerMarkerImage" => self.player_marker_image = value.to_string(),
            "playerColor" => self.player_color = value.parse()?,
            "playerSize" => self.player_size = parse_number_or(value, self.player_size),
            "enemyMarkerImage" => self.enemy_marker_image = value.to_string(),
            "enemyColor" => self.enemy_color = value.parse()?,
            "enemySize" => self.enemy_size = parse_number_or(value, self.enemy_size),
            "itemMarkerImage" => self.item_marker_image = value.to_string(),
            "itemColor" => self.item_color = value.parse()?,
            "itemSize" => self.item_size = parse_number_or(value, self.item_size),
            "showObstacles" => self.show_obstacles = parse_bool(value),
            "obstacleColor" => self.obstacle_color = value.parse()?,
            "obstacleOpacity" => {
                self.obstacle_opacity = parse_number_or(value, self.obstacle_opacity)
            }
            "useObjectShape" => self.use_object_shape = parse_bool(value),
            "autoDetectBounds" => self.auto_detect_bounds = parse_bool(value),
            _ => return Err(PropertyError::UnknownProperty(name.to_string())),
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerShape {
    Dot,
    Icon,
    /// Obstacles drawn with the tracked object's own box.
    ObjectShape,
}

/// How one marker should be drawn, after map defaults and marker overrides are combined.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub color: Color,
    pub size: f64,
    pub icon: Option<String>,
    pub shape: MarkerShape,
    pub opacity: f64,
}

/// Runtime state of one map object placed in a scene.
#[derive(Clone, Debug)]
pub struct MapObject {
    pub name: String,
    pub config: MapConfig,
    pub position: Vec2,
    visible: bool,
    bounds: Option<Bounds>,
}

impl MapObject {
    pub fn new(name: &str, config: MapConfig) -> Self {
        Self {
            name: name.to_string(),
            config,
            position: Vec2::ZERO,
            visible: true,
            bounds: None,
        }
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn toggle_visibility(&mut self) {
        self.visible = !self.visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.config.zoom + ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.config.zoom - ZOOM_STEP);
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.config.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn zoom_level(&self) -> f64 {
        self.config.zoom
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.position = Vec2::new(x, y);
    }

    /// Resizes the map to a square of `size`, never below the minimum size.
    pub fn set_size(&mut self, size: f64) {
        let size = size.max(MIN_SIZE);
        self.config.default_width = size;
        self.config.default_height = size;
    }

    pub fn width(&self) -> f64 {
        self.config.default_width
    }

    pub fn height(&self) -> f64 {
        self.config.default_height
    }

    pub fn set_player_color(&mut self, color: &str) -> Result<(), PropertyError> {
        self.config.player_color = color.parse()?;
        Ok(())
    }

    pub fn set_enemy_color(&mut self, color: &str) -> Result<(), PropertyError> {
        self.config.enemy_color = color.parse()?;
        Ok(())
    }

    pub fn set_item_color(&mut self, color: &str) -> Result<(), PropertyError> {
        self.config.item_color = color.parse()?;
        Ok(())
    }

    pub fn set_obstacle_color(&mut self, color: &str) -> Result<(), PropertyError> {
        self.config.obstacle_color = color.parse()?;
        Ok(())
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = Some(bounds);
    }

    pub fn needs_bounds(&self) -> bool {
        self.config.auto_detect_bounds && self.bounds.is_none()
    }

    /// Computes the level bounds from the viewport and the boxes of every tracked object.
    pub fn detect_bounds(&mut self, viewport: Bounds, tracked: impl IntoIterator<Item = Bounds>) {
        let mut bounds = viewport;
        for b in tracked {
            bounds.include(b.min, b.max);
        }
        self.bounds = Some(bounds.padded(BOUNDS_PADDING));
    }

    /// Projects a scene position onto the map's own pixel space.
    /// Without usable bounds everything lands on the map origin.
    pub fn world_to_map(&self, world: Vec2) -> Vec2 {
        let Some(bounds) = self.bounds else {
            return Vec2::ZERO;
        };
        let extent = bounds.size();
        if extent.x <= 0.0 || extent.y <= 0.0 {
            return Vec2::ZERO;
        }
        let normalized = (world - bounds.min) / extent;
        normalized * Vec2::new(self.width() as f32, self.height() as f32)
    }

    /// Resolves the style of a marker, or `None` when this map does not draw it.
    pub fn marker_style(&self, marker: &MarkerConfig) -> Option<MarkerStyle> {
        let config = &self.config;
        let (default_color, default_size, default_image, mut shape, opacity) =
            match marker.marker_type {
                MarkerType::Player => (
                    config.player_color,
                    config.player_size,
                    config.player_marker_image.as_str(),
                    MarkerShape::Dot,
                    1.0,
                ),
                MarkerType::Enemy => (
                    config.enemy_color,
                    config.enemy_size,
                    config.enemy_marker_image.as_str(),
                    MarkerShape::Dot,
                    1.0,
                ),
                MarkerType::Item => (
                    config.item_color,
                    config.item_size,
                    config.item_marker_image.as_str(),
                    MarkerShape::Dot,
                    1.0,
                ),
                MarkerType::Obstacle => {
                    if !config.show_obstacles {
                        return None;
                    }
                    let shape = if config.use_object_shape {
                        MarkerShape::ObjectShape
                    } else {
                        MarkerShape::Dot
                    };
                    (config.obstacle_color, 8.0, "", shape, config.obstacle_opacity)
                }
                MarkerType::Ally => (Color::WHITE, 12.0, "", MarkerShape::Dot, 1.0),
                MarkerType::Objective => (Color::WHITE, 10.0, "", MarkerShape::Dot, 1.0),
                MarkerType::Waypoint => (Color::WHITE, 6.0, "", MarkerShape::Dot, 1.0),
                MarkerType::Neutral | MarkerType::Custom => {
                    (Color::WHITE, 8.0, "", MarkerShape::Dot, 1.0)
                }
            };

        let icon = marker
            .custom_icon
            .clone()
            .or_else(|| (!default_image.is_empty()).then(|| default_image.to_string()));
        if icon.is_some() && shape == MarkerShape::Dot {
            shape = MarkerShape::Icon;
        }
        Some(MarkerStyle {
            color: marker.custom_color.unwrap_or(default_color),
            size: marker.custom_size.unwrap_or(default_size),
            icon,
            shape,
            opacity,
        })
    }
}
