use std::collections::BTreeMap;
use std::fs;
use std::io;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::behavior::{BehaviorKind, OffsetMode};
use crate::entity::EntityId;
use crate::error::ConfigError;
use crate::math::{Bounds, Transform};
use crate::object::{MapConfig, MapObject};
use crate::property::{Configurable, SerializedContent};
use crate::scene::{Scene, StepReport};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SimulationConfig {
    pub ticks: u32,
    pub tick_seconds: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks: 120,
            tick_seconds: 1.0 / 60.0,
        }
    }
}

/// A behavior attached to an entity, with property edits applied on top of its defaults.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BehaviorEntry {
    pub type_name: String, // "Sticker3DBehavior::Sticker3DBehavior", "Map::MapMarker", ...
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EntityConfig {
    pub name: String,
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Vec3, // degrees
    #[serde(default = "default_size")]
    pub size: Vec2,
    #[serde(default)]
    pub velocity: Vec3, // units per second
    #[serde(default)]
    pub angular_velocity: Vec3, // degrees per second
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destroy_after: Option<f64>, // seconds
    #[serde(default)]
    pub behaviors: Vec<BehaviorEntry>,
}

fn default_size() -> Vec2 {
    Vec2::splat(32.0)
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MapEntry {
    pub name: String,
    #[serde(default)]
    pub position: Vec2,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StickEntry {
    pub child: String,
    pub parent: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_mode: Option<OffsetMode>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default = "default_viewport")]
    pub viewport: Bounds,
    #[serde(default)]
    pub entities: Vec<EntityConfig>,
    #[serde(default)]
    pub maps: Vec<MapEntry>,
    #[serde(default)]
    pub sticks: Vec<StickEntry>,
}

fn default_viewport() -> Bounds {
    Bounds::new(Vec2::ZERO, Vec2::new(800.0, 600.0))
}

impl SceneConfig {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: SceneConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, path: &str) -> Result<(), ConfigError> {
        let content = toml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Loads `path`, writing the default scene there only when no file exists yet.
    /// A file that exists but cannot be read or parsed is left untouched and reported.
    pub fn load_or_create(path: &str) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                info!("{path} not found, writing the default scene");
                let config = default_config();
                config.save(path)?;
                Ok(config)
            }
            other => other,
        }
    }

    /// Creates the scene: entities, their behaviors, map objects, then stick relations.
    ///
    /// Property edits go through the same validation as editor edits; rejected ones are
    /// logged and leave the default in place.
    pub fn build_scene(&self) -> Result<BuiltScene, ConfigError> {
        let mut scene = Scene::new(self.viewport);
        let mut motions = Vec::new();

        for entity in &self.entities {
            let id = scene.spawn(
                &entity.name,
                Transform::new(entity.position, entity.rotation),
                entity.size,
            );
            for behavior in &entity.behaviors {
                let kind = BehaviorKind::from_type_name(&behavior.type_name)
                    .ok_or_else(|| ConfigError::UnknownBehavior(behavior.type_name.clone()))?;
                let content = behavior_content(kind, &behavior.properties, &entity.name);
                if let Err(e) = scene.add_behavior(id, kind, &content) {
                    warn!("could not add {} to {}: {}", behavior.type_name, entity.name, e);
                }
            }
            motions.push(Motion {
                id,
                velocity: entity.velocity,
                angular_velocity: entity.angular_velocity,
                destroy_after: entity.destroy_after,
            });
        }

        for entry in &self.maps {
            let mut config = MapConfig::default();
            for (name, value) in &entry.properties {
                if !config.update_property(name, value) {
                    warn!("map {}: ignored property {name}={value:?}", entry.name);
                }
            }
            let mut map = MapObject::new(&entry.name, config);
            map.set_position(entry.position.x, entry.position.y);
            scene.add_map(map);
        }

        for stick in &self.sticks {
            let child = scene
                .find_entity(&stick.child)
                .ok_or_else(|| ConfigError::UnknownEntity(stick.child.clone()))?;
            let parent = scene
                .find_entity(&stick.parent)
                .ok_or_else(|| ConfigError::UnknownEntity(stick.parent.clone()))?;
            let stuck = match stick.offset_mode {
                Some(mode) => scene.stick_to_with_mode(child, parent, mode),
                None => scene.stick_to(child, parent),
            };
            if !stuck {
                warn!("could not stick {} to {}", stick.child, stick.parent);
            }
        }

        info!(
            "built scene with {} entities and {} maps",
            self.entities.len(),
            self.maps.len()
        );
        Ok(BuiltScene { scene, motions })
    }
}

fn behavior_content(
    kind: BehaviorKind,
    properties: &BTreeMap<String, String>,
    owner: &str,
) -> SerializedContent {
    let schema = kind.schema();
    let mut content = SerializedContent::new();
    (schema.initialize_content)(&mut content);
    for (name, value) in properties {
        if !(schema.update_property)(&mut content, name, value) {
            warn!("{owner}: ignored {} property {name}={value:?}", kind.type_name());
        }
    }
    content
}

/// Scripted movement standing in for the host's own game logic.
#[derive(Debug, Clone, Copy)]
struct Motion {
    id: EntityId,
    velocity: Vec3,
    angular_velocity: Vec3,
    destroy_after: Option<f64>,
}

pub struct BuiltScene {
    pub scene: Scene,
    motions: Vec<Motion>,
}

impl BuiltScene {
    /// Moves and expires the scripted entities, then steps the scene.
    pub fn tick(&mut self, dt: f64) -> StepReport {
        let now = self.scene.elapsed() + dt;
        for motion in &self.motions {
            if motion.destroy_after.is_some_and(|t| now >= t) && self.scene.destroy(motion.id) {
                info!("{:?} reached the end of its lifetime", motion.id);
                continue;
            }
            let Some(entity) = self.scene.entity_mut(motion.id) else {
                continue;
            };
            entity.transform.position += motion.velocity * dt as f32;
            entity.transform.rotation += motion.angular_velocity * dt as f32;
        }
        self.scene.step(dt)
    }
}

fn string_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn behavior(kind: BehaviorKind, properties: &[(&str, &str)]) -> BehaviorEntry {
    BehaviorEntry {
        type_name: kind.type_name().to_string(),
        properties: string_map(properties),
    }
}

pub fn default_config() -> SceneConfig {
    SceneConfig {
        simulation: SimulationConfig::default(),
        viewport: default_viewport(),
        entities: vec![
            EntityConfig {
                name: "Ship".to_string(),
                position: Vec3::new(100.0, 300.0, 0.0),
                rotation: Vec3::ZERO,
                size: Vec2::new(64.0, 32.0),
                velocity: Vec3::new(60.0, 0.0, 0.0),
                angular_velocity: Vec3::new(0.0, 0.0, 45.0),
                destroy_after: Some(1.5),
                behaviors: vec![behavior(
                    BehaviorKind::MapMarker,
                    &[("markerType", "Player"), ("showRotation", "true")],
                )],
            },
            EntityConfig {
                name: "Turret".to_string(),
                position: Vec3::new(100.0, 300.0, 20.0),
                rotation: Vec3::ZERO,
                size: Vec2::new(16.0, 16.0),
                velocity: Vec3::ZERO,
                angular_velocity: Vec3::ZERO,
                destroy_after: None,
                behaviors: vec![behavior(
                    BehaviorKind::Sticker3D,
                    &[("offsetMode", "Local"), ("destroyWithStuckToObject", "true")],
                )],
            },
            EntityConfig {
                name: "Flag".to_string(),
                position: Vec3::new(110.0, 300.0, 40.0),
                rotation: Vec3::ZERO,
                size: Vec2::new(8.0, 8.0),
                velocity: Vec3::ZERO,
                angular_velocity: Vec3::ZERO,
                destroy_after: None,
                behaviors: vec![behavior(
                    BehaviorKind::Sticker3D,
                    &[("followRotation", "false")],
                )],
            },
            EntityConfig {
                name: "Enemy".to_string(),
                position: Vec3::new(600.0, 150.0, 0.0),
                rotation: Vec3::ZERO,
                size: default_size(),
                velocity: Vec3::new(-20.0, 10.0, 0.0),
                angular_velocity: Vec3::ZERO,
                destroy_after: None,
                behaviors: vec![behavior(BehaviorKind::MapMarker, &[("markerType", "Enemy")])],
            },
            EntityConfig {
                name: "Rock".to_string(),
                position: Vec3::new(900.0, 700.0, 0.0),
                rotation: Vec3::ZERO,
                size: Vec2::new(96.0, 64.0),
                velocity: Vec3::ZERO,
                angular_velocity: Vec3::ZERO,
                destroy_after: None,
                behaviors: vec![behavior(BehaviorKind::MapMarker, &[("markerType", "Obstacle")])],
            },
        ],
        maps: vec![MapEntry {
            name: "Minimap".to_string(),
            position: Vec2::new(580.0, 20.0),
            properties: string_map(&[("width", "200"), ("height", "150"), ("shape", "Rectangle")]),
        }],
        sticks: vec![
            StickEntry {
                child: "Turret".to_string(),
                parent: "Ship".to_string(),
                offset_mode: None,
            },
            StickEntry {
                child: "Flag".to_string(),
                parent: "Turret".to_string(),
                offset_mode: Some(OffsetMode::World),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    #[test]
    fn default_config_survives_toml() {
        let config = default_config();
        let text = toml::to_string(&config).unwrap();
        let parsed: SceneConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    fn scratch_path(name: &str) -> String {
        let file = format!("map-sticker-{}-{name}", std::process::id());
        let path = std::env::temp_dir().join(file);
        let _ = fs::remove_file(&path);
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn malformed_file_is_reported_and_kept() {
        let path = scratch_path("malformed.toml");
        let original = "[[entities]]\nname = \"Broken\"\nposition = [1.0, 2.0\n";
        fs::write(&path, original).unwrap();

        assert!(matches!(
            SceneConfig::load_or_create(&path),
            Err(ConfigError::TomlDe(_))
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), original.to_string());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_gets_the_default_scene() {
        let path = scratch_path("missing.toml");

        let created = SceneConfig::load_or_create(&path).unwrap();
        assert_eq!(created, default_config());
        assert_eq!(SceneConfig::load(&path).unwrap(), default_config());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_sections_use_defaults() {
        let parsed: SceneConfig = toml::from_str(
            r#"
            [[entities]]
            name = "Lonely"
            position = [1.0, 2.0, 3.0]
            "#,
        )
        .unwrap();
        assert_eq!(parsed.simulation, SimulationConfig::default());
        assert_eq!(parsed.entities[0].size, default_size());
        assert!(parsed.maps.is_empty());
    }

    #[test]
    fn unknown_behavior_is_an_error() {
        let mut config = default_config();
        config.entities[0].behaviors[0].type_name = "Platformer::Character".to_string();
        assert!(matches!(
            config.build_scene(),
            Err(ConfigError::UnknownBehavior(_))
        ));
    }

    #[test]
    fn unknown_stick_target_is_an_error() {
        let mut config = default_config();
        config.sticks[0].parent = "Nobody".to_string();
        assert!(matches!(
            config.build_scene(),
            Err(ConfigError::UnknownEntity(name)) if name == "Nobody"
        ));
    }

    #[test]
    fn invalid_property_keeps_default() {
        let content = behavior_content(
            BehaviorKind::MapMarker,
            &BTreeMap::from([("markerType".to_string(), "Dragon".to_string())]),
            "test",
        );
        assert_eq!(content.get_string_attribute("markerType", ""), "Player".to_string());
    }

    #[test]
    fn built_scene_destroys_ship_and_turret_but_releases_flag() {
        let mut built = default_config().build_scene().unwrap();
        let scene = &built.scene;
        let ship = scene.find_entity("Ship").unwrap();
        let turret = scene.find_entity("Turret").unwrap();
        let flag = scene.find_entity("Flag").unwrap();
        assert!(scene.is_stuck(turret));
        assert!(scene.is_stuck(flag));

        let mut destroyed = Vec::new();
        let mut unstuck = Vec::new();
        for _ in 0..120 {
            let report = built.tick(1.0 / 60.0);
            destroyed.extend(report.destroyed);
            unstuck.extend(report.unstuck);
        }

        assert!(!built.scene.is_alive(ship));
        assert_eq!(destroyed, vec![turret]);
        assert_eq!(unstuck, vec![flag]);
        assert!(built.scene.is_alive(flag));
    }
}
