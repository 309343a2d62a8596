use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::behavior::sticker::Axis;
use crate::behavior::{MarkerType, OffsetMode};
use crate::entity::EntityId;
use crate::error::{InstructionError, SceneError};
use crate::object::MapObject;
use crate::scene::Scene;

/// A value passed by the host event sheet, after the object and behavior parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Argument {
    Number(f64),
    String(String),
    Bool(bool),
    Object(EntityId),
}

/// What an action, condition or expression hands back to the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum InstructionValue {
    None,
    Bool(bool),
    Number(f64),
    String(String),
}

/// The object an instruction runs on: a behavior owner, or a map object by index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Entity(EntityId),
    Map(usize),
}

struct Args<'a> {
    function: &'a str,
    values: &'a [Argument],
}

impl<'a> Args<'a> {
    fn get(&self, index: usize) -> Result<&'a Argument, InstructionError> {
        self.values
            .get(index)
            .ok_or_else(|| InstructionError::MissingArgument {
                function: self.function.to_string(),
                index,
            })
    }

    fn wrong(&self, index: usize) -> InstructionError {
        InstructionError::WrongArgument {
            function: self.function.to_string(),
            index,
        }
    }

    fn number(&self, index: usize) -> Result<f64, InstructionError> {
        match self.get(index)? {
            Argument::Number(n) => Ok(*n),
            _ => Err(self.wrong(index)),
        }
    }

    fn string(&self, index: usize) -> Result<&'a str, InstructionError> {
        match self.get(index)? {
            Argument::String(s) => Ok(s),
            _ => Err(self.wrong(index)),
        }
    }

    fn boolean(&self, index: usize) -> Result<bool, InstructionError> {
        match self.get(index)? {
            Argument::Bool(b) => Ok(*b),
            Argument::Number(n) => Ok(*n != 0.0),
            _ => Err(self.wrong(index)),
        }
    }

    fn object(&self, index: usize) -> Result<EntityId, InstructionError> {
        match self.get(index)? {
            Argument::Object(id) => Ok(*id),
            _ => Err(self.wrong(index)),
        }
    }

    /// An optional string argument; missing and empty both mean "not given".
    fn optional_string(&self, index: usize) -> Result<Option<&'a str>, InstructionError> {
        match self.values.get(index) {
            None => Ok(None),
            Some(Argument::String(s)) if s.is_empty() => Ok(None),
            Some(Argument::String(s)) => Ok(Some(s)),
            Some(_) => Err(self.wrong(index)),
        }
    }
}

/// Runs the action, condition or expression the host declared as `function_name`.
pub fn call(
    scene: &mut Scene,
    target: Target,
    function_name: &str,
    args: &[Argument],
) -> Result<InstructionValue, InstructionError> {
    let args = Args {
        function: function_name,
        values: args,
    };
    debug!("call {function_name} on {target:?}");
    match target {
        Target::Entity(id) => call_behavior(scene, id, &args),
        Target::Map(index) => call_map(scene, index, &args),
    }
}

fn call_behavior(
    scene: &mut Scene,
    id: EntityId,
    args: &Args,
) -> Result<InstructionValue, InstructionError> {
    use InstructionValue::{Bool, Number};

    let value = match args.function {
        // Sticker3D
        "stickTo3DObject" => {
            let parent = args.object(0)?;
            if !scene.stick_to(id, parent) {
                debug!("stickTo3DObject had no effect: {id:?} -> {parent:?}");
            }
            InstructionValue::None
        }
        "unstick" => {
            scene.unstick(id);
            InstructionValue::None
        }
        "isStuck" => Bool(scene.is_stuck(id)),
        "setOffsetX" => set_offset(scene, id, Axis::X, args)?,
        "setOffsetY" => set_offset(scene, id, Axis::Y, args)?,
        "setOffsetZ" => set_offset(scene, id, Axis::Z, args)?,
        "getOffsetX" => Number(scene.offset(id, Axis::X) as f64),
        "getOffsetY" => Number(scene.offset(id, Axis::Y) as f64),
        "getOffsetZ" => Number(scene.offset(id, Axis::Z) as f64),
        "setFollowRotation" => {
            scene.set_follow_rotation(id, args.boolean(0)?);
            InstructionValue::None
        }
        "followsRotation" => Bool(scene.follows_rotation(id)),
        "setOffsetMode" => {
            let mode: OffsetMode = args.string(0)?.parse().map_err(SceneError::from)?;
            scene.set_offset_mode(id, mode);
            InstructionValue::None
        }
        "offsetModeIs" => {
            let expected = args.string(0)?;
            Bool(scene.offset_mode(id).is_some_and(|mode| mode.as_str() == expected))
        }
        "setDestroyWithStuckToObject" => {
            scene.set_destroy_with_parent(id, args.boolean(0)?);
            InstructionValue::None
        }

        // MapMarker
        "showOnMap" => {
            scene.show_marker(id)?;
            InstructionValue::None
        }
        "hideOnMap" => {
            scene.hide_marker(id)?;
            InstructionValue::None
        }
        "setMarkerType" => {
            scene.set_marker_type(id, args.string(0)?)?;
            InstructionValue::None
        }
        "flash" => {
            scene.flash_marker(id, args.number(0)?)?;
            InstructionValue::None
        }
        "isVisibleOnMap" => Bool(scene.is_marker_visible(id)),
        "markerTypeIs" => Bool(scene.marker_type_is(id, args.string(0)?)),
        "isFlashing" => Bool(scene.is_marker_flashing(id)),

        other => return Err(InstructionError::UnknownFunction(other.to_string())),
    };
    Ok(value)
}

fn set_offset(
    scene: &mut Scene,
    id: EntityId,
    axis: Axis,
    args: &Args,
) -> Result<InstructionValue, InstructionError> {
    scene.set_offset(id, axis, args.number(0)? as f32);
    Ok(InstructionValue::None)
}

fn call_map(
    scene: &mut Scene,
    index: usize,
    args: &Args,
) -> Result<InstructionValue, InstructionError> {
    use InstructionValue::{Bool, Number};

    // Counting needs the whole scene, everything else only the map object.
    if args.function == "getTrackedCount" {
        scene.map(index).ok_or(SceneError::NoSuchMap(index))?;
        let count = match args.optional_string(0)? {
            None => scene.tracked_count(None),
            Some(name) => match name.parse::<MarkerType>() {
                Ok(marker_type) => scene.tracked_count(Some(marker_type)),
                Err(_) => 0,
            },
        };
        return Ok(Number(count as f64));
    }

    let map: &mut MapObject = scene.map_mut(index).ok_or(SceneError::NoSuchMap(index))?;
    let value = match args.function {
        "getZoomLevel" => Number(map.zoom_level()),
        "setVisible" => {
            map.set_visible(args.boolean(0)?);
            InstructionValue::None
        }
        "isVisible" => Bool(map.is_visible()),
        "zoomIn" => {
            map.zoom_in();
            InstructionValue::None
        }
        "zoomOut" => {
            map.zoom_out();
            InstructionValue::None
        }
        "setZoom" => {
            map.set_zoom(args.number(0)?);
            InstructionValue::None
        }
        "setPosition" => {
            map.set_position(args.number(0)? as f32, args.number(1)? as f32);
            InstructionValue::None
        }
        "setSize" => {
            map.set_size(args.number(0)?);
            InstructionValue::None
        }
        "setPlayerColor" => {
            map.set_player_color(args.string(0)?).map_err(SceneError::from)?;
            InstructionValue::None
        }
        "setEnemyColor" => {
            map.set_enemy_color(args.string(0)?).map_err(SceneError::from)?;
            InstructionValue::None
        }
        "setItemColor" => {
            map.set_item_color(args.string(0)?).map_err(SceneError::from)?;
            InstructionValue::None
        }
        "setObstacleColor" => {
            map.set_obstacle_color(args.string(0)?).map_err(SceneError::from)?;
            InstructionValue::None
        }
        other => return Err(InstructionError::UnknownFunction(other.to_string())),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3};

    use super::*;
    use crate::behavior::BehaviorKind;
    use crate::math::Transform;
    use crate::object::MapConfig;
    use crate::property::SerializedContent;

    fn scene() -> (Scene, EntityId, usize) {
        let mut scene = Scene::default();
        let id = scene.spawn("hero", Transform::from_position(Vec3::ZERO), Vec2::ONE);
        scene
            .add_behavior(id, BehaviorKind::MapMarker, &SerializedContent::new())
            .unwrap();
        scene
            .add_behavior(id, BehaviorKind::Sticker3D, &SerializedContent::new())
            .unwrap();
        let map = scene.add_map(MapObject::new("Map", MapConfig::default()));
        (scene, id, map)
    }

    fn text(value: &str) -> Argument {
        Argument::String(value.to_string())
    }

    #[test]
    fn marker_type_round_trip_through_calls() {
        let (mut scene, id, _) = scene();
        let target = Target::Entity(id);
        call(&mut scene, target, "setMarkerType", &[text("Enemy")]).unwrap();
        assert_eq!(
            call(&mut scene, target, "markerTypeIs", &[text("Enemy")]).unwrap(),
            InstructionValue::Bool(true)
        );

        let rejected = call(&mut scene, target, "setMarkerType", &[text("Dragon")]);
        assert!(matches!(
            rejected,
            Err(InstructionError::Scene(SceneError::Property(_)))
        ));
        assert!(scene.marker_type_is(id, "Enemy"));
    }

    #[test]
    fn refused_stick_is_not_an_error_and_leaves_child_free() {
        let (mut scene, id, _) = scene();
        let target = Target::Entity(id);

        let itself = call(&mut scene, target, "stickTo3DObject", &[Argument::Object(id)]);
        assert_eq!(itself.unwrap(), InstructionValue::None);
        assert_eq!(
            call(&mut scene, target, "isStuck", &[]).unwrap(),
            InstructionValue::Bool(false)
        );

        let gone = scene.spawn("gone", Transform::default(), Vec2::ONE);
        scene.destroy(gone);
        call(&mut scene, target, "stickTo3DObject", &[Argument::Object(gone)]).unwrap();
        assert!(!scene.is_stuck(id));
    }

    #[test]
    fn tracked_count_filter_is_optional() {
        let (mut scene, _, map) = scene();
        let target = Target::Map(map);
        assert_eq!(
            call(&mut scene, target, "getTrackedCount", &[]).unwrap(),
            InstructionValue::Number(1.0)
        );
        assert_eq!(
            call(&mut scene, target, "getTrackedCount", &[text("Enemy")]).unwrap(),
            InstructionValue::Number(0.0)
        );
        assert_eq!(
            call(&mut scene, target, "getTrackedCount", &[text("")]).unwrap(),
            InstructionValue::Number(1.0)
        );
    }

    #[test]
    fn argument_errors_name_the_position() {
        let (mut scene, id, map) = scene();
        assert!(matches!(
            call(&mut scene, Target::Entity(id), "setOffsetX", &[]),
            Err(InstructionError::MissingArgument { index: 0, .. })
        ));
        let position = [Argument::Number(1.0), Argument::Bool(true)];
        assert!(matches!(
            call(&mut scene, Target::Map(map), "setPosition", &position),
            Err(InstructionError::WrongArgument { index: 1, .. })
        ));
        assert!(matches!(
            call(&mut scene, Target::Map(map), "showOnMap", &[]),
            Err(InstructionError::UnknownFunction(_))
        ));
    }

    #[test]
    fn zoom_steps_are_clamped() {
        let (mut scene, _, map) = scene();
        for _ in 0..30 {
            call(&mut scene, Target::Map(map), "zoomIn", &[]).unwrap();
        }
        assert_eq!(
            call(&mut scene, Target::Map(map), "getZoomLevel", &[]).unwrap(),
            InstructionValue::Number(1.0)
        );
    }
}
