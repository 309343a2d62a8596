use std::collections::{HashMap, HashSet};

use glam::{Vec2, Vec3};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::behavior::sticker::Axis;
use crate::behavior::{
    BehaviorConfig, BehaviorKind, MarkerConfig, MarkerType, OffsetMode, StickerConfig,
    StickerRelationship, TrackedMarker,
};
use crate::entity::{Entity, EntityId, EntityTable};
use crate::error::SceneError;
use crate::math::{normalize_angle, Bounds, Transform};
use crate::object::{MapObject, MarkerStyle};
use crate::property::SerializedContent;

/// What happened during one [`Scene::step`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StepReport {
    /// Children removed because the object they were stuck to disappeared.
    pub destroyed: Vec<EntityId>,
    /// Children released because the object they were stuck to disappeared.
    pub unstuck: Vec<EntityId>,
    /// Markers whose flash request ran out this tick.
    pub flashes_ended: Vec<EntityId>,
}

/// A marker ready for the renderer of one map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedMarker {
    pub entity: EntityId,
    pub marker_type: MarkerType,
    pub map_position: Vec2,
    pub angle: Option<f32>, // degrees, only when the marker shows rotation
    pub style: MarkerStyle,
}

/// Runtime container for scene objects, their behaviors and the map objects that track them.
///
/// Everything here is driven by the host: it moves objects, calls the operations below
/// from its event sheets, and calls [`Scene::step`] once per frame.
pub struct Scene {
    entities: EntityTable,
    maps: Vec<MapObject>,
    viewport: Bounds,
    elapsed: f64, // seconds since the scene started
}

impl Scene {
    pub fn new(viewport: Bounds) -> Self {
        Self {
            entities: EntityTable::new(),
            maps: Vec::new(),
            viewport,
            elapsed: 0.0,
        }
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn spawn(&mut self, name: &str, transform: Transform, size: Vec2) -> EntityId {
        self.entities.spawn(name, transform, size)
    }

    /// Removes an object immediately. Objects stuck to it react on the next step.
    pub fn destroy(&mut self, id: EntityId) -> bool {
        self.entities.despawn(id).is_some()
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.entities.is_alive(id)
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn find_entity(&self, name: &str) -> Option<EntityId> {
        self.entities.find_by_name(name)
    }

    pub fn set_position(&mut self, id: EntityId, position: Vec3) -> bool {
        match self.entities.get_mut(id) {
            Some(entity) => {
                entity.transform.position = position;
                true
            }
            None => false,
        }
    }

    pub fn set_rotation(&mut self, id: EntityId, rotation: Vec3) -> bool {
        match self.entities.get_mut(id) {
            Some(entity) => {
                entity.transform.rotation = rotation;
                true
            }
            None => false,
        }
    }

    /// Attaches a behavior configured from its stored content.
    /// Replaces an existing one of the same kind.
    pub fn add_behavior(
        &mut self,
        id: EntityId,
        kind: BehaviorKind,
        content: &SerializedContent,
    ) -> Result<(), SceneError> {
        let entity = self
            .entities
            .get_mut(id)
            .ok_or(SceneError::NoSuchEntity(id))?;
        match kind {
            BehaviorKind::Sticker3D => {
                let config = StickerConfig::from_content(content);
                entity.sticker = Some(StickerRelationship::new(config));
            }
            BehaviorKind::MapMarker => {
                entity.marker = Some(TrackedMarker::new(MarkerConfig::from_content(content)))
            }
        }
        debug!("added {} to {}", kind.type_name(), entity.name);
        Ok(())
    }

    pub fn add_map(&mut self, map: MapObject) -> usize {
        self.maps.push(map);
        self.maps.len() - 1
    }

    pub fn map(&self, index: usize) -> Option<&MapObject> {
        self.maps.get(index)
    }

    pub fn map_mut(&mut self, index: usize) -> Option<&mut MapObject> {
        self.maps.get_mut(index)
    }

    pub fn maps(&self) -> &[MapObject] {
        &self.maps
    }

    // ===== STICKER =====

    fn sticker(&self, id: EntityId) -> Option<&StickerRelationship> {
        self.entities.get(id)?.sticker.as_ref()
    }

    fn sticker_mut(&mut self, id: EntityId) -> Option<&mut StickerRelationship> {
        self.entities.get_mut(id)?.sticker.as_mut()
    }

    /// Sticks `child` to `parent` using the child's configured offset mode.
    pub fn stick_to(&mut self, child: EntityId, parent: EntityId) -> bool {
        let Some(mode) = self.sticker(child).map(|s| s.offset_mode()) else {
            return false;
        };
        self.stick_to_with_mode(child, parent, mode)
    }

    /// Sticks `child` to `parent`, replacing any previous relationship, and captures the
    /// current relative position as the offset in the given frame.
    ///
    /// Has no effect, and returns false, when the child has no sticker behavior, the parent
    /// is not alive, or the parent is (directly or through its own parents) stuck to the child.
    pub fn stick_to_with_mode(
        &mut self,
        child: EntityId,
        parent: EntityId,
        mode: OffsetMode,
    ) -> bool {
        if self.sticker(child).is_none() {
            debug!("stick ignored: {child:?} has no sticker behavior");
            return false;
        }
        let Some(parent_transform) = self.entities.get(parent).map(|e| e.transform) else {
            debug!("stick ignored: parent {parent:?} does not exist");
            return false;
        };
        if self.chain_reaches(parent, child) {
            warn!("stick ignored: sticking {child:?} to {parent:?} would form a cycle");
            return false;
        }

        let Some(entity) = self.entities.get_mut(child) else {
            return false;
        };
        let child_transform = entity.transform;
        let Some(sticker) = entity.sticker.as_mut() else {
            return false;
        };
        sticker.set_offset_mode(mode);
        sticker.attach(parent, &parent_transform, &child_transform);
        info!("{} stuck to {parent:?} with {:?} offset {}", entity.name, mode, sticker.offset());
        true
    }

    /// Whether following stuck-to links from `from` arrives at `target`.
    fn chain_reaches(&self, from: EntityId, target: EntityId) -> bool {
        let mut current = Some(from);
        let mut hops = 0;
        while let Some(id) = current {
            if id == target {
                return true;
            }
            hops += 1;
            if hops > self.entities.len() {
                return true;
            }
            current = self.sticker(id).and_then(|s| s.parent());
        }
        false
    }

    /// Releases `child`. Not an error when it is not stuck.
    pub fn unstick(&mut self, child: EntityId) {
        if let Some(sticker) = self.sticker_mut(child) {
            sticker.detach();
        }
    }

    pub fn is_stuck(&self, child: EntityId) -> bool {
        self.stuck_to(child).is_some()
    }

    /// The live object `child` is stuck to.
    pub fn stuck_to(&self, child: EntityId) -> Option<EntityId> {
        self.sticker(child)
            .and_then(|s| s.parent())
            .filter(|parent| self.entities.is_alive(*parent))
    }

    pub fn set_offset(&mut self, child: EntityId, axis: Axis, value: f32) -> bool {
        match self.sticker_mut(child) {
            Some(sticker) => {
                sticker.set_offset_component(axis, value);
                true
            }
            None => false,
        }
    }

    /// Offset along one axis; 0 for objects without a sticker behavior.
    pub fn offset(&self, child: EntityId, axis: Axis) -> f32 {
        self.sticker(child)
            .map(|s| s.offset_component(axis))
            .unwrap_or(0.0)
    }

    pub fn set_follow_rotation(&mut self, child: EntityId, follow: bool) -> bool {
        match self.sticker_mut(child) {
            Some(sticker) => {
                sticker.set_follow_rotation(follow);
                true
            }
            None => false,
        }
    }

    pub fn follows_rotation(&self, child: EntityId) -> bool {
        self.sticker(child).is_some_and(|s| s.follows_rotation())
    }

    pub fn set_offset_mode(&mut self, child: EntityId, mode: OffsetMode) -> bool {
        match self.sticker_mut(child) {
            Some(sticker) => {
                sticker.set_offset_mode(mode);
                true
            }
            None => false,
        }
    }

    pub fn offset_mode(&self, child: EntityId) -> Option<OffsetMode> {
        self.sticker(child).map(|s| s.offset_mode())
    }

    pub fn set_destroy_with_parent(&mut self, child: EntityId, destroy: bool) -> bool {
        match self.sticker_mut(child) {
            Some(sticker) => {
                sticker.config.destroy_with_parent = destroy;
                true
            }
            None => false,
        }
    }

    /// Stuck children ordered so that every parent comes before the children stuck to it.
    fn sticker_update_order(&self) -> Vec<EntityId> {
        let parents: HashMap<EntityId, EntityId> = self
            .entities
            .iter()
            .filter_map(|e| Some((e.id, e.sticker.as_ref()?.parent()?)))
            .collect();

        let mut depths: HashMap<EntityId, usize> = HashMap::new();
        for &child in parents.keys() {
            let mut chain = Vec::new();
            let mut current = child;
            let mut base = 0;
            while let Some(&parent) = parents.get(&current) {
                if let Some(&known) = depths.get(&current) {
                    base = known;
                    break;
                }
                if chain.contains(&current) {
                    break;
                }
                chain.push(current);
                current = parent;
            }
            for (i, id) in chain.iter().rev().enumerate() {
                depths.insert(*id, base + i + 1);
            }
        }

        let mut order: Vec<EntityId> = parents.keys().copied().collect();
        order.sort_by_key(|id| (depths.get(id).copied().unwrap_or(0), *id));
        order
    }

    fn update_stickers(&mut self, report: &mut StepReport) {
        let mut doomed: HashSet<EntityId> = HashSet::new();

        for child in self.sticker_update_order() {
            let Some(parent) = self.sticker(child).and_then(|s| s.parent()) else {
                continue;
            };
            let parent_transform = if doomed.contains(&parent) {
                None
            } else {
                self.entities.get(parent).map(|e| e.transform)
            };
            let Some(entity) = self.entities.get_mut(child) else {
                continue;
            };
            let Some(sticker) = entity.sticker.as_mut() else {
                continue;
            };

            match parent_transform {
                Some(parent_transform) => {
                    entity.transform = sticker.follow(&parent_transform, &entity.transform);
                }
                None if sticker.config.destroy_with_parent => {
                    doomed.insert(child);
                }
                None => {
                    sticker.detach();
                    debug!("{} unstuck: the object it was stuck to is gone", entity.name);
                    report.unstuck.push(child);
                }
            }
        }

        let mut doomed: Vec<EntityId> = doomed.into_iter().collect();
        doomed.sort();
        for id in doomed {
            if let Some(entity) = self.entities.despawn(id) {
                info!("{} destroyed with the object it was stuck to", entity.name);
                report.destroyed.push(id);
            }
        }
    }

    // ===== TRACKED MARKERS =====

    fn marker(&self, id: EntityId) -> Result<&TrackedMarker, SceneError> {
        let entity = self.entities.get(id).ok_or(SceneError::NoSuchEntity(id))?;
        entity.marker.as_ref().ok_or(SceneError::MissingBehavior {
            entity: id,
            kind: BehaviorKind::MapMarker,
        })
    }

    fn marker_mut(&mut self, id: EntityId) -> Result<&mut TrackedMarker, SceneError> {
        let entity = self
            .entities
            .get_mut(id)
            .ok_or(SceneError::NoSuchEntity(id))?;
        entity.marker.as_mut().ok_or(SceneError::MissingBehavior {
            entity: id,
            kind: BehaviorKind::MapMarker,
        })
    }

    pub fn tracked_marker(&self, id: EntityId) -> Option<&TrackedMarker> {
        self.marker(id).ok()
    }

    pub fn tracked_marker_mut(&mut self, id: EntityId) -> Option<&mut TrackedMarker> {
        self.marker_mut(id).ok()
    }

    pub fn show_marker(&mut self, id: EntityId) -> Result<(), SceneError> {
        self.marker_mut(id)?.show();
        Ok(())
    }

    /// Hidden markers stay tracked and keep their type; they are only left out of rendering.
    pub fn hide_marker(&mut self, id: EntityId) -> Result<(), SceneError> {
        self.marker_mut(id)?.hide();
        Ok(())
    }

    pub fn is_marker_visible(&self, id: EntityId) -> bool {
        self.marker(id).is_ok_and(|m| m.is_visible())
    }

    pub fn set_marker_type(&mut self, id: EntityId, marker_type: &str) -> Result<(), SceneError> {
        self.marker_mut(id)?.set_marker_type(marker_type)?;
        Ok(())
    }

    pub fn marker_type_is(&self, id: EntityId, marker_type: &str) -> bool {
        self.marker(id).is_ok_and(|m| m.marker_type_is(marker_type))
    }

    pub fn flash_marker(&mut self, id: EntityId, duration: f64) -> Result<(), SceneError> {
        let now = self.elapsed;
        self.marker_mut(id)?.flash(now, duration);
        Ok(())
    }

    pub fn is_marker_flashing(&self, id: EntityId) -> bool {
        self.marker(id).is_ok_and(|m| m.is_flashing(self.elapsed))
    }

    /// Number of tracked objects, hidden ones included, optionally of a single marker type.
    pub fn tracked_count(&self, filter: Option<MarkerType>) -> usize {
        self.entities
            .iter()
            .filter_map(|e| e.marker.as_ref())
            .filter(|m| filter.map_or(true, |t| m.marker_type() == t))
            .count()
    }

    /// The markers map `map_index` should draw this frame.
    pub fn rendered_markers(&self, map_index: usize) -> Result<Vec<RenderedMarker>, SceneError> {
        let map = self
            .maps
            .get(map_index)
            .ok_or(SceneError::NoSuchMap(map_index))?;
        if !map.is_visible() {
            return Ok(Vec::new());
        }

        let rendered = self
            .entities
            .iter()
            .filter_map(|entity| {
                let marker = entity.marker.as_ref()?;
                if !marker.is_visible() || !marker.should_show_flash(self.elapsed) {
                    return None;
                }
                let style = map.marker_style(&marker.config)?;
                Some(RenderedMarker {
                    entity: entity.id,
                    marker_type: marker.marker_type(),
                    map_position: map.world_to_map(entity.center_2d()),
                    angle: marker
                        .shows_rotation()
                        .then(|| normalize_angle(entity.transform.rotation.z)),
                    style,
                })
            })
            .collect();
        Ok(rendered)
    }

    fn update_maps(&mut self) {
        let tracked: Vec<Bounds> = self
            .entities
            .iter()
            .filter(|e| e.marker.is_some())
            .map(|e| e.bounds_2d())
            .collect();
        for map in self.maps.iter_mut().filter(|m| m.needs_bounds()) {
            map.detect_bounds(self.viewport, tracked.iter().copied());
            debug!("{} detected bounds {:?}", map.name, map.bounds());
        }
    }

    // ===== FRAME =====

    /// Advances the scene by `dt` seconds, after the host has finished moving objects.
    ///
    /// Stuck children are placed in parent-before-child order so chains settle in one tick.
    pub fn step(&mut self, dt: f64) -> StepReport {
        let mut report = StepReport::default();
        self.elapsed += dt;

        let now = self.elapsed;
        for entity in self.entities.iter_mut() {
            if let Some(marker) = entity.marker.as_mut() {
                if marker.expire_flash(now) {
                    report.flashes_ended.push(entity.id);
                }
            }
        }

        self.update_stickers(&mut report);
        self.update_maps();
        report
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Bounds::new(Vec2::ZERO, Vec2::new(800.0, 600.0)))
    }
}
