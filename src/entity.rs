use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::behavior::{StickerRelationship, TrackedMarker};
use crate::math::{Bounds, Transform};

/// Handle to a scene object. A handle whose object has been destroyed never becomes
/// valid again, even when its slot is reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId {
    index: u32,
    generation: u32,
}

impl EntityId {
    pub fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(&self) -> u32 {
        self.index
    }
}

#[derive(Clone, Debug)]
pub struct Entity {
    pub id: EntityId,
    pub name: String, // object name, several entities may share it
    pub transform: Transform,
    pub size: Vec2, // width and height in scene units
    pub sticker: Option<StickerRelationship>,
    pub marker: Option<TrackedMarker>,
}

impl Entity {
    /// Center of the object's 2D box; the object's position is its top-left corner.
    pub fn center_2d(&self) -> Vec2 {
        self.transform.position_2d() + self.size / 2.0
    }

    pub fn bounds_2d(&self) -> Bounds {
        let min = self.transform.position_2d();
        Bounds::new(min, min + self.size)
    }
}

struct Slot {
    generation: u32,
    entity: Option<Entity>,
}

/// Arena of scene objects addressed by generational [`EntityId`]s.
#[derive(Default)]
pub struct EntityTable {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl EntityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, name: &str, transform: Transform, size: Vec2) -> EntityId {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    entity: None,
                });
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[index as usize];
        let id = EntityId::new(index, slot.generation);
        slot.entity = Some(Entity {
            id,
            name: name.to_string(),
            transform,
            size,
            sticker: None,
            marker: None,
        });
        self.len += 1;
        id
    }

    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        let entity = slot.entity.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(entity)
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entity.as_ref()
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entity.as_mut()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.slots.iter().filter_map(|slot| slot.entity.as_ref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.slots.iter_mut().filter_map(|slot| slot.entity.as_mut())
    }

    pub fn find_by_name(&self, name: &str) -> Option<EntityId> {
        self.iter().find(|e| e.name == name).map(|e| e.id)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn stale_handles_do_not_resolve_after_slot_reuse() {
        let mut table = EntityTable::new();
        let first = table.spawn("a", Transform::default(), Vec2::ONE);
        assert!(table.despawn(first).is_some());
        let second = table.spawn("b", Transform::default(), Vec2::ONE);

        assert_eq!(first.index(), second.index());
        assert!(!table.is_alive(first));
        assert!(table.is_alive(second));
        assert!(table.despawn(first).is_none());
        assert_eq!(table.get(second).map(|e| e.name.as_str()), Some("b"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn center_uses_top_left_position() {
        let mut table = EntityTable::new();
        let id = table.spawn(
            "box",
            Transform::from_position(Vec3::new(100.0, 200.0, 0.0)),
            Vec2::new(32.0, 32.0),
        );
        let entity = table.get(id).unwrap();
        assert_eq!(entity.center_2d(), Vec2::new(116.0, 216.0));
        assert_eq!(entity.bounds_2d().max, Vec2::new(132.0, 232.0));
    }
}
