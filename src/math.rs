use glam::{EulerRot, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Position and orientation of a scene object.
///
/// Rotations are Euler angles in degrees, applied in X, Y, Z order.
/// `rotation.z` is the object's 2D angle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
}

impl Transform {
    pub fn new(position: Vec3, rotation: Vec3) -> Self {
        Self { position, rotation }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
        }
    }

    pub fn position_2d(&self) -> Vec2 {
        self.position.truncate()
    }
}

pub fn orientation_from_degrees(rotation: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::XYZ,
        rotation.x.to_radians(),
        rotation.y.to_radians(),
        rotation.z.to_radians(),
    )
}

/// Expresses a parent-local offset in world axes.
pub fn rotate_offset(offset: Vec3, rotation: Vec3) -> Vec3 {
    orientation_from_degrees(rotation) * offset
}

/// Expresses a world-space delta in the parent's local axes.
pub fn inverse_rotate_offset(delta: Vec3, rotation: Vec3) -> Vec3 {
    orientation_from_degrees(rotation).inverse() * delta
}

/// Wraps an angle in degrees into (-180, 180].
pub fn normalize_angle(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Axis-aligned rectangle in scene coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size / 2.0,
            max: center + size / 2.0,
        }
    }

    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    pub fn include(&mut self, min: Vec2, max: Vec2) {
        self.min = self.min.min(min);
        self.max = self.max.max(max);
    }

    pub fn padded(&self, padding: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(padding),
            max: self.max + Vec2::splat(padding),
        }
    }
}
