// Objects the extensions add to a scene.
pub mod map;

pub use map::{MapConfig, MapMode, MapObject, MapShape, MarkerShape, MarkerStyle};
