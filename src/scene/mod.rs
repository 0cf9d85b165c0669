//! Scene collection and reference scenes.

mod collection;
mod presets;

pub use collection::{PrimitiveId, Scene};
pub use presets::{cornell_box, display_scene, random_scene, scene1, SceneKind};
