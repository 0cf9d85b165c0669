//! # Tracebox
//!
//! Host-side scene acceleration structures for shader ray tracing.
//!
//! Builds axis-aligned bounding boxes for spheres, axis-aligned rectangles
//! and triangle models, arranges them into a bottom-up bounding volume
//! hierarchy, and flattens primitives, materials, nodes and triangles into
//! 4-float row buffers a fragment or compute shader can traverse.
//!
//! ## Modules
//!
//! - [`util`] - Math types, [`Aabb`](util::Aabb), errors
//! - [`geom`] - Materials, primitives, triangle meshes
//! - [`scene`] - Scene collection and reference scenes
//! - [`bvh`] - Spatial sort and BVH builder
//! - [`gpu`] - Row buffer serialization and dumps
//! - [`config`] - Persistent settings
//!
//! ## Example
//!
//! ```ignore
//! use rand::SeedableRng;
//! use tracebox::prelude::*;
//!
//! let mut scene = tracebox::scene::scene1()?;
//! let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(0);
//! let buffers = prepare_scene(&mut scene, None, &mut rng, Capacities::default())?;
//! assert_eq!(buffers.root_index, 6);
//! ```

pub mod util;
pub mod geom;
pub mod scene;
pub mod bvh;
pub mod gpu;
pub mod config;

// Re-export commonly used types
pub use util::{Aabb, Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bvh::{build_bvh, sort_spatially, Bvh, BvhNode};
    pub use crate::config::Settings;
    pub use crate::geom::{Material, MaterialType, Mesh, Model, ObjectType, Primitive};
    pub use crate::gpu::{prepare_scene, Capacities, RowBuffer, SceneBuffers};
    pub use crate::scene::{Scene, SceneKind};
    pub use crate::util::{Aabb, Error, Result};
}
