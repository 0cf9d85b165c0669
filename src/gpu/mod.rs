//! Serialize primitives, materials, BVH nodes and triangles into flat
//! 4-float row buffers for buffer-texture upload.
//!
//! ## Architecture
//! ```text
//! Scene ─┬─ write_objects ──→ objects   (3 rows / primitive)
//!        └─ build_bvh → write_bvh ──→ nodes (3 rows / node)
//! Model ─── write_triangles ──→ triangles (2 rows / vertex)
//! ```
//!
//! Every writer checks its buffer capacity before writing anything.

mod buffer;
pub mod dump;
mod nodes;
mod objects;
mod scene_data;
mod triangles;

pub use buffer::{Row, RowBuffer, MAX_EXACT_INDEX};
pub use dump::{read_dump, write_dump};
pub use nodes::{read_node, write_bvh, NODE_ROWS};
pub use objects::{read_object, write_objects, DecodedObject, ObjectGeometry, OBJECT_ROWS};
pub use scene_data::{prepare_scene, Capacities, SceneBuffers, DEFAULT_CAPACITY};
pub use triangles::{read_triangle, triangle_count, write_triangles, TRIANGLE_ROWS, VERTEX_ROWS};
