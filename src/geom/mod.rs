//! Scene geometry: materials, primitives and triangle meshes.

mod material;
mod mesh;
mod primitive;

pub use material::{Material, MaterialId, MaterialType};
pub use mesh::{Mesh, Model, Vertex};
pub use primitive::{
    MeshBounds, ObjectType, Primitive, Rect, Shape, Sphere, RECT_SLAB_HALF_WIDTH,
};
