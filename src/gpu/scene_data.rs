//! Run the whole pipeline and collect the buffers for upload.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::buffer::RowBuffer;
use super::nodes::write_bvh;
use super::objects::write_objects;
use super::triangles::{triangle_count, write_triangles};
use crate::bvh::{build_bvh, sort_spatially};
use crate::geom::{Model, Shape};
use crate::scene::Scene;
use crate::util::{Error, Result};

/// Rows per buffer used by the demos.
pub const DEFAULT_CAPACITY: usize = 100_000;

/// Row capacity of each output buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capacities {
    pub objects: usize,
    pub nodes: usize,
    pub triangles: usize,
}

impl Default for Capacities {
    fn default() -> Self {
        Self {
            objects: DEFAULT_CAPACITY,
            nodes: DEFAULT_CAPACITY,
            triangles: DEFAULT_CAPACITY,
        }
    }
}

/// Complete scene data ready for GPU upload.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneBuffers {
    /// Primitive + material rows.
    pub objects: RowBuffer,
    /// BVH node rows.
    pub nodes: RowBuffer,
    /// Triangle vertex rows.
    pub triangles: RowBuffer,
    /// Number of primitives.
    pub object_count: u32,
    /// Index of the root node (`2N - 2`).
    pub root_index: u32,
    /// Number of triangles in `triangles`.
    pub triangle_count: u32,
}

impl SceneBuffers {
    pub fn node_count(&self) -> u32 {
        self.root_index + 1
    }
}

/// Sort `scene` spatially, build its BVH and write all three buffers.
///
/// `model` supplies the triangles referenced by mesh primitives; pass `None`
/// for scenes without meshes. Fails with [`Error::InvalidPrimitive`] when a
/// mesh primitive's triangle range is not covered by the written triangles.
#[tracing::instrument(skip_all, fields(count = scene.len()))]
pub fn prepare_scene<R: Rng + ?Sized>(
    scene: &mut Scene,
    model: Option<&Model>,
    rng: &mut R,
    capacities: Capacities,
) -> Result<SceneBuffers> {
    sort_spatially(scene, rng);
    let bvh = build_bvh(scene)?;

    let objects = write_objects(scene, capacities.objects)?;
    let nodes = write_bvh(&bvh, capacities.nodes)?;
    let triangles = match model {
        Some(model) => write_triangles(model, capacities.triangles)?,
        None => RowBuffer::new("triangles", capacities.triangles),
    };
    check_mesh_ranges(scene, triangle_count(&triangles))?;

    let buffers = SceneBuffers {
        object_count: scene.len() as u32,
        root_index: bvh.root_index() as u32,
        triangle_count: triangle_count(&triangles) as u32,
        objects,
        nodes,
        triangles,
    };
    tracing::info!(
        objects = buffers.object_count,
        nodes = buffers.node_count(),
        depth = bvh.depth(),
        triangles = buffers.triangle_count,
        "scene buffers ready"
    );
    Ok(buffers)
}

fn check_mesh_ranges(scene: &Scene, available: usize) -> Result<()> {
    for (id, prim) in scene.iter() {
        if let Shape::Mesh(m) = prim.shape() {
            let end = m.first_triangle as usize + m.triangle_count as usize;
            if end > available {
                return Err(Error::invalid(format!(
                    "mesh primitive {} spans triangles {}..{end}, triangle buffer holds {available}",
                    id.0, m.first_triangle
                )));
            }
        }
    }
    Ok(())
}
