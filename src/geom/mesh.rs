//! Indexed triangle meshes.
//!
//! Models are supplied in memory (loading from files is left to the caller).
//! A model contributes one [`MeshBounds`](super::MeshBounds) primitive to the
//! scene and its vertices to the triangle buffer.

use crate::util::{Aabb, Error, Result, Vec2, Vec3};

/// Mesh vertex.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coords: Vec2,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, tex_coords: Vec2) -> Self {
        Self {
            position,
            normal,
            tex_coords,
        }
    }
}

/// Indexed triangle list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Axis-aligned cube with outward normals, 4 vertices and 2 triangles per face.
    pub fn cube(center: Vec3, half_extent: f32) -> Self {
        // (normal, tangent u, tangent v) per face
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];
        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, u, v) in faces {
            let base = vertices.len() as u32;
            for (cu, cv) in corners {
                let position = center + (normal + u * cu + v * cv) * half_extent;
                let uv = Vec2::new((cu + 1.0) * 0.5, (cv + 1.0) * 0.5);
                vertices.push(Vertex::new(position, normal, uv));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        Self { vertices, indices }
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate triangles as vertex triples. Triangles referencing a missing
    /// vertex are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = [Vertex; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(|tri| {
            let v0 = *self.vertices.get(tri[0] as usize)?;
            let v1 = *self.vertices.get(tri[1] as usize)?;
            let v2 = *self.vertices.get(tri[2] as usize)?;
            Some([v0, v1, v2])
        })
    }
}

/// Collection of meshes drawn as one object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Model {
    pub meshes: Vec<Mesh>,
}

impl Model {
    pub fn new(meshes: Vec<Mesh>) -> Self {
        Self { meshes }
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(Mesh::triangle_count).sum()
    }

    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.vertices.len()).sum()
    }

    /// Merge of every triangle's box. Fails for a model without triangles
    /// or with an index past its mesh's vertex list.
    pub fn bounding_box(&self) -> Result<Aabb> {
        for (m, mesh) in self.meshes.iter().enumerate() {
            let limit = mesh.vertices.len();
            if let Some(&bad) = mesh.indices.iter().find(|&&i| i as usize >= limit) {
                return Err(Error::invalid(format!(
                    "mesh {m} references vertex {bad}, only {limit} vertices"
                )));
            }
        }

        let mut aabb = Aabb::EMPTY;
        for tri in self.meshes.iter().flat_map(Mesh::triangles) {
            for v in tri {
                aabb.expand_by_point(v.position);
            }
        }
        if aabb.is_empty() {
            return Err(Error::invalid("model has no triangles"));
        }
        Ok(aabb)
    }
}
