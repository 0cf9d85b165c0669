//! Primitive and material arenas plus the ordered scene collection.
//!
//! Primitives are stored once in an arena and addressed by [`PrimitiveId`].
//! The collection order is a separate sequence of handles: the spatial sorter
//! permutes it and the BVH builder numbers leaves by position in it.

use crate::geom::{Material, MaterialId, MeshBounds, Model, Primitive};
use crate::util::{Aabb, Error, Result, Vec3};

/// Handle of a primitive in a scene's primitive arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimitiveId(pub u32);

impl PrimitiveId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Ordered, mutable collection of primitives and the materials they use.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    materials: Vec<Material>,
    primitives: Vec<Primitive>,
    order: Vec<PrimitiveId>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a material; many primitives may share the returned handle.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        let id = MaterialId(self.materials.len() as u32);
        self.materials.push(material);
        id
    }

    /// Append a primitive to the arena and to the end of the collection order.
    pub fn add(&mut self, primitive: Primitive) -> Result<PrimitiveId> {
        self.material(primitive.material())?;
        let id = PrimitiveId(self.primitives.len() as u32);
        self.primitives.push(primitive);
        self.order.push(id);
        Ok(id)
    }

    pub fn add_sphere(&mut self, center: Vec3, radius: f32, material: MaterialId) -> Result<PrimitiveId> {
        self.add(Primitive::sphere(center, radius, material)?)
    }

    pub fn add_xy_rect(
        &mut self,
        x0: f32,
        x1: f32,
        y0: f32,
        y1: f32,
        k: f32,
        material: MaterialId,
    ) -> Result<PrimitiveId> {
        self.add(Primitive::xy_rect(x0, x1, y0, y1, k, material)?)
    }

    pub fn add_xz_rect(
        &mut self,
        x0: f32,
        x1: f32,
        z0: f32,
        z1: f32,
        k: f32,
        material: MaterialId,
    ) -> Result<PrimitiveId> {
        self.add(Primitive::xz_rect(x0, x1, z0, z1, k, material)?)
    }

    pub fn add_yz_rect(
        &mut self,
        y0: f32,
        y1: f32,
        z0: f32,
        z1: f32,
        k: f32,
        material: MaterialId,
    ) -> Result<PrimitiveId> {
        self.add(Primitive::yz_rect(y0, y1, z0, z1, k, material)?)
    }

    /// Register a triangle model as one primitive bounded by its triangles.
    ///
    /// `first_triangle` is the model's offset in the triangle buffer. Models
    /// with out-of-range indices are rejected, so `triangle_count` always
    /// matches the triangles written for the model.
    pub fn add_mesh(&mut self, model: &Model, first_triangle: u32, material: MaterialId) -> Result<PrimitiveId> {
        let bounds = MeshBounds {
            aabb: model.bounding_box()?,
            first_triangle,
            triangle_count: model.triangle_count() as u32,
        };
        self.add(Primitive::mesh(bounds, material)?)
    }

    /// Remove every primitive and material.
    pub fn clear(&mut self) {
        self.materials.clear();
        self.primitives.clear();
        self.order.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn material(&self, id: MaterialId) -> Result<&Material> {
        self.materials
            .get(id.0 as usize)
            .ok_or(Error::UnknownMaterial(id.0))
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn primitive(&self, id: PrimitiveId) -> Result<&Primitive> {
        self.primitives
            .get(id.index())
            .ok_or(Error::UnknownPrimitive(id.0))
    }

    /// Primitives in arena (handle) order.
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Handles in collection order.
    pub fn order(&self) -> &[PrimitiveId] {
        &self.order
    }

    /// Arena alongside a mutable view of the order, for reordering passes.
    pub(crate) fn order_mut(&mut self) -> (&[Primitive], &mut [PrimitiveId]) {
        (&self.primitives, &mut self.order)
    }

    /// `(handle, primitive)` pairs in collection order.
    pub fn iter(&self) -> impl Iterator<Item = (PrimitiveId, &Primitive)> + '_ {
        self.order.iter().map(move |&id| (id, &self.primitives[id.index()]))
    }

    /// Box enclosing every primitive, `None` for an empty scene.
    pub fn bounding_box(&self) -> Option<Aabb> {
        self.iter()
            .map(|(_, p)| p.bounding_box())
            .reduce(|a, b| Aabb::merge(&a, &b))
    }
}
