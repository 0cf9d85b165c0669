//! Scene primitives and their bounding boxes.
//!
//! Every primitive variant is a case of the closed [`Shape`] enum, so both
//! bounding-box computation and GPU serialization match exhaustively on it.
//! Constructors validate their parameters; a [`Primitive`] caches its box at
//! construction time.

use super::material::MaterialId;
use crate::util::{Aabb, Error, Result, Vec3};

/// Half-thickness added on both sides of a rectangle's fixed axis so its box
/// never has zero width.
pub const RECT_SLAB_HALF_WIDTH: f32 = 1e-4;

/// Integer tag identifying a primitive variant in GPU buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ObjectType {
    Sphere = 1,
    XyRect = 2,
    XzRect = 3,
    YzRect = 4,
    Mesh = 5,
}

impl ObjectType {
    #[inline]
    pub fn discriminant(self) -> i32 {
        self as i32
    }

    pub fn from_discriminant(value: i32) -> Option<Self> {
        match value {
            1 => Some(Self::Sphere),
            2 => Some(Self::XyRect),
            3 => Some(Self::XzRect),
            4 => Some(Self::YzRect),
            5 => Some(Self::Mesh),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    /// Fails for a non-positive or non-finite radius.
    pub fn new(center: Vec3, radius: f32) -> Result<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(Error::invalid(format!("sphere radius must be positive, got {radius}")));
        }
        if !center.is_finite() {
            return Err(Error::invalid(format!("sphere center must be finite, got {center}")));
        }
        Ok(Self { center, radius })
    }

    pub fn bounding_box(&self) -> Aabb {
        let r = Vec3::splat(self.radius);
        Aabb::new(self.center - r, self.center + r)
    }
}

/// Axis-aligned rectangle spanning `[a0, a1] x [b0, b1]` in its plane, at
/// coordinate `k` on the remaining axis.
///
/// Which axes `a` and `b` denote depends on the [`Shape`] variant holding it:
/// XY → (x, y), XZ → (x, z), YZ → (y, z).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub a0: f32,
    pub a1: f32,
    pub b0: f32,
    pub b1: f32,
    pub k: f32,
}

impl Rect {
    /// Fails unless `a0 < a1` and `b0 < b1` with every value finite.
    pub fn new(a0: f32, a1: f32, b0: f32, b1: f32, k: f32) -> Result<Self> {
        if ![a0, a1, b0, b1, k].iter().all(|v| v.is_finite()) {
            return Err(Error::invalid("rectangle bounds must be finite"));
        }
        if !(a0 < a1 && b0 < b1) {
            return Err(Error::invalid(format!(
                "rectangle bounds inverted or empty: [{a0}, {a1}] x [{b0}, {b1}]"
            )));
        }
        Ok(Self { a0, a1, b0, b1, k })
    }

    #[inline]
    fn slab(&self) -> (f32, f32) {
        (self.k - RECT_SLAB_HALF_WIDTH, self.k + RECT_SLAB_HALF_WIDTH)
    }
}

/// Bounds of a triangle model registered as a single scene primitive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshBounds {
    pub aabb: Aabb,
    /// First triangle of the model in the triangle buffer.
    pub first_triangle: u32,
    pub triangle_count: u32,
}

/// Closed set of primitive geometries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Sphere(Sphere),
    XyRect(Rect),
    XzRect(Rect),
    YzRect(Rect),
    Mesh(MeshBounds),
}

impl Shape {
    pub fn object_type(&self) -> ObjectType {
        match self {
            Shape::Sphere(_) => ObjectType::Sphere,
            Shape::XyRect(_) => ObjectType::XyRect,
            Shape::XzRect(_) => ObjectType::XzRect,
            Shape::YzRect(_) => ObjectType::YzRect,
            Shape::Mesh(_) => ObjectType::Mesh,
        }
    }

    /// Bounding box of the geometry. Rectangles are inflated by
    /// [`RECT_SLAB_HALF_WIDTH`] along their fixed axis.
    pub fn bounding_box(&self) -> Aabb {
        match self {
            Shape::Sphere(s) => s.bounding_box(),
            Shape::XyRect(r) => {
                let (k0, k1) = r.slab();
                Aabb::new(Vec3::new(r.a0, r.b0, k0), Vec3::new(r.a1, r.b1, k1))
            }
            Shape::XzRect(r) => {
                let (k0, k1) = r.slab();
                Aabb::new(Vec3::new(r.a0, k0, r.b0), Vec3::new(r.a1, k1, r.b1))
            }
            Shape::YzRect(r) => {
                let (k0, k1) = r.slab();
                Aabb::new(Vec3::new(k0, r.a0, r.b0), Vec3::new(k1, r.a1, r.b1))
            }
            Shape::Mesh(m) => m.aabb,
        }
    }
}

/// A shape bound to a material, with its box cached.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Primitive {
    shape: Shape,
    material: MaterialId,
    aabb: Aabb,
}

impl Primitive {
    pub fn new(shape: Shape, material: MaterialId) -> Self {
        Self {
            aabb: shape.bounding_box(),
            shape,
            material,
        }
    }

    pub fn sphere(center: Vec3, radius: f32, material: MaterialId) -> Result<Self> {
        Ok(Self::new(Shape::Sphere(Sphere::new(center, radius)?), material))
    }

    pub fn xy_rect(x0: f32, x1: f32, y0: f32, y1: f32, k: f32, material: MaterialId) -> Result<Self> {
        Ok(Self::new(Shape::XyRect(Rect::new(x0, x1, y0, y1, k)?), material))
    }

    pub fn xz_rect(x0: f32, x1: f32, z0: f32, z1: f32, k: f32, material: MaterialId) -> Result<Self> {
        Ok(Self::new(Shape::XzRect(Rect::new(x0, x1, z0, z1, k)?), material))
    }

    pub fn yz_rect(y0: f32, y1: f32, z0: f32, z1: f32, k: f32, material: MaterialId) -> Result<Self> {
        Ok(Self::new(Shape::YzRect(Rect::new(y0, y1, z0, z1, k)?), material))
    }

    pub fn mesh(bounds: MeshBounds, material: MaterialId) -> Result<Self> {
        if bounds.triangle_count == 0 || bounds.aabb.is_empty() {
            return Err(Error::invalid("mesh primitive has no triangles"));
        }
        Ok(Self::new(Shape::Mesh(bounds), material))
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub fn material(&self) -> MaterialId {
        self.material
    }

    #[inline]
    pub fn object_type(&self) -> ObjectType {
        self.shape.object_type()
    }

    /// Box computed at construction.
    #[inline]
    pub fn bounding_box(&self) -> Aabb {
        self.aabb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAT: MaterialId = MaterialId(0);

    fn assert_well_formed(b: &Aabb) {
        assert!(b.min.cmple(b.max).all(), "inverted box {:?}", b);
    }

    #[test]
    fn test_sphere_box() {
        let p = Primitive::sphere(Vec3::new(0.0, -100.5, -1.0), 100.0, MAT).unwrap();
        let b = p.bounding_box();
        assert_well_formed(&b);
        assert_eq!(b.min, Vec3::new(-100.0, -200.5, -101.0));
        assert_eq!(b.max, Vec3::new(100.0, -0.5, 99.0));
        assert_eq!(p.object_type(), ObjectType::Sphere);
    }

    #[test]
    fn test_sphere_surface_inside_box() {
        let center = Vec3::new(1.0, 2.0, -3.0);
        let radius = 0.75;
        let b = Sphere::new(center, radius).unwrap().bounding_box();
        let eps = 1e-5;
        for i in 0..16 {
            for j in 0..8 {
                let theta = i as f32 / 16.0 * std::f32::consts::TAU;
                let phi = j as f32 / 7.0 * std::f32::consts::PI;
                let dir = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
                let p = center + dir * radius;
                assert!(p.cmpge(b.min - eps).all() && p.cmple(b.max + eps).all());
            }
        }
    }

    #[test]
    fn test_sphere_rejects_bad_radius() {
        assert!(Sphere::new(Vec3::ZERO, 0.0).is_err());
        assert!(Sphere::new(Vec3::ZERO, -1.0).is_err());
        assert!(Sphere::new(Vec3::ZERO, f32::NAN).is_err());
        assert!(Sphere::new(Vec3::splat(f32::INFINITY), 1.0).is_err());
    }

    #[test]
    fn test_rect_boxes_are_inflated() {
        let xy = Primitive::xy_rect(0.0, 2.0, 1.0, 3.0, 5.0, MAT).unwrap().bounding_box();
        assert_well_formed(&xy);
        assert_eq!(xy.min, Vec3::new(0.0, 1.0, 5.0 - RECT_SLAB_HALF_WIDTH));
        assert_eq!(xy.max, Vec3::new(2.0, 3.0, 5.0 + RECT_SLAB_HALF_WIDTH));

        let xz = Primitive::xz_rect(0.0, 2.0, 1.0, 3.0, 5.0, MAT).unwrap().bounding_box();
        assert_eq!(xz.min, Vec3::new(0.0, 5.0 - RECT_SLAB_HALF_WIDTH, 1.0));
        assert_eq!(xz.max, Vec3::new(2.0, 5.0 + RECT_SLAB_HALF_WIDTH, 3.0));

        let yz = Primitive::yz_rect(0.0, 2.0, 1.0, 3.0, 5.0, MAT).unwrap().bounding_box();
        assert_eq!(yz.min, Vec3::new(5.0 - RECT_SLAB_HALF_WIDTH, 0.0, 1.0));
        assert_eq!(yz.max, Vec3::new(5.0 + RECT_SLAB_HALF_WIDTH, 2.0, 3.0));

        for b in [xy, xz, yz] {
            assert!(b.size().min_element() > 0.0);
        }
    }

    #[test]
    fn test_rect_rejects_inverted_bounds() {
        assert!(Rect::new(1.0, 0.0, 0.0, 1.0, 0.0).is_err());
        assert!(Rect::new(0.0, 1.0, 2.0, 2.0, 0.0).is_err());
        assert!(Rect::new(0.0, 1.0, 0.0, f32::NAN, 0.0).is_err());
    }

    #[test]
    fn test_mesh_requires_triangles() {
        let bounds = MeshBounds {
            aabb: Aabb::new(Vec3::ZERO, Vec3::ONE),
            first_triangle: 0,
            triangle_count: 0,
        };
        assert!(Primitive::mesh(bounds, MAT).is_err());

        let bounds = MeshBounds { triangle_count: 12, ..bounds };
        let p = Primitive::mesh(bounds, MAT).unwrap();
        assert_eq!(p.bounding_box(), bounds.aabb);
        assert_eq!(p.object_type().discriminant(), 5);
    }

    #[test]
    fn test_object_type_roundtrip() {
        for v in 1..=5 {
            assert_eq!(ObjectType::from_discriminant(v).map(|t| t.discriminant()), Some(v));
        }
        assert_eq!(ObjectType::from_discriminant(-1), None);
    }
}
