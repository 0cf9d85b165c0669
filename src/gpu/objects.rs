//! Primitive + material rows.
//!
//! Three rows per primitive, written in arena order so primitive handle `h`
//! occupies rows `3h..3h+3`. Layout by object type:
//!
//! | type   | row 0                          | row 1          | row 2                   |
//! |--------|--------------------------------|----------------|-------------------------|
//! | sphere | center.xyz, radius             | color.rgb, mat | roughness, ior, 0, 0    |
//! | rect   | a0, a1, b0, b1                 | color.rgb, k   | mat, roughness, ior, 0  |
//! | mesh   | first_tri, tri_count, 0, 0     | color.rgb, mat | roughness, ior, 0, 0    |
//!
//! `mat` is the [`MaterialType`] discriminant. Rect in-plane axes follow
//! [`Rect`]: XY → (x, y), XZ → (x, z), YZ → (y, z).

use super::buffer::{Row, RowBuffer, MAX_EXACT_INDEX};
use crate::geom::{Material, MaterialType, ObjectType, Rect, Shape, Sphere};
use crate::scene::Scene;
use crate::util::{Error, Result, Vec3};

/// Rows occupied by one primitive.
pub const OBJECT_ROWS: usize = 3;

/// Geometry fields recovered from a primitive's rows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ObjectGeometry {
    Sphere(Sphere),
    XyRect(Rect),
    XzRect(Rect),
    YzRect(Rect),
    Mesh { first_triangle: u32, triangle_count: u32 },
}

/// Primitive as the shader sees it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecodedObject {
    pub geometry: ObjectGeometry,
    pub material: Material,
}

/// Write every primitive of `scene` into a new buffer of `capacity` rows.
#[tracing::instrument(skip_all, fields(count = scene.len(), capacity))]
pub fn write_objects(scene: &Scene, capacity: usize) -> Result<RowBuffer> {
    let mut buf = RowBuffer::new("objects", capacity);
    buf.ensure_room(scene.primitives().len() * OBJECT_ROWS)?;

    for prim in scene.primitives() {
        let mat = scene.material(prim.material())?;
        buf.push(&object_rows(prim.shape(), mat)?)?;
    }
    Ok(buf)
}

fn object_rows(shape: &Shape, mat: &Material) -> Result<[Row; OBJECT_ROWS]> {
    let c = mat.color;
    let ty = mat.material_type.discriminant() as f32;
    let rows = match shape {
        Shape::Sphere(s) => [
            [s.center.x, s.center.y, s.center.z, s.radius],
            [c.x, c.y, c.z, ty],
            [mat.roughness, mat.ior, 0.0, 0.0],
        ],
        Shape::XyRect(r) | Shape::XzRect(r) | Shape::YzRect(r) => [
            [r.a0, r.a1, r.b0, r.b1],
            [c.x, c.y, c.z, r.k],
            [ty, mat.roughness, mat.ior, 0.0],
        ],
        Shape::Mesh(m) => {
            let end = m.first_triangle as usize + m.triangle_count as usize;
            if end > MAX_EXACT_INDEX {
                return Err(Error::other(format!(
                    "mesh triangle range ends at {end}, beyond exact float range"
                )));
            }
            [
                [m.first_triangle as f32, m.triangle_count as f32, 0.0, 0.0],
                [c.x, c.y, c.z, ty],
                [mat.roughness, mat.ior, 0.0, 0.0],
            ]
        }
    };
    Ok(rows)
}

/// Decode the `index`-th primitive, interpreting its rows as `object_type`.
///
/// The object type comes from the BVH leaf that references the primitive.
pub fn read_object(buf: &RowBuffer, index: usize, object_type: ObjectType) -> Result<DecodedObject> {
    let rows = buf
        .block(index, OBJECT_ROWS)
        .ok_or(Error::UnknownPrimitive(index as u32))?;
    let [r0, r1, r2] = [rows[0], rows[1], rows[2]];
    let color = Vec3::new(r1[0], r1[1], r1[2]);

    let (geometry, type_slot, roughness, ior) = match object_type {
        ObjectType::Sphere => {
            let sphere = Sphere {
                center: Vec3::new(r0[0], r0[1], r0[2]),
                radius: r0[3],
            };
            (ObjectGeometry::Sphere(sphere), r1[3], r2[0], r2[1])
        }
        ObjectType::XyRect | ObjectType::XzRect | ObjectType::YzRect => {
            let rect = Rect {
                a0: r0[0],
                a1: r0[1],
                b0: r0[2],
                b1: r0[3],
                k: r1[3],
            };
            let geometry = match object_type {
                ObjectType::XyRect => ObjectGeometry::XyRect(rect),
                ObjectType::XzRect => ObjectGeometry::XzRect(rect),
                _ => ObjectGeometry::YzRect(rect),
            };
            (geometry, r2[0], r2[1], r2[2])
        }
        ObjectType::Mesh => {
            let geometry = ObjectGeometry::Mesh {
                first_triangle: r0[0] as u32,
                triangle_count: r0[1] as u32,
            };
            (geometry, r1[3], r2[0], r2[1])
        }
    };

    let material_type = MaterialType::from_discriminant(type_slot as u32)
        .filter(|_| type_slot >= 0.0 && type_slot.fract() == 0.0)
        .ok_or_else(|| Error::other(format!("bad material type {type_slot} in object {index}")))?;

    Ok(DecodedObject {
        geometry,
        material: Material::new(color, material_type, roughness, ior),
    })
}
