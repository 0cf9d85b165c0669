//! Triangle vertex rows.
//!
//! Triangles are expanded from their index lists, three vertices each, and
//! every vertex takes two rows: `position.xyz, uv.x` then `normal.xyz, uv.y`.

use super::buffer::{Row, RowBuffer, MAX_EXACT_INDEX};
use crate::geom::{Mesh, Model, Vertex};
use crate::util::{Error, Result, Vec2, Vec3};

/// Rows occupied by one vertex.
pub const VERTEX_ROWS: usize = 2;

/// Rows occupied by one triangle.
pub const TRIANGLE_ROWS: usize = 3 * VERTEX_ROWS;

/// Write every triangle of `model` into a new buffer of `capacity` rows.
#[tracing::instrument(skip_all, fields(triangles = model.triangle_count(), capacity))]
pub fn write_triangles(model: &Model, capacity: usize) -> Result<RowBuffer> {
    let mut buf = RowBuffer::new("triangles", capacity);
    let count: usize = model.meshes.iter().map(|m| m.triangles().count()).sum();
    buf.ensure_room(count * TRIANGLE_ROWS)?;
    if count > MAX_EXACT_INDEX {
        return Err(Error::other(format!("{count} triangles exceed exact float index range")));
    }

    let skipped = model.triangle_count() - count;
    if skipped > 0 {
        tracing::warn!(skipped, "triangles with out-of-range indices skipped");
    }

    for tri in model.meshes.iter().flat_map(Mesh::triangles) {
        let mut rows = [[0.0f32; 4]; TRIANGLE_ROWS];
        for (i, v) in tri.iter().enumerate() {
            let [a, b] = vertex_rows(v);
            rows[i * VERTEX_ROWS] = a;
            rows[i * VERTEX_ROWS + 1] = b;
        }
        buf.push(&rows)?;
    }
    Ok(buf)
}

fn vertex_rows(v: &Vertex) -> [Row; VERTEX_ROWS] {
    let (p, n, uv) = (v.position, v.normal, v.tex_coords);
    [[p.x, p.y, p.z, uv.x], [n.x, n.y, n.z, uv.y]]
}

/// Number of whole triangles stored in `buf`.
#[inline]
pub fn triangle_count(buf: &RowBuffer) -> usize {
    buf.len() / TRIANGLE_ROWS
}

/// Decode triangle `index` back into its three vertices.
pub fn read_triangle(buf: &RowBuffer, index: usize) -> Option<[Vertex; 3]> {
    let rows = buf.block(index, TRIANGLE_ROWS)?;
    let vertex = |i: usize| {
        let (a, b) = (rows[i * VERTEX_ROWS], rows[i * VERTEX_ROWS + 1]);
        Vertex::new(
            Vec3::new(a[0], a[1], a[2]),
            Vec3::new(b[0], b[1], b[2]),
            Vec2::new(a[3], b[3]),
        )
    };
    Some([vertex(0), vertex(1), vertex(2)])
}
