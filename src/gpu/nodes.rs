//! BVH node rows.
//!
//! Three rows per node, node `i` at rows `3i..3i+3`:
//! - row 0: `aabb.min.xyz`, `object_index`
//! - row 1: `aabb.max.xyz`, `object_type`
//! - row 2: `left`, `right`, `parent`, 0
//!
//! Internal nodes store -1 for object index and type; leaves store -1 children.

use super::buffer::{RowBuffer, MAX_EXACT_INDEX};
use crate::bvh::{Bvh, BvhNode};
use crate::util::{Aabb, Error, Result, Vec3};

/// Rows occupied by one node.
pub const NODE_ROWS: usize = 3;

#[tracing::instrument(skip_all, fields(nodes = bvh.nodes.len(), capacity))]
pub fn write_bvh(bvh: &Bvh, capacity: usize) -> Result<RowBuffer> {
    let mut buf = RowBuffer::new("nodes", capacity);
    buf.ensure_room(bvh.nodes.len() * NODE_ROWS)?;
    if bvh.nodes.len() > MAX_EXACT_INDEX {
        return Err(Error::other(format!(
            "{} nodes exceed exact float index range",
            bvh.nodes.len()
        )));
    }

    for node in &bvh.nodes {
        let (min, max) = (node.aabb.min, node.aabb.max);
        buf.push(&[
            [min.x, min.y, min.z, node.object_index as f32],
            [max.x, max.y, max.z, node.object_type as f32],
            [node.left as f32, node.right as f32, node.parent as f32, 0.0],
        ])?;
    }
    Ok(buf)
}

/// Decode the node stored at `index`.
pub fn read_node(buf: &RowBuffer, index: usize) -> Result<BvhNode> {
    let rows = buf
        .block(index, NODE_ROWS)
        .ok_or_else(|| Error::other(format!("node {index} outside buffer of {} rows", buf.len())))?;
    let [r0, r1, r2] = [rows[0], rows[1], rows[2]];
    Ok(BvhNode {
        object_type: r1[3] as i32,
        object_index: r0[3] as i32,
        left: r2[0] as i32,
        right: r2[1] as i32,
        parent: r2[2] as i32,
        aabb: Aabb::new(Vec3::new(r0[0], r0[1], r0[2]), Vec3::new(r1[0], r1[1], r1[2])),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bvh::{build_bvh, NO_NODE};
    use crate::scene::scene1;

    #[test]
    fn test_node_rows() {
        let scene = scene1().unwrap();
        let bvh = build_bvh(&scene).unwrap();
        let buf = write_bvh(&bvh, 100).unwrap();
        assert_eq!(buf.len(), 21);

        // leaf 1: sphere (0,0,-1) r=0.5
        assert_eq!(buf.rows()[3], [-0.5, -0.5, -1.5, 1.0]);
        assert_eq!(buf.rows()[4], [0.5, 0.5, -0.5, 1.0]);
        assert_eq!(buf.rows()[5], [-1.0, -1.0, 4.0, 0.0]);

        // root
        assert_eq!(buf.rows()[18][3], -1.0);
        assert_eq!(buf.rows()[19][3], -1.0);
        assert_eq!(buf.rows()[20], [4.0, 5.0, -1.0, 0.0]);

        for (i, node) in bvh.nodes.iter().enumerate() {
            assert_eq!(&read_node(&buf, i).unwrap(), node);
        }
        assert_eq!(read_node(&buf, 6).unwrap().parent, NO_NODE);
        assert!(read_node(&buf, 7).is_err());
    }

    #[test]
    fn test_node_capacity() {
        let bvh = build_bvh(&scene1().unwrap()).unwrap();
        assert!(matches!(
            write_bvh(&bvh, 20),
            Err(Error::CapacityExceeded { buffer: "nodes", required: 21, capacity: 20 })
        ));
    }
}
