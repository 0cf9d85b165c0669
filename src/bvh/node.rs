//! BVH node type.
//!
//! Nodes use signed indices with `-1` as "none" because the same values are
//! written verbatim into the float rows the shader decodes.

use crate::util::Aabb;

/// Sentinel for a missing child, parent, object index or object type.
pub const NO_NODE: i32 = -1;

/// Node of the flat hierarchy.
///
/// Leaf: `object_index`/`object_type` name the primitive, no children.
/// Internal: `object_index == object_type == -1`, `left`/`right` are children.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BvhNode {
    pub object_type: i32,
    pub object_index: i32,
    pub left: i32,
    pub right: i32,
    pub parent: i32,
    pub aabb: Aabb,
}

impl BvhNode {
    pub fn leaf(object_type: i32, object_index: i32, aabb: Aabb) -> Self {
        Self {
            object_type,
            object_index,
            left: NO_NODE,
            right: NO_NODE,
            parent: NO_NODE,
            aabb,
        }
    }

    /// Internal node bounding both children.
    pub fn internal(left: i32, left_box: &Aabb, right: i32, right_box: &Aabb) -> Self {
        Self {
            object_type: NO_NODE,
            object_index: NO_NODE,
            left,
            right,
            parent: NO_NODE,
            aabb: Aabb::merge(left_box, right_box),
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.object_index >= 0
    }
}
