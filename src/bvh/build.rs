//! Bottom-up pairwise BVH builder.
//!
//! Leaves occupy `[0, N)` in collection order. Internal nodes are appended at
//! `[N, 2N-1)` level by level: each level's nodes are paired left to right and
//! every pair gets a new parent. When a level has an odd count its last node
//! is carried unchanged to the end of the next level. Every merge creates one
//! node, so there are always `N - 1` internal nodes and the root is `2N - 2`.

use super::node::{BvhNode, NO_NODE};
use crate::scene::Scene;
use crate::util::{Error, Result};

/// Built hierarchy.
#[derive(Clone, Debug)]
pub struct Bvh {
    /// Flat node array, leaves first, root last.
    pub nodes: Vec<BvhNode>,
    leaf_count: usize,
}

impl Bvh {
    #[inline]
    pub fn root_index(&self) -> usize {
        self.nodes.len() - 1
    }

    #[inline]
    pub fn root(&self) -> &BvhNode {
        &self.nodes[self.root_index()]
    }

    #[inline]
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    pub fn leaves(&self) -> &[BvhNode] {
        &self.nodes[..self.leaf_count]
    }

    pub fn internal_nodes(&self) -> &[BvhNode] {
        &self.nodes[self.leaf_count..]
    }

    /// Longest root-to-leaf path, counted in edges.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.root_index(), 0usize)];
        while let Some((idx, depth)) = stack.pop() {
            let node = &self.nodes[idx];
            if node.is_leaf() {
                deepest = deepest.max(depth);
            } else {
                stack.push((node.left as usize, depth + 1));
                stack.push((node.right as usize, depth + 1));
            }
        }
        deepest
    }
}

/// Build the hierarchy over `scene` in its current collection order.
///
/// Each leaf's `object_index` is its primitive's arena handle.
#[tracing::instrument(skip_all, fields(count = scene.len()))]
pub fn build_bvh(scene: &Scene) -> Result<Bvh> {
    let n = scene.len();
    if n == 0 {
        return Err(Error::EmptyScene);
    }
    if n > (i32::MAX as usize) / 2 {
        return Err(Error::other(format!("too many primitives for a BVH: {n}")));
    }

    let mut nodes: Vec<BvhNode> = Vec::with_capacity(2 * n - 1);
    for (id, prim) in scene.iter() {
        nodes.push(BvhNode::leaf(
            prim.object_type().discriminant(),
            id.0 as i32,
            prim.bounding_box(),
        ));
    }

    let mut level: Vec<usize> = (0..n).collect();
    let mut levels = 0usize;
    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        for pair in level.chunks(2) {
            if let [left, right] = *pair {
                let parent = nodes.len();
                let node = BvhNode::internal(
                    left as i32,
                    &nodes[left].aabb,
                    right as i32,
                    &nodes[right].aabb,
                );
                nodes.push(node);
                nodes[left].parent = parent as i32;
                nodes[right].parent = parent as i32;
                next.push(parent);
            } else {
                // odd level: promote the straggler as-is
                next.push(pair[0]);
            }
        }
        level = next;
        levels += 1;
    }

    debug_assert_eq!(nodes.len(), 2 * n - 1);
    debug_assert_eq!(nodes[nodes.len() - 1].parent, NO_NODE);
    tracing::debug!(nodes = nodes.len(), levels, "bvh built");

    Ok(Bvh {
        nodes,
        leaf_count: n,
    })
}
