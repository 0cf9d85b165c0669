//! Bounding volume hierarchy over the scene collection.
//!
//! ## Pipeline
//! ```text
//! Scene → sort_spatially (random-axis windows) → build_bvh (bottom-up pairing) → Bvh
//! ```

mod build;
mod node;
mod sort;

pub use build::{build_bvh, Bvh};
pub use node::{BvhNode, NO_NODE};
pub use sort::sort_spatially;
