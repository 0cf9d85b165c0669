//! Randomized spatial ordering of the scene collection.
//!
//! The builder pairs neighbours by position, so the collection is first
//! grouped spatially: the whole range is sorted along a random axis, then each
//! half, each quarter and so on, each window along its own random axis, until
//! windows shrink below two elements.

use rand::Rng;

use crate::scene::Scene;
use crate::util::Axis;

/// Reorder `scene`'s collection in place. The arena is untouched; only the
/// order of handles changes. Deterministic for a given `rng` state.
#[tracing::instrument(skip_all, fields(count = scene.len()))]
pub fn sort_spatially<R: Rng + ?Sized>(scene: &mut Scene, rng: &mut R) {
    let (primitives, order) = scene.order_mut();
    let n = order.len();

    let mut span = n;
    let mut passes = 0usize;
    while span >= 2 {
        for window in order.chunks_mut(span) {
            let axis = Axis::ALL[rng.random_range(0..3)];
            let i = axis.index();
            window.sort_by(|a, b| {
                let ka = primitives[a.index()].bounding_box().min[i];
                let kb = primitives[b.index()].bounding_box().min[i];
                ka.total_cmp(&kb)
            });
        }
        span /= 2;
        passes += 1;
    }

    tracing::debug!(passes, "spatial sort done");
}
