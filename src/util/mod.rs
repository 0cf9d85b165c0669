//! Utility types shared by every module.
//!
//! - [`Aabb`] / [`Axis`] and `glam` vector re-exports
//! - [`Error`] / [`Result`] - Error handling

mod error;
mod math;

pub use error::*;
pub use math::*;
