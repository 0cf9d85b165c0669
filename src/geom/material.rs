//! Surface materials referenced by scene primitives.

use crate::util::Vec3;
use serde::{Deserialize, Serialize};

/// Handle of a material in a scene's material arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

/// Shading model selector, stored as its discriminant in GPU buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum MaterialType {
    Lambertian = 0,
    Metallic = 1,
    Dielectric = 2,
    Pbr = 3,
}

impl MaterialType {
    /// Integer tag the shader switches on.
    #[inline]
    pub fn discriminant(self) -> u32 {
        self as u32
    }

    /// Inverse of [`MaterialType::discriminant`].
    pub fn from_discriminant(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Lambertian),
            1 => Some(Self::Metallic),
            2 => Some(Self::Dielectric),
            3 => Some(Self::Pbr),
            _ => None,
        }
    }
}

/// Material parameters shared by every primitive that references them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: Vec3,
    pub material_type: MaterialType,
    pub roughness: f32,
    /// Index of refraction; only meaningful for dielectric and PBR.
    pub ior: f32,
}

impl Material {
    pub fn new(color: Vec3, material_type: MaterialType, roughness: f32, ior: f32) -> Self {
        Self {
            color,
            material_type,
            roughness,
            ior,
        }
    }

    /// Diffuse material.
    pub fn lambertian(color: Vec3) -> Self {
        Self::new(color, MaterialType::Lambertian, 0.0, 0.0)
    }

    /// Reflective material; roughness 0 is a perfect mirror.
    pub fn metallic(color: Vec3, roughness: f32) -> Self {
        Self::new(color, MaterialType::Metallic, roughness, 0.0)
    }

    /// Clear glass-like material.
    pub fn dielectric(ior: f32) -> Self {
        Self::new(Vec3::ONE, MaterialType::Dielectric, 0.0, ior)
    }

    pub fn pbr(color: Vec3, roughness: f32, ior: f32) -> Self {
        Self::new(color, MaterialType::Pbr, roughness, ior)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::lambertian(Vec3::splat(0.8))
    }
}
