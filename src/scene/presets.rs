//! Reference scenes used by the demos and tests.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use super::Scene;
use crate::geom::{Material, MaterialId, Model};
use crate::util::{Aabb, Error, Result, Vec3};

/// Named reference scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneKind {
    /// Ground sphere plus three small spheres.
    Scene1,
    /// Large field of randomly placed small spheres.
    Random,
    /// Rectangle-built Cornell box.
    Cornell,
    /// Ground sphere with a triangle model in the middle.
    Display,
}

impl SceneKind {
    pub const ALL: [SceneKind; 4] = [
        SceneKind::Scene1,
        SceneKind::Random,
        SceneKind::Cornell,
        SceneKind::Display,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SceneKind::Scene1 => "scene1",
            SceneKind::Random => "random",
            SceneKind::Cornell => "cornell",
            SceneKind::Display => "display",
        }
    }

    /// Whether the scene places a triangle model.
    pub fn uses_model(self) -> bool {
        matches!(self, SceneKind::Display)
    }

    /// Build the scene. `model` is required by [`SceneKind::Display`] and
    /// ignored otherwise.
    pub fn build<R: Rng + ?Sized>(self, model: Option<&Model>, rng: &mut R) -> Result<Scene> {
        match self {
            SceneKind::Scene1 => scene1(),
            SceneKind::Random => random_scene(rng),
            SceneKind::Cornell => cornell_box(),
            SceneKind::Display => {
                let model = model.ok_or_else(|| Error::other("display scene requires a model"))?;
                display_scene(model)
            }
        }
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SceneKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SceneKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownScene(s.to_string()))
    }
}

/// The four-sphere test scene.
pub fn scene1() -> Result<Scene> {
    let mut scene = Scene::new();
    let ground = scene.add_material(Material::lambertian(Vec3::new(0.1, 0.7, 0.6)));
    let center = scene.add_material(Material::metallic(Vec3::new(0.5, 0.7, 0.5), 0.0));
    let left = scene.add_material(Material::lambertian(Vec3::new(0.8, 0.8, 0.0)));
    let right = scene.add_material(Material::lambertian(Vec3::new(0.1, 0.8, 0.4)));

    scene.add_sphere(Vec3::new(0.0, -100.5, -1.0), 100.0, ground)?;
    scene.add_sphere(Vec3::new(0.0, 0.0, -1.0), 0.5, center)?;
    scene.add_sphere(Vec3::new(-1.0, 0.0, -1.0), 0.5, left)?;
    scene.add_sphere(Vec3::new(1.0, 0.0, -1.0), 0.5, right)?;
    Ok(scene)
}

/// Ground sphere, a 22x22 grid of jittered small spheres and three large ones.
pub fn random_scene<R: Rng + ?Sized>(rng: &mut R) -> Result<Scene> {
    let mut scene = Scene::new();
    let ground = scene.add_material(Material::lambertian(Vec3::new(0.1, 0.7, 0.6)));
    scene.add_sphere(Vec3::new(0.0, -1000.0, 0.0), 1000.0, ground)?;

    let glass = scene.add_material(Material::dielectric(1.5));
    let keep_clear = Vec3::new(4.0, 0.2, 0.0);

    for a in -11..11 {
        for b in -11..11 {
            let center = Vec3::new(
                a as f32 + 0.9 * rng.random::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.random::<f32>(),
            );
            if (center - keep_clear).length() <= 0.9 {
                continue;
            }

            let choose_mat: f32 = rng.random();
            let material = if choose_mat < 0.8 {
                let albedo = random_color(rng, 0.0, 1.0) * random_color(rng, 0.0, 1.0);
                scene.add_material(Material::lambertian(albedo))
            } else if choose_mat < 0.95 {
                let albedo = random_color(rng, 0.5, 1.0);
                let roughness = rng.random_range(0.0..0.5);
                scene.add_material(Material::metallic(albedo, roughness))
            } else {
                glass
            };
            scene.add_sphere(center, 0.2, material)?;
        }
    }

    let brown = scene.add_material(Material::lambertian(Vec3::new(0.4, 0.2, 0.1)));
    let bronze = scene.add_material(Material::metallic(Vec3::new(0.7, 0.6, 0.5), 0.0));
    scene.add_sphere(Vec3::new(0.0, 1.0, 0.0), 1.0, glass)?;
    scene.add_sphere(Vec3::new(-4.0, 1.0, 0.0), 1.0, brown)?;
    scene.add_sphere(Vec3::new(4.0, 1.0, 0.0), 1.0, bronze)?;
    Ok(scene)
}

/// 555-unit Cornell box: green and red side walls, white floor, ceiling and
/// back wall, and a ceiling light.
pub fn cornell_box() -> Result<Scene> {
    let mut scene = Scene::new();
    let red = scene.add_material(Material::lambertian(Vec3::new(0.65, 0.05, 0.05)));
    let white = scene.add_material(Material::lambertian(Vec3::splat(0.73)));
    let green = scene.add_material(Material::lambertian(Vec3::new(0.12, 0.45, 0.15)));
    // TODO: switch to a dedicated emissive material once the shader grows one
    let light = scene.add_material(Material::pbr(Vec3::splat(15.0), 1.0, 1.0));

    scene.add_yz_rect(0.0, 555.0, 0.0, 555.0, 555.0, green)?;
    scene.add_yz_rect(0.0, 555.0, 0.0, 555.0, 0.0, red)?;
    scene.add_xz_rect(213.0, 343.0, 227.0, 332.0, 554.0, light)?;
    scene.add_xz_rect(0.0, 555.0, 0.0, 555.0, 0.0, white)?;
    scene.add_xz_rect(0.0, 555.0, 0.0, 555.0, 555.0, white)?;
    scene.add_xy_rect(0.0, 555.0, 0.0, 555.0, 555.0, white)?;
    Ok(scene)
}

/// Model resting on a ground sphere, flanked by a glass and a metal sphere.
///
/// The model's triangles start at offset 0 in the triangle buffer.
pub fn display_scene(model: &Model) -> Result<Scene> {
    let mut scene = Scene::new();
    let ground = scene.add_material(Material::lambertian(Vec3::new(0.5, 0.5, 0.5)));
    let model_mat = scene.add_material(Material::pbr(Vec3::new(0.6, 0.55, 0.5), 0.4, 1.5));
    let glass = scene.add_material(Material::dielectric(1.5));
    let metal = scene.add_material(Material::metallic(Vec3::new(0.8, 0.8, 0.9), 0.05));

    let bounds: Aabb = model.bounding_box()?;
    let floor = bounds.min.y;
    scene.add_sphere(Vec3::new(0.0, floor - 1000.0, 0.0), 1000.0, ground)?;
    scene.add_mesh(model, 0, model_mat)?;

    let radius = bounds.size().max_element().max(0.1) * 0.5;
    let offset = bounds.size().x * 0.5 + radius * 1.5;
    let center = bounds.center();
    place_flank(&mut scene, center - Vec3::X * offset, floor, radius, glass)?;
    place_flank(&mut scene, center + Vec3::X * offset, floor, radius, metal)?;
    Ok(scene)
}

fn place_flank(scene: &mut Scene, at: Vec3, floor: f32, radius: f32, material: MaterialId) -> Result<()> {
    scene.add_sphere(Vec3::new(at.x, floor + radius, at.z), radius, material)?;
    Ok(())
}

fn random_color<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> Vec3 {
    Vec3::new(
        rng.random_range(min..max),
        rng.random_range(min..max),
        rng.random_range(min..max),
    )
}
