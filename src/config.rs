//! Persistent settings for the scene builder.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::gpu::Capacities;
use crate::scene::SceneKind;
use crate::util::{Result, Vec3};

/// Settings loaded from JSON; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Reference scene name (`scene1`, `random`, `cornell`, `display`).
    pub scene: String,
    /// Seed for the spatial sorter and the random scene.
    pub seed: u64,

    // Buffer capacities, in rows
    pub object_capacity: usize,
    pub node_capacity: usize,
    pub triangle_capacity: usize,

    // Procedural model; always built for scenes that place one
    pub include_mesh: bool,
    pub mesh_center: [f32; 3],
    pub mesh_half_extent: f32,
}

impl Default for Settings {
    fn default() -> Self {
        let caps = Capacities::default();
        Self {
            scene: SceneKind::Scene1.name().to_string(),
            seed: 0,
            object_capacity: caps.objects,
            node_capacity: caps.nodes,
            triangle_capacity: caps.triangles,
            include_mesh: false,
            mesh_center: [0.0, 1.0, 0.0],
            mesh_half_extent: 1.0,
        }
    }
}

impl Settings {
    /// Default settings file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("tracebox");
            p.push("settings.json");
            p
        })
    }

    /// Load from `path`, or from [`Settings::default_path`] when `None`.
    ///
    /// A missing default file yields defaults; an explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => match Self::default_path() {
                Some(p) if p.exists() => Self::load_from(&p),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let settings = serde_json::from_str(&text)?;
        tracing::debug!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    /// Save as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn scene_kind(&self) -> Result<SceneKind> {
        self.scene.parse()
    }

    pub fn capacities(&self) -> Capacities {
        Capacities {
            objects: self.object_capacity,
            nodes: self.node_capacity,
            triangles: self.triangle_capacity,
        }
    }

    pub fn mesh_center(&self) -> Vec3 {
        Vec3::from(self.mesh_center)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::Error;

    #[test]
    fn test_partial_json_uses_defaults() {
        let s: Settings = serde_json::from_str(r#"{ "scene": "cornell", "seed": 9 }"#).unwrap();
        assert_eq!(s.scene_kind().unwrap(), SceneKind::Cornell);
        assert_eq!(s.seed, 9);
        assert_eq!(s.capacities(), Capacities::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let s = Settings {
            seed: 1234,
            node_capacity: 77,
            ..Default::default()
        };
        s.save(&path).unwrap();
        assert_eq!(Settings::load(Some(&path)).unwrap(), s);
    }

    #[test]
    fn test_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(Some(&dir.path().join("absent.json"))).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_unknown_scene() {
        let s = Settings {
            scene: "teapot".into(),
            ..Default::default()
        };
        assert!(matches!(s.scene_kind(), Err(Error::UnknownScene(_))));
    }
}
