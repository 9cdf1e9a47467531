use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Editor-side instance identifier. Only meaningful within one editor session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(pub i32);

impl InstanceId {
    pub const NONE: InstanceId = InstanceId(0);

    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::NONE
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    pub colors: Option<Vec<[f32; 3]>>,
}

impl SceneMesh {
    pub fn bounds(&self) -> Option<(glam::Vec3, glam::Vec3)> {
        let mut iter = self.positions.iter().map(|p| glam::Vec3::from(*p));
        let first = iter.next()?;
        Some(iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p))))
    }

    pub fn base_color(&self) -> [f32; 3] {
        let Some(colors) = self.colors.as_ref().filter(|colors| !colors.is_empty()) else {
            return [0.8, 0.8, 0.8];
        };
        let sum = colors
            .iter()
            .fold(glam::Vec3::ZERO, |acc, c| acc + glam::Vec3::from(*c));
        (sum / colors.len() as f32).to_array()
    }

    pub fn unit_cube(color: [f32; 3]) -> Self {
        let positions = vec![
            [-0.5, -0.5, -0.5],
            [0.5, -0.5, -0.5],
            [0.5, 0.5, -0.5],
            [-0.5, 0.5, -0.5],
            [-0.5, -0.5, 0.5],
            [0.5, -0.5, 0.5],
            [0.5, 0.5, 0.5],
            [-0.5, 0.5, 0.5],
        ];
        let normals = positions
            .iter()
            .map(|p| glam::Vec3::from(*p).normalize().to_array())
            .collect();
        let indices = vec![
            0, 2, 1, 0, 3, 2, 4, 5, 6, 4, 6, 7, 0, 1, 5, 0, 5, 4, 3, 6, 2, 3, 7, 6, 1, 2, 6, 1,
            6, 5, 0, 4, 7, 0, 7, 3,
        ];
        Self {
            colors: Some(vec![color; positions.len()]),
            positions,
            normals,
            indices,
        }
    }
}

/// Stand-in for an HDRI or cubemap asset used to light a view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentMap {
    pub sky_color: [f32; 3],
    pub ground_color: [f32; 3],
    pub intensity: f32,
}

impl Default for EnvironmentMap {
    fn default() -> Self {
        Self {
            sky_color: [0.45, 0.55, 0.7],
            ground_color: [0.2, 0.18, 0.16],
            intensity: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectContent {
    Mesh(SceneMesh),
    Environment(EnvironmentMap),
    Empty,
}

/// Where an object lives: inside an open scene hierarchy, or on disk as an asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Residence {
    Scene { scene: String },
    Asset { path: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub id: InstanceId,
    pub name: String,
    pub residence: Residence,
    pub content: ObjectContent,
}

impl SceneObject {
    pub fn is_scene_resident(&self) -> bool {
        matches!(self.residence, Residence::Scene { .. })
    }

    pub fn asset_path(&self) -> Option<&str> {
        match &self.residence {
            Residence::Asset { path } => Some(path),
            Residence::Scene { .. } => None,
        }
    }

    pub fn mesh(&self) -> Option<&SceneMesh> {
        match &self.content {
            ObjectContent::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn environment(&self) -> Option<&EnvironmentMap> {
        match &self.content {
            ObjectContent::Environment(environment) => Some(environment),
            _ => None,
        }
    }
}

pub type ObjectHandle = Arc<SceneObject>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_bounds_are_centered() {
        let mesh = SceneMesh::unit_cube([1.0, 0.0, 0.0]);
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, glam::Vec3::splat(-0.5));
        assert_eq!(max, glam::Vec3::splat(0.5));
        assert_eq!(mesh.base_color(), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn empty_mesh_has_no_bounds() {
        let mesh = SceneMesh {
            positions: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
            colors: None,
        };
        assert!(mesh.bounds().is_none());
        assert_eq!(mesh.base_color(), [0.8, 0.8, 0.8]);
    }

    #[test]
    fn residence_classifies_objects() {
        let object = SceneObject {
            id: InstanceId(3),
            name: "Lamp".to_string(),
            residence: Residence::Asset {
                path: "Assets/Lamp.prefab".to_string(),
            },
            content: ObjectContent::Empty,
        };
        assert!(!object.is_scene_resident());
        assert_eq!(object.asset_path(), Some("Assets/Lamp.prefab"));
        assert!(InstanceId::default().is_none());
    }
}
