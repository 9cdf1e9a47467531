use lookdev_core::MemoryAssetDatabase;
use lookdev_scene::{EnvironmentMap, ObjectContent, ObjectHandle, SceneMesh};

/// Objects and environments offered by the viewer's library panels.
#[derive(Debug, Clone, Default)]
pub struct DemoLibrary {
    pub objects: Vec<ObjectHandle>,
    pub environments: Vec<ObjectHandle>,
}

impl DemoLibrary {
    pub fn populate(assets: &MemoryAssetDatabase) -> Self {
        let objects = vec![
            assets.import_asset(
                "Assets/Models/Cube.mesh",
                "Cube",
                ObjectContent::Mesh(SceneMesh::unit_cube([0.8, 0.3, 0.25])),
            ),
            assets.import_asset(
                "Assets/Models/Pillar.mesh",
                "Pillar",
                ObjectContent::Mesh(scaled_cube([0.4, 1.6, 0.4], [0.85, 0.8, 0.7])),
            ),
            assets.import_asset(
                "Assets/Models/Slab.mesh",
                "Slab",
                ObjectContent::Mesh(scaled_cube([1.6, 0.25, 1.0], [0.3, 0.5, 0.8])),
            ),
            assets.spawn_in_scene(
                "Main",
                "Scene Crate",
                ObjectContent::Mesh(scaled_cube([0.8, 0.8, 0.8], [0.6, 0.45, 0.25])),
            ),
        ];
        let environments = vec![
            assets.import_asset(
                "Assets/HDRI/Studio.hdr",
                "Studio",
                ObjectContent::Environment(EnvironmentMap::default()),
            ),
            assets.import_asset(
                "Assets/HDRI/Sunset.hdr",
                "Sunset",
                ObjectContent::Environment(EnvironmentMap {
                    sky_color: [0.95, 0.55, 0.3],
                    ground_color: [0.25, 0.15, 0.1],
                    intensity: 1.0,
                }),
            ),
            assets.import_asset(
                "Assets/HDRI/Night.hdr",
                "Night",
                ObjectContent::Environment(EnvironmentMap {
                    sky_color: [0.08, 0.1, 0.2],
                    ground_color: [0.02, 0.02, 0.03],
                    intensity: 0.8,
                }),
            ),
        ];
        tracing::debug!(
            "demo library: {} objects, {} environments",
            objects.len(),
            environments.len()
        );
        Self {
            objects,
            environments,
        }
    }

    pub fn object(&self, name: &str) -> Option<&ObjectHandle> {
        find_by_name(&self.objects, name)
    }

    pub fn environment(&self, name: &str) -> Option<&ObjectHandle> {
        find_by_name(&self.environments, name)
    }
}

fn find_by_name<'a>(items: &'a [ObjectHandle], name: &str) -> Option<&'a ObjectHandle> {
    items
        .iter()
        .find(|item| item.name.eq_ignore_ascii_case(name))
}

fn scaled_cube(scale: [f32; 3], color: [f32; 3]) -> SceneMesh {
    let mut mesh = SceneMesh::unit_cube(color);
    for position in &mut mesh.positions {
        for axis in 0..3 {
            position[axis] *= scale[axis];
        }
    }
    mesh
}
