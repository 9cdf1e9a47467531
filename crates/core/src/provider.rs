use std::sync::Arc;

use lookdev_scene::EnvironmentMap;

use crate::stage::{StageCamera, StageRuntime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReflectionMode {
    #[default]
    Skybox,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AmbientMode {
    #[default]
    Skybox,
    Trilight,
    Flat,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyboxMaterial {
    pub tint: [f32; 3],
    pub exposure: f32,
}

/// Environment setup a render pipeline applies to a look-dev stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomRenderSettings {
    pub default_reflection_mode: ReflectionMode,
    pub custom_reflection: Option<EnvironmentMap>,
    pub skybox: Option<SkyboxMaterial>,
    pub ambient_mode: AmbientMode,
}

/// Capability a render pipeline implements to support look-dev.
pub trait DataProvider {
    fn environment_setup(&self) -> CustomRenderSettings;

    fn setup_camera(&self, camera: &mut StageCamera);

    /// Called once per stage when it is created. Persistent helper objects added
    /// here survive scene rebuilds.
    fn setup_stage(&self, _stage: &mut StageRuntime<'_>) {}
}

/// The active render pipeline, as seen from the editor.
pub trait PipelineHost {
    fn current_provider(&self) -> Option<Arc<dyn DataProvider>>;

    fn pipeline_name(&self) -> Option<String>;

    fn supported(&self) -> bool {
        self.current_provider().is_some()
    }
}
