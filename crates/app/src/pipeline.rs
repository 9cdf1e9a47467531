use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use lookdev_core::{
    AmbientMode, CustomRenderSettings, DataProvider, PipelineHost, ReflectionMode, SkyboxMaterial,
    StageCamera, StageRuntime,
};

const PIPELINE_NAME: &str = "PreviewPipeline";

/// Pipeline-specific data attached to every stage.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewStageData {
    pub ground_object: lookdev_core::StageObjectId,
}

#[derive(Debug, Clone)]
pub struct PreviewProvider {
    pub sky_tint: [f32; 3],
    pub exposure: f32,
}

impl Default for PreviewProvider {
    fn default() -> Self {
        Self {
            sky_tint: [0.32, 0.36, 0.42],
            exposure: 1.0,
        }
    }
}

impl DataProvider for PreviewProvider {
    fn environment_setup(&self) -> CustomRenderSettings {
        CustomRenderSettings {
            default_reflection_mode: ReflectionMode::Skybox,
            custom_reflection: None,
            skybox: Some(SkyboxMaterial {
                tint: self.sky_tint,
                exposure: 1.0,
            }),
            ambient_mode: AmbientMode::Trilight,
        }
    }

    fn setup_camera(&self, camera: &mut StageCamera) {
        camera.exposure = self.exposure;
    }

    fn setup_stage(&self, stage: &mut StageRuntime<'_>) {
        let ground_object = stage.add_game_object(true);
        stage.set_custom_data(Box::new(PreviewStageData { ground_object }));
    }
}

/// Standalone render pipeline that becomes usable after a number of ticks,
/// like a pipeline still compiling after an editor reload.
#[derive(Debug)]
pub struct PreviewPipeline {
    ready_after: u32,
    ticks: AtomicU32,
    provider: Arc<PreviewProvider>,
}

impl PreviewPipeline {
    pub fn new(ready_after: u32) -> Self {
        Self::with_provider(ready_after, PreviewProvider::default())
    }

    pub fn with_provider(ready_after: u32, provider: PreviewProvider) -> Self {
        Self {
            ready_after,
            ticks: AtomicU32::new(0),
            provider: Arc::new(provider),
        }
    }

    pub fn advance(&self) {
        let ticks = self.ticks.fetch_add(1, Ordering::Relaxed) + 1;
        if ticks == self.ready_after {
            tracing::info!("{} ready after {} ticks", PIPELINE_NAME, ticks);
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ticks.load(Ordering::Relaxed) >= self.ready_after
    }
}

impl PipelineHost for PreviewPipeline {
    fn current_provider(&self) -> Option<Arc<dyn DataProvider>> {
        if !self.is_ready() {
            return None;
        }
        let provider: Arc<dyn DataProvider> = self.provider.clone();
        Some(provider)
    }

    fn pipeline_name(&self) -> Option<String> {
        self.is_ready().then(|| PIPELINE_NAME.to_string())
    }
}
