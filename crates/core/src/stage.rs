use std::any::Any;

use lookdev_scene::{EnvironmentMap, InstanceId, ObjectContent, SceneMesh};

use crate::camera::CameraState;
use crate::context::{Context, ViewIndex};
use crate::provider::{AmbientMode, CustomRenderSettings, DataProvider, ReflectionMode};

const DEFAULT_SKY: [f32; 3] = [0.18, 0.18, 0.2];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StageObjectId(u32);

#[derive(Debug, Clone)]
pub struct StageObject {
    pub id: StageObjectId,
    pub name: String,
    pub persistent: bool,
    pub source: Option<InstanceId>,
    pub content: ObjectContent,
}

impl StageObject {
    pub fn mesh(&self) -> Option<&SceneMesh> {
        match &self.content {
            ObjectContent::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StageCamera {
    pub state: CameraState,
    pub clear_color: [f32; 4],
    pub exposure: f32,
}

impl Default for StageCamera {
    fn default() -> Self {
        Self {
            state: CameraState::default(),
            clear_color: [DEFAULT_SKY[0], DEFAULT_SKY[1], DEFAULT_SKY[2], 1.0],
            exposure: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageLighting {
    pub settings: Option<CustomRenderSettings>,
    pub environment: Option<EnvironmentMap>,
}

impl StageLighting {
    /// Background colour seen behind the stage objects.
    pub fn sky_color(&self) -> [f32; 3] {
        if let Some(environment) = &self.environment {
            return scale(environment.sky_color, environment.intensity);
        }
        let Some(settings) = &self.settings else {
            return DEFAULT_SKY;
        };
        if let Some(skybox) = &settings.skybox {
            return scale(skybox.tint, skybox.exposure);
        }
        match (settings.default_reflection_mode, &settings.custom_reflection) {
            (ReflectionMode::Custom, Some(reflection)) => {
                scale(reflection.sky_color, reflection.intensity)
            }
            _ => DEFAULT_SKY,
        }
    }

    pub fn ambient_color(&self) -> [f32; 3] {
        let sky = self.sky_color();
        let ground = self
            .environment
            .as_ref()
            .map(|environment| scale(environment.ground_color, environment.intensity))
            .unwrap_or(sky);
        match self.settings.as_ref().map(|settings| settings.ambient_mode) {
            Some(AmbientMode::Flat) => sky,
            Some(AmbientMode::Trilight) => mix(sky, ground, 0.5),
            _ => mix(sky, ground, 0.25),
        }
    }
}

fn scale(color: [f32; 3], factor: f32) -> [f32; 3] {
    color.map(|c| (c * factor).clamp(0.0, 1.0))
}

fn mix(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [0, 1, 2].map(|i| a[i] + (b[i] - a[i]) * t)
}

/// Isolated scene and camera rendering one view.
pub struct Stage {
    name: String,
    objects: Vec<StageObject>,
    next_object_id: u32,
    camera: StageCamera,
    lighting: StageLighting,
    custom_data: Option<Box<dyn Any>>,
    scene_version: u64,
    lighting_version: u64,
}

impl Stage {
    fn new(name: String) -> Self {
        Self {
            name,
            objects: Vec::new(),
            next_object_id: 1,
            camera: StageCamera::default(),
            lighting: StageLighting::default(),
            custom_data: None,
            scene_version: 0,
            lighting_version: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn objects(&self) -> &[StageObject] {
        &self.objects
    }

    pub fn object(&self, id: StageObjectId) -> Option<&StageObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    pub fn camera(&self) -> &StageCamera {
        &self.camera
    }

    pub fn lighting(&self) -> &StageLighting {
        &self.lighting
    }

    pub fn custom_data(&self) -> Option<&dyn Any> {
        self.custom_data.as_deref()
    }

    pub fn scene_version(&self) -> u64 {
        self.scene_version
    }

    pub fn lighting_version(&self) -> u64 {
        self.lighting_version
    }

    pub fn runtime(&mut self) -> StageRuntime<'_> {
        StageRuntime { stage: self }
    }

    fn add_object(
        &mut self,
        name: String,
        persistent: bool,
        source: Option<InstanceId>,
        content: ObjectContent,
    ) -> StageObjectId {
        let id = StageObjectId(self.next_object_id);
        self.next_object_id += 1;
        self.objects.push(StageObject {
            id,
            name,
            persistent,
            source,
            content,
        });
        id
    }

    fn clear_transient(&mut self) {
        self.objects.retain(|object| object.persistent);
    }
}

/// Stage access handed to the render pipeline.
pub struct StageRuntime<'a> {
    stage: &'a mut Stage,
}

impl StageRuntime<'_> {
    /// Creates an empty object in the stage. Persistent objects are kept across scene updates.
    pub fn add_game_object(&mut self, persistent: bool) -> StageObjectId {
        let name = format!("{} helper", self.stage.name);
        self.stage
            .add_object(name, persistent, None, ObjectContent::Empty)
    }

    pub fn camera(&self) -> &StageCamera {
        &self.stage.camera
    }

    pub fn camera_mut(&mut self) -> &mut StageCamera {
        &mut self.stage.camera
    }

    pub fn custom_data(&self) -> Option<&dyn Any> {
        self.stage.custom_data.as_deref()
    }

    pub fn set_custom_data(&mut self, data: Box<dyn Any>) {
        self.stage.custom_data = Some(data);
    }
}

/// One stage per view, rebuilt on demand from the context.
pub struct StageCache {
    stages: [Stage; 2],
    inert: bool,
}

impl StageCache {
    /// Without a provider the cache is inert and every update is a no-op.
    pub fn new(provider: Option<&dyn DataProvider>, context: &mut Context) -> Self {
        let mut cache = Self {
            stages: [
                Stage::new("LookDev First".to_string()),
                Stage::new("LookDev Second".to_string()),
            ],
            inert: provider.is_none(),
        };
        let Some(provider) = provider else {
            tracing::warn!("stage cache created without a data provider");
            return cache;
        };
        for index in ViewIndex::ALL {
            provider.setup_stage(&mut cache.stages[index as usize].runtime());
            cache.update_scene_objects(index, context);
            cache.update_scene_lighting(index, context, Some(provider));
        }
        cache
    }

    pub fn stage(&self, index: ViewIndex) -> &Stage {
        &self.stages[index as usize]
    }

    pub fn update_scene_objects(&mut self, index: ViewIndex, context: &mut Context) {
        if self.inert {
            return;
        }
        let stage = &mut self.stages[index as usize];
        stage.clear_transient();
        let view = context.view_content_mut(index);
        view.viewed_instance_in_preview = view.viewed_object_reference().cloned().map(|object| {
            stage.add_object(
                object.name.clone(),
                false,
                Some(object.id),
                object.content.clone(),
            )
        });
        stage.scene_version += 1;
        tracing::debug!(
            "{}: scene rebuilt with {} objects",
            stage.name,
            stage.objects.len()
        );
    }

    pub fn update_scene_lighting(
        &mut self,
        index: ViewIndex,
        context: &Context,
        provider: Option<&dyn DataProvider>,
    ) {
        let Some(provider) = provider.filter(|_| !self.inert) else {
            return;
        };
        let stage = &mut self.stages[index as usize];
        let mut settings = provider.environment_setup();
        let environment = context
            .view_content(index)
            .environment_reference()
            .and_then(|object| object.environment().copied());
        if let Some(environment) = environment {
            settings.default_reflection_mode = ReflectionMode::Custom;
            settings.custom_reflection = Some(environment);
        }
        stage.lighting = StageLighting {
            settings: Some(settings),
            environment,
        };
        stage.camera.state = *context.camera_state(index);
        provider.setup_camera(&mut stage.camera);
        stage.lighting_version += 1;
    }

    pub fn sync_camera(&mut self, index: ViewIndex, context: &Context) {
        self.stages[index as usize].camera.state = *context.camera_state(index);
    }
}
