mod assets;
mod camera;
mod config;
mod context;
mod error;
mod gizmo;
mod provider;
mod retry;
mod stage;
mod surface;

pub use assets::{AssetDatabase, AssetGuid, MemoryAssetDatabase};
pub use camera::CameraState;
pub use config::{load_config, save_config, DEFAULT_CONFIG_PATH};
pub use context::{
    Context, Layout, LayoutContext, ViewCompositionIndex, ViewContext, ViewIndex, ViewedObjectRef,
};
pub use error::LookDevError;
pub use gizmo::{
    ComparisonGizmo, ComparisonGizmoState, DividerGeometry, GizmoDragKind, CENTER_HANDLE_PX,
    HIT_THICKNESS_PX, MAX_RADIUS, MIN_RADIUS, ROTATE_ARM_PX,
};
pub use provider::{
    AmbientMode, CustomRenderSettings, DataProvider, PipelineHost, ReflectionMode, SkyboxMaterial,
};
pub use retry::{BoundedRetry, RetryStep, Scheduler, MAX_STARTUP_ATTEMPTS};
pub use stage::{
    Stage, StageCache, StageCamera, StageLighting, StageObject, StageObjectId, StageRuntime,
};
pub use surface::SurfaceSize;
