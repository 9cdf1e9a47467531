use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::Vec2;
use lookdev_core::{
    load_config, save_config, AssetDatabase, BoundedRetry, ComparisonGizmo, Context, DataProvider,
    Layout, LookDevError, PipelineHost, RetryStep, Scheduler, StageCache, SurfaceSize,
    ViewCompositionIndex, ViewIndex, DEFAULT_CONFIG_PATH, MAX_STARTUP_ATTEMPTS,
};
use lookdev_scene::ObjectHandle;
use render::{Compositer, RenderTexture, StageRenderer};

use crate::displayer::{Displayer, DisplayerEvent};

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub config_path: PathBuf,
    pub max_startup_attempts: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            max_startup_attempts: MAX_STARTUP_ATTEMPTS,
        }
    }
}

/// Everything created once the render pipeline can provide data.
struct RendererWiring {
    provider: Arc<dyn DataProvider>,
    stages: StageCache,
    gizmo: ComparisonGizmo,
    compositer: Compositer,
}

/// One look-dev session: the persisted context plus the display window wired to it.
pub struct LookDev {
    settings: SessionSettings,
    context: Context,
    host: Arc<dyn PipelineHost>,
    assets: Arc<dyn AssetDatabase>,
    renderer: Box<dyn StageRenderer>,
    displayer: Option<Box<dyn Displayer>>,
    startup: Option<BoundedRetry>,
    wiring: Option<RendererWiring>,
    open: bool,
    configurations: u32,
}

impl LookDev {
    pub fn new(
        settings: SessionSettings,
        host: Arc<dyn PipelineHost>,
        assets: Arc<dyn AssetDatabase>,
        renderer: Box<dyn StageRenderer>,
    ) -> Self {
        let mut context = load_config(&settings.config_path).unwrap_or_default();
        context.reload_data_on_load(assets.as_ref());
        Self {
            settings,
            context,
            host,
            assets,
            renderer,
            displayer: None,
            startup: None,
            wiring: None,
            open: false,
            configurations: 0,
        }
    }

    pub fn supported(&self) -> bool {
        self.host.supported()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn current_displayer(&self) -> Option<&dyn Displayer> {
        self.displayer.as_deref()
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Number of times the renderer has been wired since the session was created.
    pub fn configurations(&self) -> u32 {
        self.configurations
    }

    pub fn is_renderer_configured(&self) -> bool {
        self.wiring.is_some()
    }

    pub fn is_waiting_for_pipeline(&self) -> bool {
        self.startup.as_ref().is_some_and(BoundedRetry::is_pending)
    }

    pub fn compositer(&self) -> Option<&Compositer> {
        self.wiring.as_ref().map(|wiring| &wiring.compositer)
    }

    pub fn stages(&self) -> Option<&StageCache> {
        self.wiring.as_ref().map(|wiring| &wiring.stages)
    }

    pub fn is_gizmo_dragging(&self) -> bool {
        self.wiring
            .as_ref()
            .is_some_and(|wiring| wiring.gizmo.is_dragging())
    }

    /// Opens the window. Fails when the active pipeline cannot feed look-dev stages.
    pub fn open(
        &mut self,
        displayer: Box<dyn Displayer>,
        scheduler: &mut dyn Scheduler,
    ) -> Result<(), LookDevError> {
        if !self.supported() {
            return Err(LookDevError::unsupported(self.host.pipeline_name()));
        }
        if self.open {
            return Err(LookDevError::AlreadyOpen);
        }
        self.displayer = Some(displayer);
        self.configure_look_dev(scheduler);
        Ok(())
    }

    /// Re-attaches to a window that survived an editor reload, if any.
    pub fn on_editor_reload(
        &mut self,
        displayer: Option<Box<dyn Displayer>>,
        scheduler: &mut dyn Scheduler,
    ) {
        self.teardown_renderer();
        self.startup = None;
        self.context.reload_data_on_scripts_reload(self.assets.as_ref());
        self.displayer = displayer;
        self.open = self.displayer.is_some();
        if self.open {
            self.configure_look_dev(scheduler);
        }
    }

    /// Runs a deferred startup check. Returns `None` when nothing was waiting.
    pub fn tick(&mut self, scheduler: &mut dyn Scheduler) -> Option<RetryStep> {
        if !self.is_waiting_for_pipeline() {
            return None;
        }
        Some(self.poll_startup(scheduler))
    }

    fn configure_look_dev(&mut self, scheduler: &mut dyn Scheduler) {
        self.open = true;
        let path = self.settings.config_path.clone();
        self.load_config(&path);
        self.startup = Some(BoundedRetry::new(self.settings.max_startup_attempts));
        self.poll_startup(scheduler);
    }

    fn poll_startup(&mut self, scheduler: &mut dyn Scheduler) -> RetryStep {
        let supported = self.supported();
        let Some(startup) = self.startup.as_mut() else {
            return RetryStep::Exhausted;
        };
        let attempt = startup.attempt().unwrap_or_default();
        let step = startup.poll(supported);
        match step {
            RetryStep::Ready => {
                self.startup = None;
                self.configure_renderer();
            }
            RetryStep::RetryLater => {
                tracing::debug!("render pipeline not ready (attempt {}), retrying", attempt);
                scheduler.defer();
            }
            RetryStep::Exhausted => {
                tracing::warn!(
                    "render pipeline never became ready after {} attempts, closing look-dev",
                    attempt
                );
                self.startup = None;
                if let Some(mut displayer) = self.displayer.take() {
                    displayer.close();
                }
                self.open = false;
            }
        }
        step
    }

    /// Wires stages, gizmo and compositer to the current pipeline and displayer.
    pub fn configure_renderer(&mut self) -> bool {
        let Some(provider) = self.host.current_provider() else {
            tracing::warn!("cannot configure look-dev renderer without a data provider");
            return false;
        };
        let Some(size) = self.displayer.as_ref().map(|displayer| displayer.surface_size()) else {
            tracing::warn!("cannot configure look-dev renderer without a displayer");
            return false;
        };
        self.teardown_renderer();
        let stages = StageCache::new(Some(provider.as_ref()), &mut self.context);
        let compositer = Compositer::new(size, self.context.layout().view_layout);
        self.wiring = Some(RendererWiring {
            provider,
            stages,
            gizmo: ComparisonGizmo::new(),
            compositer,
        });
        self.configurations += 1;
        tracing::info!(
            "look-dev renderer configured for {}",
            self.host.pipeline_name().as_deref().unwrap_or("unnamed pipeline")
        );
        self.repaint();
        true
    }

    pub fn dispatch(&mut self, event: DisplayerEvent) {
        match event {
            DisplayerEvent::Closed => self.on_closed(),
            DisplayerEvent::ChangingObjectInView {
                object,
                index,
                local_pos,
            } => self.on_changing_object_in_view(object.as_ref(), index, local_pos),
            DisplayerEvent::ChangingEnvironmentInView {
                object,
                index,
                local_pos,
            } => self.on_changing_environment_in_view(object.as_ref(), index, local_pos),
            DisplayerEvent::PointerDown(pos) => {
                self.on_pointer_down(pos);
            }
            DisplayerEvent::PointerMoved(pos) => {
                self.on_pointer_moved(pos);
            }
            DisplayerEvent::PointerUp => {
                self.on_pointer_up();
            }
            DisplayerEvent::Resized(size) => self.on_surface_resized(size),
            DisplayerEvent::LayoutChanged(layout) => self.set_layout(layout),
            DisplayerEvent::ToggleEnvironmentPanel => self.toggle_environment_panel(),
        }
    }

    /// Releases the renderer, persists the context and forgets the window.
    pub fn on_closed(&mut self) {
        self.teardown_renderer();
        let path = self.settings.config_path.clone();
        if let Err(err) = self.save_config(&path) {
            tracing::error!("failed to save look-dev config: {}", err);
        }
        self.open = false;
        self.startup = None;
        self.displayer = None;
    }

    pub fn on_changing_object_in_view(
        &mut self,
        object: Option<&ObjectHandle>,
        index: ViewCompositionIndex,
        local_pos: Vec2,
    ) {
        let view = self.resolve_view(index, local_pos);
        self.context
            .view_content_mut(view)
            .update_viewed_object(object, self.assets.as_ref());
        tracing::debug!(
            "viewed object of {:?} set to {:?}",
            view,
            self.context.view_content(view).viewed_object()
        );
        self.push_scene_changes_to_renderer(view);
    }

    pub fn on_changing_environment_in_view(
        &mut self,
        object: Option<&ObjectHandle>,
        index: ViewCompositionIndex,
        local_pos: Vec2,
    ) {
        let view = self.resolve_view(index, local_pos);
        if !self
            .context
            .view_content_mut(view)
            .update_environment(object, self.assets.as_ref())
        {
            return;
        }
        self.push_scene_changes_to_renderer(view);
    }

    /// Rebuilds the stage of `index` from the context and asks for a repaint.
    pub fn push_scene_changes_to_renderer(&mut self, index: ViewIndex) {
        if let Some(wiring) = self.wiring.as_mut() {
            wiring.stages.update_scene_objects(index, &mut self.context);
            wiring
                .stages
                .update_scene_lighting(index, &self.context, Some(wiring.provider.as_ref()));
            wiring.compositer.mark_dirty(index);
        }
        self.repaint();
    }

    /// Renders dirty views and returns the up-to-date composite.
    pub fn render_frame(&mut self) -> Option<&RenderTexture> {
        let size = self.displayer.as_ref().map(|displayer| displayer.surface_size());
        let wiring = self.wiring.as_mut()?;
        if let Some(size) = size {
            wiring.compositer.resize(size);
        }
        for index in ViewIndex::ALL {
            wiring.stages.sync_camera(index, &self.context);
        }
        wiring
            .compositer
            .render(&self.context, &wiring.stages, self.renderer.as_mut())
    }

    pub fn view_from_composition(&self, local_pos: Vec2) -> ViewIndex {
        match &self.wiring {
            Some(wiring) => wiring
                .compositer
                .view_from_composition(&self.context, local_pos),
            None => ComparisonGizmo::view_from_composition(
                self.context.layout(),
                self.surface_size(),
                local_pos,
            ),
        }
    }

    pub fn set_layout(&mut self, layout: Layout) {
        if self.context.layout().view_layout == layout {
            return;
        }
        tracing::info!("look-dev layout {}", layout.style_name());
        self.context.layout_mut().view_layout = layout;
        if let Some(wiring) = self.wiring.as_mut() {
            wiring.gizmo.on_pointer_up();
            wiring.compositer.mark_all_dirty();
        }
        self.repaint();
    }

    pub fn toggle_environment_panel(&mut self) {
        let layout = self.context.layout_mut();
        layout.show_environment_panel = !layout.show_environment_panel;
        self.repaint();
    }

    pub fn reset_gizmo(&mut self) {
        let Some(wiring) = self.wiring.as_mut() else {
            return;
        };
        wiring.gizmo.reset(self.context.layout_mut());
        wiring.compositer.mark_composite_dirty();
        self.repaint();
    }

    /// Starts a divider drag. Only combined layouts have a divider.
    pub fn on_pointer_down(&mut self, pos: Vec2) -> bool {
        let size = self.surface_size();
        let Some(wiring) = self.wiring.as_mut() else {
            return false;
        };
        if !self.context.layout().is_combined_view() {
            return false;
        }
        wiring.gizmo.on_pointer_down(self.context.layout(), size, pos)
    }

    pub fn on_pointer_moved(&mut self, pos: Vec2) -> bool {
        let size = self.surface_size();
        let Some(wiring) = self.wiring.as_mut() else {
            return false;
        };
        let changed = wiring
            .gizmo
            .on_pointer_move(self.context.layout_mut(), size, pos);
        if changed {
            wiring.compositer.mark_composite_dirty();
            self.repaint();
        }
        changed
    }

    pub fn on_pointer_up(&mut self) -> bool {
        self.wiring
            .as_mut()
            .is_some_and(|wiring| wiring.gizmo.on_pointer_up())
    }

    /// Orbits and zooms the camera of the view under `local_pos`.
    pub fn navigate_camera(&mut self, local_pos: Vec2, orbit: Vec2, zoom: f32) -> ViewIndex {
        let view = self.view_from_composition(local_pos);
        let camera = self.context.camera_state_mut(view);
        camera.orbit(orbit.x, orbit.y);
        camera.zoom(zoom);
        if let Some(wiring) = self.wiring.as_mut() {
            wiring.stages.sync_camera(view, &self.context);
            wiring.compositer.mark_dirty(view);
        }
        self.repaint();
        view
    }

    pub fn on_surface_resized(&mut self, size: SurfaceSize) {
        let resized = self
            .wiring
            .as_mut()
            .is_some_and(|wiring| wiring.compositer.resize(size));
        if resized {
            self.repaint();
        }
    }

    /// Replaces the context with a fresh default one.
    pub fn reset_config(&mut self) {
        self.context = Context::default();
        self.refresh_all_views();
    }

    /// Replaces the context with the one stored at `path`. Returns false if nothing usable was found.
    pub fn load_config(&mut self, path: &Path) -> bool {
        let Some(mut context) = load_config(path) else {
            return false;
        };
        context.reload_data_on_load(self.assets.as_ref());
        self.context = context;
        self.refresh_all_views();
        true
    }

    pub fn save_config(&self, path: &Path) -> Result<(), LookDevError> {
        save_config(path, &self.context)
    }

    fn refresh_all_views(&mut self) {
        if self.wiring.is_none() {
            return;
        }
        for index in ViewIndex::ALL {
            self.push_scene_changes_to_renderer(index);
        }
        if let Some(wiring) = self.wiring.as_mut() {
            wiring.compositer.mark_all_dirty();
        }
    }

    fn resolve_view(&self, index: ViewCompositionIndex, local_pos: Vec2) -> ViewIndex {
        index
            .as_view()
            .unwrap_or_else(|| self.view_from_composition(local_pos))
    }

    fn surface_size(&self) -> SurfaceSize {
        self.displayer
            .as_ref()
            .map(|displayer| displayer.surface_size())
            .or_else(|| self.compositer().map(Compositer::size))
            .unwrap_or_default()
    }

    fn repaint(&mut self) {
        if let Some(displayer) = self.displayer.as_mut() {
            displayer.repaint();
        }
    }

    fn teardown_renderer(&mut self) {
        if let Some(mut wiring) = self.wiring.take() {
            wiring.compositer.dispose();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use lookdev_core::{
        AssetGuid, CustomRenderSettings, MemoryAssetDatabase, StageCamera, ViewedObjectRef,
    };
    use lookdev_scene::{EnvironmentMap, ObjectContent, SceneMesh};
    use render::PreviewRenderer;

    use super::*;
    use crate::displayer::FrameScheduler;

    struct FlatProvider;

    impl DataProvider for FlatProvider {
        fn environment_setup(&self) -> CustomRenderSettings {
            CustomRenderSettings::default()
        }

        fn setup_camera(&self, _camera: &mut StageCamera) {}
    }

    #[derive(Default)]
    struct SwitchHost {
        ready: AtomicBool,
    }

    impl SwitchHost {
        fn ready() -> Arc<Self> {
            let host = Arc::new(Self::default());
            host.ready.store(true, Ordering::Relaxed);
            host
        }
    }

    impl PipelineHost for SwitchHost {
        fn current_provider(&self) -> Option<Arc<dyn DataProvider>> {
            let provider: Arc<dyn DataProvider> = Arc::new(FlatProvider);
            self.ready.load(Ordering::Relaxed).then_some(provider)
        }

        fn pipeline_name(&self) -> Option<String> {
            None
        }
    }

    #[derive(Default)]
    struct WindowLog {
        repaints: Cell<u32>,
        closes: Cell<u32>,
    }

    struct TestWindow {
        size: SurfaceSize,
        log: Rc<WindowLog>,
    }

    impl Displayer for TestWindow {
        fn surface_size(&self) -> SurfaceSize {
            self.size
        }

        fn repaint(&mut self) {
            self.log.repaints.set(self.log.repaints.get() + 1);
        }

        fn close(&mut self) {
            self.log.closes.set(self.log.closes.get() + 1);
        }
    }

    fn window(width: u32, height: u32) -> (Box<dyn Displayer>, Rc<WindowLog>) {
        let log = Rc::new(WindowLog::default());
        let window = TestWindow {
            size: SurfaceSize::new(width, height),
            log: log.clone(),
        };
        (Box::new(window), log)
    }

    fn config_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("lookdev_session_{}_{}", std::process::id(), name))
            .join("LookDevConfig.json")
    }

    fn session(name: &str, host: Arc<SwitchHost>) -> (LookDev, Arc<MemoryAssetDatabase>) {
        let assets = Arc::new(MemoryAssetDatabase::new());
        let settings = SessionSettings {
            config_path: config_path(name),
            ..SessionSettings::default()
        };
        let session = LookDev::new(settings, host, assets.clone(), Box::new(PreviewRenderer::new()));
        (session, assets)
    }

    fn cleanup(name: &str) {
        let _ = std::fs::remove_dir_all(config_path(name).parent().unwrap());
    }

    fn cube(assets: &MemoryAssetDatabase, path: &str) -> ObjectHandle {
        let mesh = SceneMesh::unit_cube([1.0, 0.5, 0.0]);
        assets.import_asset(path, "Cube", ObjectContent::Mesh(mesh))
    }

    #[test]
    fn open_fails_loudly_without_pipeline() {
        let (mut session, _) = session("unsupported", Arc::new(SwitchHost::default()));
        let (window, _) = window(64, 64);
        let err = session.open(window, &mut FrameScheduler::new()).unwrap_err();
        assert!(matches!(err, LookDevError::Unsupported { .. }));
        assert!(err.to_string().contains("No render pipeline in use"));
        assert!(!session.is_open());
        assert!(session.current_displayer().is_none());
    }

    #[test]
    fn open_twice_is_rejected() {
        let (mut session, _) = session("twice", SwitchHost::ready());
        let mut scheduler = FrameScheduler::new();
        session.open(window(32, 32).0, &mut scheduler).unwrap();
        let err = session.open(window(32, 32).0, &mut scheduler).unwrap_err();
        assert!(matches!(err, LookDevError::AlreadyOpen));
        assert_eq!(session.configurations(), 1);
        cleanup("twice");
    }

    #[test]
    fn startup_configures_once_when_pipeline_arrives_within_budget() {
        for ready_at in 0..=MAX_STARTUP_ATTEMPTS {
            let host = Arc::new(SwitchHost::default());
            let (mut session, _) = session("retry_ok", host.clone());
            let mut scheduler = FrameScheduler::new();
            let (window, log) = window(64, 64);
            if ready_at == 0 {
                host.ready.store(true, Ordering::Relaxed);
            }
            session.on_editor_reload(Some(window), &mut scheduler);
            let mut attempt = 0;
            while scheduler.take_one() {
                attempt += 1;
                if attempt == ready_at {
                    host.ready.store(true, Ordering::Relaxed);
                }
                session.tick(&mut scheduler);
            }
            assert_eq!(session.configurations(), 1, "ready at attempt {ready_at}");
            assert!(session.is_renderer_configured());
            assert!(session.is_open());
            assert_eq!(log.closes.get(), 0);
            assert_eq!(session.tick(&mut scheduler), None);
        }
        cleanup("retry_ok");
    }

    #[test]
    fn startup_closes_window_when_pipeline_never_arrives() {
        let (mut session, _) = session("retry_exhausted", Arc::new(SwitchHost::default()));
        let mut scheduler = FrameScheduler::new();
        let (window, log) = window(64, 64);
        session.on_editor_reload(Some(window), &mut scheduler);
        let mut steps = Vec::new();
        while scheduler.take_one() {
            steps.extend(session.tick(&mut scheduler));
        }
        assert_eq!(steps.len(), MAX_STARTUP_ATTEMPTS as usize);
        assert_eq!(steps.last(), Some(&RetryStep::Exhausted));
        assert_eq!(log.closes.get(), 1);
        assert_eq!(session.configurations(), 0);
        assert!(!session.is_open());
        assert!(session.compositer().is_none());
    }

    #[test]
    fn reload_without_window_stays_closed() {
        let (mut session, _) = session("reload_none", SwitchHost::ready());
        let mut scheduler = FrameScheduler::new();
        session.on_editor_reload(None, &mut scheduler);
        assert!(!session.is_open());
        assert!(!scheduler.has_pending());
        assert_eq!(session.configurations(), 0);
    }

    #[test]
    fn dropping_object_into_first_renders_first_only() {
        let (mut session, assets) = session("drop_first", SwitchHost::ready());
        assert_eq!(session.context().layout().view_layout, Layout::FullFirstView);
        assert_eq!(
            session.context().view_content(ViewIndex::First).viewed_object(),
            ViewedObjectRef::None
        );
        let (window, log) = window(64, 48);
        session.open(window, &mut FrameScheduler::new()).unwrap();
        session.render_frame();

        let object = cube(&assets, "Assets/A.mesh");
        session.dispatch(DisplayerEvent::ChangingObjectInView {
            object: Some(object.clone()),
            index: ViewCompositionIndex::First,
            local_pos: Vec2::ZERO,
        });
        let reference = session
            .context()
            .view_content(ViewIndex::First)
            .viewed_object_reference()
            .unwrap();
        assert!(Arc::ptr_eq(reference, &object));
        assert!(log.repaints.get() >= 2);

        assert!(session.render_frame().is_some());
        assert_eq!(session.compositer().unwrap().rendered_views(), &[ViewIndex::First]);
        cleanup("drop_first");
    }

    #[test]
    fn drop_into_split_view_marks_only_that_view() {
        let (mut session, assets) = session("drop_split", SwitchHost::ready());
        session.open(window(64, 48).0, &mut FrameScheduler::new()).unwrap();
        session.set_layout(Layout::HorizontalSplit);
        session.render_frame();
        assert_eq!(
            session.compositer().unwrap().rendered_views(),
            &[ViewIndex::First, ViewIndex::Second]
        );

        let object = cube(&assets, "Assets/B.mesh");
        session.on_changing_object_in_view(Some(&object), ViewCompositionIndex::Second, Vec2::ZERO);
        session.render_frame();
        assert_eq!(session.compositer().unwrap().rendered_views(), &[ViewIndex::Second]);
        let stage = session.stages().unwrap().stage(ViewIndex::Second);
        assert!(stage.objects().iter().any(|o| o.source == Some(object.id)));
        cleanup("drop_split");
    }

    #[test]
    fn composite_drop_resolves_through_divider() {
        let (mut session, assets) = session("composite", SwitchHost::ready());
        session.open(window(200, 100).0, &mut FrameScheduler::new()).unwrap();
        session.set_layout(Layout::CustomSplit);
        assert_eq!(session.view_from_composition(Vec2::new(50.0, 50.0)), ViewIndex::First);
        assert_eq!(session.view_from_composition(Vec2::new(150.0, 50.0)), ViewIndex::Second);

        let left = cube(&assets, "Assets/Left.mesh");
        let right = cube(&assets, "Assets/Right.mesh");
        let composite = ViewCompositionIndex::Composite;
        session.on_changing_object_in_view(Some(&left), composite, Vec2::new(50.0, 50.0));
        session.on_changing_object_in_view(Some(&right), composite, Vec2::new(150.0, 50.0));
        let first = session.context().view_content(ViewIndex::First);
        let second = session.context().view_content(ViewIndex::Second);
        assert_eq!(
            first.viewed_object(),
            ViewedObjectRef::Asset(AssetGuid::from_path("Assets/Left.mesh"))
        );
        assert_eq!(
            second.viewed_object(),
            ViewedObjectRef::Asset(AssetGuid::from_path("Assets/Right.mesh"))
        );
        cleanup("composite");
    }

    #[test]
    fn environment_drop_mirrors_object_drop() {
        let (mut session, assets) = session("environment", SwitchHost::ready());
        session.open(window(100, 100).0, &mut FrameScheduler::new()).unwrap();
        session.set_layout(Layout::VerticalSplit);
        let night = assets.import_asset(
            "Assets/Night.hdr",
            "Night",
            ObjectContent::Environment(EnvironmentMap {
                sky_color: [0.0, 0.0, 0.5],
                ground_color: [0.0; 3],
                intensity: 1.0,
            }),
        );
        session.dispatch(DisplayerEvent::ChangingEnvironmentInView {
            object: Some(night.clone()),
            index: ViewCompositionIndex::Composite,
            local_pos: Vec2::new(50.0, 90.0),
        });
        let stage = session.stages().unwrap().stage(ViewIndex::Second);
        assert_eq!(stage.lighting().sky_color(), [0.0, 0.0, 0.5]);
        let first = session.context().view_content(ViewIndex::First);
        assert!(first.environment_reference().is_none());

        let mesh = cube(&assets, "Assets/NotAnEnv.mesh");
        session.on_changing_environment_in_view(Some(&mesh), ViewCompositionIndex::Second, Vec2::ZERO);
        let second = session.context().view_content(ViewIndex::Second);
        assert!(Arc::ptr_eq(second.environment_reference().unwrap(), &night));
        cleanup("environment");
    }

    #[test]
    fn closing_saves_config_and_releases_renderer() {
        let name = "close";
        let (mut session, assets) = session(name, SwitchHost::ready());
        session.open(window(80, 60).0, &mut FrameScheduler::new()).unwrap();
        session.set_layout(Layout::CustomCircular);
        let chair = cube(&assets, "Assets/Chair.fbx");
        let lamp = assets.spawn_in_scene("Main", "Lamp", ObjectContent::Empty);
        session.on_changing_object_in_view(Some(&chair), ViewCompositionIndex::First, Vec2::ZERO);
        session.on_changing_object_in_view(Some(&lamp), ViewCompositionIndex::Second, Vec2::ZERO);
        session.dispatch(DisplayerEvent::Closed);

        assert!(!session.is_open());
        assert!(session.compositer().is_none());
        assert!(session.current_displayer().is_none());

        let saved = load_config(&config_path(name)).unwrap();
        assert_eq!(saved.layout().view_layout, Layout::CustomCircular);
        assert_eq!(
            saved.view_content(ViewIndex::Second).viewed_object(),
            ViewedObjectRef::Scene(lamp.id)
        );

        let settings = SessionSettings {
            config_path: config_path(name),
            ..SessionSettings::default()
        };
        let reopened = LookDev::new(
            settings,
            SwitchHost::ready(),
            assets.clone(),
            Box::new(PreviewRenderer::new()),
        );
        assert_eq!(reopened.context().layout().view_layout, Layout::CustomCircular);
        let first = reopened.context().view_content(ViewIndex::First);
        assert_eq!(first.viewed_object_reference().unwrap().id, chair.id);
        // scene instance ids are not trusted across a cold load
        let second = reopened.context().view_content(ViewIndex::Second);
        assert_eq!(second.viewed_object(), ViewedObjectRef::None);
        assert!(second.viewed_object_reference().is_none());
        cleanup(name);
    }

    #[test]
    fn gizmo_drag_moves_divider_and_recomposites() {
        let (mut session, _) = session("gizmo", SwitchHost::ready());
        session.open(window(200, 100).0, &mut FrameScheduler::new()).unwrap();
        assert!(!session.on_pointer_down(Vec2::new(100.0, 50.0)));
        session.set_layout(Layout::CustomSplit);
        session.render_frame();
        assert!(session.on_pointer_down(Vec2::new(100.0, 50.0)));
        assert!(session.is_gizmo_dragging());
        assert!(session.on_pointer_moved(Vec2::new(150.0, 50.0)));
        assert!(session.on_pointer_up());
        assert_eq!(session.view_from_composition(Vec2::new(120.0, 50.0)), ViewIndex::First);
        session.render_frame();
        assert!(session.compositer().unwrap().rendered_views().is_empty());

        session.reset_gizmo();
        assert_eq!(session.view_from_composition(Vec2::new(120.0, 50.0)), ViewIndex::Second);
        cleanup("gizmo");
    }

    #[test]
    fn reset_and_load_config_replace_context() {
        let name = "reload_config";
        let (mut session, _) = session(name, SwitchHost::ready());
        session.open(window(40, 40).0, &mut FrameScheduler::new()).unwrap();
        session.set_layout(Layout::VerticalSplit);
        let path = config_path(name);
        session.save_config(&path).unwrap();

        session.reset_config();
        assert_eq!(session.context().layout().view_layout, Layout::FullFirstView);
        assert!(session.load_config(&path));
        assert_eq!(session.context().layout().view_layout, Layout::VerticalSplit);
        assert!(!session.load_config(&config_path("reload_config_missing")));
        assert_eq!(session.context().layout().view_layout, Layout::VerticalSplit);
        cleanup(name);
    }

    #[test]
    fn navigation_moves_only_the_camera_under_the_pointer() {
        let (mut session, _) = session("navigate", SwitchHost::ready());
        session.open(window(100, 50).0, &mut FrameScheduler::new()).unwrap();
        session.set_layout(Layout::HorizontalSplit);
        session.render_frame();
        let view = session.navigate_camera(Vec2::new(80.0, 20.0), Vec2::new(0.25, 0.0), 1.0);
        assert_eq!(view, ViewIndex::Second);
        let yaw = std::f32::consts::FRAC_PI_2;
        assert_eq!(session.context().camera_state(ViewIndex::First).yaw, yaw);
        assert_eq!(session.context().camera_state(ViewIndex::Second).yaw, yaw + 0.25);
        session.render_frame();
        assert_eq!(session.compositer().unwrap().rendered_views(), &[ViewIndex::Second]);
        cleanup("navigate");
    }

    #[test]
    fn resize_reallocates_compositer() {
        let (mut session, _) = session("resize", SwitchHost::ready());
        session.open(window(40, 40).0, &mut FrameScheduler::new()).unwrap();
        session.dispatch(DisplayerEvent::Resized(SurfaceSize::new(10, 20)));
        assert_eq!(session.compositer().unwrap().size(), SurfaceSize::new(10, 20));
        cleanup("resize");
    }
}
