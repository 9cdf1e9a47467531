use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use eframe::egui;
use lookdev_app::{DemoLibrary, Displayer, FrameScheduler, LookDev, PreviewPipeline, SessionSettings};
use lookdev_core::{MemoryAssetDatabase, SurfaceSize};
use render::{GpuCompositeTarget, PreviewRenderer};
use tracing_subscriber::filter::LevelFilter;

mod io;
mod logging;
mod ui;
mod viewport;

pub(crate) use logging::{ConsoleBuffer, LogLevelHandle};

/// Frames the preview pipeline needs before it can provide data.
const PIPELINE_WARMUP_FRAMES: u32 = 3;

pub(crate) fn setup_tracing() -> (ConsoleBuffer, LogLevelHandle) {
    logging::setup_tracing()
}

/// State the central panel shares with the session's displayer.
#[derive(Default)]
struct WindowShared {
    size: Cell<SurfaceSize>,
    closed: Cell<bool>,
}

/// The central panel acting as the look-dev display window.
struct PanelDisplayer {
    ctx: egui::Context,
    shared: Rc<WindowShared>,
}

impl Displayer for PanelDisplayer {
    fn surface_size(&self) -> SurfaceSize {
        self.shared.size.get()
    }

    fn repaint(&mut self) {
        self.ctx.request_repaint();
    }

    fn close(&mut self) {
        self.shared.closed.set(true);
        self.ctx.request_repaint();
    }
}

/// Library entry dragged onto the composite.
#[derive(Clone)]
struct LibraryPayload {
    object: lookdev_scene::ObjectHandle,
    environment: bool,
}

pub(crate) struct LookDevApp {
    session: LookDev,
    pipeline: Arc<PreviewPipeline>,
    library: DemoLibrary,
    scheduler: FrameScheduler,
    window: Rc<WindowShared>,
    gpu_target: Option<GpuCompositeTarget>,
    console: ConsoleBuffer,
    log_level: LogLevelHandle,
    show_console: bool,
    status: Option<String>,
}

impl LookDevApp {
    pub(crate) fn new(ctx: &egui::Context, console: ConsoleBuffer, log_level: LogLevelHandle) -> Self {
        let assets = Arc::new(MemoryAssetDatabase::new());
        let library = DemoLibrary::populate(&assets);
        let pipeline = Arc::new(PreviewPipeline::new(PIPELINE_WARMUP_FRAMES));
        let session = LookDev::new(
            SessionSettings::default(),
            pipeline.clone(),
            assets,
            Box::new(PreviewRenderer::new()),
        );
        let mut app = Self {
            session,
            pipeline,
            library,
            scheduler: FrameScheduler::new(),
            window: Rc::new(WindowShared::default()),
            gpu_target: None,
            console,
            log_level,
            show_console: false,
            status: None,
        };
        // the window is already up, so start the way an editor reload would
        let displayer = app.new_displayer(ctx);
        app.session
            .on_editor_reload(Some(displayer), &mut app.scheduler);
        app
    }

    fn new_displayer(&mut self, ctx: &egui::Context) -> Box<dyn Displayer> {
        let size = self.window.size.get();
        self.window = Rc::new(WindowShared::default());
        self.window.size.set(size);
        Box::new(PanelDisplayer {
            ctx: ctx.clone(),
            shared: self.window.clone(),
        })
    }

    fn open_look_dev(&mut self, ctx: &egui::Context) {
        let displayer = self.new_displayer(ctx);
        match self.session.open(displayer, &mut self.scheduler) {
            Ok(()) => self.status = None,
            Err(err) => {
                tracing::error!("{}", err);
                self.status = Some(err.to_string());
            }
        }
    }

    /// Advances the pipeline warm-up and runs any deferred startup check.
    fn pump_startup(&mut self, ctx: &egui::Context) {
        if !self.pipeline.is_ready() {
            self.pipeline.advance();
            ctx.request_repaint();
        }
        if self.scheduler.take_one() {
            self.session.tick(&mut self.scheduler);
            ctx.request_repaint();
        }
        if self.window.closed.get() && self.status.is_none() {
            self.status = Some("LookDev closed: the render pipeline never became ready".to_string());
        }
    }

    fn set_log_level(&mut self, level: LevelFilter) {
        if level != self.log_level.get() {
            self.log_level.set(level);
            tracing::info!("log level set to {:?}", level);
        }
    }

    fn release_gpu_target(&mut self, frame: &eframe::Frame) {
        let (Some(target), Some(render_state)) = (self.gpu_target.take(), frame.wgpu_render_state())
        else {
            return;
        };
        target.release(&mut render_state.renderer.write());
    }
}
