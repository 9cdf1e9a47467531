use glam::Vec2;
use lookdev_core::{Layout, Scheduler, SurfaceSize, ViewCompositionIndex};
use lookdev_scene::ObjectHandle;

/// Window surface that shows the composite.
pub trait Displayer {
    fn surface_size(&self) -> SurfaceSize;

    fn repaint(&mut self);

    /// Asks the window to close. The session is told through [`DisplayerEvent::Closed`].
    fn close(&mut self);
}

#[derive(Debug, Clone)]
pub enum DisplayerEvent {
    Closed,
    ChangingObjectInView {
        object: Option<ObjectHandle>,
        index: ViewCompositionIndex,
        local_pos: Vec2,
    },
    ChangingEnvironmentInView {
        object: Option<ObjectHandle>,
        index: ViewCompositionIndex,
        local_pos: Vec2,
    },
    PointerDown(Vec2),
    PointerMoved(Vec2),
    PointerUp,
    Resized(SurfaceSize),
    LayoutChanged(Layout),
    ToggleEnvironmentPanel,
}

/// Counts deferred polls; the event loop drains one per frame.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    pending: u32,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_pending(&self) -> bool {
        self.pending > 0
    }

    pub fn take_one(&mut self) -> bool {
        if self.pending == 0 {
            return false;
        }
        self.pending -= 1;
        true
    }
}

impl Scheduler for FrameScheduler {
    fn defer(&mut self) {
        self.pending += 1;
    }
}

/// Displayer without a window, used by headless runs.
#[derive(Debug, Clone)]
pub struct OffscreenDisplayer {
    size: SurfaceSize,
    repaints: u32,
    closed: bool,
}

impl OffscreenDisplayer {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size: size.clamped(),
            repaints: 0,
            closed: false,
        }
    }
}

impl Displayer for OffscreenDisplayer {
    fn surface_size(&self) -> SurfaceSize {
        self.size
    }

    fn repaint(&mut self) {
        self.repaints += 1;
    }

    fn close(&mut self) {
        self.closed = true;
        tracing::debug!("offscreen displayer closed after {} repaints", self.repaints);
    }
}
