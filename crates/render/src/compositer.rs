use glam::Vec2;
use lookdev_core::{ComparisonGizmo, Context, Layout, LayoutContext, StageCache, SurfaceSize, ViewIndex};

use crate::layout::view_viewport;
use crate::renderer::StageRenderer;
use crate::texture::RenderTexture;

/// Renders the two stages into per-view targets and combines them into the displayed image.
pub struct Compositer {
    size: SurfaceSize,
    layout: Layout,
    view_targets: [Option<RenderTexture>; 2],
    composite: Option<RenderTexture>,
    dirty: [bool; 2],
    composite_dirty: bool,
    rendered_views: Vec<ViewIndex>,
    disposed: bool,
}

impl Compositer {
    pub fn new(size: SurfaceSize, layout: Layout) -> Self {
        let mut compositer = Self {
            size: size.clamped(),
            layout,
            view_targets: [None, None],
            composite: None,
            dirty: [true, true],
            composite_dirty: true,
            rendered_views: Vec::new(),
            disposed: false,
        };
        compositer.allocate_targets();
        compositer
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Reallocates the targets when the displayer surface changed size. Returns whether it did.
    pub fn resize(&mut self, size: SurfaceSize) -> bool {
        let size = size.clamped();
        if self.disposed || size == self.size {
            return false;
        }
        tracing::debug!("compositer resize {:?} -> {:?}", self.size, size);
        self.size = size;
        self.release_targets();
        self.allocate_targets();
        self.mark_all_dirty();
        true
    }

    pub fn relayout(&mut self, layout: Layout) -> bool {
        if self.disposed || layout == self.layout {
            return false;
        }
        self.layout = layout;
        self.release_targets();
        self.allocate_targets();
        self.mark_all_dirty();
        true
    }

    pub fn mark_dirty(&mut self, index: ViewIndex) {
        self.dirty[index as usize] = true;
    }

    pub fn mark_all_dirty(&mut self) {
        self.dirty = [true, true];
        self.composite_dirty = true;
    }

    pub fn mark_composite_dirty(&mut self) {
        self.composite_dirty = true;
    }

    pub fn is_dirty(&self, index: ViewIndex) -> bool {
        self.dirty[index as usize]
    }

    /// Views rendered by the last call to [`Compositer::render`].
    pub fn rendered_views(&self) -> &[ViewIndex] {
        &self.rendered_views
    }

    pub fn live_targets(&self) -> usize {
        self.view_targets.iter().flatten().count() + usize::from(self.composite.is_some())
    }

    pub fn view_target(&self, index: ViewIndex) -> Option<&RenderTexture> {
        self.view_targets[index as usize].as_ref()
    }

    pub fn composite(&self) -> Option<&RenderTexture> {
        self.composite.as_ref()
    }

    pub fn view_from_composition(&self, context: &Context, local_pos: Vec2) -> ViewIndex {
        ComparisonGizmo::view_from_composition(context.layout(), self.size, local_pos)
    }

    /// Renders dirty active views and rebuilds the composite if anything changed.
    pub fn render(
        &mut self,
        context: &Context,
        stages: &StageCache,
        renderer: &mut dyn StageRenderer,
    ) -> Option<&RenderTexture> {
        if self.disposed {
            return None;
        }
        self.relayout(context.layout().view_layout);
        self.rendered_views.clear();
        for &index in self.layout.active_views() {
            if !self.dirty[index as usize] {
                continue;
            }
            let Some(target) = self.view_targets[index as usize].as_mut() else {
                continue;
            };
            renderer.render(stages.stage(index), context.camera_state(index), target);
            self.dirty[index as usize] = false;
            self.rendered_views.push(index);
            self.composite_dirty = true;
        }
        if self.composite_dirty {
            self.compose(context.layout());
            self.composite_dirty = false;
        }
        self.composite.as_ref()
    }

    /// Releases every target. The compositer renders nothing afterwards.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.release_targets();
        self.disposed = true;
        tracing::debug!("compositer disposed");
    }

    fn allocate_targets(&mut self) {
        for index in ViewIndex::ALL {
            self.view_targets[index as usize] = view_viewport(self.layout, self.size, index)
                .map(|rect| RenderTexture::new(format!("lookdev_view_{:?}", index), rect.size()));
        }
        self.composite = Some(RenderTexture::new("lookdev_composite", self.size));
    }

    fn release_targets(&mut self) {
        for target in &mut self.view_targets {
            if let Some(target) = target.take() {
                tracing::trace!("released {}", target.label());
            }
        }
        self.composite = None;
    }

    fn compose(&mut self, layout: &LayoutContext) {
        let Some(composite) = self.composite.as_mut() else {
            return;
        };
        if layout.is_combined_view() {
            let (Some(first), Some(second)) = (&self.view_targets[0], &self.view_targets[1]) else {
                return;
            };
            for y in 0..self.size.height {
                for x in 0..self.size.width {
                    let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                    let source = match ComparisonGizmo::view_from_composition(layout, self.size, center) {
                        ViewIndex::First => first,
                        ViewIndex::Second => second,
                    };
                    if let Some(pixel) = source.pixel(x, y) {
                        composite.set_pixel(x, y, pixel);
                    }
                }
            }
            return;
        }
        for index in ViewIndex::ALL {
            let (Some(target), Some(rect)) = (
                &self.view_targets[index as usize],
                view_viewport(self.layout, self.size, index),
            ) else {
                continue;
            };
            target.blit_into(composite, rect.x, rect.y);
        }
    }
}
