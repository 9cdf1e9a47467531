use glam::{Vec3, Vec4Swizzles};
use lookdev_core::{CameraState, Stage};

use crate::layout::PixelRect;
use crate::texture::{RenderTexture, Rgba8};

/// Renders one stage into a colour target. Supplied by the render pipeline.
pub trait StageRenderer {
    fn render(&mut self, stage: &Stage, camera: &CameraState, target: &mut RenderTexture);
}

/// Flat preview: clears to the stage sky and marks the screen bounds of each mesh.
#[derive(Debug, Default)]
pub struct PreviewRenderer {
    frames: u64,
}

impl PreviewRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl StageRenderer for PreviewRenderer {
    fn render(&mut self, stage: &Stage, camera: &CameraState, target: &mut RenderTexture) {
        self.frames += 1;
        let exposure = stage.camera().exposure.max(0.0);
        let sky = stage.lighting().sky_color().map(|c| c * exposure);
        target.fill(Rgba8::from_linear(sky));

        let ambient = stage.lighting().ambient_color();
        let view_proj = camera.view_proj(target.size().aspect());
        for object in stage.objects() {
            let Some(mesh) = object.mesh() else {
                continue;
            };
            let Some((min, max)) = mesh.bounds() else {
                continue;
            };
            let Some(rect) = project_bounds(view_proj, min, max, target.bounds()) else {
                continue;
            };
            let base = mesh.base_color();
            let tint = [0, 1, 2].map(|i| base[i] * (0.35 + 0.65 * ambient[i]) * exposure);
            target.fill_rect(rect, Rgba8::from_linear(tint));
        }
        tracing::trace!("{}: preview frame {}", stage.name(), self.frames);
    }
}

fn project_bounds(view_proj: glam::Mat4, min: Vec3, max: Vec3, viewport: PixelRect) -> Option<PixelRect> {
    let mut lo = glam::Vec2::splat(f32::INFINITY);
    let mut hi = glam::Vec2::splat(f32::NEG_INFINITY);
    for corner in 0..8 {
        let point = Vec3::new(
            if corner & 1 == 0 { min.x } else { max.x },
            if corner & 2 == 0 { min.y } else { max.y },
            if corner & 4 == 0 { min.z } else { max.z },
        );
        let clip = view_proj * point.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = clip.xy() / clip.w;
        let screen = glam::Vec2::new(
            (ndc.x * 0.5 + 0.5) * viewport.width as f32,
            (0.5 - ndc.y * 0.5) * viewport.height as f32,
        );
        lo = lo.min(screen);
        hi = hi.max(screen);
    }
    let lo = lo.max(glam::Vec2::ZERO);
    let hi = hi.min(glam::Vec2::new(viewport.width as f32, viewport.height as f32));
    if hi.x <= lo.x || hi.y <= lo.y {
        return None;
    }
    let x = lo.x.floor() as u32;
    let y = lo.y.floor() as u32;
    PixelRect {
        x,
        y,
        width: (hi.x.ceil() as u32).saturating_sub(x),
        height: (hi.y.ceil() as u32).saturating_sub(y),
    }
    .intersect(viewport)
}
