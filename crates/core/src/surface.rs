use glam::Vec2;

/// Pixel size of the displayer surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Same size with both sides at least one pixel.
    pub fn clamped(self) -> Self {
        Self {
            width: self.width.max(1),
            height: self.height.max(1),
        }
    }

    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    pub fn aspect(self) -> f32 {
        let size = self.clamped();
        size.width as f32 / size.height as f32
    }

    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }
}
