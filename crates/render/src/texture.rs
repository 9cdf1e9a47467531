use bytemuck::{Pod, Zeroable};
use lookdev_core::SurfaceSize;

use crate::layout::PixelRect;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct Rgba8(pub [u8; 4]);

impl Rgba8 {
    pub const BLACK: Rgba8 = Rgba8([0, 0, 0, 255]);

    pub fn from_linear(color: [f32; 3]) -> Self {
        let [r, g, b] = color.map(|c| (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u8);
        Rgba8([r, g, b, 255])
    }
}

/// CPU colour target owned by the compositer.
#[derive(Debug, Clone)]
pub struct RenderTexture {
    label: String,
    size: SurfaceSize,
    pixels: Vec<Rgba8>,
}

impl RenderTexture {
    pub fn new(label: impl Into<String>, size: SurfaceSize) -> Self {
        let size = size.clamped();
        Self {
            label: label.into(),
            size,
            pixels: vec![Rgba8::BLACK; size.pixel_count()],
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn fill(&mut self, color: Rgba8) {
        self.pixels.fill(color);
    }

    pub fn fill_rect(&mut self, rect: PixelRect, color: Rgba8) {
        let Some(rect) = rect.intersect(self.bounds()) else {
            return;
        };
        for y in rect.y..rect.y + rect.height {
            let start = self.index(rect.x, y);
            self.pixels[start..start + rect.width as usize].fill(color);
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        (x < self.size.width && y < self.size.height).then(|| self.pixels[self.index(x, y)])
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba8) {
        if x < self.size.width && y < self.size.height {
            let index = self.index(x, y);
            self.pixels[index] = color;
        }
    }

    /// Copies the whole texture into `dst` with its top-left corner at `(x, y)`, clipping at the edges.
    pub fn blit_into(&self, dst: &mut RenderTexture, x: u32, y: u32) {
        let area = PixelRect {
            x,
            y,
            width: self.size.width,
            height: self.size.height,
        };
        let Some(area) = area.intersect(dst.bounds()) else {
            return;
        };
        for row in 0..area.height {
            let src = self.index(0, row);
            let dst_start = dst.index(area.x, area.y + row);
            dst.pixels[dst_start..dst_start + area.width as usize]
                .copy_from_slice(&self.pixels[src..src + area.width as usize]);
        }
    }

    pub fn bounds(&self) -> PixelRect {
        PixelRect {
            x: 0,
            y: 0,
            width: self.size.width,
            height: self.size.height,
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.size.width as usize + x as usize
    }
}
