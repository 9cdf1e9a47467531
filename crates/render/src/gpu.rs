use egui_wgpu::wgpu;
use lookdev_core::SurfaceSize;

use crate::texture::RenderTexture;

const COMPOSITE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// GPU copy of the composite, registered with egui so the displayer can draw it.
pub struct GpuCompositeTarget {
    texture: wgpu::Texture,
    texture_id: egui::TextureId,
    size: SurfaceSize,
}

impl GpuCompositeTarget {
    pub fn new(device: &wgpu::Device, renderer: &mut egui_wgpu::Renderer, size: SurfaceSize) -> Self {
        let size = size.clamped();
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("lookdev_composite"),
            size: extent(size),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: COMPOSITE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let texture_id = renderer.register_native_texture(device, &view, wgpu::FilterMode::Linear);
        tracing::debug!("gpu composite target {}x{}", size.width, size.height);
        Self {
            texture,
            texture_id,
            size,
        }
    }

    pub fn texture_id(&self) -> egui::TextureId {
        self.texture_id
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Copies the CPU composite into the GPU texture. Mismatched sizes are skipped.
    pub fn upload(&self, queue: &wgpu::Queue, composite: &RenderTexture) -> bool {
        if composite.size() != self.size {
            tracing::warn!(
                "composite {:?} does not match gpu target {:?}",
                composite.size(),
                self.size
            );
            return false;
        }
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            composite.as_bytes(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * self.size.width),
                rows_per_image: Some(self.size.height),
            },
            extent(self.size),
        );
        true
    }

    /// Unregisters the texture from egui and destroys it.
    pub fn release(self, renderer: &mut egui_wgpu::Renderer) {
        renderer.free_texture(&self.texture_id);
        self.texture.destroy();
        tracing::debug!("gpu composite target released");
    }
}

/// Keeps `slot` matching the composite size, then uploads it.
pub fn sync_composite_target(
    slot: &mut Option<GpuCompositeTarget>,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    renderer: &mut egui_wgpu::Renderer,
    composite: &RenderTexture,
) -> egui::TextureId {
    if slot
        .as_ref()
        .is_some_and(|target| target.size() != composite.size())
    {
        if let Some(old) = slot.take() {
            old.release(renderer);
        }
    }
    let target = slot.get_or_insert_with(|| GpuCompositeTarget::new(device, renderer, composite.size()));
    target.upload(queue, composite);
    target.texture_id()
}

fn extent(size: SurfaceSize) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: size.width,
        height: size.height,
        depth_or_array_layers: 1,
    }
}
