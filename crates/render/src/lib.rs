mod compositer;
mod gpu;
mod layout;
mod renderer;
mod texture;

pub use compositer::Compositer;
pub use gpu::{sync_composite_target, GpuCompositeTarget};
pub use layout::{view_viewport, PixelRect};
pub use lookdev_core::SurfaceSize;
pub use renderer::{PreviewRenderer, StageRenderer};
pub use texture::{RenderTexture, Rgba8};
