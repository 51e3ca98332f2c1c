/// Graphics device module - textures, shared textures and the render queue

pub mod graphics_device;
pub mod texture;
pub mod render_queue;

pub use graphics_device::*;
pub use texture::*;
pub use render_queue::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
