/// GraphicsDevice trait and shared texture types

use std::fmt;
use std::sync::{Arc, Mutex};
use crate::error::Result;
use super::texture::{Texture, TextureFormat, TextureUsage};

/// Cross-process handle other programs use to open a shared texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SharedHandle(pub u64);

impl fmt::Display for SharedHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Descriptor for creating a shared texture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedTextureDesc {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Concrete pixel format (never typeless)
    pub format: TextureFormat,
    /// Usage flags; `SHARED | COPY_DST` at minimum
    pub usage: TextureUsage,
}

impl SharedTextureDesc {
    /// Descriptor for a copy destination matching `width` x `height` x `format`
    pub fn copy_destination(width: u32, height: u32, format: TextureFormat) -> Self {
        Self {
            width,
            height,
            format: format.to_renderable(),
            usage: TextureUsage::SHARED | TextureUsage::COPY_DST | TextureUsage::SAMPLED,
        }
    }
}

/// A device texture together with its cross-process handle
///
/// Dropping the last `Arc` of `texture` releases the GPU resource and
/// invalidates `handle`.
#[derive(Clone)]
pub struct SharedTexture {
    pub texture: Arc<dyn Texture>,
    pub handle: SharedHandle,
}

impl fmt::Debug for SharedTexture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedTexture")
            .field("info", self.texture.info())
            .field("handle", &self.handle)
            .finish()
    }
}

/// GPU device capability used by the frame publisher
///
/// A thin seam over the platform device and its shared-texture transport.
/// Calls happen either on the tick thread (immediate queue) or on the
/// render thread, never on both at once: the device is always accessed
/// through a `DeviceHandle`.
pub trait GraphicsDevice: Send {
    /// Create a texture other processes can open through the returned handle
    fn create_shared_texture(&mut self, desc: &SharedTextureDesc) -> Result<SharedTexture>;

    /// Record a full-resource copy `src` → `dst`
    ///
    /// Both textures must have the same dimensions and compatible formats.
    fn copy_texture(&mut self, dst: &dyn Texture, src: &dyn Texture) -> Result<()>;

    /// Submit recorded work to the GPU queue
    fn flush(&mut self) -> Result<()>;
}

/// Device shared between the tick thread and the render thread
pub type DeviceHandle = Arc<Mutex<dyn GraphicsDevice>>;
