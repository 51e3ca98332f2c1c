/// Texture trait, texture formats and texture info

use bitflags::bitflags;

/// Pixel format of a capture or shared texture
///
/// `*_TYPELESS` formats only describe memory layout. They can back a render
/// target but a shared texture needs a concrete, renderable format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    // 8-bit
    R8G8B8A8_TYPELESS,
    R8G8B8A8_UNORM,
    R8G8B8A8_SRGB,
    B8G8R8A8_TYPELESS,
    B8G8R8A8_UNORM,
    B8G8R8A8_SRGB,

    // 10-bit
    R10G10B10A2_TYPELESS,
    R10G10B10A2_UNORM,

    // Float
    R16G16B16A16_TYPELESS,
    R16G16B16A16_FLOAT,
    R32G32B32A32_FLOAT,
}

impl TextureFormat {
    /// True for layout-only formats
    pub fn is_typeless(self) -> bool {
        matches!(
            self,
            TextureFormat::R8G8B8A8_TYPELESS
                | TextureFormat::B8G8R8A8_TYPELESS
                | TextureFormat::R10G10B10A2_TYPELESS
                | TextureFormat::R16G16B16A16_TYPELESS
        )
    }

    /// Concrete format a shared copy of this format must use
    ///
    /// Already-renderable formats map to themselves.
    pub fn to_renderable(self) -> TextureFormat {
        match self {
            TextureFormat::B8G8R8A8_TYPELESS => TextureFormat::B8G8R8A8_UNORM,
            TextureFormat::R8G8B8A8_TYPELESS => TextureFormat::R8G8B8A8_UNORM,
            TextureFormat::R10G10B10A2_TYPELESS => TextureFormat::R10G10B10A2_UNORM,
            TextureFormat::R16G16B16A16_TYPELESS => TextureFormat::R16G16B16A16_FLOAT,
            other => other,
        }
    }
}

bitflags! {
    /// How a texture may be used by the device
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct TextureUsage: u32 {
        const COPY_SRC = 1 << 0;
        const COPY_DST = 1 << 1;
        const SAMPLED = 1 << 2;
        const RENDER_TARGET = 1 << 3;
        /// Openable by other processes through a shared handle
        const SHARED = 1 << 4;
    }
}

/// Backend resource handle of a texture (e.g. an `ID3D11Texture2D*`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle(pub u64);

// ===== TEXTURE INFO =====

/// Read-only properties of a created texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel format
    pub format: TextureFormat,
    /// Usage flags
    pub usage: TextureUsage,
}

// ===== TEXTURE TRAIT =====

/// Texture resource trait
///
/// Implemented by backend-specific texture types. The texture is destroyed
/// when the last reference is dropped.
pub trait Texture: Send + Sync {
    /// Get the read-only properties of this texture
    fn info(&self) -> &TextureInfo;

    /// Backend resource, if the texture has been realized on the device
    ///
    /// Host render targets are created lazily; until the host renders the
    /// first frame this returns `None`.
    fn native_handle(&self) -> Option<NativeHandle>;
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
