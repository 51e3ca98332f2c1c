/// Tests for texture formats

use super::*;

#[test]
fn test_typeless_formats() {
    assert!(TextureFormat::B8G8R8A8_TYPELESS.is_typeless());
    assert!(TextureFormat::R16G16B16A16_TYPELESS.is_typeless());
    assert!(!TextureFormat::B8G8R8A8_UNORM.is_typeless());
    assert!(!TextureFormat::R32G32B32A32_FLOAT.is_typeless());
}

#[test]
fn test_typeless_maps_to_concrete_format() {
    assert_eq!(TextureFormat::B8G8R8A8_TYPELESS.to_renderable(), TextureFormat::B8G8R8A8_UNORM);
    assert_eq!(TextureFormat::R8G8B8A8_TYPELESS.to_renderable(), TextureFormat::R8G8B8A8_UNORM);
    assert_eq!(TextureFormat::R10G10B10A2_TYPELESS.to_renderable(), TextureFormat::R10G10B10A2_UNORM);
    assert_eq!(TextureFormat::R16G16B16A16_TYPELESS.to_renderable(), TextureFormat::R16G16B16A16_FLOAT);
}

#[test]
fn test_renderable_formats_map_to_themselves() {
    let concrete = [
        TextureFormat::R8G8B8A8_UNORM,
        TextureFormat::R8G8B8A8_SRGB,
        TextureFormat::B8G8R8A8_SRGB,
        TextureFormat::R32G32B32A32_FLOAT,
    ];
    for format in concrete {
        assert_eq!(format.to_renderable(), format);
        assert!(!format.to_renderable().is_typeless());
    }
}
