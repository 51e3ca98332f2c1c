/// Host capture capability and a passive reference implementation.
///
/// The host framework owns the capture camera and its render target. The
/// camera actor only needs four things from it: the current render target,
/// a world transform slot, a custom projection slot, and (optionally) a way
/// to become the active view. `SceneCapture` stores those values and computes
/// nothing, for headless use and tests.

use std::sync::Arc;
use glam::Mat4;
use crate::graphics_device::Texture;
use super::transform::HostTransform;

/// What the camera actor needs from the host scene-capture component
pub trait CaptureHost {
    /// Texture the host renders the capture into, if one is bound
    fn render_target(&self) -> Option<Arc<dyn Texture>>;

    /// Place the capture camera
    ///
    /// `teleport` requests an instantaneous relocation (no interpolation,
    /// no sweep collision); the scene is marked dirty either way.
    fn set_world_transform(&mut self, transform: &HostTransform, teleport: bool);

    /// Override the projection for the current frame
    fn set_custom_projection(&mut self, projection: Mat4);

    /// Make this capture the active view of the local player
    fn set_view_target(&mut self) {}
}

/// Passive capture state. Stores what it is given.
#[derive(Clone, Default)]
pub struct SceneCapture {
    render_target: Option<Arc<dyn Texture>>,
    world_transform: HostTransform,
    custom_projection: Option<Mat4>,
    teleported: bool,
    dirty: bool,
    view_target: bool,
}

impl SceneCapture {
    /// Create a capture without a render target
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a capture rendering into `render_target`
    pub fn with_render_target(render_target: Arc<dyn Texture>) -> Self {
        Self {
            render_target: Some(render_target),
            ..Self::default()
        }
    }

    // ===== GETTERS =====

    /// Current world transform
    pub fn world_transform(&self) -> &HostTransform {
        &self.world_transform
    }

    /// Projection installed for the current frame, if any
    pub fn custom_projection(&self) -> Option<&Mat4> {
        self.custom_projection.as_ref()
    }

    /// Whether the last placement was a teleport
    pub fn teleported(&self) -> bool {
        self.teleported
    }

    /// Whether the transform changed since the last `end_frame`
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_view_target(&self) -> bool {
        self.view_target
    }

    // ===== SETTERS =====

    /// Bind, replace or clear the render target
    pub fn set_render_target(&mut self, render_target: Option<Arc<dyn Texture>>) {
        self.render_target = render_target;
    }

    /// Finish a frame: clears the dirty flag and the per-frame projection
    pub fn end_frame(&mut self) {
        self.dirty = false;
        self.custom_projection = None;
    }
}

impl CaptureHost for SceneCapture {
    fn render_target(&self) -> Option<Arc<dyn Texture>> {
        self.render_target.clone()
    }

    fn set_world_transform(&mut self, transform: &HostTransform, teleport: bool) {
        self.world_transform = *transform;
        self.teleported = teleport;
        self.dirty = true;
    }

    fn set_custom_projection(&mut self, projection: Mat4) {
        self.custom_projection = Some(projection);
    }

    fn set_view_target(&mut self) {
        self.view_target = true;
    }
}

#[cfg(test)]
#[path = "scene_capture_tests.rs"]
mod tests;
