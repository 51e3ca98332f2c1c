/// Frame publisher: exposes the capture render target as a named shared
/// texture.
///
/// State machine, advanced once per tick:
///
/// - `Uninitialized`: no texture, no registered name. When the host exposes a
///   realized render target, create a shared destination texture matching
///   it, register the configured name, become `Active`. No copy that tick.
/// - `Active`: if the configured name or the (renderable) source format no
///   longer matches the publication, tear down and go back to
///   `Uninitialized` without copying. Otherwise queue copy + flush and
///   refresh the registry entry with the source dimensions.
///
/// A size change alone only refreshes the registry entry; the destination
/// texture keeps its creation size. A format change recreates everything.
///
/// Teardown always revokes the name before the texture is released. An
/// `Active` publication whose registry entry disappeared is torn down too, so
/// the next tick registers it again.

use std::mem;
use std::sync::{Arc, MutexGuard};
use crate::error::{Error, Result};
use crate::graphics_device::{
    DeviceHandle, GraphicsDevice, RenderQueue, SharedHandle, SharedTexture, SharedTextureDesc,
    Texture, TextureFormat,
};
use crate::{cam_debug, cam_info, cam_warn};
use super::registry::RegistryHandle;

const SOURCE: &str = "oscam::FramePublisher";

/// Name and texture description of one publication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishIdentity {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Always a renderable (non-typeless) format
    pub format: TextureFormat,
}

/// A registered shared texture
#[derive(Debug)]
pub struct Publication {
    identity: PublishIdentity,
    shared: SharedTexture,
}

impl Publication {
    pub fn identity(&self) -> &PublishIdentity {
        &self.identity
    }

    pub fn handle(&self) -> SharedHandle {
        self.shared.handle
    }

    pub fn texture(&self) -> &Arc<dyn Texture> {
        &self.shared.texture
    }
}

/// Publisher state
#[derive(Debug, Default)]
pub enum PublisherState {
    #[default]
    Uninitialized,
    Active(Publication),
}

/// What a tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing to do (no realized source)
    Idle,
    /// Publication created and registered; nothing copied
    Created,
    /// Copy queued and registry entry refreshed
    Copied,
    /// Identity changed; publication released, nothing copied
    TornDown,
    /// Creation, copy submission or registry refresh failed (logged);
    /// a failed refresh also releases the publication
    Failed,
}

/// Publishes a source texture under a configurable name
pub struct FramePublisher {
    device: DeviceHandle,
    registry: RegistryHandle,
    queue: Box<dyn RenderQueue>,
    publish_name: String,
    state: PublisherState,
}

impl FramePublisher {
    /// Create an uninitialized publisher
    pub fn new(
        device: DeviceHandle,
        registry: RegistryHandle,
        queue: Box<dyn RenderQueue>,
        publish_name: impl Into<String>,
    ) -> Self {
        Self {
            device,
            registry,
            queue,
            publish_name: publish_name.into(),
            state: PublisherState::Uninitialized,
        }
    }

    // ===== ACCESSORS =====

    /// Configured name (the active publication may still use the old one)
    pub fn publish_name(&self) -> &str {
        &self.publish_name
    }

    /// Change the configured name; takes effect on the next tick
    pub fn set_publish_name(&mut self, name: impl Into<String>) {
        self.publish_name = name.into();
    }

    pub fn state(&self) -> &PublisherState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, PublisherState::Active(_))
    }

    /// Identity of the active publication
    pub fn identity(&self) -> Option<&PublishIdentity> {
        match &self.state {
            PublisherState::Active(publication) => Some(&publication.identity),
            PublisherState::Uninitialized => None,
        }
    }

    // ===== TICK =====

    /// Advance the state machine with this frame's source texture
    pub fn tick(&mut self, source: Option<&Arc<dyn Texture>>) -> TickOutcome {
        // Unrealized or empty render targets count as no source
        let source = source.filter(|s| {
            let info = s.info();
            s.native_handle().is_some() && info.width > 0 && info.height > 0
        });

        let identity_changed = match &self.state {
            PublisherState::Uninitialized => {
                let Some(source) = source else {
                    return TickOutcome::Idle;
                };
                return match self.create(source) {
                    Ok(publication) => {
                        cam_info!(SOURCE, "Publishing '{}' ({}x{} {:?}, handle {})",
                            publication.identity.name,
                            publication.identity.width,
                            publication.identity.height,
                            publication.identity.format,
                            publication.shared.handle);
                        self.state = PublisherState::Active(publication);
                        TickOutcome::Created
                    }
                    Err(e) => {
                        cam_warn!(SOURCE, "Cannot publish '{}': {}", self.publish_name, e);
                        TickOutcome::Failed
                    }
                };
            }
            PublisherState::Active(publication) => {
                let identity = &publication.identity;
                identity.name != self.publish_name
                    || source.is_some_and(|s| s.info().format.to_renderable() != identity.format)
            }
        };

        if identity_changed {
            self.teardown();
            return TickOutcome::TornDown;
        }

        let Some(source) = source else {
            return TickOutcome::Idle;
        };
        if let Err(e) = self.queue_copy(source) {
            cam_warn!(SOURCE, "Frame not published: {}", e);
            return TickOutcome::Failed;
        }

        // A publication without its registry entry is dropped and recreated
        if let Err(e) = self.refresh_registry(source) {
            cam_warn!(SOURCE, "Registry entry for '{}' lost: {}", self.publish_name, e);
            self.teardown();
            return TickOutcome::Failed;
        }
        TickOutcome::Copied
    }

    /// Release the publication, if any
    pub fn stop(&mut self) {
        self.teardown();
    }

    // ===== INTERNALS =====

    fn lock_device(&self) -> MutexGuard<'_, dyn GraphicsDevice + 'static> {
        self.device.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn create(&self, source: &Arc<dyn Texture>) -> Result<Publication> {
        let info = source.info();
        let desc = SharedTextureDesc::copy_destination(info.width, info.height, info.format);
        if info.format.is_typeless() {
            cam_debug!(SOURCE, "Source format {:?} published as {:?}", info.format, desc.format);
        }

        let shared = self.lock_device().create_shared_texture(&desc)?;

        // On failure `shared` is dropped here, releasing the texture
        self.registry.register(
            &self.publish_name,
            desc.width,
            desc.height,
            shared.handle,
            desc.format,
        )?;

        Ok(Publication {
            identity: PublishIdentity {
                name: self.publish_name.clone(),
                width: desc.width,
                height: desc.height,
                format: desc.format,
            },
            shared,
        })
    }

    fn active_publication(&self) -> Result<&Publication> {
        match &self.state {
            PublisherState::Active(publication) => Ok(publication),
            PublisherState::Uninitialized => {
                Err(Error::InvalidResource("no active publication".to_string()))
            }
        }
    }

    fn queue_copy(&self, source: &Arc<dyn Texture>) -> Result<()> {
        let dst = self.active_publication()?.shared.texture.clone();
        let src = source.clone();
        self.queue.enqueue(Box::new(move |device: &mut dyn GraphicsDevice| -> Result<()> {
            device.copy_texture(dst.as_ref(), src.as_ref())?;
            device.flush()
        }))
    }

    fn refresh_registry(&self, source: &Arc<dyn Texture>) -> Result<()> {
        let publication = self.active_publication()?;
        let info = source.info();
        self.registry.update(
            &publication.identity.name,
            info.width,
            info.height,
            publication.shared.handle,
        )
    }

    fn teardown(&mut self) {
        let PublisherState::Active(publication) = mem::take(&mut self.state) else {
            return;
        };

        if let Err(e) = self.registry.unregister(&publication.identity.name) {
            cam_warn!(SOURCE, "Unregister '{}' failed: {}", publication.identity.name, e);
        }
        cam_debug!(SOURCE, "Released '{}'", publication.identity.name);
        drop(publication);
    }
}

impl Drop for FramePublisher {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
#[path = "frame_publisher_tests.rs"]
mod tests;
