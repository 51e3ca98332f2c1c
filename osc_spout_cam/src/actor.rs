//! OSC camera actor: lifecycle glue between the listener, the camera state,
//! the host capture and the frame publisher.
//!
//! - `begin_play`: (re)open the OSC port, reset the publication, optionally
//!   become the view target.
//! - `tick`: snapshot the pose, convert it, drive the host capture, then
//!   advance the frame publisher.
//! - `end_play`: close the listener (joined), then tear the publication down.

use std::net::SocketAddr;
use std::sync::Arc;
use crate::camera::{CameraStateStore, CameraUpdate, CaptureHost, CoordinateTransform};
use crate::config::CamConfig;
use crate::error::Result;
use crate::graphics_device::{DeviceHandle, RenderQueue};
use crate::listener::{ListenerStatsSnapshot, OscListener};
use crate::publish::{FramePublisher, RegistryHandle, TickOutcome};
use crate::{cam_info, cam_warn};

const SOURCE: &str = "oscam::Actor";

/// Virtual camera driven by an OSC pose stream
pub struct OscCamActor<H: CaptureHost> {
    config: CamConfig,
    host: H,
    store: Arc<CameraStateStore>,
    transform: CoordinateTransform,
    publisher: FramePublisher,
    listener: Option<OscListener>,
}

impl<H: CaptureHost> OscCamActor<H> {
    /// Create a stopped actor
    ///
    /// `device`, `registry` and `queue` are the GPU seams handed to the frame
    /// publisher.
    pub fn new(
        config: CamConfig,
        host: H,
        device: DeviceHandle,
        registry: RegistryHandle,
        queue: Box<dyn RenderQueue>,
    ) -> Self {
        let publisher = FramePublisher::new(device, registry, queue, config.publish_name.clone());
        Self {
            transform: CoordinateTransform::new(config.unit_scale),
            config,
            host,
            store: Arc::new(CameraStateStore::new()),
            publisher,
            listener: None,
        }
    }

    // ===== LIFECYCLE =====

    /// Start (or restart) receiving poses
    ///
    /// A bind failure is logged and returned; the actor keeps ticking with
    /// the last known pose and `begin_play` may be called again to retry.
    pub fn begin_play(&mut self) -> Result<()> {
        self.close_listener();
        self.publisher.stop();

        if self.config.auto_set_view_target {
            self.host.set_view_target();
        }

        match OscListener::open(
            &self.config.bind_address,
            self.config.osc_port,
            self.store.clone(),
            self.config.poll_interval(),
        ) {
            Ok(listener) => {
                self.listener = Some(listener);
                Ok(())
            }
            Err(e) => {
                cam_warn!(SOURCE, "No pose updates until the port can be opened: {}", e);
                Err(e)
            }
        }
    }

    /// Advance one frame
    pub fn tick(&mut self) -> TickOutcome {
        self.apply_pose();

        let source = self.host.render_target();
        self.publisher.tick(source.as_ref())
    }

    /// Convert the latest pose and push it to the host capture
    ///
    /// The store is locked only for the snapshot copy.
    pub fn apply_pose(&mut self) -> CameraUpdate {
        let state = self.store.read_both();
        let update = self.transform.apply(&state);

        self.host.set_world_transform(&update.transform, true);
        self.host.set_custom_projection(update.projection);
        update
    }

    /// Stop receiving, then release the publication
    pub fn end_play(&mut self) {
        self.close_listener();
        self.publisher.stop();
        cam_info!(SOURCE, "Stopped");
    }

    // ===== CONFIGURATION =====

    pub fn config(&self) -> &CamConfig {
        &self.config
    }

    /// Rename the publication; the next tick tears the old one down
    pub fn set_publish_name(&mut self, name: impl Into<String>) {
        self.config.publish_name = name.into();
        self.publisher.set_publish_name(self.config.publish_name.clone());
    }

    // ===== ACCESSORS =====

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Pose store written by the listener
    pub fn store(&self) -> &Arc<CameraStateStore> {
        &self.store
    }

    pub fn publisher(&self) -> &FramePublisher {
        &self.publisher
    }

    /// Bound OSC address, while listening
    pub fn listen_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().map(|l| l.local_addr())
    }

    pub fn is_listening(&self) -> bool {
        self.listener.as_ref().is_some_and(|l| l.is_open())
    }

    pub fn listener_stats(&self) -> Option<ListenerStatsSnapshot> {
        self.listener.as_ref().map(|l| l.stats())
    }

    // ===== INTERNALS =====

    fn close_listener(&mut self) {
        if let Some(mut listener) = self.listener.take() {
            listener.close();
        }
    }
}

impl<H: CaptureHost> Drop for OscCamActor<H> {
    fn drop(&mut self) {
        self.close_listener();
        self.publisher.stop();
    }
}

#[cfg(test)]
#[path = "actor_tests.rs"]
mod tests;
