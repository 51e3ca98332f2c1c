/// Render command queue
///
/// GPU work issued by the tick thread goes through a `RenderQueue`. The
/// immediate queue runs commands on the caller's thread; the render thread
/// hands them to a dedicated worker and returns at once. Commands own `Arc`
/// clones of the textures they touch, so a texture dropped by its owner stays
/// alive until every queued command using it has run.

use std::sync::MutexGuard;
use std::thread::{self, JoinHandle};
use crossbeam_channel::{unbounded, Sender};
use crate::error::{Error, Result};
use crate::{cam_bail, cam_debug, cam_err, cam_error};
use super::graphics_device::{DeviceHandle, GraphicsDevice};

/// Deferred GPU work
pub type RenderCommand = Box<dyn FnOnce(&mut dyn GraphicsDevice) -> Result<()> + Send>;

/// Destination for render commands
pub trait RenderQueue: Send {
    /// Submit a command
    ///
    /// Errors from the command itself are returned only by queues that run
    /// it synchronously. Deferred queues log them.
    fn enqueue(&self, command: RenderCommand) -> Result<()>;
}

fn lock_device(device: &DeviceHandle) -> MutexGuard<'_, dyn GraphicsDevice + 'static> {
    device.lock().unwrap_or_else(|e| e.into_inner())
}

// ===== IMMEDIATE =====

/// Runs each command on the calling thread
pub struct ImmediateQueue {
    device: DeviceHandle,
}

impl ImmediateQueue {
    pub fn new(device: DeviceHandle) -> Self {
        Self { device }
    }
}

impl RenderQueue for ImmediateQueue {
    fn enqueue(&self, command: RenderCommand) -> Result<()> {
        let mut device = lock_device(&self.device);
        command(&mut *device)
    }
}

// ===== RENDER THREAD =====

/// Dedicated render worker fed through an unbounded channel
///
/// Fire-and-forget: `enqueue` never waits for the GPU. `shutdown` (also run
/// on drop) closes the channel, lets the worker drain what was queued, and
/// joins it.
pub struct RenderThread {
    sender: Option<Sender<RenderCommand>>,
    worker: Option<JoinHandle<()>>,
}

impl RenderThread {
    /// Spawn the worker
    pub fn spawn(device: DeviceHandle) -> Result<Self> {
        let (sender, receiver) = unbounded::<RenderCommand>();

        let worker = thread::Builder::new()
            .name("oscam-render".into())
            .spawn(move || {
                cam_debug!("oscam::RenderThread", "Render thread started");
                for command in receiver.iter() {
                    let mut guard = lock_device(&device);
                    if let Err(e) = command(&mut *guard) {
                        cam_error!("oscam::RenderThread", "Render command failed: {}", e);
                    }
                }
                cam_debug!("oscam::RenderThread", "Render thread stopped");
            })
            .map_err(|e| Error::InitializationFailed(format!("render thread: {}", e)))?;

        Ok(Self {
            sender: Some(sender),
            worker: Some(worker),
        })
    }

    /// Whether the worker is still accepting commands
    pub fn is_running(&self) -> bool {
        self.sender.is_some()
    }

    /// Drain queued commands and join the worker
    pub fn shutdown(&mut self) {
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                cam_error!("oscam::RenderThread", "Render thread panicked");
            }
        }
    }
}

impl RenderQueue for RenderThread {
    fn enqueue(&self, command: RenderCommand) -> Result<()> {
        let Some(sender) = &self.sender else {
            cam_bail!("oscam::RenderThread", "Render thread is shut down");
        };
        sender
            .send(command)
            .map_err(|_| cam_err!("oscam::RenderThread", "Render thread is gone"))
    }
}

impl Drop for RenderThread {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
#[path = "render_queue_tests.rs"]
mod tests;
