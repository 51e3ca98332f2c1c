/// Mock graphics device for unit tests (no GPU required)
///
/// Every device call and every shared texture release is appended to an
/// event log, so tests can assert on the exact order of GPU work.

use std::sync::{Arc, Mutex};
use crate::error::{Error, Result};
use super::graphics_device::{GraphicsDevice, SharedHandle, SharedTexture, SharedTextureDesc};
use super::texture::{NativeHandle, Texture, TextureFormat, TextureInfo, TextureUsage};

/// Shared, ordered record of device activity
pub type EventLog = Arc<Mutex<Vec<String>>>;

/// Native handle given to textures built with `MockTexture::new`
pub const SOURCE_NATIVE_HANDLE: NativeHandle = NativeHandle(1000);

// ============================================================================
// Mock Texture
// ============================================================================

pub struct MockTexture {
    pub info: TextureInfo,
    pub name: String,
    native: Option<NativeHandle>,
    events: Option<EventLog>,
}

impl MockTexture {
    /// Realized render target
    pub fn new(name: &str, width: u32, height: u32, format: TextureFormat) -> Self {
        Self {
            info: TextureInfo {
                width,
                height,
                format,
                usage: TextureUsage::RENDER_TARGET | TextureUsage::COPY_SRC,
            },
            name: name.to_string(),
            native: Some(SOURCE_NATIVE_HANDLE),
            events: None,
        }
    }

    /// Render target the host has not realized yet (no native handle)
    pub fn unrealized(name: &str, width: u32, height: u32, format: TextureFormat) -> Self {
        let mut texture = Self::new(name, width, height, format);
        texture.native = None;
        texture
    }
}

impl Texture for MockTexture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }

    fn native_handle(&self) -> Option<NativeHandle> {
        self.native
    }
}

impl Drop for MockTexture {
    fn drop(&mut self) {
        if let Some(events) = &self.events {
            events.lock().unwrap().push(format!("release {}", self.name));
        }
    }
}

// ============================================================================
// Mock GraphicsDevice
// ============================================================================

pub struct MockGraphicsDevice {
    pub events: EventLog,
    /// Fail the next `create_shared_texture` calls while set
    pub fail_create: bool,
    /// Fail `copy_texture` while set
    pub fail_copy: bool,
    next_id: u64,
}

impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            fail_create: false,
            fail_copy: false,
            next_id: 1,
        }
    }

    /// Snapshot of the event log
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear_events(&self) {
        self.events.lock().unwrap().clear();
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

fn native_id(texture: &dyn Texture) -> u64 {
    texture.native_handle().map(|h| h.0).unwrap_or(0)
}

impl GraphicsDevice for MockGraphicsDevice {
    fn create_shared_texture(&mut self, desc: &SharedTextureDesc) -> Result<SharedTexture> {
        if self.fail_create {
            self.record("create failed".to_string());
            return Err(Error::BackendError("mock create failure".to_string()));
        }

        let id = self.next_id;
        self.next_id += 1;
        self.record(format!("create #{} {}x{} {:?}", id, desc.width, desc.height, desc.format));

        let texture = MockTexture {
            info: TextureInfo {
                width: desc.width,
                height: desc.height,
                format: desc.format,
                usage: desc.usage,
            },
            name: format!("#{}", id),
            native: Some(NativeHandle(id)),
            events: Some(self.events.clone()),
        };

        Ok(SharedTexture {
            texture: Arc::new(texture),
            handle: SharedHandle(0x5000 + id),
        })
    }

    fn copy_texture(&mut self, dst: &dyn Texture, src: &dyn Texture) -> Result<()> {
        if self.fail_copy {
            return Err(Error::BackendError("mock copy failure".to_string()));
        }
        self.record(format!("copy #{} <- #{}", native_id(dst), native_id(src)));
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.record("flush".to_string());
        Ok(())
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
