/// Process-wide naming registry for shared textures.
///
/// A publication is visible to receivers only while its name is registered.
/// Receivers look a name up to get the shared handle and the dimensions to
/// open it with. The registry stores descriptions only; it never owns a
/// texture.

use std::sync::{Arc, OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};
use rustc_hash::FxHashMap;
use crate::error::{Error, Result};
use crate::graphics_device::{SharedHandle, TextureFormat};
use crate::cam_warn;

/// What a receiver needs to open a published texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SenderInfo {
    pub width: u32,
    pub height: u32,
    pub handle: SharedHandle,
    pub format: TextureFormat,
}

/// Named publication slots
///
/// Shared between every publisher of the process, hence `&self` methods.
pub trait PublishRegistry: Send + Sync {
    /// Make `name` visible to receivers
    ///
    /// # Errors
    ///
    /// Fails if the name is empty, already registered, or the registry is full.
    fn register(
        &self,
        name: &str,
        width: u32,
        height: u32,
        handle: SharedHandle,
        format: TextureFormat,
    ) -> Result<()>;

    /// Refresh dimensions and handle of a registered name (format unchanged)
    fn update(&self, name: &str, width: u32, height: u32, handle: SharedHandle) -> Result<()>;

    /// Revoke `name`
    fn unregister(&self, name: &str) -> Result<()>;

    /// Current description of `name`
    fn lookup(&self, name: &str) -> Option<SenderInfo>;

    /// All registered names, sorted
    fn names(&self) -> Vec<String>;
}

/// Registry handle shared by publishers
pub type RegistryHandle = Arc<dyn PublishRegistry>;

/// In-process registry
#[derive(Debug, Default)]
pub struct LocalPublishRegistry {
    senders: RwLock<FxHashMap<String, SenderInfo>>,
    max_senders: Option<usize>,
}

impl LocalPublishRegistry {
    /// Create an empty registry without a sender limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry holding at most `max_senders` names
    pub fn with_max_senders(max_senders: usize) -> Self {
        Self {
            senders: RwLock::default(),
            max_senders: Some(max_senders),
        }
    }

    /// Number of registered names
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, FxHashMap<String, SenderInfo>> {
        self.senders.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, FxHashMap<String, SenderInfo>> {
        self.senders.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl PublishRegistry for LocalPublishRegistry {
    fn register(
        &self,
        name: &str,
        width: u32,
        height: u32,
        handle: SharedHandle,
        format: TextureFormat,
    ) -> Result<()> {
        if name.is_empty() {
            return Err(Error::Registry("empty sender name".to_string()));
        }

        let mut senders = self.write();
        if senders.contains_key(name) {
            cam_warn!("oscam::PublishRegistry", "Sender '{}' already exists", name);
            return Err(Error::Registry(format!("sender '{}' already exists", name)));
        }
        if let Some(max) = self.max_senders {
            if senders.len() >= max {
                return Err(Error::Registry(format!(
                    "cannot register '{}': {} senders already registered", name, max
                )));
            }
        }

        senders.insert(name.to_string(), SenderInfo { width, height, handle, format });
        Ok(())
    }

    fn update(&self, name: &str, width: u32, height: u32, handle: SharedHandle) -> Result<()> {
        let mut senders = self.write();
        match senders.get_mut(name) {
            Some(info) => {
                info.width = width;
                info.height = height;
                info.handle = handle;
                Ok(())
            }
            None => Err(Error::Registry(format!("sender '{}' is not registered", name))),
        }
    }

    fn unregister(&self, name: &str) -> Result<()> {
        match self.write().remove(name) {
            Some(_) => Ok(()),
            None => Err(Error::Registry(format!("sender '{}' is not registered", name))),
        }
    }

    fn lookup(&self, name: &str) -> Option<SenderInfo> {
        self.read().get(name).copied()
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }
}

/// Registry shared by every publisher of this process
pub fn shared_registry() -> Arc<LocalPublishRegistry> {
    static REGISTRY: OnceLock<Arc<LocalPublishRegistry>> = OnceLock::new();
    REGISTRY.get_or_init(|| Arc::new(LocalPublishRegistry::new())).clone()
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
