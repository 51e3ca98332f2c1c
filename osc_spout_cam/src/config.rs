//! Camera actor configuration

use std::time::Duration;
use serde::Deserialize;
use crate::camera::DEFAULT_UNIT_SCALE;
use crate::error::{Error, Result};

/// Settings read at `begin_play` (port, address, poll interval) or on every
/// tick (publish name)
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CamConfig {
    /// UDP port for incoming OSC (default: 12000)
    pub osc_port: u16,

    /// Name the frame is published under (default: "OSCSpoutCam")
    pub publish_name: String,

    /// Make the capture the active view at `begin_play` (default: true)
    pub auto_set_view_target: bool,

    /// Receive poll interval in milliseconds (default: 100)
    pub receive_poll_interval_ms: u64,

    /// Source units → host units for translations (default: 100, m → cm)
    pub unit_scale: f32,

    /// Local address the socket binds to (default: all interfaces)
    pub bind_address: String,
}

impl Default for CamConfig {
    fn default() -> Self {
        Self {
            osc_port: 12000,
            publish_name: "OSCSpoutCam".to_string(),
            auto_set_view_target: true,
            receive_poll_interval_ms: 100,
            unit_scale: DEFAULT_UNIT_SCALE,
            bind_address: "0.0.0.0".to_string(),
        }
    }
}

impl CamConfig {
    /// Parse and validate a TOML document; missing keys keep their defaults
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: CamConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the actor cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.publish_name.is_empty() {
            return Err(Error::Config("publish_name must not be empty".to_string()));
        }
        if !self.unit_scale.is_finite() || self.unit_scale <= 0.0 {
            return Err(Error::Config(format!(
                "unit_scale must be a positive number, got {}", self.unit_scale
            )));
        }
        if self.receive_poll_interval_ms == 0 {
            return Err(Error::Config("receive_poll_interval_ms must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.receive_poll_interval_ms)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
