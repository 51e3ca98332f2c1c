/*!
# OSC Spout Camera

A virtual camera driven by an OSC pose stream, publishing its rendered frame
as a named shared texture for other processes.

Two paths run side by side:

- **Receive path** (listener thread): UDP datagram → OSC decoder → pose
  updates → `CameraStateStore` (one lock per message).
- **Tick path** (caller thread): store snapshot → `CoordinateTransform` →
  host capture transform and projection; host render target →
  `FramePublisher` → shared texture → `PublishRegistry` slot.

## Architecture

- **CaptureHost**: what the host scene capture must provide
- **GraphicsDevice**: shared texture creation, copy and flush
- **RenderQueue**: immediate or render-thread execution of GPU work
- **PublishRegistry**: process-wide name → shared texture table
- **OscCamActor**: lifecycle glue (`begin_play` / `tick` / `end_play`)

Hosts implement the traits; the crate drives them.
*/

// Internal modules
mod error;
pub mod log;
pub mod osc;
pub mod camera;
pub mod graphics_device;
pub mod publish;
pub mod listener;
pub mod config;
pub mod actor;

// Main oscam namespace module
pub mod oscam {
    // Error types
    pub use crate::error::{DecodeError, Error, Result};

    // Actor and configuration
    pub use crate::actor::OscCamActor;
    pub use crate::config::CamConfig;

    // Logging sub-module (types and logger slot, NOT macros)
    pub mod log {
        pub use crate::log::{
            DefaultLogger, LogEntry, LogSeverity, Logger, reset_logger, set_logger,
        };
    }

    // OSC wire format
    pub mod osc {
        pub use crate::osc::*;
    }

    // Camera state, transform and host capture
    pub mod camera {
        pub use crate::camera::*;
    }

    // GPU seams
    pub mod device {
        pub use crate::graphics_device::*;
    }

    // Shared-texture publishing
    pub mod publish {
        pub use crate::publish::*;
    }

    // UDP listener
    pub mod listener {
        pub use crate::listener::{
            DEFAULT_POLL_INTERVAL, ListenerStatsSnapshot, MAX_DATAGRAM_SIZE, OscListener,
            handle_datagram,
        };
    }
}

// Re-export math library at crate root
pub use glam;
