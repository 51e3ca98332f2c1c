//! Camera module: pose state, coordinate conversion and the host capture
//! capability.
//!
//! The store is written by the listener thread and read once per tick; the
//! transform and the capture types are plain data driven by the caller.

pub mod state;
pub mod transform;
pub mod scene_capture;

pub use state::{CameraState, CameraStateStore};
pub use transform::{
    CameraUpdate, CoordinateTransform, HostTransform, DEFAULT_UNIT_SCALE, source_to_host_basis,
};
pub use scene_capture::{CaptureHost, SceneCapture};
