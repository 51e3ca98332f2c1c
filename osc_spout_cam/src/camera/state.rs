/// Camera state store
///
/// Holds the latest modelview and projection matrices exactly as received.
/// Written by the listener thread, one message at a time, and read once per
/// tick as a snapshot. Both sides hold the lock only for the matrix copy.

use std::sync::{Mutex, MutexGuard};
use crate::osc::{PoseMatrix, PoseTarget, PoseUpdate};

/// Snapshot of both camera matrices
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraState {
    /// Camera modelview (`/model`)
    pub modelview: PoseMatrix,
    /// Camera projection (`/proj`)
    pub projection: PoseMatrix,
}

/// Lock-guarded camera matrices shared between the listener and the tick
#[derive(Debug, Default)]
pub struct CameraStateStore {
    state: Mutex<CameraState>,
}

impl CameraStateStore {
    /// Create a store holding identity matrices
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave a half-written matrix
    // (assignment of a Copy value), so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, CameraState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Replace one matrix
    pub fn write(&self, target: PoseTarget, matrix: PoseMatrix) {
        let mut state = self.lock();
        match target {
            PoseTarget::Modelview => state.modelview = matrix,
            PoseTarget::Projection => state.projection = matrix,
        }
    }

    /// Apply decoded updates in order, locking once per message
    pub fn apply(&self, updates: &[PoseUpdate]) {
        for update in updates {
            self.write(update.target, update.matrix);
        }
    }

    /// Consistent copy of both matrices
    pub fn read_both(&self) -> CameraState {
        *self.lock()
    }

    /// Restore identity matrices
    pub fn reset(&self) {
        *self.lock() = CameraState::default();
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
