/// Pose messages: `/model` and `/proj`
///
/// Walks a datagram depth-first and extracts every recognized pose message.
/// The whole datagram is decoded before anything is returned, so a malformed
/// element anywhere in a bundle rejects the datagram as a unit.

use crate::error::DecodeError;
use super::packet::{Message, Packet};

/// Address carrying the camera modelview matrix
pub const MODEL_ADDRESS: &str = "/model";

/// Address carrying the camera projection matrix
pub const PROJECTION_ADDRESS: &str = "/proj";

/// Float arguments required by both pose addresses
pub const MATRIX_ARG_COUNT: usize = 16;

/// Deepest bundle nesting accepted
pub const MAX_BUNDLE_DEPTH: usize = 32;

/// 4x4 matrix exactly as received: 16 floats in row-major fill order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseMatrix(pub [f32; 16]);

impl PoseMatrix {
    /// Identity, the value before any message arrives
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ]);

    /// Element at `row`, `column` of the row-major fill
    pub fn get(&self, row: usize, column: usize) -> f32 {
        self.0[row * 4 + column]
    }

    /// The 16 values in wire order
    pub fn as_array(&self) -> &[f32; 16] {
        &self.0
    }
}

impl Default for PoseMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Which camera matrix a message replaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoseTarget {
    /// `/model`
    Modelview,
    /// `/proj`
    Projection,
}

impl PoseTarget {
    /// Map an address to a target; `None` for addresses this camera ignores
    pub fn from_address(address: &str) -> Option<Self> {
        Self::from_address_bytes(address.as_bytes())
    }

    /// Same as `from_address`, on the raw wire bytes
    pub fn from_address_bytes(address: &[u8]) -> Option<Self> {
        if address == MODEL_ADDRESS.as_bytes() {
            Some(PoseTarget::Modelview)
        } else if address == PROJECTION_ADDRESS.as_bytes() {
            Some(PoseTarget::Projection)
        } else {
            None
        }
    }

    /// Wire address for this target
    pub fn address(&self) -> &'static str {
        match self {
            PoseTarget::Modelview => MODEL_ADDRESS,
            PoseTarget::Projection => PROJECTION_ADDRESS,
        }
    }
}

/// One decoded pose message
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseUpdate {
    /// Matrix being replaced
    pub target: PoseTarget,
    /// New value
    pub matrix: PoseMatrix,
}

/// Decode every pose message in a datagram, in depth-first order
///
/// Unrecognized addresses are skipped without looking at their arguments.
///
/// # Errors
///
/// Returns the first decode error found anywhere in the datagram; in that
/// case no update is returned.
pub fn decode_pose_updates(datagram: &[u8]) -> Result<Vec<PoseUpdate>, DecodeError> {
    let mut updates = Vec::new();
    collect(Packet::parse(datagram)?, 0, &mut updates)?;
    Ok(updates)
}

fn collect(packet: Packet<'_>, depth: usize, out: &mut Vec<PoseUpdate>) -> Result<(), DecodeError> {
    match packet {
        Packet::Bundle(bundle) => {
            if depth >= MAX_BUNDLE_DEPTH {
                return Err(DecodeError::TooDeep(MAX_BUNDLE_DEPTH));
            }
            for element in bundle.packets() {
                collect(element?, depth + 1, out)?;
            }
        }
        Packet::Message(message) => {
            if let Some(target) = PoseTarget::from_address_bytes(message.address_bytes()) {
                out.push(PoseUpdate {
                    target,
                    matrix: read_matrix(&message)?,
                });
            }
        }
    }
    Ok(())
}

/// Read the 16 float arguments of a pose message
pub fn read_matrix(message: &Message<'_>) -> Result<PoseMatrix, DecodeError> {
    if message.arg_count() != MATRIX_ARG_COUNT {
        return Err(DecodeError::ArgumentCount {
            address: message.address().into_owned(),
            expected: MATRIX_ARG_COUNT,
            found: message.arg_count(),
        });
    }

    let mut args = message.args();
    let mut values = [0.0f32; 16];
    for value in values.iter_mut() {
        *value = args.float32()?;
    }
    Ok(PoseMatrix(values))
}

#[cfg(test)]
#[path = "pose_tests.rs"]
mod tests;
