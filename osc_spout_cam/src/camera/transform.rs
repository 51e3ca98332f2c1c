/// Coordinate transform: source pose → host camera
///
/// The sender uses right-handed, Y-up, meter-based matrices (x right, y up,
/// -z forward). The host camera is left-handed, Z-up and measured in
/// centimeters (x forward, y right, z up). Runs once per tick on the latest
/// snapshot, never per message.

use glam::{Mat4, Quat, Vec3, Vec4};
use crate::osc::PoseMatrix;
use super::state::CameraState;

/// Meters → host units, applied to translation and projection depth only
pub const DEFAULT_UNIT_SCALE: f32 = 100.0;

/// Axis remap from source to host: host.x = -src.z, host.y = src.x, host.z = src.y
pub fn source_to_host_basis() -> Mat4 {
    Mat4::from_cols(
        Vec4::new(0.0, 1.0, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0, 0.0),
        Vec4::new(-1.0, 0.0, 0.0, 0.0),
        Vec4::W,
    )
}

/// Rigid placement of the host camera actor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostTransform {
    /// World position in host units
    pub translation: Vec3,
    /// World orientation
    pub rotation: Quat,
    /// World scale (unit for a rigid pose)
    pub scale: Vec3,
}

impl HostTransform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Decompose an affine world matrix
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let (scale, rotation, translation) = matrix.to_scale_rotation_translation();
        Self { translation, rotation, scale }
    }

    /// Recompose the world matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for HostTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Result of converting one snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraUpdate {
    /// Converted world matrix (translation already in host units)
    pub world_matrix: Mat4,
    /// `world_matrix` decomposed for the host actor
    pub transform: HostTransform,
    /// Projection for the host's custom projection slot
    pub projection: Mat4,
}

/// Fixed conversion between sender and host conventions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    basis: Mat4,
    unit_scale: f32,
}

impl Default for CoordinateTransform {
    fn default() -> Self {
        Self::new(DEFAULT_UNIT_SCALE)
    }
}

impl CoordinateTransform {
    /// Standard basis change with the given unit scale
    pub fn new(unit_scale: f32) -> Self {
        Self {
            basis: source_to_host_basis(),
            unit_scale,
        }
    }

    pub fn unit_scale(&self) -> f32 {
        self.unit_scale
    }

    /// Wire order fills rows; glam stores columns, hence the transpose.
    pub fn to_matrix(pose: &PoseMatrix) -> Mat4 {
        Mat4::from_cols_array(pose.as_array()).transpose()
    }

    /// `B · M · Bᵀ`, then translation scaled to host units
    pub fn convert_modelview(&self, pose: &PoseMatrix) -> Mat4 {
        let model = Self::to_matrix(pose);
        let mut converted = self.basis * model * self.basis.transpose();

        converted.w_axis.x *= self.unit_scale;
        converted.w_axis.y *= self.unit_scale;
        converted.w_axis.z *= self.unit_scale;
        converted
    }

    /// Adapt an off-axis GL projection to the host's custom projection slot
    ///
    /// Element names below are `[column][row]`.
    pub fn convert_projection(&self, pose: &PoseMatrix) -> Mat4 {
        let mut m = Self::to_matrix(pose);

        // [2][3]: w takes +z instead of -z
        m.z_axis.w *= -1.0;
        // [2][2]: the host derives depth itself
        m.z_axis.z = 0.0;
        // [3][2]: near-plane term in host units
        m.w_axis.z *= -self.unit_scale;
        // [2][0], [2][1]: principal point offset
        m.z_axis.x *= -1.0;
        m.z_axis.y *= -1.0;
        m
    }

    /// Convert a full snapshot
    pub fn apply(&self, state: &CameraState) -> CameraUpdate {
        let world_matrix = self.convert_modelview(&state.modelview);
        CameraUpdate {
            world_matrix,
            transform: HostTransform::from_matrix(&world_matrix),
            projection: self.convert_projection(&state.projection),
        }
    }
}

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;
