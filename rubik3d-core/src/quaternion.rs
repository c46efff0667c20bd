//! Unit quaternion rotations
//!
//! Rotations are stored as `nalgebra::Quaternion<f32>` rather than
//! `UnitQuaternion` because the cube keeps its own normalization discipline:
//! every composed rotation is renormalized explicitly, and a degenerate
//! (zero length) quaternion collapses to the identity instead of producing NaNs.

use crate::vector::{Vector3, VectorExt};

pub use nalgebra::Quaternion;

/// Rotation helpers used by the cube model and the renderer
pub trait QuaternionExt: Sized {
    /// Rotation of `angle` radians about `axis` (right-hand rule).
    ///
    /// The axis does not need to be normalized. A zero axis yields the identity.
    fn from_axis_angle(axis: &Vector3<f32>, angle: f32) -> Self;

    /// Normalized copy, or the identity if the length is zero
    fn normalized_or_identity(&self) -> Self;

    /// Apply the rotation to a vector: vector part of `q * (0, v) * conj(q)`
    fn rotate_vector(&self, v: &Vector3<f32>) -> Vector3<f32>;

    /// `self` applied after `first`, renormalized
    fn then_after(&self, first: &Self) -> Self;
}

impl QuaternionExt for Quaternion<f32> {
    fn from_axis_angle(axis: &Vector3<f32>, angle: f32) -> Self {
        let axis = axis.normalized_or_zero();
        if axis == Vector3::zeros() {
            return Quaternion::identity();
        }
        let half = angle / 2.0;
        Quaternion::from_parts(half.cos(), axis * half.sin())
    }

    fn normalized_or_identity(&self) -> Self {
        let length = self.norm();
        if length == 0.0 {
            return Quaternion::identity();
        }
        *self / length
    }

    fn rotate_vector(&self, v: &Vector3<f32>) -> Vector3<f32> {
        (*self * Quaternion::from_imag(*v) * self.conjugate()).imag()
    }

    fn then_after(&self, first: &Self) -> Self {
        (*self * *first).normalized_or_identity()
    }
}
