//! 3D vector helpers on top of nalgebra

pub use nalgebra::Vector3;

/// Tolerance used for approximate vector equality
pub const VECTOR_EPSILON: f32 = 1e-6;

/// Extra operations the cube code needs on `Vector3<f32>`
pub trait VectorExt {
    /// Unit vector in the same direction, or the zero vector if the length is zero
    fn normalized_or_zero(&self) -> Self;

    /// Component-wise comparison within [`VECTOR_EPSILON`]
    fn approx_eq(&self, other: &Self) -> bool;

    /// Component-wise comparison within a caller supplied tolerance
    fn approx_eq_eps(&self, other: &Self, epsilon: f32) -> bool;
}

impl VectorExt for Vector3<f32> {
    fn normalized_or_zero(&self) -> Self {
        let length = self.norm();
        if length == 0.0 {
            return Vector3::zeros();
        }
        self / length
    }

    fn approx_eq(&self, other: &Self) -> bool {
        self.approx_eq_eps(other, VECTOR_EPSILON)
    }

    fn approx_eq_eps(&self, other: &Self, epsilon: f32) -> bool {
        (self.x - other.x).abs() < epsilon
            && (self.y - other.y).abs() < epsilon
            && (self.z - other.z).abs() < epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_zero_guard() {
        let zero = Vector3::<f32>::zeros();
        assert_eq!(zero.normalized_or_zero(), Vector3::zeros());
    }

    #[test]
    fn test_normalized_length() {
        let v = Vector3::new(3.0_f32, 4.0, 0.0).normalized_or_zero();
        assert!((v.norm() - 1.0).abs() < 1e-6);
        assert!(v.approx_eq(&Vector3::new(0.6, 0.8, 0.0)));
    }

    #[test]
    fn test_algebra() {
        let a = Vector3::new(1.0_f32, 0.0, 0.0);
        let b = Vector3::new(0.0_f32, 1.0, 0.0);
        assert!(a.cross(&b).approx_eq(&Vector3::new(0.0, 0.0, 1.0)));
        assert_eq!(a.dot(&b), 0.0);
        assert!((a + b - a).approx_eq(&b));
        assert!((a * 2.0).approx_eq(&Vector3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_approx_eq_tolerance() {
        let a = Vector3::new(1.0_f32, 2.0, 3.0);
        assert!(a.approx_eq(&Vector3::new(1.0 + 5e-7, 2.0, 3.0)));
        assert!(!a.approx_eq(&Vector3::new(1.001, 2.0, 3.0)));
    }
}
