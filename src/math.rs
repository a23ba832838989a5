//! Shared numerical primitives: fast reciprocal square root and the
//! normalization helpers built on top of it.

use nalgebra::{Quaternion, RealField, Vector3};

/// Scalar types supporting the fast inverse square root approximation.
///
/// The approximation reinterprets the IEEE-754 bit pattern as an integer,
/// applies the width-specific magic constant, and refines the estimate with
/// a single Newton-Raphson iteration. Relative error is roughly 0.2%, which
/// is sufficient for normalizing sensor vectors and quaternions.
///
/// The input must be positive; the result for zero or negative inputs is
/// meaningless and callers must guard against it (the filters skip their
/// corrective step when a sensor vector is exactly zero).
pub trait FastInvSqrt {
    /// Approximates `1 / sqrt(self)`.
    fn fast_inv_sqrt(self) -> Self;
}

impl FastInvSqrt for f32 {
    #[inline]
    fn fast_inv_sqrt(self) -> Self {
        let half_x = 0.5 * self;
        let y = f32::from_bits(0x5f37_59df - (self.to_bits() >> 1));
        y * (1.5 - half_x * y * y)
    }
}

impl FastInvSqrt for f64 {
    #[inline]
    fn fast_inv_sqrt(self) -> Self {
        let half_x = 0.5 * self;
        let y = f64::from_bits(0x5fe6_eb50_c7b5_37a9 - (self.to_bits() >> 1));
        y * (1.5 - half_x * y * y)
    }
}

/// Extension trait for vector normalization via [`FastInvSqrt`].
pub trait VectorExt<T> {
    /// Scales the vector to unit length using the fast inverse square root.
    ///
    /// The vector must be non-zero.
    fn fast_normalize(self) -> Self;
}

impl<T> VectorExt<T> for Vector3<T>
where
    T: RealField + Copy + FastInvSqrt,
{
    #[inline]
    fn fast_normalize(self) -> Self {
        self * self.norm_squared().fast_inv_sqrt()
    }
}

/// Extension trait for quaternion normalization via [`FastInvSqrt`].
pub trait QuaternionExt<T> {
    /// Scales the quaternion to unit norm using the fast inverse square root.
    fn fast_normalize(self) -> Self;
}

impl<T> QuaternionExt<T> for Quaternion<T>
where
    T: RealField + Copy + FastInvSqrt,
{
    #[inline]
    fn fast_normalize(self) -> Self {
        let reciprocal_norm = self.norm_squared().fast_inv_sqrt();
        Quaternion::new(
            self.w * reciprocal_norm,
            self.i * reciprocal_norm,
            self.j * reciprocal_norm,
            self.k * reciprocal_norm,
        )
    }
}
