//! Core types: Euler angles, per-filter settings, and the error type.

use core::fmt;

use nalgebra::{ComplexField, Quaternion, RealField, convert};

/// Errors reported by filter construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AhrsError {
    /// The sample rate passed at construction was zero or negative.
    NonPositiveSampleRate,
}

impl fmt::Display for AhrsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AhrsError::NonPositiveSampleRate => {
                write!(f, "sample rate must be positive")
            }
        }
    }
}

impl core::error::Error for AhrsError {}

/// Orientation expressed as yaw, pitch, and roll in degrees.
///
/// The angles are derived from the orientation quaternion after every
/// update; the quaternion remains the authoritative representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EulerAngles<T> {
    /// Rotation about the vertical axis, in degrees.
    pub yaw: T,
    /// Rotation about the lateral axis, in degrees. Bounded to ±90°.
    pub pitch: T,
    /// Rotation about the longitudinal axis, in degrees.
    pub roll: T,
}

impl<T> EulerAngles<T>
where
    T: RealField + Copy,
{
    /// All angles zero, matching the identity quaternion.
    pub fn identity() -> Self {
        Self {
            yaw: T::zero(),
            pitch: T::zero(),
            roll: T::zero(),
        }
    }

    /// Extracts yaw, pitch, and roll from a unit quaternion.
    ///
    /// The asin argument is clamped to [-1, 1] so that pitch saturates at
    /// ±90° near gimbal lock instead of producing NaN when rounding pushes
    /// the argument out of the domain.
    pub fn from_quaternion(q: &Quaternion<T>) -> Self {
        let one = T::one();
        let two: T = convert(2.0);
        let (q0, q1, q2, q3) = (q.w, q.i, q.j, q.k);

        let yaw = (two * (q0 * q3 + q1 * q2)).atan2(one - two * (q2 * q2 + q3 * q3));
        let pitch = nalgebra::clamp(two * (q0 * q2 - q1 * q3), -one, one).asin();
        let roll = (two * (q0 * q1 + q2 * q3)).atan2(one - two * (q1 * q1 + q2 * q2));

        let rad_to_deg: T = convert::<f64, T>(180.0) / T::pi();
        Self {
            yaw: yaw * rad_to_deg,
            pitch: pitch * rad_to_deg,
            roll: roll * rad_to_deg,
        }
    }
}

/// Tuning for the gradient-descent (Madgwick) filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MadgwickSettings<T> {
    /// Gradient-descent step size, twice the algorithm's proportional gain.
    ///
    /// Larger values track the accelerometer/magnetometer more aggressively
    /// at the cost of noise sensitivity.
    pub beta: T,
}

impl<T> Default for MadgwickSettings<T>
where
    T: RealField,
{
    fn default() -> Self {
        Self {
            beta: convert(0.033),
        }
    }
}

/// Tuning for the proportional-integral (Mahony) filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MahonySettings<T> {
    /// Proportional gain, pre-doubled (2 * Kp).
    pub two_kp: T,
    /// Integral gain, pre-doubled (2 * Ki).
    ///
    /// Zero disables integral feedback entirely; the accumulator is then
    /// held at zero every step to prevent windup.
    pub two_ki: T,
}

impl<T> Default for MahonySettings<T>
where
    T: RealField,
{
    fn default() -> Self {
        Self {
            two_kp: convert(1.0),
            two_ki: convert(0.0),
        }
    }
}
