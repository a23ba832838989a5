//! Common interface implemented by both fusion filters.

use nalgebra::{Quaternion, Vector3};

use crate::types::EulerAngles;

/// Interface shared by the Madgwick and Mahony filters.
///
/// Both filters are drop-in replacements for one another: a consumer can
/// hold an `impl AhrsFilter<f32>` and swap the algorithm without touching
/// the update loop. Units are fixed across implementations: gyroscope in
/// radians per second, accelerometer and magnetometer in any consistent
/// unit (only the direction is used), Euler angles in degrees.
pub trait AhrsFilter<T> {
    /// Advances the filter by one sample period using gyroscope and
    /// accelerometer readings only.
    ///
    /// An accelerometer reading that is exactly the zero vector marks the
    /// sensor as unavailable for this step; gyroscope integration still
    /// runs but the corrective term is skipped.
    fn update_imu(&mut self, gyroscope: Vector3<T>, accelerometer: Vector3<T>);

    /// Advances the filter by one sample period using gyroscope,
    /// accelerometer, and magnetometer readings.
    ///
    /// A magnetometer reading that is exactly the zero vector falls back
    /// to [`update_imu`](Self::update_imu) with the same gyroscope and
    /// accelerometer inputs.
    fn update(
        &mut self,
        gyroscope: Vector3<T>,
        accelerometer: Vector3<T>,
        magnetometer: Vector3<T>,
    );

    /// Current orientation as a unit quaternion (scalar part first).
    fn quaternion(&self) -> Quaternion<T>;

    /// Current orientation as yaw, pitch, and roll in degrees.
    fn euler_angles(&self) -> EulerAngles<T>;

    /// Returns the filter to its initial state: identity orientation and,
    /// where applicable, zeroed integral feedback.
    fn reset(&mut self);
}
