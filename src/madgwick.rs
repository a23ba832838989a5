//! Gradient-descent orientation filter (Madgwick's algorithm).

use nalgebra::{ComplexField, Quaternion, RealField, Vector3, convert};

use crate::filter::AhrsFilter;
use crate::math::{FastInvSqrt, QuaternionExt, VectorExt};
use crate::types::{AhrsError, EulerAngles, MadgwickSettings};

/// Gradient-descent orientation filter.
///
/// Each update step blends gyroscope integration with a gradient-descent
/// correction that pulls the orientation toward the reference directions
/// measured by the accelerometer (gravity) and, in the nine-axis path, the
/// magnetometer (Earth's magnetic field).
///
/// The filter owns its entire state; instances are independent and a single
/// instance must be updated from one execution context at a time.
#[derive(Debug, Clone, Copy)]
pub struct Madgwick<T = f32> {
    settings: MadgwickSettings<T>,
    sample_rate: T,
    quaternion: Quaternion<T>,
    euler: EulerAngles<T>,
}

impl<T> Madgwick<T>
where
    T: RealField + Copy + FastInvSqrt,
{
    /// Creates a filter for a fixed sample rate in Hz with default tuning.
    ///
    /// Fails when `sample_rate` is zero or negative.
    pub fn new(sample_rate: T) -> Result<Self, AhrsError> {
        Self::with_settings(sample_rate, MadgwickSettings::default())
    }

    /// Creates a filter with explicit tuning.
    pub fn with_settings(
        sample_rate: T,
        settings: MadgwickSettings<T>,
    ) -> Result<Self, AhrsError> {
        if sample_rate <= T::zero() {
            return Err(AhrsError::NonPositiveSampleRate);
        }
        Ok(Self {
            settings,
            sample_rate,
            quaternion: Quaternion::identity(),
            euler: EulerAngles::identity(),
        })
    }

    /// Configured sample rate in Hz.
    pub fn sample_rate(&self) -> T {
        self.sample_rate
    }

    /// Configured tuning.
    pub fn settings(&self) -> MadgwickSettings<T> {
        self.settings
    }

    /// Adopts a new sample rate.
    ///
    /// A zero, negative, or unchanged rate is a no-op. Otherwise the
    /// orientation resets to identity, since state integrated under a
    /// different timestep is not comparable.
    pub fn set_sample_rate(&mut self, sample_rate: T) {
        if sample_rate <= T::zero() || sample_rate == self.sample_rate {
            return;
        }
        self.sample_rate = sample_rate;
        self.reset();
    }

    /// Returns the orientation to the identity quaternion.
    pub fn reset(&mut self) {
        self.quaternion = Quaternion::identity();
        self.euler = EulerAngles::identity();
    }

    /// Current orientation as a unit quaternion (scalar part first).
    pub fn quaternion(&self) -> Quaternion<T> {
        self.quaternion
    }

    /// Yaw, pitch, and roll in degrees, recomputed on every update.
    pub fn euler_angles(&self) -> EulerAngles<T> {
        self.euler
    }

    /// Six-axis update from gyroscope (rad/s) and accelerometer readings.
    pub fn update_imu(&mut self, gyroscope: Vector3<T>, accelerometer: Vector3<T>) {
        let half: T = convert(0.5);
        let (gx, gy, gz) = (gyroscope.x, gyroscope.y, gyroscope.z);
        let (q0, q1, q2, q3) = (
            self.quaternion.w,
            self.quaternion.i,
            self.quaternion.j,
            self.quaternion.k,
        );

        // Rate of change of quaternion from gyroscope
        let mut q_dot0 = half * (-q1 * gx - q2 * gy - q3 * gz);
        let mut q_dot1 = half * (q0 * gx + q2 * gz - q3 * gy);
        let mut q_dot2 = half * (q0 * gy - q1 * gz + q3 * gx);
        let mut q_dot3 = half * (q0 * gz + q1 * gy - q2 * gx);

        // An exactly zero reading means the accelerometer is unavailable
        // this step; integrate the gyroscope alone.
        if accelerometer != Vector3::zeros() {
            let a = accelerometer.fast_normalize();
            let (ax, ay, az) = (a.x, a.y, a.z);

            let two: T = convert(2.0);
            let four: T = convert(4.0);
            let eight: T = convert(8.0);

            // Auxiliary products to avoid repeated arithmetic
            let two_q0 = two * q0;
            let two_q1 = two * q1;
            let two_q2 = two * q2;
            let two_q3 = two * q3;
            let four_q0 = four * q0;
            let four_q1 = four * q1;
            let four_q2 = four * q2;
            let eight_q1 = eight * q1;
            let eight_q2 = eight * q2;
            let q0q0 = q0 * q0;
            let q1q1 = q1 * q1;
            let q2q2 = q2 * q2;
            let q3q3 = q3 * q3;

            // Gradient-descent corrective step
            let s0 = four_q0 * q2q2 + two_q2 * ax + four_q0 * q1q1 - two_q1 * ay;
            let s1 = four_q1 * q3q3 - two_q3 * ax + four * q0q0 * q1 - two_q0 * ay - four_q1
                + eight_q1 * q1q1
                + eight_q1 * q2q2
                + four_q1 * az;
            let s2 = four * q0q0 * q2 + two_q0 * ax + four_q2 * q3q3 - two_q3 * ay - four_q2
                + eight_q2 * q1q1
                + eight_q2 * q2q2
                + four_q2 * az;
            let s3 = four * q1q1 * q3 - two_q1 * ax + four * q2q2 * q3 - two_q2 * ay;

            let reciprocal_norm = (s0 * s0 + s1 * s1 + s2 * s2 + s3 * s3).fast_inv_sqrt();
            let beta = self.settings.beta;
            q_dot0 -= beta * s0 * reciprocal_norm;
            q_dot1 -= beta * s1 * reciprocal_norm;
            q_dot2 -= beta * s2 * reciprocal_norm;
            q_dot3 -= beta * s3 * reciprocal_norm;
        }

        self.integrate(q_dot0, q_dot1, q_dot2, q_dot3);
    }

    /// Nine-axis update from gyroscope (rad/s), accelerometer, and
    /// magnetometer readings.
    ///
    /// An exactly zero magnetometer reading signals that no magnetometer is
    /// present and falls back to the six-axis algorithm.
    pub fn update(
        &mut self,
        gyroscope: Vector3<T>,
        accelerometer: Vector3<T>,
        magnetometer: Vector3<T>,
    ) {
        if magnetometer == Vector3::zeros() {
            self.update_imu(gyroscope, accelerometer);
            return;
        }

        let half: T = convert(0.5);
        let (gx, gy, gz) = (gyroscope.x, gyroscope.y, gyroscope.z);
        let (q0, q1, q2, q3) = (
            self.quaternion.w,
            self.quaternion.i,
            self.quaternion.j,
            self.quaternion.k,
        );

        // Rate of change of quaternion from gyroscope
        let mut q_dot0 = half * (-q1 * gx - q2 * gy - q3 * gz);
        let mut q_dot1 = half * (q0 * gx + q2 * gz - q3 * gy);
        let mut q_dot2 = half * (q0 * gy - q1 * gz + q3 * gx);
        let mut q_dot3 = half * (q0 * gz + q1 * gy - q2 * gx);

        if accelerometer != Vector3::zeros() {
            let a = accelerometer.fast_normalize();
            let m = magnetometer.fast_normalize();
            let (ax, ay, az) = (a.x, a.y, a.z);
            let (mx, my, mz) = (m.x, m.y, m.z);

            let one = T::one();
            let two: T = convert(2.0);
            let four: T = convert(4.0);

            // Auxiliary products to avoid repeated arithmetic
            let two_q0mx = two * q0 * mx;
            let two_q0my = two * q0 * my;
            let two_q0mz = two * q0 * mz;
            let two_q1mx = two * q1 * mx;
            let two_q0 = two * q0;
            let two_q1 = two * q1;
            let two_q2 = two * q2;
            let two_q3 = two * q3;
            let two_q0q2 = two * q0 * q2;
            let two_q2q3 = two * q2 * q3;
            let q0q0 = q0 * q0;
            let q0q1 = q0 * q1;
            let q0q2 = q0 * q2;
            let q0q3 = q0 * q3;
            let q1q1 = q1 * q1;
            let q1q2 = q1 * q2;
            let q1q3 = q1 * q3;
            let q2q2 = q2 * q2;
            let q2q3 = q2 * q3;
            let q3q3 = q3 * q3;

            // Reference direction of Earth's magnetic field
            let hx = mx * q0q0 - two_q0my * q3 + two_q0mz * q2 + mx * q1q1
                + two_q1 * my * q2
                + two_q1 * mz * q3
                - mx * q2q2
                - mx * q3q3;
            let hy = two_q0mx * q3 + my * q0q0 - two_q0mz * q1 + two_q1mx * q2 - my * q1q1
                + my * q2q2
                + two_q2 * mz * q3
                - my * q3q3;
            let two_bx = (hx * hx + hy * hy).sqrt();
            let two_bz = -two_q0mx * q2 + two_q0my * q1 + mz * q0q0 + two_q1mx * q3 - mz * q1q1
                + two_q2 * my * q3
                - mz * q2q2
                + mz * q3q3;
            let four_bx = two * two_bx;
            let four_bz = two * two_bz;

            // Residuals of the objective function, shared by all four
            // gradient components
            let f_gx = two * q1q3 - two_q0q2 - ax;
            let f_gy = two * q0q1 + two_q2q3 - ay;
            let f_gz = one - two * q1q1 - two * q2q2 - az;
            let f_bx = two_bx * (half - q2q2 - q3q3) + two_bz * (q1q3 - q0q2) - mx;
            let f_by = two_bx * (q1q2 - q0q3) + two_bz * (q0q1 + q2q3) - my;
            let f_bz = two_bx * (q0q2 + q1q3) + two_bz * (half - q1q1 - q2q2) - mz;

            // Gradient-descent corrective step
            let s0 = -two_q2 * f_gx + two_q1 * f_gy - two_bz * q2 * f_bx
                + (-two_bx * q3 + two_bz * q1) * f_by
                + two_bx * q2 * f_bz;
            let s1 = two_q3 * f_gx + two_q0 * f_gy - four * q1 * f_gz + two_bz * q3 * f_bx
                + (two_bx * q2 + two_bz * q0) * f_by
                + (two_bx * q3 - four_bz * q1) * f_bz;
            let s2 = -two_q0 * f_gx + two_q3 * f_gy - four * q2 * f_gz
                + (-four_bx * q2 - two_bz * q0) * f_bx
                + (two_bx * q1 + two_bz * q3) * f_by
                + (two_bx * q0 - four_bz * q2) * f_bz;
            let s3 = two_q1 * f_gx + two_q2 * f_gy + (-four_bx * q3 + two_bz * q1) * f_bx
                + (-two_bx * q0 + two_bz * q2) * f_by
                + two_bx * q1 * f_bz;

            let reciprocal_norm = (s0 * s0 + s1 * s1 + s2 * s2 + s3 * s3).fast_inv_sqrt();
            let beta = self.settings.beta;
            q_dot0 -= beta * s0 * reciprocal_norm;
            q_dot1 -= beta * s1 * reciprocal_norm;
            q_dot2 -= beta * s2 * reciprocal_norm;
            q_dot3 -= beta * s3 * reciprocal_norm;
        }

        self.integrate(q_dot0, q_dot1, q_dot2, q_dot3);
    }

    /// Integrates the quaternion derivative over one sample period,
    /// renormalizes, and refreshes the cached Euler angles.
    fn integrate(&mut self, q_dot0: T, q_dot1: T, q_dot2: T, q_dot3: T) {
        let dt = T::one() / self.sample_rate;
        let q = Quaternion::new(
            self.quaternion.w + q_dot0 * dt,
            self.quaternion.i + q_dot1 * dt,
            self.quaternion.j + q_dot2 * dt,
            self.quaternion.k + q_dot3 * dt,
        );
        self.quaternion = q.fast_normalize();
        self.euler = EulerAngles::from_quaternion(&self.quaternion);
    }
}

impl<T> AhrsFilter<T> for Madgwick<T>
where
    T: RealField + Copy + FastInvSqrt,
{
    fn update_imu(&mut self, gyroscope: Vector3<T>, accelerometer: Vector3<T>) {
        Madgwick::update_imu(self, gyroscope, accelerometer);
    }

    fn update(
        &mut self,
        gyroscope: Vector3<T>,
        accelerometer: Vector3<T>,
        magnetometer: Vector3<T>,
    ) {
        Madgwick::update(self, gyroscope, accelerometer, magnetometer);
    }

    fn quaternion(&self) -> Quaternion<T> {
        self.quaternion
    }

    fn euler_angles(&self) -> EulerAngles<T> {
        self.euler
    }

    fn reset(&mut self) {
        Madgwick::reset(self);
    }
}
