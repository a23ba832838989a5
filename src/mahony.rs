//! Proportional-integral complementary filter (Mahony's algorithm).

use nalgebra::{ComplexField, Quaternion, RealField, Vector3, convert};

use crate::filter::AhrsFilter;
use crate::math::{FastInvSqrt, QuaternionExt, VectorExt};
use crate::types::{AhrsError, EulerAngles, MahonySettings};

/// Proportional-integral complementary orientation filter.
///
/// Each update derives an orientation error as the cross product between
/// the reference directions predicted from the current quaternion and the
/// directions actually measured, then feeds that error back into the
/// gyroscope reading through proportional and integral terms before
/// integrating. The integral term doubles as a gyroscope bias estimate.
#[derive(Debug, Clone, Copy)]
pub struct Mahony<T = f32> {
    settings: MahonySettings<T>,
    sample_rate: T,
    quaternion: Quaternion<T>,
    euler: EulerAngles<T>,
    integral_feedback: Vector3<T>,
}

impl<T> Mahony<T>
where
    T: RealField + Copy + FastInvSqrt,
{
    /// Creates a filter for a fixed sample rate in Hz with default tuning.
    ///
    /// Fails when `sample_rate` is zero or negative.
    pub fn new(sample_rate: T) -> Result<Self, AhrsError> {
        Self::with_settings(sample_rate, MahonySettings::default())
    }

    /// Creates a filter with explicit tuning.
    pub fn with_settings(sample_rate: T, settings: MahonySettings<T>) -> Result<Self, AhrsError> {
        if sample_rate <= T::zero() {
            return Err(AhrsError::NonPositiveSampleRate);
        }
        Ok(Self {
            settings,
            sample_rate,
            quaternion: Quaternion::identity(),
            euler: EulerAngles::identity(),
            integral_feedback: Vector3::zeros(),
        })
    }

    /// Configured sample rate in Hz.
    pub fn sample_rate(&self) -> T {
        self.sample_rate
    }

    /// Configured tuning.
    pub fn settings(&self) -> MahonySettings<T> {
        self.settings
    }

    /// Accumulated integral feedback, the running gyroscope bias estimate.
    pub fn integral_feedback(&self) -> Vector3<T> {
        self.integral_feedback
    }

    /// Adopts a new sample rate.
    ///
    /// A zero, negative, or unchanged rate is a no-op. Otherwise both the
    /// orientation and the integral accumulator reset, since state
    /// integrated under a different timestep is not comparable.
    pub fn set_sample_rate(&mut self, sample_rate: T) {
        if sample_rate <= T::zero() || sample_rate == self.sample_rate {
            return;
        }
        self.sample_rate = sample_rate;
        self.reset();
    }

    /// Returns the orientation to identity and clears the integral term.
    pub fn reset(&mut self) {
        self.quaternion = Quaternion::identity();
        self.euler = EulerAngles::identity();
        self.integral_feedback = Vector3::zeros();
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
        let mut corrected_gyro = gyroscope;

        // An exactly zero reading means the accelerometer is unavailable
        // this step; integrate the gyroscope alone.
        if accelerometer != Vector3::zeros() {
            let a = accelerometer.fast_normalize();
            let (q0, q1, q2, q3) = (
                self.quaternion.w,
                self.quaternion.i,
                self.quaternion.j,
                self.quaternion.k,
            );

            // Estimated direction of gravity (half magnitude)
            let half_v = Vector3::new(
                q1 * q3 - q0 * q2,
                q0 * q1 + q2 * q3,
                q0 * q0 - half + q3 * q3,
            );

            // Error is the cross product between the estimated and
            // measured directions of gravity
            let half_error = a.cross(&half_v);

            self.apply_feedback(&mut corrected_gyro, half_error);
        }

        self.integrate(corrected_gyro);
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
        let two: T = convert(2.0);
        let mut corrected_gyro = gyroscope;

        if accelerometer != Vector3::zeros() {
            let a = accelerometer.fast_normalize();
            let m = magnetometer.fast_normalize();
            let (q0, q1, q2, q3) = (
                self.quaternion.w,
                self.quaternion.i,
                self.quaternion.j,
                self.quaternion.k,
            );

            // Auxiliary products to avoid repeated arithmetic
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
            let hx = two
                * (m.x * (half - q2q2 - q3q3) + m.y * (q1q2 - q0q3) + m.z * (q1q3 + q0q2));
            let hy = two
                * (m.x * (q1q2 + q0q3) + m.y * (half - q1q1 - q3q3) + m.z * (q2q3 - q0q1));
            let bx = (hx * hx + hy * hy).sqrt();
            let bz = two
                * (m.x * (q1q3 - q0q2) + m.y * (q2q3 + q0q1) + m.z * (half - q1q1 - q2q2));

            // Estimated directions of gravity and magnetic field (half
            // magnitude)
            let half_v = Vector3::new(
                q1q3 - q0q2,
                q0q1 + q2q3,
                q0q0 - half + q3q3,
            );
            let half_w = Vector3::new(
                bx * (half - q2q2 - q3q3) + bz * (q1q3 - q0q2),
                bx * (q1q2 - q0q3) + bz * (q0q1 + q2q3),
                bx * (q0q2 + q1q3) + bz * (half - q1q1 - q2q2),
            );

            // Error is the sum of the cross products between the estimated
            // and measured directions of both field vectors
            let half_error = a.cross(&half_v) + m.cross(&half_w);

            self.apply_feedback(&mut corrected_gyro, half_error);
        }

        self.integrate(corrected_gyro);
    }

    /// Adds integral and proportional feedback to the angular rate.
    ///
    /// With the integral gain disabled the accumulator is forced to zero
    /// every step so a stale estimate cannot persist (anti-windup).
    fn apply_feedback(&mut self, gyroscope: &mut Vector3<T>, half_error: Vector3<T>) {
        let settings = self.settings;
        if settings.two_ki > T::zero() {
            let dt = T::one() / self.sample_rate;
            self.integral_feedback += half_error * (settings.two_ki * dt);
            *gyroscope += self.integral_feedback;
        } else {
            self.integral_feedback = Vector3::zeros();
        }

        *gyroscope += half_error * settings.two_kp;
    }

    /// Integrates the corrected angular rate over one sample period,
    /// renormalizes, and refreshes the cached Euler angles.
    fn integrate(&mut self, gyroscope: Vector3<T>) {
        let half: T = convert(0.5);
        let g = gyroscope * (half / self.sample_rate);
        let (qa, qb, qc, qd) = (
            self.quaternion.w,
            self.quaternion.i,
            self.quaternion.j,
            self.quaternion.k,
        );

        let q = Quaternion::new(
            qa + (-qb * g.x - qc * g.y - qd * g.z),
            qb + (qa * g.x + qc * g.z - qd * g.y),
            qc + (qa * g.y - qb * g.z + qd * g.x),
            qd + (qa * g.z + qb * g.y - qc * g.x),
        );
        self.quaternion = q.fast_normalize();
        self.euler = EulerAngles::from_quaternion(&self.quaternion);
    }
}

impl<T> AhrsFilter<T> for Mahony<T>
where
    T: RealField + Copy + FastInvSqrt,
{
    fn update_imu(&mut self, gyroscope: Vector3<T>, accelerometer: Vector3<T>) {
        Mahony::update_imu(self, gyroscope, accelerometer);
    }

    fn update(
        &mut self,
        gyroscope: Vector3<T>,
        accelerometer: Vector3<T>,
        magnetometer: Vector3<T>,
    ) {
        Mahony::update(self, gyroscope, accelerometer, magnetometer);
    }

    fn quaternion(&self) -> Quaternion<T> {
        self.quaternion
    }

    fn euler_angles(&self) -> EulerAngles<T> {
        self.euler
    }

    fn reset(&mut self) {
        Mahony::reset(self);
    }
}
