#![no_std]

//! Madgwick and Mahony orientation filters for MARG/IMU sensor fusion.
//!
//! This crate estimates a rigid body's 3-D orientation in real time from
//! gyroscope, accelerometer, and optional magnetometer samples, producing a
//! unit quaternion and derived yaw/pitch/roll angles. It targets embedded
//! loops running at a fixed sample rate: no allocation, no operating-system
//! dependency, and every update is a bounded sequence of floating-point
//! arithmetic.
//!
//! Two drop-in-compatible filters are provided:
//!
//! - [`Madgwick`]: gradient-descent filter blending gyroscope integration
//!   with an accelerometer/magnetometer-derived correction step.
//! - [`Mahony`]: proportional-integral complementary filter with an
//!   integral accumulator that doubles as a gyroscope bias estimate.
//!
//! Both implement the [`AhrsFilter`] trait and are generic over the scalar
//! type, defaulting to `f32`; `f64` instances use the double-precision
//! magic constant in the fast inverse square root.
//!
//! # Quick Start
//!
//! ```rust
//! use marg_fusion::{AhrsFilter, Madgwick};
//! use nalgebra::Vector3;
//!
//! let mut filter = Madgwick::<f32>::new(100.0).expect("positive sample rate");
//!
//! // One iteration of the fixed-rate sensor loop.
//! let gyroscope = Vector3::new(0.01, -0.02, 0.005); // rad/s
//! let accelerometer = Vector3::new(0.0, 0.0, 1.0);  // g
//! let magnetometer = Vector3::new(22.0, 5.0, -43.0); // µT
//!
//! filter.update(gyroscope, accelerometer, magnetometer);
//!
//! let quaternion = filter.quaternion();
//! let angles = filter.euler_angles();
//! let _ = (quaternion, angles.yaw, angles.pitch, angles.roll);
//! ```

mod filter;
mod madgwick;
mod mahony;
pub mod math;
mod types;

pub use filter::AhrsFilter;
pub use madgwick::Madgwick;
pub use mahony::Mahony;
pub use math::{FastInvSqrt, QuaternionExt, VectorExt};
pub use types::{AhrsError, EulerAngles, MadgwickSettings, MahonySettings};
