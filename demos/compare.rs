//! Runs both filters against the same synthetic motion and prints their
//! estimates side by side.

use marg_fusion::{Madgwick, Mahony, MahonySettings};
use nalgebra::Vector3;

const SAMPLE_RATE: f32 = 100.0; // Hz
const DURATION_SECONDS: f32 = 10.0;

fn main() {
    let mut madgwick = Madgwick::<f32>::new(SAMPLE_RATE).expect("positive sample rate");
    let settings = MahonySettings {
        two_kp: 1.0,
        two_ki: 0.1,
    };
    let mut mahony = Mahony::with_settings(SAMPLE_RATE, settings).expect("positive sample rate");

    let steps = (DURATION_SECONDS * SAMPLE_RATE) as usize;
    for step in 0..steps {
        let t = step as f32 / SAMPLE_RATE;

        // Slow oscillation about the roll axis while otherwise at rest.
        let gyroscope = Vector3::new(0.5 * (t * 0.8).cos(), 0.0, 0.0);
        let roll = 0.625 * (t * 0.8).sin();
        let accelerometer = Vector3::new(0.0, roll.sin(), roll.cos());
        let magnetometer = Vector3::new(22.0, 0.0, -43.0);

        madgwick.update(gyroscope, accelerometer, magnetometer);
        mahony.update(gyroscope, accelerometer, magnetometer);

        if step % 100 == 0 {
            let a = madgwick.euler_angles();
            let b = mahony.euler_angles();
            println!(
                "t = {t:5.2}s  madgwick roll: {:7.2}  mahony roll: {:7.2}  (true: {:7.2})",
                a.roll,
                b.roll,
                roll.to_degrees()
            );
        }
    }
}
