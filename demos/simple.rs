use marg_fusion::Madgwick;
use nalgebra::Vector3;

const SAMPLE_RATE: f32 = 100.0; // Hz

fn main() {
    let mut filter = Madgwick::<f32>::new(SAMPLE_RATE).expect("positive sample rate");

    for _ in 0..10 {
        // this loop should repeat each time new gyroscope data is available
        let gyroscope = Vector3::new(0.0, 0.0, 0.0); // replace with actual gyroscope data in rad/s
        let accelerometer = Vector3::new(0.0, 0.0, 1.0); // replace with actual accelerometer data in g

        filter.update_imu(gyroscope, accelerometer);

        let angles = filter.euler_angles();
        println!(
            "Yaw: {:.2}, Pitch: {:.2}, Roll: {:.2}",
            angles.yaw, angles.pitch, angles.roll
        );
    }
}
