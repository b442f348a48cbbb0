// src/sensor/mod.rs

// Everything that touches the physical sensors lives here. These types run in
// the timer interrupt context and are owned by the `BurstRunner`.

pub mod accelerometer;
pub mod aggregator;
pub mod rangefinder;

// --- Public Re-exports ---
pub use accelerometer::{Adxl345, AnyAccelerometer, Mpu6050};
pub use aggregator::SampleAggregator;
pub use rangefinder::{RangefinderReader, RxBuffer};
