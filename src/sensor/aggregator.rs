// src/sensor/aggregator.rs

use super::rangefinder::RangefinderReader;
use crate::common::{
    error::NodeError,
    hal_traits::{Accelerometer, RangeSerial},
    reading::SensorReading,
};

/// Fuses one accelerometer poll and one rangefinder attempt into a `SensorReading`.
///
/// Owns both sensors, the last accepted distance and the last record of the
/// current burst. The distance outlives bursts: a burst that sees no valid
/// frame reports whatever was accepted last, or zero if nothing ever was.
#[derive(Debug)]
pub struct SampleAggregator<A, S> {
    accel: A,
    range: RangefinderReader<S>,
    last_distance: u16,
    last_sample: Option<SensorReading>,
}

impl<A, S> SampleAggregator<A, S>
where
    A: Accelerometer,
    S: RangeSerial,
{
    pub fn new(accel: A, range: RangefinderReader<S>) -> Self {
        SampleAggregator {
            accel,
            range,
            last_distance: 0,
            last_sample: None,
        }
    }

    /// Initializes the accelerometer. See `Accelerometer::init`.
    pub fn init(&mut self) -> Result<(), NodeError<A::Error>> {
        self.accel.init()
    }

    /// Forgets the sample of the previous burst. The distance is kept.
    pub fn begin_burst(&mut self) {
        self.last_sample = None;
    }

    /// Takes one fused sample.
    ///
    /// The accelerometer and the rangefinder are each polled exactly once. A
    /// frame that yields a distance replaces the last known one; any framing
    /// error keeps it. The only error is an accelerometer bus failure.
    pub fn sample_once(&mut self) -> Result<SensorReading, NodeError<A::Error>> {
        let accel = self.accel.poll()?;
        if let Ok(distance) = self.range.try_read_frame() {
            self.last_distance = distance;
        }
        let reading = SensorReading::new(accel, self.last_distance);
        self.last_sample = Some(reading);
        Ok(reading)
    }

    /// The last record produced since `begin_burst`.
    pub fn last_sample(&self) -> Option<SensorReading> {
        self.last_sample
    }

    /// Last distance ever accepted, zero if none.
    pub fn last_distance(&self) -> u16 {
        self.last_distance
    }

    pub fn accelerometer(&self) -> &A {
        &self.accel
    }

    pub fn accelerometer_mut(&mut self) -> &mut A {
        &mut self.accel
    }

    pub fn rangefinder_mut(&mut self) -> &mut RangefinderReader<S> {
        &mut self.range
    }
}
