// src/common/hal_traits.rs

use super::{address::PeerAddr, error::NodeError, reading::Acceleration3D};
use core::fmt::Debug;
use core::time::Duration;

/// Byte-oriented receive side of the rangefinder's serial port.
///
/// The module transmits continuously; implementations buffer what arrives
/// and hand it out on demand.
pub trait RangeSerial {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Number of bytes currently buffered and readable without blocking.
    fn available(&self) -> usize;

    /// Attempts to read a single byte from the receive buffer.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` if the buffer is empty. Other errors
    /// are returned as `Err(nb::Error::Other(Self::Error))`.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;
}

/// A polled 3-axis accelerometer.
pub trait Accelerometer {
    /// Bus error type of the underlying driver.
    type Error: Debug;

    /// Probes and configures the device. Must succeed before `poll`.
    ///
    /// Returns `NodeError::SensorAbsent` if the device does not identify itself.
    fn init(&mut self) -> Result<(), NodeError<Self::Error>>;

    /// Reads one acceleration sample in m/s².
    fn poll(&mut self) -> Result<Acceleration3D, NodeError<Self::Error>>;
}

/// Outbound side of the peer-to-peer radio.
///
/// Methods take `&self`: the link is shared between the request callback and
/// the timer interrupt, and implementations must be safe to call from both.
pub trait RadioLink {
    /// Associated error type for transmit failures.
    type Error: Debug;

    /// Makes `peer` a valid destination for `send`.
    ///
    /// Transports that need peers registered before a unicast (ESP-NOW does)
    /// override this. Registering an already known peer must succeed.
    fn ensure_peer(&self, _peer: &PeerAddr) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Queues `payload` for transmission to `peer`. Fire-and-forget: success
    /// means the frame was handed to the radio, not that it was received.
    fn send(&self, peer: &PeerAddr, payload: &[u8]) -> Result<(), Self::Error>;
}

/// The hardware timer that drives burst firings.
///
/// Methods take `&self`; `start_periodic` is called from the request context
/// and `stop` from inside the timer interrupt.
pub trait BurstTimer {
    /// Starts (or restarts) a periodic alarm every `interval`.
    fn start_periodic(&self, interval: Duration);

    /// Disables the alarm. Stopping a stopped timer is a no-op.
    fn stop(&self);
}
