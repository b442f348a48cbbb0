// src/common/config.rs

use super::frame::LOWER_LIMIT_MM;

/// Which accelerometer is fitted to the node.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum AccelBackend {
    /// Analog Devices ADXL345 on I2C.
    Adxl345,
    /// InvenSense MPU-6050 on I2C.
    Mpu6050,
}

/// Wire protocol of the rangefinder.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum RangeProtocol {
    /// `FF HH LL SUM` frames, distance in mm, as sent by the A01NYUB family.
    FourByteFrame,
}

impl RangeProtocol {
    /// Smallest distance (exclusive, in mm) the protocol reports reliably.
    pub const fn lower_limit_mm(&self) -> u16 {
        match self {
            RangeProtocol::FourByteFrame => LOWER_LIMIT_MM,
        }
    }
}

/// Startup configuration of the node.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NodeConfig {
    /// The fitted accelerometer.
    pub backend: AccelBackend,
    /// The rangefinder protocol.
    pub protocol: RangeProtocol,
}

impl NodeConfig {
    /// Creates a new `NodeConfig` instance.
    ///
    /// # Arguments
    ///
    /// * `backend` - The fitted accelerometer.
    /// * `protocol` - The rangefinder protocol.
    pub fn new(backend: AccelBackend, protocol: RangeProtocol) -> NodeConfig {
        NodeConfig { backend, protocol }
    }

    /// Sets the accelerometer backend.
    pub fn backend(mut self, backend: AccelBackend) -> Self {
        self.backend = backend;
        self
    }

    /// Sets the rangefinder protocol.
    pub fn protocol(mut self, protocol: RangeProtocol) -> Self {
        self.protocol = protocol;
        self
    }
}

/// The default configuration is an ADXL345 with a four byte frame rangefinder.
impl Default for NodeConfig {
    fn default() -> NodeConfig {
        NodeConfig {
            backend: AccelBackend::Adxl345,
            protocol: RangeProtocol::FourByteFrame,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = NodeConfig::default().backend(AccelBackend::Mpu6050);
        assert_eq!(config.backend, AccelBackend::Mpu6050);
        assert_eq!(config.protocol, RangeProtocol::FourByteFrame);
        assert_eq!(config.protocol.lower_limit_mm(), 30);
    }
}
