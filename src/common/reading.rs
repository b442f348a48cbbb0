// src/common/reading.rs

use super::error::NodeError;

/// Size of the reply payload on the wire.
pub const REPLY_LEN: usize = 20;

/// One 3-axis acceleration sample in m/s².
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Acceleration3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Acceleration3D {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Acceleration3D { x, y, z }
    }
}

/// The record sent back to a requester at the end of a burst.
///
/// Wire layout (little-endian, 20 bytes):
///
/// | offset | field      | type |
/// |--------|------------|------|
/// | 0      | `ax`       | f32  |
/// | 4      | `ay`       | f32  |
/// | 8      | `az`       | f32  |
/// | 12     | `distance` | i32  |
/// | 16     | `tempo`    | i32  |
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct SensorReading {
    pub ax: f32,
    pub ay: f32,
    pub az: f32,
    /// Distance in millimetres; zero when no frame was accepted.
    pub distance: i32,
    /// Reserved, always zero.
    pub tempo: i32,
}

impl SensorReading {
    pub fn new(accel: Acceleration3D, distance_mm: u16) -> Self {
        SensorReading {
            ax: accel.x,
            ay: accel.y,
            az: accel.z,
            distance: i32::from(distance_mm),
            tempo: 0,
        }
    }

    pub fn acceleration(&self) -> Acceleration3D {
        Acceleration3D::new(self.ax, self.ay, self.az)
    }

    pub fn to_le_bytes(&self) -> [u8; REPLY_LEN] {
        let mut out = [0u8; REPLY_LEN];
        out[0..4].copy_from_slice(&self.ax.to_le_bytes());
        out[4..8].copy_from_slice(&self.ay.to_le_bytes());
        out[8..12].copy_from_slice(&self.az.to_le_bytes());
        out[12..16].copy_from_slice(&self.distance.to_le_bytes());
        out[16..20].copy_from_slice(&self.tempo.to_le_bytes());
        out
    }

    pub fn from_le_bytes(bytes: &[u8; REPLY_LEN]) -> Self {
        let word = |i: usize| [bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]];
        SensorReading {
            ax: f32::from_le_bytes(word(0)),
            ay: f32::from_le_bytes(word(4)),
            az: f32::from_le_bytes(word(8)),
            distance: i32::from_le_bytes(word(12)),
            tempo: i32::from_le_bytes(word(16)),
        }
    }
}

impl TryFrom<&[u8]> for SensorReading {
    type Error = NodeError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let bytes: &[u8; REPLY_LEN] = value.try_into().map_err(|_| NodeError::InvalidLength {
            expected: REPLY_LEN,
            got: value.len(),
        })?;
        Ok(SensorReading::from_le_bytes(bytes))
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_layout() {
        let reading = SensorReading { ax: 1.0, ay: 2.0, az: 3.0, distance: 100, tempo: 0 };
        let bytes = reading.to_le_bytes();
        assert_eq!(&bytes[0..4], &[0x00, 0x00, 0x80, 0x3F]); // 1.0f32
        assert_eq!(&bytes[4..8], &[0x00, 0x00, 0x00, 0x40]); // 2.0f32
        assert_eq!(&bytes[8..12], &[0x00, 0x00, 0x40, 0x40]); // 3.0f32
        assert_eq!(&bytes[12..16], &[100, 0, 0, 0]);
        assert_eq!(&bytes[16..20], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_try_from_slice() {
        let reading = SensorReading { ax: -9.81, ay: 0.25, az: 0.0, distance: 4500, tempo: 0 };
        let bytes = reading.to_le_bytes();
        assert_eq!(SensorReading::try_from(&bytes[..]), Ok(reading));
        assert_eq!(
            SensorReading::try_from(&bytes[..19]),
            Err(NodeError::InvalidLength { expected: 20, got: 19 })
        );
    }

    #[test]
    fn test_default_is_all_zero() {
        assert_eq!(SensorReading::default().to_le_bytes(), [0u8; REPLY_LEN]);
    }

    #[test]
    fn test_new_from_parts() {
        let reading = SensorReading::new(Acceleration3D::new(0.5, -0.5, 9.8), 321);
        assert_eq!(reading.distance, 321);
        assert_eq!(reading.tempo, 0);
        assert_eq!(reading.acceleration(), Acceleration3D::new(0.5, -0.5, 9.8));
    }
}
