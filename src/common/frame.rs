// src/common/frame.rs

/// Size of one rangefinder frame on the wire.
pub const FRAME_LEN: usize = 4;

/// First byte of every rangefinder frame.
pub const FRAME_MARKER: u8 = 0xFF;

/// Distances at or below this value (mm) are outside the sensor's reliable range.
pub const LOWER_LIMIT_MM: u16 = 30;

/// Why a frame attempt did not produce a distance.
///
/// These never fail a sample; they are reported for observability and the
/// last known distance is kept.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum FrameError {
    /// Fewer than `FRAME_LEN` bytes were buffered. Nothing was consumed.
    #[error("Not enough data available: {available} bytes")]
    InsufficientData { available: usize },

    /// The first byte was not `FRAME_MARKER`.
    #[error("Invalid start byte: {0:#04x}")]
    InvalidStartByte(u8),

    /// Received checksum does not match the calculated one.
    #[error("Checksum mismatch: expected {expected:#04x}, calculated {calculated:#04x}")]
    ChecksumMismatch { expected: u8, calculated: u8 },

    /// Well-formed frame whose distance is at or below `LOWER_LIMIT_MM`.
    #[error("Below the lower limit: {0} mm")]
    BelowLowerLimit(u16),

    /// The serial port reported an error or ran dry mid-frame.
    #[error("Serial read failure")]
    ReadFailure,
}

/// One raw 4-byte frame from the rangefinder: `FF HH LL SUM`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RangeFrame {
    pub marker: u8,
    pub high: u8,
    pub low: u8,
    pub checksum: u8,
}

impl RangeFrame {
    pub const fn from_bytes(bytes: [u8; FRAME_LEN]) -> Self {
        RangeFrame {
            marker: bytes[0],
            high: bytes[1],
            low: bytes[2],
            checksum: bytes[3],
        }
    }

    /// Builds a well-formed frame for `distance_mm`, checksum included.
    pub const fn encode(distance_mm: u16) -> Self {
        let high = (distance_mm >> 8) as u8;
        let low = distance_mm as u8;
        RangeFrame {
            marker: FRAME_MARKER,
            high,
            low,
            checksum: frame_checksum(FRAME_MARKER, high, low),
        }
    }

    pub const fn to_bytes(&self) -> [u8; FRAME_LEN] {
        [self.marker, self.high, self.low, self.checksum]
    }

    /// Raw distance in millimetres, without any validation.
    #[inline]
    pub const fn distance_mm(&self) -> u16 {
        ((self.high as u16) << 8) + self.low as u16
    }

    /// Validates marker, checksum and range, in that order.
    pub fn validate(&self) -> Result<u16, FrameError> {
        self.validate_above(LOWER_LIMIT_MM)
    }

    /// Same as `validate`, with distances `<= lower_limit_mm` rejected.
    pub fn validate_above(&self, lower_limit_mm: u16) -> Result<u16, FrameError> {
        if self.marker != FRAME_MARKER {
            return Err(FrameError::InvalidStartByte(self.marker));
        }
        let calculated = frame_checksum(self.marker, self.high, self.low);
        if calculated != self.checksum {
            return Err(FrameError::ChecksumMismatch { expected: self.checksum, calculated });
        }
        let distance = self.distance_mm();
        if distance <= lower_limit_mm {
            return Err(FrameError::BelowLowerLimit(distance));
        }
        Ok(distance)
    }
}

impl From<[u8; FRAME_LEN]> for RangeFrame {
    fn from(value: [u8; FRAME_LEN]) -> Self {
        RangeFrame::from_bytes(value)
    }
}

/// Low byte of the sum of the first three frame bytes.
#[inline]
pub const fn frame_checksum(marker: u8, high: u8, low: u8) -> u8 {
    marker.wrapping_add(high).wrapping_add(low)
}
