// src/sensor/rangefinder.rs

use crate::common::{
    config::RangeProtocol,
    frame::{FrameError, RangeFrame, FRAME_LEN},
    hal_traits::RangeSerial,
};
use core::convert::Infallible;
use heapless::Deque;
use log::{debug, warn};

/// Reads distance frames from a continuously transmitting rangefinder.
///
/// One call to `try_read_frame` is one frame attempt. There is no
/// resynchronisation: if the stream is misaligned, attempts keep failing on
/// the start byte until the module's output realigns.
#[derive(Debug)]
pub struct RangefinderReader<S> {
    serial: S,
    protocol: RangeProtocol,
}

impl<S> RangefinderReader<S>
where
    S: RangeSerial,
{
    pub fn new(serial: S, protocol: RangeProtocol) -> Self {
        RangefinderReader { serial, protocol }
    }

    /// Attempts to read and validate one frame.
    ///
    /// Never blocks. With fewer than `FRAME_LEN` bytes buffered nothing is
    /// consumed and `InsufficientData` is returned. Otherwise exactly
    /// `FRAME_LEN` reads are made whether or not the frame is valid, even if
    /// one of them fails, so a bad byte never shifts the following frames.
    pub fn try_read_frame(&mut self) -> Result<u16, FrameError> {
        let available = self.serial.available();
        if available < FRAME_LEN {
            debug!("Not enough data available ({} bytes)", available);
            return Err(FrameError::InsufficientData { available });
        }

        let mut bytes = [0u8; FRAME_LEN];
        let mut failed = false;
        for slot in bytes.iter_mut() {
            match self.serial.read_byte() {
                Ok(byte) => *slot = byte,
                Err(e) => {
                    warn!("Rangefinder read failed mid-frame: {:?}", e);
                    failed = true;
                }
            }
        }
        if failed {
            return Err(FrameError::ReadFailure);
        }

        let frame = RangeFrame::from_bytes(bytes);
        match frame.validate_above(self.protocol.lower_limit_mm()) {
            Ok(distance) => {
                debug!("distance={}mm", distance);
                Ok(distance)
            }
            Err(e) => {
                warn!("Rangefinder frame {:02X?} rejected: {}", bytes, e);
                Err(e)
            }
        }
    }

    pub fn serial(&self) -> &S {
        &self.serial
    }

    pub fn serial_mut(&mut self) -> &mut S {
        &mut self.serial
    }

    pub fn into_inner(self) -> S {
        self.serial
    }
}

/// Fixed-capacity receive buffer for the rangefinder UART.
///
/// Filled from the UART receive path (`push`, `pump`) and drained by
/// `RangefinderReader`. When full, newly arriving bytes are dropped and
/// counted, the way a software serial receive buffer behaves.
#[derive(Debug)]
pub struct RxBuffer<const N: usize> {
    bytes: Deque<u8, N>,
    dropped: usize,
}

impl<const N: usize> RxBuffer<N> {
    pub const fn new() -> Self {
        RxBuffer {
            bytes: Deque::new(),
            dropped: 0,
        }
    }

    /// Appends one received byte. Returns `false` if it was dropped.
    pub fn push(&mut self, byte: u8) -> bool {
        match self.bytes.push_back(byte) {
            Ok(()) => true,
            Err(_) => {
                self.dropped += 1;
                false
            }
        }
    }

    /// Appends every byte of `data`, dropping what does not fit.
    pub fn extend_from_slice(&mut self, data: &[u8]) {
        for &byte in data {
            self.push(byte);
        }
    }

    /// Drains a non-blocking byte source until it would block.
    ///
    /// Returns the number of bytes taken from `read` (including dropped ones).
    pub fn pump<E, F>(&mut self, mut read: F) -> Result<usize, E>
    where
        F: FnMut() -> nb::Result<u8, E>,
    {
        let mut count = 0;
        loop {
            match read() {
                Ok(byte) => {
                    self.push(byte);
                    count += 1;
                }
                Err(nb::Error::WouldBlock) => return Ok(count),
                Err(nb::Error::Other(e)) => return Err(e),
            }
        }
    }

    /// Bytes dropped because the buffer was full.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }
}

impl<const N: usize> Default for RxBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RangeSerial for RxBuffer<N> {
    type Error = Infallible;

    fn available(&self) -> usize {
        self.bytes.len()
    }

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        self.bytes.pop_front().ok_or(nb::Error::WouldBlock)
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    // --- Mock Serial that fails on demand ---
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    struct MockSerialError;

    // Replays `bytes`, failing once on read number `fail_at` (0-based).
    struct FlakySerial {
        bytes: std::collections::VecDeque<u8>,
        reads: usize,
        fail_at: usize,
    }
    impl RangeSerial for FlakySerial {
        type Error = MockSerialError;
        fn available(&self) -> usize {
            self.bytes.len()
        }
        fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
            let n = self.reads;
            self.reads += 1;
            let byte = self.bytes.pop_front().ok_or(nb::Error::WouldBlock)?;
            if n == self.fail_at {
                return Err(nb::Error::Other(MockSerialError));
            }
            Ok(byte)
        }
    }

    fn reader_with(data: &[u8]) -> RangefinderReader<RxBuffer<64>> {
        let mut rx = RxBuffer::new();
        rx.extend_from_slice(data);
        RangefinderReader::new(rx, RangeProtocol::FourByteFrame)
    }

    #[test]
    fn test_valid_frame() {
        let mut reader = reader_with(&[0xFF, 0x00, 0x64, 0x63]);
        assert_eq!(reader.try_read_frame(), Ok(100));
        assert!(reader.serial().is_empty());
    }

    #[test]
    fn test_insufficient_data_consumes_nothing() {
        let mut reader = reader_with(&[0xFF, 0x00, 0x64]);
        for _ in 0..3 {
            assert_eq!(
                reader.try_read_frame(),
                Err(FrameError::InsufficientData { available: 3 })
            );
        }
        assert_eq!(reader.serial().len(), 3);

        // The fourth byte completes the frame.
        reader.serial_mut().push(0x63);
        assert_eq!(reader.try_read_frame(), Ok(100));
    }

    #[test]
    fn test_empty_buffer() {
        let mut reader = reader_with(&[]);
        assert_eq!(reader.try_read_frame(), Err(FrameError::InsufficientData { available: 0 }));
    }

    #[test]
    fn test_invalid_frames_still_consume_four_bytes() {
        let mut reader = reader_with(&[
            0x00, 0x00, 0x64, 0x63, // bad start byte
            0xFF, 0x00, 0x64, 0x00, // bad checksum
            0xFF, 0x00, 0x1E, 0x1D, // 30mm, at the limit
            0xFF, 0x01, 0x2C, 0x2C, // 300mm
        ]);
        assert_eq!(reader.try_read_frame(), Err(FrameError::InvalidStartByte(0x00)));
        assert_eq!(reader.serial().len(), 12);
        assert_eq!(
            reader.try_read_frame(),
            Err(FrameError::ChecksumMismatch { expected: 0x00, calculated: 0x63 })
        );
        assert_eq!(reader.serial().len(), 8);
        assert_eq!(reader.try_read_frame(), Err(FrameError::BelowLowerLimit(30)));
        assert_eq!(reader.serial().len(), 4);
        assert_eq!(reader.try_read_frame(), Ok(300));
        assert!(reader.serial().is_empty());
    }

    #[test]
    fn test_misaligned_stream_is_not_resynchronised() {
        // A stray byte shifts every following frame by one.
        let mut reader = reader_with(&[0x63, 0xFF, 0x00, 0x64, 0x63, 0xFF, 0x00, 0x64]);
        assert_eq!(reader.try_read_frame(), Err(FrameError::InvalidStartByte(0x63)));
        assert_eq!(reader.try_read_frame(), Err(FrameError::InvalidStartByte(0x63)));
    }

    #[test]
    fn test_read_failure_mid_frame_still_consumes_frame() {
        let serial = FlakySerial {
            bytes: [0xFF, 0x00, 0x64, 0x63, 0xFF, 0x01, 0x2C, 0x2C].into_iter().collect(),
            reads: 0,
            fail_at: 2,
        };
        let mut reader = RangefinderReader::new(serial, RangeProtocol::FourByteFrame);
        assert_eq!(reader.try_read_frame(), Err(FrameError::ReadFailure));
        assert_eq!(reader.serial().reads, 4);
        assert_eq!(reader.serial().available(), 4);

        // The next frame is still aligned.
        assert_eq!(reader.try_read_frame(), Ok(300));
    }

    #[test]
    fn test_rx_buffer_overflow_drops_newest() {
        let mut rx: RxBuffer<4> = RxBuffer::new();
        rx.extend_from_slice(&[0xFF, 0x00, 0x64, 0x63, 0xAA, 0xBB]);
        assert_eq!(rx.len(), 4);
        assert_eq!(rx.dropped(), 2);

        let mut reader = RangefinderReader::new(rx, RangeProtocol::FourByteFrame);
        assert_eq!(reader.try_read_frame(), Ok(100));
    }

    #[test]
    fn test_rx_buffer_pump() {
        let mut source = [0xFF, 0x00, 0x64, 0x63].into_iter();
        let mut rx: RxBuffer<8> = RxBuffer::new();
        let taken: Result<usize, MockSerialError> =
            rx.pump(|| source.next().ok_or(nb::Error::WouldBlock));
        assert_eq!(taken, Ok(4));
        assert_eq!(rx.available(), 4);

        let failed = rx.pump(|| Err::<u8, _>(nb::Error::Other(MockSerialError)));
        assert_eq!(failed, Err(MockSerialError));
    }
}
