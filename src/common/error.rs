// src/common/error.rs

/// Errors surfaced by the node's control path.
///
/// `E` is the error type of whichever HAL collaborator failed (the I2C bus for
/// the accelerometer, the radio link for replies). Operations that cannot hit
/// an I/O error use the default `E = ()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NodeError<E = ()>
where
    E: core::fmt::Debug,
{
    /// Underlying I/O error from the HAL implementation.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// The accelerometer did not answer with its identity byte.
    #[error("Sensor absent: expected id {expected:#04x}, found {found:#04x}")]
    SensorAbsent { expected: u8, found: u8 },

    /// A burst is already running; the new request was not accepted.
    #[error("Burst already active")]
    Busy,

    /// The node failed bring-up and no longer accepts requests.
    #[error("Node halted")]
    Halted,

    /// A completion or firing arrived while no burst was armed.
    #[error("No burst armed")]
    NotArmed,

    /// A reply payload had the wrong size.
    #[error("Invalid length: expected {expected}, got {got}")]
    InvalidLength { expected: usize, got: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e: NodeError = NodeError::SensorAbsent { expected: 0xE5, found: 0x00 };
        assert_eq!(e.to_string(), "Sensor absent: expected id 0xe5, found 0x00");
        let e: NodeError<u8> = NodeError::Io(7);
        assert_eq!(e.to_string(), "I/O error: 7");
    }

    #[test]
    fn test_errors_compare_by_variant() {
        let e: NodeError<u32> = NodeError::InvalidLength { expected: 20, got: 3 };
        assert_eq!(e, NodeError::InvalidLength { expected: 20, got: 3 });
        assert_ne!(e, NodeError::Busy);
    }
}
