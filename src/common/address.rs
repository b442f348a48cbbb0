// src/common/address.rs

use core::fmt;
use core::str::FromStr;

/// Physical-layer (MAC) address of a radio peer.
///
/// Captured from an inbound request and used as the destination of the
/// reply to that request.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct PeerAddr([u8; 6]);

impl PeerAddr {
    pub const LEN: usize = 6;
    pub const BROADCAST: PeerAddr = PeerAddr([0xFF; 6]);

    #[inline]
    pub const fn new(bytes: [u8; 6]) -> Self {
        PeerAddr(bytes)
    }

    /// Copies an address out of a raw callback buffer.
    ///
    /// Returns `None` unless `bytes` is exactly six bytes long.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let array: [u8; 6] = bytes.try_into().ok()?;
        Some(PeerAddr(array))
    }

    #[inline]
    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }

    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }

    #[inline]
    pub fn is_broadcast(&self) -> bool {
        *self == Self::BROADCAST
    }
}

impl From<[u8; 6]> for PeerAddr {
    fn from(value: [u8; 6]) -> Self {
        PeerAddr(value)
    }
}

impl From<PeerAddr> for [u8; 6] {
    fn from(value: PeerAddr) -> Self {
        value.0
    }
}

impl fmt::Display for PeerAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

/// Error returned when parsing a `PeerAddr` from text fails.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
#[error("Invalid peer address")]
pub struct PeerAddrParseError;

impl FromStr for PeerAddr {
    type Err = PeerAddrParseError;

    /// Parses the colon separated form, e.g. `AA:BB:CC:DD:EE:FF`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 6];
        let mut parts = s.split(':');
        for slot in bytes.iter_mut() {
            let part = parts.next().ok_or(PeerAddrParseError)?;
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(PeerAddrParseError);
            }
            *slot = u8::from_str_radix(part, 16).map_err(|_| PeerAddrParseError)?;
        }
        if parts.next().is_some() {
            return Err(PeerAddrParseError);
        }
        Ok(PeerAddr(bytes))
    }
}
