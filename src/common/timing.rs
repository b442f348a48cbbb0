// src/common/timing.rs

use core::time::Duration;

// === Burst ===

/// Number of firings per armed burst.
pub const READINGS_NUM: u8 = 6;

/// Period of the sampling timer between firings (150 ms).
pub const BURST_INTERVAL: Duration = Duration::from_micros(150_000);

/// Nominal wall time of a whole burst, first firing to reply.
pub const BURST_DURATION: Duration = Duration::from_micros(150_000 * READINGS_NUM as u64);

// === Rangefinder UART (8N1) ===
// 1 start bit + 8 data bits + 1 stop bit = 10 bits per byte

/// Baud rate of the rangefinder module.
pub const RANGEFINDER_BAUD: u32 = 9600;

/// Nominal duration of one byte at `RANGEFINDER_BAUD`.
pub const RANGEFINDER_BYTE_DURATION: Duration = Duration::from_micros(1_042); // Approx 1.04 ms

/// Nominal duration of one 4-byte frame at `RANGEFINDER_BAUD`.
pub const RANGEFINDER_FRAME_DURATION: Duration = Duration::from_micros(1_042 * 4);

// === Firing budget ===

/// Work allowed inside one firing before it starts crowding the next one.
///
/// Half the interval. Nothing enforces it; glue code that measures its
/// firings can compare against it with `within_firing_budget`.
pub const fn firing_budget() -> Duration {
    Duration::from_micros(BURST_INTERVAL.as_micros() as u64 / 2)
}

/// True if a firing that took `elapsed` stayed inside `firing_budget()`.
pub fn within_firing_budget(elapsed: Duration) -> bool {
    elapsed <= firing_budget()
}
