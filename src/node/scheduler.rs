// src/node/scheduler.rs

use crate::common::{
    address::PeerAddr,
    error::NodeError,
    hal_traits::BurstTimer,
    timing::{BURST_INTERVAL, READINGS_NUM},
};
use core::sync::atomic::{AtomicU8, Ordering};
use core::time::Duration;

// Raw values of the shared state byte.
const IDLE: u8 = 0;
const ARMING: u8 = 1; // request context is writing the peer
const ARMED: u8 = 2;
const HALTED: u8 = 3;

/// Lifecycle of the burst as seen from outside the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurstState {
    /// Waiting for a request.
    Idle,
    /// A burst is running (or being armed).
    Armed,
    /// Bring-up failed; requests are refused for good.
    Halted,
}

/// What one timer interrupt should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Firing {
    /// No burst is armed, or the final firing already happened.
    Spurious,
    /// Take sample number `index` (1-based) and keep going.
    Sample { index: u8 },
    /// Take the last sample; the timer has been stopped.
    Final { index: u8 },
}

/// Drives a burst of a fixed number of timer firings.
///
/// All methods take `&self` so a single instance can be shared between the
/// request context and the timer interrupt. Each field has one writer:
///
/// * the request context moves `Idle -> Armed` and writes the peer address;
/// * the interrupt context counts firings and moves `Armed -> Idle`.
///
/// The peer is written while the state is the private `ARMING` value and
/// `ARMED` is published with `Release`. `fire` loads the state with `Acquire`
/// before touching anything else, so the interrupt never sees a partially
/// written address.
#[derive(Debug)]
pub struct BurstScheduler<T> {
    timer: T,
    state: AtomicU8,
    fired: AtomicU8,
    max_firings: AtomicU8,
    peer: [AtomicU8; PeerAddr::LEN],
}

impl<T> BurstScheduler<T>
where
    T: BurstTimer,
{
    pub const fn new(timer: T) -> Self {
        BurstScheduler {
            timer,
            state: AtomicU8::new(IDLE),
            fired: AtomicU8::new(0),
            max_firings: AtomicU8::new(READINGS_NUM),
            peer: [
                AtomicU8::new(0),
                AtomicU8::new(0),
                AtomicU8::new(0),
                AtomicU8::new(0),
                AtomicU8::new(0),
                AtomicU8::new(0),
            ],
        }
    }

    /// Arms a burst of `READINGS_NUM` firings every `BURST_INTERVAL` for `peer`.
    pub fn arm(&self, peer: PeerAddr) -> Result<(), NodeError> {
        self.schedule_periodic(peer, BURST_INTERVAL, READINGS_NUM)
    }

    /// Arms a burst of `max_firings` firings, `interval` apart, for `peer`.
    ///
    /// Fails with `Busy` while a burst is armed and with `Halted` after
    /// `halt`. A zero `max_firings` is treated as one.
    pub fn schedule_periodic(
        &self,
        peer: PeerAddr,
        interval: Duration,
        max_firings: u8,
    ) -> Result<(), NodeError> {
        match self
            .state
            .compare_exchange(IDLE, ARMING, Ordering::Acquire, Ordering::Acquire)
        {
            Ok(_) => {}
            Err(HALTED) => return Err(NodeError::Halted),
            Err(_) => return Err(NodeError::Busy),
        }

        for (slot, byte) in self.peer.iter().zip(peer.octets()) {
            slot.store(byte, Ordering::Relaxed);
        }
        self.fired.store(0, Ordering::Relaxed);
        self.max_firings.store(max_firings.max(1), Ordering::Relaxed);

        // `halt` may have run while we were writing.
        if self
            .state
            .compare_exchange(ARMING, ARMED, Ordering::Release, Ordering::Relaxed)
            .is_err()
        {
            return Err(NodeError::Halted);
        }

        self.timer.start_periodic(interval);
        Ok(())
    }

    /// Accounts for one timer interrupt. Called from the interrupt context.
    pub fn fire(&self) -> Firing {
        if self.state.load(Ordering::Acquire) != ARMED {
            return Firing::Spurious;
        }

        let max = self.max_firings.load(Ordering::Relaxed);
        let fired = self.fired.load(Ordering::Relaxed);
        if fired >= max {
            return Firing::Spurious;
        }

        let index = fired + 1;
        self.fired.store(index, Ordering::Relaxed);
        if index == max {
            self.timer.stop();
            Firing::Final { index }
        } else {
            Firing::Sample { index }
        }
    }

    /// Returns to `Idle` once the burst's reply has been handed off or the
    /// burst has been abandoned.
    ///
    /// Returns `false` if no burst was armed.
    pub fn disarm(&self) -> bool {
        self.timer.stop();
        self.state
            .compare_exchange(ARMED, IDLE, Ordering::Release, Ordering::Relaxed)
            .is_ok()
    }

    /// Stops the timer and refuses every later request.
    pub fn halt(&self) {
        self.state.store(HALTED, Ordering::Release);
        self.timer.stop();
    }

    pub fn state(&self) -> BurstState {
        match self.state.load(Ordering::Acquire) {
            IDLE => BurstState::Idle,
            HALTED => BurstState::Halted,
            _ => BurstState::Armed,
        }
    }

    /// The requester of the armed burst, if one is armed.
    pub fn active_peer(&self) -> Option<PeerAddr> {
        if self.state.load(Ordering::Acquire) != ARMED {
            return None;
        }
        let mut bytes = [0u8; PeerAddr::LEN];
        for (byte, slot) in bytes.iter_mut().zip(self.peer.iter()) {
            *byte = slot.load(Ordering::Relaxed);
        }
        Some(PeerAddr::new(bytes))
    }

    /// Firings taken so far in the current (or last) burst.
    pub fn firings(&self) -> u8 {
        self.fired.load(Ordering::Relaxed)
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::mock::MockTimer;

    fn peer(last: u8) -> PeerAddr {
        PeerAddr::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, last])
    }

    #[test]
    fn test_starts_idle() {
        let scheduler = BurstScheduler::new(MockTimer::default());
        assert_eq!(scheduler.state(), BurstState::Idle);
        assert_eq!(scheduler.fire(), Firing::Spurious);
        assert_eq!(scheduler.active_peer(), None);
        assert!(!scheduler.timer().is_running());
    }

    #[test]
    fn test_arm_starts_timer_with_burst_interval() {
        let scheduler = BurstScheduler::new(MockTimer::default());
        assert!(scheduler.arm(peer(0xFF)).is_ok());
        assert_eq!(scheduler.state(), BurstState::Armed);
        assert_eq!(scheduler.active_peer(), Some(peer(0xFF)));
        assert_eq!(scheduler.timer().interval(), Some(Duration::from_micros(150_000)));
        assert!(scheduler.timer().is_running());
    }

    #[test]
    fn test_exactly_six_firings() {
        let scheduler = BurstScheduler::new(MockTimer::default());
        scheduler.arm(peer(1)).unwrap();
        for i in 1..READINGS_NUM {
            assert_eq!(scheduler.fire(), Firing::Sample { index: i });
            assert!(scheduler.timer().is_running());
        }
        assert_eq!(scheduler.fire(), Firing::Final { index: 6 });
        assert!(!scheduler.timer().is_running());

        // Late interrupts before disarm are ignored.
        assert_eq!(scheduler.fire(), Firing::Spurious);
        assert_eq!(scheduler.firings(), 6);

        assert!(scheduler.disarm());
        assert_eq!(scheduler.state(), BurstState::Idle);
        assert_eq!(scheduler.fire(), Firing::Spurious);
    }

    #[test]
    fn test_rearm_while_armed_is_busy() {
        let scheduler = BurstScheduler::new(MockTimer::default());
        scheduler.arm(peer(1)).unwrap();
        scheduler.fire();
        assert_eq!(scheduler.arm(peer(2)), Err(NodeError::Busy));
        // The active burst is untouched.
        assert_eq!(scheduler.active_peer(), Some(peer(1)));
        assert_eq!(scheduler.firings(), 1);
        assert_eq!(scheduler.timer().starts(), 1);
    }

    #[test]
    fn test_rearm_after_disarm_resets_counter() {
        let scheduler = BurstScheduler::new(MockTimer::default());
        scheduler.schedule_periodic(peer(1), Duration::from_millis(10), 2).unwrap();
        assert_eq!(scheduler.fire(), Firing::Sample { index: 1 });
        assert_eq!(scheduler.fire(), Firing::Final { index: 2 });
        assert!(scheduler.disarm());

        scheduler.arm(peer(2)).unwrap();
        assert_eq!(scheduler.firings(), 0);
        assert_eq!(scheduler.active_peer(), Some(peer(2)));
        assert_eq!(scheduler.fire(), Firing::Sample { index: 1 });
    }

    #[test]
    fn test_zero_firings_means_one() {
        let scheduler = BurstScheduler::new(MockTimer::default());
        scheduler.schedule_periodic(peer(1), Duration::from_millis(1), 0).unwrap();
        assert_eq!(scheduler.fire(), Firing::Final { index: 1 });
    }

    #[test]
    fn test_halt_refuses_requests() {
        let scheduler = BurstScheduler::new(MockTimer::default());
        scheduler.arm(peer(1)).unwrap();
        scheduler.halt();
        assert_eq!(scheduler.state(), BurstState::Halted);
        assert!(!scheduler.timer().is_running());
        assert_eq!(scheduler.fire(), Firing::Spurious);
        assert_eq!(scheduler.arm(peer(2)), Err(NodeError::Halted));
        assert!(!scheduler.disarm());
        assert_eq!(scheduler.state(), BurstState::Halted);
    }

    #[test]
    fn test_disarm_when_idle() {
        let scheduler = BurstScheduler::new(MockTimer::default());
        assert!(!scheduler.disarm());
        assert_eq!(scheduler.state(), BurstState::Idle);
    }
}
