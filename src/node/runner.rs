// src/node/runner.rs

use super::{router::RequestRouter, scheduler::Firing};
use crate::common::{
    address::PeerAddr,
    error::NodeError,
    hal_traits::{Accelerometer, BurstTimer, RadioLink, RangeSerial},
    reading::SensorReading,
};
use crate::sensor::aggregator::SampleAggregator;
use log::{error, info};

/// Result of one timer interrupt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tick {
    /// No burst was armed; nothing was sampled.
    Idle,
    /// Sample `index` (1-based) was taken.
    Sampled { index: u8 },
    /// Final sample taken and sent to `peer`.
    Replied { peer: PeerAddr, reading: SensorReading },
    /// Final sample taken but the reply could not be sent. `peer` is `None`
    /// only if the node was halted before the reply went out.
    SendFailed { peer: Option<PeerAddr>, reading: SensorReading },
}

/// Interrupt-context half of the node.
///
/// Owns the sensors (through the aggregator) and a router handle. The timer
/// interrupt calls `on_timer`; the radio callback keeps its own copy of the
/// router and calls `RequestRouter::on_request`.
///
/// The work done by one `on_timer` call must finish well inside
/// `BURST_INTERVAL`; see `timing::firing_budget`.
#[derive(Debug)]
pub struct BurstRunner<'a, T, L, A, S> {
    router: RequestRouter<'a, T, L>,
    aggregator: SampleAggregator<A, S>,
}

impl<'a, T, L, A, S> BurstRunner<'a, T, L, A, S>
where
    T: BurstTimer,
    L: RadioLink,
    A: Accelerometer,
    S: RangeSerial,
{
    pub fn new(router: RequestRouter<'a, T, L>, aggregator: SampleAggregator<A, S>) -> Self {
        BurstRunner { router, aggregator }
    }

    /// Initializes the accelerometer.
    ///
    /// On failure the scheduler is halted: every later request is refused and
    /// no reply is ever sent. There is no recovery short of a reset.
    pub fn bring_up(&mut self) -> Result<(), NodeError<A::Error>> {
        match self.aggregator.init() {
            Ok(()) => {
                info!("Accelerometer ready");
                Ok(())
            }
            Err(e) => {
                error!("Accelerometer init failed, halting: {}", e);
                self.router.scheduler().halt();
                Err(e)
            }
        }
    }

    /// Handles one timer interrupt.
    ///
    /// Samples on every firing of an armed burst. After the final firing the
    /// last sample is sent to the requester and the scheduler is disarmed,
    /// whether or not the send succeeded. An accelerometer error abandons the
    /// burst without a reply and returns the node to idle, so the next
    /// request starts afresh.
    pub fn on_timer(&mut self) -> Result<Tick, NodeError<A::Error>> {
        let scheduler = self.router.scheduler();
        let firing = scheduler.fire();
        let index = match firing {
            Firing::Spurious => return Ok(Tick::Idle),
            Firing::Sample { index } | Firing::Final { index } => index,
        };

        if index == 1 {
            self.aggregator.begin_burst();
        }

        let reading = match self.aggregator.sample_once() {
            Ok(reading) => reading,
            Err(e) => {
                error!("Accelerometer poll failed on firing {}, burst abandoned: {}", index, e);
                scheduler.disarm();
                return Err(e);
            }
        };

        if let Firing::Sample { index } = firing {
            return Ok(Tick::Sampled { index });
        }

        let tick = match self.router.on_burst_complete(&reading) {
            Ok(peer) => Tick::Replied { peer, reading },
            Err(_) => Tick::SendFailed { peer: scheduler.active_peer(), reading },
        };
        scheduler.disarm();
        Ok(tick)
    }

    pub fn router(&self) -> RequestRouter<'a, T, L> {
        self.router
    }

    pub fn aggregator(&self) -> &SampleAggregator<A, S> {
        &self.aggregator
    }

    pub fn aggregator_mut(&mut self) -> &mut SampleAggregator<A, S> {
        &mut self.aggregator
    }
}
