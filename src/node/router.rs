// src/node/router.rs

use super::scheduler::BurstScheduler;
use crate::common::{
    address::PeerAddr,
    error::NodeError,
    hal_traits::{BurstTimer, RadioLink},
    reading::SensorReading,
};
use log::{debug, error, warn};

/// Correlates requests with replies.
///
/// Holds only shared references, so it is `Copy`: the radio receive callback
/// and the timer interrupt each keep their own handle. The requester address
/// is stored in the scheduler, which is the single place a reply destination
/// can come from.
#[derive(Debug)]
pub struct RequestRouter<'a, T, L> {
    scheduler: &'a BurstScheduler<T>,
    link: &'a L,
}

impl<T, L> Clone for RequestRouter<'_, T, L> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, L> Copy for RequestRouter<'_, T, L> {}

impl<'a, T, L> RequestRouter<'a, T, L>
where
    T: BurstTimer,
    L: RadioLink,
{
    pub fn new(scheduler: &'a BurstScheduler<T>, link: &'a L) -> Self {
        RequestRouter { scheduler, link }
    }

    /// Handles an inbound request from `peer`: stores it and arms a burst.
    ///
    /// A request that arrives while a burst is running is refused with
    /// `Busy`; the running burst and its requester are left alone. A halted
    /// node refuses everything with `Halted`.
    pub fn on_request(&self, peer: PeerAddr) -> Result<(), NodeError> {
        match self.scheduler.arm(peer) {
            Ok(()) => {
                debug!("Received signal to send data from {}", peer);
                Ok(())
            }
            Err(NodeError::Busy) => {
                warn!("Request from {} ignored: burst already active", peer);
                Err(NodeError::Busy)
            }
            Err(e) => {
                debug!("Request from {} refused: {}", peer, e);
                Err(e)
            }
        }
    }

    /// `on_request` for a raw address buffer as handed over by a radio driver.
    pub fn on_request_raw(&self, mac: &[u8]) -> Result<(), NodeError> {
        let peer = PeerAddr::from_slice(mac).ok_or(NodeError::InvalidLength {
            expected: PeerAddr::LEN,
            got: mac.len(),
        })?;
        self.on_request(peer)
    }

    /// Sends `reading` to the requester of the armed burst.
    ///
    /// Called once per burst, after the final firing. The send is not
    /// retried; a failure is logged and returned. Returns the destination on
    /// success.
    pub fn on_burst_complete(
        &self,
        reading: &SensorReading,
    ) -> Result<PeerAddr, NodeError<L::Error>> {
        let peer = self.scheduler.active_peer().ok_or_else(|| {
            error!("Burst completed with no burst armed");
            NodeError::NotArmed
        })?;

        let payload = reading.to_le_bytes();
        self.link
            .ensure_peer(&peer)
            .and_then(|()| self.link.send(&peer, &payload))
            .map_err(|e| {
                error!("Failed to send reply to {}: {:?}", peer, e);
                NodeError::Io(e)
            })?;

        debug!("Reply sent to {}: {:?}", peer, reading);
        Ok(peer)
    }

    pub fn scheduler(&self) -> &'a BurstScheduler<T> {
        self.scheduler
    }

    pub fn link(&self) -> &'a L {
        self.link
    }
}
