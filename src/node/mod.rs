// src/node/mod.rs

// The request/response control path: arming, firing and replying.

pub mod router;
pub mod runner;
pub mod scheduler;

// --- Public Re-exports ---
pub use router::RequestRouter;
pub use runner::{BurstRunner, Tick};
pub use scheduler::{BurstScheduler, BurstState, Firing};
