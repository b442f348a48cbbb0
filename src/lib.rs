// src/lib.rs

#![cfg_attr(not(test), no_std)] // Tests use std for mocks

pub mod common;
pub mod node;
pub mod sensor;

// Re-export key types for convenience
pub use common::{NodeConfig, NodeError, PeerAddr, SensorReading};
pub use node::{BurstRunner, BurstScheduler, RequestRouter, Tick};
