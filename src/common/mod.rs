// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod address;
pub mod config;
pub mod error;
pub mod frame;
pub mod hal_traits;
pub mod reading;
pub mod timing;

// --- Re-export key types/traits for easier access ---

// From address.rs
pub use address::PeerAddr;

// From config.rs
pub use config::{AccelBackend, NodeConfig, RangeProtocol};

// From error.rs
pub use error::NodeError;

// From frame.rs
pub use frame::{FrameError, RangeFrame};

// From hal_traits.rs
pub use hal_traits::{Accelerometer, BurstTimer, RadioLink, RangeSerial};

// From reading.rs
pub use reading::{Acceleration3D, SensorReading, REPLY_LEN};

// From timing.rs (constants - users can access via common::timing::*)
pub use timing::{BURST_INTERVAL, READINGS_NUM};
