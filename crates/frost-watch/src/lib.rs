pub mod error;
pub mod monitor;
pub mod registry;
pub mod state;

pub use error::{Result, WatchError};
pub use monitor::DeviceMonitor;
pub use registry::{DeviceRegistry, RearmOutcome};
pub use state::{LivenessState, WatchdogConfig};
