pub mod record;

pub use record::{SensorReading, TelemetryRecord};
