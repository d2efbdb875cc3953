pub mod ingest;

pub use ingest::{MqttIngest, MqttIngestConfig};
