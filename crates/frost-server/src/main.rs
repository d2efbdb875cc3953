mod config;

use crate::config::AppConfig;
use clap::Parser;
use frost_mqtt::MqttIngest;
use frost_notify::{NotifyManager, WebhookConfig, WebhookNotifier};
use frost_watch::{DeviceMonitor, WatchdogConfig};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file path
    #[arg(short, long, default_value = "frost.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = AppConfig::load(&args.config)?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .init();

    tracing::info!(config = %args.config, "Starting FROST telemetry monitor");

    let mut manager = NotifyManager::new();
    manager.register(Arc::new(WebhookNotifier::new(WebhookConfig {
        url: config.webhook.url.clone(),
        credential: config.webhook.credential.clone(),
    })));

    let monitor = Arc::new(DeviceMonitor::new(
        Arc::new(manager),
        config.thresholds.clone(),
        WatchdogConfig::new(config.monitor.wait_minutes),
        config.monitor.name.clone(),
        config.monitor.device_id.clone(),
    ));

    let ingest = MqttIngest::new(&config.mqtt_ingest(), monitor);
    ingest.run().await
}
