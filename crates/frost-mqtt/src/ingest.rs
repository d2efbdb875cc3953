use frost_watch::DeviceMonitor;
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// MQTT 接入配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MqttIngestConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub topic: String,
    pub client_id: String,
}

/// MQTT 遥测接入
///
/// 订阅配置的主题，把每条 Publish 负载交给 DeviceMonitor。
/// 坏负载记日志后丢弃，连接错误退避 5 秒重试，循环本身
/// 一直运行直到进程被外部停止。
pub struct MqttIngest {
    client: AsyncClient,
    eventloop: EventLoop,
    topic: String,
    monitor: Arc<DeviceMonitor>,
}

impl MqttIngest {
    pub fn new(config: &MqttIngestConfig, monitor: Arc<DeviceMonitor>) -> Self {
        let mut mqtt_options = MqttOptions::new(&config.client_id, &config.host, config.port);
        mqtt_options.set_credentials(&config.username, &config.password);
        mqtt_options.set_keep_alive(Duration::from_secs(30));
        mqtt_options.set_clean_session(true);

        let (client, eventloop) = AsyncClient::new(mqtt_options, 10);

        info!(
            broker = %format!("{}:{}", config.host, config.port),
            client_id = %config.client_id,
            topic = %config.topic,
            "MQTT ingest created"
        );

        Self {
            client,
            eventloop,
            topic: config.topic.clone(),
            monitor,
        }
    }

    /// 订阅并处理事件，直到进程被外部停止
    pub async fn run(mut self) -> anyhow::Result<()> {
        loop {
            match self.eventloop.poll().await {
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    debug!(topic = %publish.topic, bytes = publish.payload.len(), "Record received");

                    if let Err(e) = self.monitor.handle_payload(&publish.payload).await {
                        // 坏记录丢弃，活跃度状态不动，循环继续
                        warn!(topic = %publish.topic, error = %e, "Dropped malformed record");
                    }
                }
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    info!("Connected to MQTT broker");

                    // clean_session 下重连后订阅不保留，每次 ConnAck 都重新订阅
                    if let Err(e) = self
                        .client
                        .subscribe(self.topic.clone(), QoS::AtLeastOnce)
                        .await
                    {
                        error!(topic = %self.topic, error = %e, "Subscribe failed");
                    }
                }
                Ok(Event::Incoming(packet)) => {
                    debug!(?packet, "Received MQTT packet");
                }
                Ok(Event::Outgoing(_)) => {}
                Err(e) => {
                    error!(error = %e, "MQTT connection error");
                    tokio::time::sleep(Duration::from_secs(5)).await;
                }
            }
        }
    }
}
