use anyhow::{anyhow, Result};
use config::{Config, Environment, File, FileFormat};
use frost_mqtt::MqttIngestConfig;
use frost_rule::ThresholdRules;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub mqtt: MqttSection,
    #[serde(default)]
    pub monitor: MonitorSection,
    #[serde(default)]
    pub webhook: WebhookSection,
    #[serde(default)]
    pub thresholds: ThresholdRules,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MqttSection {
    #[serde(default = "default_mqtt_host")]
    pub host: String,
    #[serde(default = "default_mqtt_port")]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_mqtt_topic")]
    pub topic: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MonitorSection {
    /// 设备上报间隔（分钟）
    #[serde(default = "default_wait_minutes")]
    pub wait_minutes: f64,

    /// 记录缺少 device_id 时使用的来源标签
    #[serde(default = "default_monitor_name")]
    pub name: String,

    /// 只监控这一台设备（缺省监控全部）
    #[serde(default)]
    pub device_id: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WebhookSection {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub credential: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
}

// 默认值函数
fn default_mqtt_host() -> String {
    "localhost".to_string()
}

fn default_mqtt_port() -> u16 {
    1883
}

fn default_mqtt_topic() -> String {
    "telemetry".to_string()
}

fn default_wait_minutes() -> f64 {
    5.0
}

fn default_monitor_name() -> String {
    "frost-monitor".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// Default trait 实现
impl Default for MqttSection {
    fn default() -> Self {
        Self {
            host: default_mqtt_host(),
            port: default_mqtt_port(),
            username: String::new(),
            password: String::new(),
            topic: default_mqtt_topic(),
        }
    }
}

impl Default for MonitorSection {
    fn default() -> Self {
        Self {
            wait_minutes: default_wait_minutes(),
            name: default_monitor_name(),
            device_id: None,
        }
    }
}

impl Default for WebhookSection {
    fn default() -> Self {
        Self {
            url: String::new(),
            credential: String::new(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mqtt: MqttSection::default(),
            monitor: MonitorSection::default(),
            webhook: WebhookSection::default(),
            thresholds: ThresholdRules::default(),
            logging: LoggingSection::default(),
        }
    }
}

impl AppConfig {
    /// 加载配置：TOML 文件 + FROST_ 前缀的环境变量覆盖
    ///
    /// 文件不存在时只用环境变量和默认值。
    pub fn load(path: &str) -> Result<Self> {
        let mut builder = Config::builder();

        if Path::new(path).exists() {
            builder = builder.add_source(File::new(path, FileFormat::Toml));
        }

        let config = builder
            .add_source(Environment::with_prefix("FROST").separator("__"))
            .build()?;

        let config: AppConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        if self.webhook.url.is_empty() {
            return Err(anyhow!("webhook.url must be set"));
        }
        if self.monitor.wait_minutes <= 0.0 {
            return Err(anyhow!(
                "monitor.wait_minutes must be positive, got {}",
                self.monitor.wait_minutes
            ));
        }
        Ok(())
    }

    /// 派生 MQTT 接入配置，client id 带随机后缀避免会话冲突
    pub fn mqtt_ingest(&self) -> MqttIngestConfig {
        let suffix: u32 = rand::random::<u32>() % 100;
        MqttIngestConfig {
            host: self.mqtt.host.clone(),
            port: self.mqtt.port,
            username: self.mqtt.username.clone(),
            password: self.mqtt.password.clone(),
            topic: self.mqtt.topic.clone(),
            client_id: format!("subscribe-{}-{}", self.monitor.name, suffix),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.mqtt.port, 1883);
        assert_eq!(config.monitor.wait_minutes, 5.0);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_validate_requires_webhook_url() {
        let config = AppConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[mqtt]
host = "broker.example.com"
username = "pi-server-1"
password = "secret"
topic = "telemetry/kitchen"

[monitor]
wait_minutes = 1.5
name = "kitchen-pi"

[webhook]
url = "https://hooks.example.com/frost"
credential = "user:pass"

[thresholds]
freezer_bounds_c = [-29.0, -9.0]
"#
        )
        .unwrap();

        let config = AppConfig::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.mqtt.host, "broker.example.com");
        assert_eq!(config.monitor.wait_minutes, 1.5);
        assert_eq!(config.thresholds.freezer_bounds_c, (-29.0, -9.0));

        let ingest = config.mqtt_ingest();
        assert_eq!(ingest.topic, "telemetry/kitchen");
        assert!(ingest.client_id.starts_with("subscribe-kitchen-pi-"));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let err = AppConfig::load("/nonexistent/frost.toml").unwrap_err();
        // 默认配置缺 webhook.url，校验必须失败
        assert!(err.to_string().contains("webhook.url"));
    }
}
