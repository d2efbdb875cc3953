use crate::notifier::{Notifier, NotifyResult};
use anyhow::Result;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Webhook 通知配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// 目标 URL
    pub url: String,

    /// Basic 认证凭据（原文，发送前做 base64 编码）
    pub credential: String,
}

/// Webhook 通知器
///
/// 告警文本打包成 {"data": "<text>"}，带
/// `Authorization: Basic <base64(credential)>` 投递。
/// 传输失败和非 2xx 状态都映射为 NotifyResult::failure，从不 panic。
pub struct WebhookNotifier {
    config: WebhookConfig,
    client: reqwest::Client,
    enabled: bool,
}

impl WebhookNotifier {
    pub fn new(config: WebhookConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            enabled: true,
        }
    }

    fn authorization_header(&self) -> String {
        format!("Basic {}", STANDARD.encode(&self.config.credential))
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, text: &str) -> Result<NotifyResult> {
        let body = serde_json::json!({ "data": text });

        let response = self
            .client
            .post(&self.config.url)
            .header("Authorization", self.authorization_header())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await;

        match response {
            Ok(response) if response.status().is_success() => Ok(NotifyResult::success()),
            Ok(response) => Ok(NotifyResult::failure(format!(
                "Webhook failed with status: {}",
                response.status()
            ))),
            Err(e) => Ok(NotifyResult::failure(format!("Webhook send failed: {}", e))),
        }
    }

    fn name(&self) -> &str {
        "webhook"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
