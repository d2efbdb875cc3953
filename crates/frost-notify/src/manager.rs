use crate::notifier::Notifier;
use std::sync::Arc;
use tracing::{error, info};

/// 通知管理器
///
/// 把一条告警文本扇出到所有已注册的通知器。投递失败只记录日志，
/// 不重试、不排队：这是有意保留的简化，重试/退避属于将来的增强。
#[derive(Default)]
pub struct NotifyManager {
    /// 通知器列表（启动时注册，之后只读）
    notifiers: Vec<Arc<dyn Notifier>>,
}

impl NotifyManager {
    pub fn new() -> Self {
        Self {
            notifiers: Vec::new(),
        }
    }

    /// 注册通知器
    pub fn register(&mut self, notifier: Arc<dyn Notifier>) {
        info!("Registered notifier: {}", notifier.name());
        self.notifiers.push(notifier);
    }

    /// 发送告警到所有启用的通知器
    ///
    /// 永不失败：DispatchFailure 在此处吸收，调用方的状态机不受影响。
    pub async fn dispatch(&self, text: &str) {
        for notifier in &self.notifiers {
            if !notifier.is_enabled() {
                continue;
            }

            match notifier.send(text).await {
                Ok(result) => {
                    if result.success {
                        info!(notifier = %notifier.name(), "Alert dispatched");
                    } else {
                        error!(
                            notifier = %notifier.name(),
                            reason = %result.message,
                            "Alert dispatch failed"
                        );
                    }
                }
                Err(e) => {
                    error!(notifier = %notifier.name(), error = %e, "Alert dispatch error");
                }
            }
        }
    }
}
