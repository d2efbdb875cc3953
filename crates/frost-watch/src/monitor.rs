use crate::error::Result;
use crate::registry::DeviceRegistry;
use crate::state::WatchdogConfig;
use chrono::Utc;
use frost_notify::NotifyManager;
use frost_rule::{evaluate, format_report, ThresholdRules};
use frost_types::TelemetryRecord;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 设备监控器
///
/// 入站记录在这里分两条独立路径处理：阈值评估产出报告（非空才投递），
/// 同时记录到达重新武装该设备的 watchdog，并在需要时翻转在线状态。
/// watchdog 到期路径独立运行，与入站路径共用 DeviceRegistry 的临界区。
pub struct DeviceMonitor {
    /// 设备注册表
    registry: Arc<DeviceRegistry>,

    /// 阈值规则表
    rules: ThresholdRules,

    /// 告警出口
    notify: Arc<NotifyManager>,

    /// watchdog 参数
    watchdog: WatchdogConfig,

    /// 记录缺少 device_id 时使用的来源标签
    fallback_label: String,

    /// 只监控这台设备（None 表示全部）
    target_device: Option<String>,
}

impl DeviceMonitor {
    pub fn new(
        notify: Arc<NotifyManager>,
        rules: ThresholdRules,
        watchdog: WatchdogConfig,
        fallback_label: impl Into<String>,
        target_device: Option<String>,
    ) -> Self {
        Self {
            registry: Arc::new(DeviceRegistry::new()),
            rules,
            notify,
            watchdog,
            fallback_label: fallback_label.into(),
            target_device,
        }
    }

    pub fn registry(&self) -> &Arc<DeviceRegistry> {
        &self.registry
    }

    /// 处理一条原始负载
    ///
    /// 解码失败的负载被丢弃并报告给调用方；一条坏记录绝不能
    /// 阻止后续有效记录重新武装 watchdog。
    pub async fn handle_payload(&self, payload: &[u8]) -> Result<()> {
        let record = TelemetryRecord::parse(payload)?;
        self.handle_record(record).await;
        Ok(())
    }

    /// 处理一条已解码的遥测记录
    pub async fn handle_record(&self, record: TelemetryRecord) {
        let source = record.source_label(&self.fallback_label).to_string();

        if let Some(target) = &self.target_device {
            if &source != target {
                debug!(device = %source, "Record from untracked device ignored");
                return;
            }
        }

        // 先重新武装活跃度，慢速的报告投递不能推迟 rearm
        self.observe(&source).await;

        let lines = evaluate(&record, &self.rules);
        if let Some(report) = format_report(&source, record.timestamp, &lines) {
            info!(device = %source, alerts = lines.len(), "Threshold report dispatched");
            self.notify.dispatch(&report).await;
        }
    }

    /// 记录设备的一次出现：rearm watchdog，必要时发在线告警
    pub async fn observe(&self, device: &str) {
        let outcome = self.registry.rearm(device, Utc::now()).await;

        // 转换结果在锁内决定，文本投递在锁外进行
        if outcome.came_online {
            info!(device = %device, "Device came online");
            self.notify.dispatch(&format!("{} is online!", device)).await;
        }

        self.spawn_watchdog(device.to_string(), outcome.generation);
    }

    /// 安装携带新代号的定时任务
    ///
    /// 不依赖对旧任务的取消：到期的任务自己在锁内比对代号，
    /// 过期的 fire 退化为空操作。
    fn spawn_watchdog(&self, device: String, generation: u64) {
        let registry = self.registry.clone();
        let notify = self.notify.clone();
        let deadline = self.watchdog.deadline();

        tokio::spawn(async move {
            tokio::time::sleep(deadline).await;

            if registry.expire(&device, generation).await {
                warn!(device = %device, "Device went offline (watchdog timeout)");
                notify.dispatch(&format!("{} is offline!", device)).await;
            }
        });
    }
}
