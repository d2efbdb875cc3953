/// frost-watch 基本使用示例
///
/// 演示活跃度监控的基本流程：一台设备上线、上报超标读数、
/// 沉默后被 watchdog 判定离线。告警打印到 stdout。
use anyhow::Result;
use async_trait::async_trait;
use frost_notify::{Notifier, NotifyManager, NotifyResult};
use frost_rule::ThresholdRules;
use frost_types::TelemetryRecord;
use frost_watch::{DeviceMonitor, WatchdogConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

struct StdoutNotifier;

#[async_trait]
impl Notifier for StdoutNotifier {
    async fn send(&self, text: &str) -> Result<NotifyResult> {
        println!(">>> {}", text);
        Ok(NotifyResult::success())
    }

    fn name(&self) -> &str {
        "stdout"
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志
    tracing_subscriber::fmt::init();

    println!("=== FROST 活跃度监控示例 ===\n");

    let mut manager = NotifyManager::new();
    manager.register(Arc::new(StdoutNotifier));

    // wait_minutes 取一个演示用的小值：超时 = 0.05×60 + 10 = 13 秒
    let mut watchdog = WatchdogConfig::new(0.05);
    watchdog.slack = Duration::from_secs(10);

    let monitor = Arc::new(DeviceMonitor::new(
        Arc::new(manager),
        ThresholdRules::default(),
        watchdog,
        "demo-pi",
        None,
    ));

    // 1. 第一条记录：设备上线，冷冻柜超标
    println!("--- 第一条记录 ---");
    let payload = br#"{
        "device_id": "demo-pi",
        "timestamp": 1718000000.0,
        "sensors": {
            "cpu_temp": "45000",
            "fridge_1": 3200,
            "freezer_1": -5000
        }
    }"#;
    let record = TelemetryRecord::parse(payload)?;
    monitor.handle_record(record).await;

    // 2. 设备保持沉默，等 watchdog 判定离线
    println!("\n--- 设备沉默，等待 watchdog（约 13 秒）---");
    sleep(Duration::from_secs(15)).await;

    println!(
        "\n设备在线: {:?}",
        monitor.registry().is_online("demo-pi").await
    );
    Ok(())
}
