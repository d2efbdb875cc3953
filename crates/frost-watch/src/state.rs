use chrono::{DateTime, Utc};
use std::time::Duration;

/// 单台设备的活跃度状态
///
/// 首条记录到达时惰性创建，进程生命周期内常驻，从不持久化：
/// 重启后的第一条记录永远算"首次出现"。
#[derive(Debug, Clone)]
pub struct LivenessState {
    /// 设备当前是否在线
    pub online: bool,

    /// 最近一条被接受记录的时间
    pub last_seen: DateTime<Utc>,

    /// 当前有效的 watchdog 代号
    ///
    /// 每次 rearm 递增。到期的定时任务必须在锁内比对代号，
    /// 代号不符的 fire 是过期的，一律空操作。
    pub watchdog_gen: u64,
}

/// Watchdog 参数
#[derive(Debug, Clone)]
pub struct WatchdogConfig {
    /// 设备上报间隔（分钟）
    pub wait_minutes: f64,

    /// 宽限时间，默认 10 秒
    pub slack: Duration,
}

impl WatchdogConfig {
    pub fn new(wait_minutes: f64) -> Self {
        Self {
            wait_minutes,
            slack: Duration::from_secs(10),
        }
    }

    /// 超时时限 = wait_minutes × 60 + slack
    pub fn deadline(&self) -> Duration {
        Duration::from_secs_f64(self.wait_minutes.max(0.0) * 60.0) + self.slack
    }
}
