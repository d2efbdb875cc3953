use crate::state::LivenessState;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

/// 一次 rearm 的结果
///
/// 在锁内决定，调用方据此在锁外构造并投递告警。
#[derive(Debug, Clone, Copy)]
pub struct RearmOutcome {
    /// 新安装的 watchdog 代号
    pub generation: u64,

    /// 本次记录是否触发了 offline→online 转换
    pub came_online: bool,
}

/// 设备活跃度注册表
///
/// 进程级单例，按设备标识持有 LivenessState。online、last_seen 和
/// watchdog 代号的所有读写都在同一把锁下进行：入站路径和
/// watchdog 到期路径共用这一个临界区。
pub struct DeviceRegistry {
    devices: Mutex<HashMap<String, LivenessState>>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self {
            devices: Mutex::new(HashMap::new()),
        }
    }

    /// 接受一条记录：重新武装 watchdog，必要时翻转为在线
    ///
    /// last_seen 无条件更新 —— 任何被接受的记录都重新武装，
    /// 与记录自带时间戳的先后无关。旧的 watchdog 代号被作废，
    /// 尚未 fire 的旧定时任务醒来后比对代号即知自己已过期。
    pub async fn rearm(&self, device: &str, now: DateTime<Utc>) -> RearmOutcome {
        let mut devices = self.devices.lock().await;
        let state = devices
            .entry(device.to_string())
            .or_insert_with(|| LivenessState {
                online: false,
                last_seen: now,
                watchdog_gen: 0,
            });

        state.watchdog_gen += 1;
        state.last_seen = now;

        let came_online = !state.online;
        state.online = true;

        RearmOutcome {
            generation: state.watchdog_gen,
            came_online,
        }
    }

    /// Watchdog 到期：代号仍然有效且设备在线时翻转为离线
    ///
    /// 返回 true 表示发生了 online→offline 转换，调用方应投递
    /// 离线告警。代号不符（过期 fire）或设备已离线时为空操作。
    pub async fn expire(&self, device: &str, generation: u64) -> bool {
        let mut devices = self.devices.lock().await;
        let Some(state) = devices.get_mut(device) else {
            return false;
        };

        if state.watchdog_gen != generation {
            debug!(device = %device, "Stale watchdog fire ignored");
            return false;
        }
        if !state.online {
            return false;
        }

        state.online = false;
        true
    }

    /// 设备是否在线（尚未出现过的设备返回 None）
    pub async fn is_online(&self, device: &str) -> Option<bool> {
        let devices = self.devices.lock().await;
        devices.get(device).map(|state| state.online)
    }

    /// 最近一次接受记录的时间
    pub async fn last_seen(&self, device: &str) -> Option<DateTime<Utc>> {
        let devices = self.devices.lock().await;
        devices.get(device).map(|state| state.last_seen)
    }

    /// 已知设备数量
    pub async fn device_count(&self) -> usize {
        self.devices.lock().await.len()
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_sighting_comes_online() {
        let registry = DeviceRegistry::new();

        let outcome = registry.rearm("pi-kitchen", Utc::now()).await;
        assert!(outcome.came_online);
        assert_eq!(registry.is_online("pi-kitchen").await, Some(true));

        // 已在线的设备再次上报不再转换
        let outcome = registry.rearm("pi-kitchen", Utc::now()).await;
        assert!(!outcome.came_online);
    }

    #[tokio::test]
    async fn test_generation_invalidates_prior_timer() {
        let registry = DeviceRegistry::new();

        let first = registry.rearm("pi-kitchen", Utc::now()).await;
        let second = registry.rearm("pi-kitchen", Utc::now()).await;
        assert!(second.generation > first.generation);

        // 旧代号的 fire 是空操作
        assert!(!registry.expire("pi-kitchen", first.generation).await);
        assert_eq!(registry.is_online("pi-kitchen").await, Some(true));

        // 有效代号的 fire 翻转一次
        assert!(registry.expire("pi-kitchen", second.generation).await);
        assert_eq!(registry.is_online("pi-kitchen").await, Some(false));

        // 已离线后再次 fire 不再转换
        assert!(!registry.expire("pi-kitchen", second.generation).await);
    }

    #[tokio::test]
    async fn test_expire_unknown_device_is_noop() {
        let registry = DeviceRegistry::new();
        assert!(!registry.expire("ghost", 1).await);
    }

    #[tokio::test]
    async fn test_last_seen_updates_unconditionally() {
        let registry = DeviceRegistry::new();

        let t1 = Utc::now();
        registry.rearm("pi-kitchen", t1).await;
        let t2 = t1 + chrono::Duration::seconds(30);
        registry.rearm("pi-kitchen", t2).await;

        assert_eq!(registry.last_seen("pi-kitchen").await, Some(t2));
        assert_eq!(registry.device_count().await, 1);
    }
}
