use thiserror::Error;

/// 活跃度监控错误类型
#[derive(Error, Debug)]
pub enum WatchError {
    /// 负载无法解码，记录被丢弃，活跃度状态不受影响
    #[error("Malformed telemetry record: {0}")]
    MalformedRecord(#[from] serde_json::Error),
}

/// 活跃度监控结果类型
pub type Result<T> = std::result::Result<T, WatchError>;
