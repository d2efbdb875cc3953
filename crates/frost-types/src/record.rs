use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 传感器读数
///
/// 设备端直接把 sysfs 读到的原始值放进 JSON，所以读数可能是数字、
/// 数字字符串（毫摄氏度整数），或者故障哨兵字符串
/// （如 "Sensor Error"、"Unknown Sensor Error: <detail>"）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SensorReading {
    Number(f64),
    Text(String),
}

impl SensorReading {
    /// 以毫摄氏度整数解释读数
    ///
    /// 数字字符串（设备端从 sysfs 原样读出）同样有效；
    /// 无法解析的字符串视为故障哨兵，返回 None。
    pub fn milli_celsius(&self) -> Option<i64> {
        match self {
            SensorReading::Number(n) => Some(*n as i64),
            SensorReading::Text(s) => s.trim().parse::<i64>().ok(),
        }
    }

    /// 故障哨兵文本（仅当读数不是有效数值时返回）
    pub fn fault_text(&self) -> Option<&str> {
        match self {
            SensorReading::Text(s) if s.trim().parse::<i64>().is_err() => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_fault(&self) -> bool {
        self.fault_text().is_some()
    }
}

/// 遥测记录
///
/// 设备周期性上报的一次传感器快照。sensors 使用 IndexMap
/// 保持上报时的插入顺序，告警行按此顺序输出。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryRecord {
    /// 设备 ID（可选，缺省时由调用方提供回退标签）
    pub device_id: Option<String>,

    /// Unix 时间戳（秒，设备端可能带小数）
    pub timestamp: f64,

    /// 传感器名称 -> 读数，保持插入顺序
    #[serde(default)]
    pub sensors: IndexMap<String, SensorReading>,
}

impl TelemetryRecord {
    /// 从原始 JSON 负载解码
    pub fn parse(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload)
    }

    /// 告警文本使用的来源标签
    pub fn source_label<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.device_id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record() {
        let payload = br#"{
            "device_id": "pi-kitchen",
            "timestamp": 1718000000.5,
            "sensors": {
                "cpu_temp": "45000",
                "fridge_1": 3200,
                "freezer_1": "Sensor Error"
            }
        }"#;

        let record = TelemetryRecord::parse(payload).unwrap();
        assert_eq!(record.device_id.as_deref(), Some("pi-kitchen"));
        assert_eq!(record.timestamp, 1718000000.5);

        // 插入顺序保持不变
        let names: Vec<&str> = record.sensors.keys().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["cpu_temp", "fridge_1", "freezer_1"]);

        assert_eq!(record.sensors["cpu_temp"].milli_celsius(), Some(45000));
        assert_eq!(record.sensors["fridge_1"].milli_celsius(), Some(3200));
        assert!(record.sensors["freezer_1"].is_fault());
    }

    #[test]
    fn test_fault_text() {
        let reading = SensorReading::Text("Unknown Sensor Error: timeout".to_string());
        assert_eq!(reading.milli_celsius(), None);
        assert_eq!(
            reading.fault_text(),
            Some("Unknown Sensor Error: timeout")
        );

        let numeric = SensorReading::Text("-18657".to_string());
        assert_eq!(numeric.milli_celsius(), Some(-18657));
        assert!(!numeric.is_fault());
    }

    #[test]
    fn test_source_label_fallback() {
        let record = TelemetryRecord {
            device_id: None,
            timestamp: 0.0,
            sensors: IndexMap::new(),
        };
        assert_eq!(record.source_label("pantry-pi"), "pantry-pi");

        let record = TelemetryRecord {
            device_id: Some("".to_string()),
            timestamp: 0.0,
            sensors: IndexMap::new(),
        };
        assert_eq!(record.source_label("pantry-pi"), "pantry-pi");
    }

    #[test]
    fn test_parse_malformed() {
        assert!(TelemetryRecord::parse(b"not json").is_err());
        assert!(TelemetryRecord::parse(b"{\"timestamp\": \"abc\"}").is_err());
    }
}
