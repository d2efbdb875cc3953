use crate::model::{classify, SensorClass, ThresholdRules};
use frost_types::TelemetryRecord;
use tracing::debug;

/// 按阈值规则评估一条遥测记录
///
/// 纯函数：只读输入，按 sensors 的插入顺序产出告警行，
/// 没有告警时返回空列表。min > max 的错配不视为错误，
/// "too hot" 和 "too cold" 可以对同一读数同时成立。
pub fn evaluate(record: &TelemetryRecord, rules: &ThresholdRules) -> Vec<String> {
    let mut lines = Vec::new();

    for (name, reading) in &record.sensors {
        // 故障哨兵：报一行错误，跳过数值检查
        if let Some(fault) = reading.fault_text() {
            lines.push(format!("{} is reporting an error: {}", name, fault));
            continue;
        }

        let Some(milli) = reading.milli_celsius() else {
            continue;
        };
        let celsius = milli as f64 / 1000.0;

        let class = classify(name);
        let Some((min, max)) = rules.bounds_for(class) else {
            debug!(sensor = %name, "No threshold rule for sensor");
            continue;
        };

        if let Some(max) = max {
            if celsius > max {
                lines.push(format!("{} is too hot ({} F)", name, format_fahrenheit(celsius)));
            }
        }
        if let Some(min) = min {
            if celsius < min {
                lines.push(format!("{} is too cold ({} F)", name, format_fahrenheit(celsius)));
            }
        }
    }

    lines
}

/// 摄氏度转华氏度，保留两位小数后去掉多余的尾零（至少留一位小数）
fn format_fahrenheit(celsius: f64) -> String {
    let fahrenheit = celsius * 1.8 + 32.0;
    let rounded = (fahrenheit * 100.0).round() / 100.0;

    let mut text = format!("{:.2}", rounded);
    while text.ends_with('0') && !text.ends_with(".0") {
        text.pop();
    }
    text
}
