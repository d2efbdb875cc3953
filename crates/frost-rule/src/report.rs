use chrono::{DateTime, Local, TimeZone};

/// 组装发给运维的报告文本
///
/// 告警行为空时不产出报告：完全正常的记录不发任何消息。
pub fn format_report(source: &str, timestamp: f64, lines: &[String]) -> Option<String> {
    if lines.is_empty() {
        return None;
    }

    let mut report = format!(
        "Report from {} at {}",
        source,
        format_local_time(timestamp)
    );
    for line in lines {
        report.push('\n');
        report.push_str(line);
    }

    Some(report)
}

/// Unix 秒 -> 本地时间 "MM/DD/YYYY H:MM:SS AM/PM"
fn format_local_time(timestamp: f64) -> String {
    let local: DateTime<Local> = Local
        .timestamp_opt(timestamp.trunc() as i64, 0)
        .earliest()
        .unwrap_or_else(Local::now);

    local.format("%m/%d/%Y %-I:%M:%S %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_lines_no_report() {
        assert_eq!(format_report("pi-kitchen", 1718000000.0, &[]), None);
    }

    #[test]
    fn test_report_layout() {
        let lines = vec![
            "freezer_1 is too hot (23.0 F)".to_string(),
            "fridge_1 is reporting an error: Sensor Error".to_string(),
        ];
        let report = format_report("pi-kitchen", 1718000000.0, &lines).unwrap();

        let mut parts = report.lines();
        let header = parts.next().unwrap();
        assert!(header.starts_with("Report from pi-kitchen at "));
        assert_eq!(parts.next(), Some("freezer_1 is too hot (23.0 F)"));
        assert_eq!(
            parts.next(),
            Some("fridge_1 is reporting an error: Sensor Error")
        );
        assert_eq!(parts.next(), None);
    }

    #[test]
    fn test_local_time_shape() {
        // 具体时刻依赖本地时区，只校验格式形状
        let text = format_local_time(1718000000.0);
        let (date, rest) = text.split_once(' ').unwrap();
        let date_parts: Vec<&str> = date.split('/').collect();
        assert_eq!(date_parts.len(), 3);
        assert_eq!(date_parts[0].len(), 2);
        assert_eq!(date_parts[1].len(), 2);
        assert_eq!(date_parts[2].len(), 4);
        assert!(rest.ends_with("AM") || rest.ends_with("PM"));
    }
}
