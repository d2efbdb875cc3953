use serde::{Deserialize, Serialize};

/// 传感器分类
///
/// 分类只看传感器名称。Unmonitored 的传感器仍计入设备活跃度，
/// 但不产生告警行。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorClass {
    /// 精确匹配 "cpu_temp"，只有上限
    Cpu,

    /// 名称包含 "fridge"（不区分大小写），双边 [min, max]
    Fridge,

    /// 名称包含 "freezer"（不区分大小写），双边 [min, max]
    Freezer,

    /// 未匹配任何规则
    Unmonitored,
}

/// 按名称分类传感器
///
/// 子串匹配的方案比较脆弱，集中在这一个函数里，
/// 将来换成显式标签时不需要动评估逻辑。
pub fn classify(name: &str) -> SensorClass {
    if name == "cpu_temp" {
        return SensorClass::Cpu;
    }

    let lower = name.to_lowercase();
    if lower.contains("fridge") {
        SensorClass::Fridge
    } else if lower.contains("freezer") {
        SensorClass::Freezer
    } else {
        SensorClass::Unmonitored
    }
}

/// 阈值规则表
///
/// 所有阈值以摄氏度表达；线上读数是毫摄氏度整数，
/// 由评估器负责换算。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdRules {
    /// CPU 温度上限（摄氏度）
    #[serde(default = "default_cpu_max_c")]
    pub cpu_max_c: f64,

    /// 冷藏区间 [min, max]（摄氏度）
    #[serde(default = "default_fridge_bounds_c")]
    pub fridge_bounds_c: (f64, f64),

    /// 冷冻区间 [min, max]（摄氏度）
    #[serde(default = "default_freezer_bounds_c")]
    pub freezer_bounds_c: (f64, f64),
}

// 默认值函数
fn default_cpu_max_c() -> f64 {
    100.0
}

fn default_fridge_bounds_c() -> (f64, f64) {
    (0.0, 4.4)
}

fn default_freezer_bounds_c() -> (f64, f64) {
    (-29.0, -9.0)
}

impl Default for ThresholdRules {
    fn default() -> Self {
        Self {
            cpu_max_c: default_cpu_max_c(),
            fridge_bounds_c: default_fridge_bounds_c(),
            freezer_bounds_c: default_freezer_bounds_c(),
        }
    }
}

impl ThresholdRules {
    /// 分类对应的 (min, max) 界限，Unmonitored 返回 None
    pub fn bounds_for(&self, class: SensorClass) -> Option<(Option<f64>, Option<f64>)> {
        match class {
            SensorClass::Cpu => Some((None, Some(self.cpu_max_c))),
            SensorClass::Fridge => {
                Some((Some(self.fridge_bounds_c.0), Some(self.fridge_bounds_c.1)))
            }
            SensorClass::Freezer => {
                Some((Some(self.freezer_bounds_c.0), Some(self.freezer_bounds_c.1)))
            }
            SensorClass::Unmonitored => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify("cpu_temp"), SensorClass::Cpu);
        assert_eq!(classify("fridge_1"), SensorClass::Fridge);
        assert_eq!(classify("FREEZER_2"), SensorClass::Freezer);
        assert_eq!(classify("GarageFridge"), SensorClass::Fridge);
        assert_eq!(classify("ambient"), SensorClass::Unmonitored);
        // 只有精确的 "cpu_temp" 算 CPU
        assert_eq!(classify("cpu_temp_2"), SensorClass::Unmonitored);
    }

    #[test]
    fn test_default_rules() {
        let rules = ThresholdRules::default();
        assert_eq!(rules.cpu_max_c, 100.0);
        assert_eq!(rules.freezer_bounds_c, (-29.0, -9.0));
        assert_eq!(rules.bounds_for(SensorClass::Cpu), Some((None, Some(100.0))));
        assert_eq!(rules.bounds_for(SensorClass::Unmonitored), None);
    }
}
