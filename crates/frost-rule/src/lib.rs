pub mod evaluate;
pub mod model;
pub mod report;

pub use evaluate::evaluate;
pub use model::{classify, SensorClass, ThresholdRules};
pub use report::format_report;
