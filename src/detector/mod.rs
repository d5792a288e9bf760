//! 检测模块：技术检测核心逻辑
pub mod record;
pub mod matcher;
pub mod resolver;
pub mod detector;
pub mod global;

// 导出核心接口
pub use self::record::DetectionRecord;
pub use self::matcher::{MatchOutcome, RuleMatcher};
pub use self::resolver::ImpliedResolver;
pub use self::detector::TechDetector;
pub use self::global::{
    init_detector,
    init_detector_with_config,
    detect_technologies,
    detect_technology_names,
};
