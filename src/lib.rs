//! rstechdetect - 基于声明式指纹规则的网站技术栈检测引擎
//!
//! 核心为纯内存的检测引擎：规则归一化、信号匹配、置信度累加与implies闭包推导。
//! 页面抓取与规则加载属于协作方边界，引擎本身不做任何I/O。

// 导出全局错误类型
pub use self::error::{TechDetectError, TdResult};

// 导出配置模块
pub use self::config::{GlobalConfig, ConfigManager, CustomConfigBuilder};

// 导出规则模块核心接口
pub use self::rule::{
    RawTechRule, TechRule, RuleLibrary, Technology,
    RuleNormalizer, RuleLoader, RuleCacheManager,
};

// 导出编译模块核心接口
pub use self::compiler::{Pattern, PatternCompiler};

// 导出信号模块核心接口
pub use self::signal::{SignalBundle, PageFetcher};

// 导出提取模块核心接口
pub use self::extractor::HtmlExtractor;

// 导出工具模块核心接口
pub use self::utils::{VersionExtractor, HeaderConverter};

// 导出检测模块核心接口
pub use self::detector::{
    TechDetector,
    DetectionRecord,
    MatchOutcome,
    RuleMatcher,
    ImpliedResolver,
    init_detector,
    init_detector_with_config,
    detect_technologies,
    detect_technology_names,
};

// 声明所有子模块
pub mod config;
pub mod error;
pub mod rule;
pub mod compiler;
pub mod signal;
pub mod extractor;
pub mod utils;
pub mod detector;
