//! 规则模块：规则的数据模型、归一化、加载与缓存
pub mod model;
pub mod normalizer;
pub mod cache;
pub mod loader;

// 导出核心接口
pub use self::model::{RawTechRule, TechRule, RuleLibrary, Technology};
pub use self::normalizer::RuleNormalizer;
pub use self::loader::RuleLoader;
pub use self::cache::RuleCacheManager;
