//! 工具模块：版本提取与Header格式转换
pub mod version_extractor;
pub mod header_converter;

pub use self::version_extractor::VersionExtractor;
pub use self::header_converter::HeaderConverter;
