//! 提取模块：从原始HTML中抽取可匹配的页面信号
pub mod html_extractor;

pub use self::html_extractor::HtmlExtractor;
