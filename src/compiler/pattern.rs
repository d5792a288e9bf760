//! 编译后模式模型
//! 单条可匹配表达式及其置信度/版本元数据

use regex::{Captures, Regex};

/// 编译后的匹配模式
///
/// `raw` 保留分段0的原始表达式，作为去重的稳定标识键；
/// `regex` 为 None 时该模式为惰性模式，永远不参与匹配。
#[derive(Debug, Clone)]
pub struct Pattern {
    pub raw: String,
    pub regex: Option<Regex>,
    pub confidence: u32,
    pub version_template: Option<String>,
    // 未识别的 key:value 属性，原样保留，下游逻辑忽略
    pub extra_attrs: Vec<(String, String)>,
}

impl Pattern {
    /// 是否为惰性模式（表达式编译失败）
    pub fn is_inert(&self) -> bool {
        self.regex.is_none()
    }

    /// 简单匹配判断，惰性模式恒为 false
    pub fn is_match(&self, input: &str) -> bool {
        match &self.regex {
            Some(regex) => regex.is_match(input),
            None => false,
        }
    }

    /// 匹配输入并返回捕获结果（版本提取用）
    pub fn captures<'a>(&self, input: &'a str) -> Option<Captures<'a>> {
        self.regex.as_ref().and_then(|regex| regex.captures(input))
    }
}
