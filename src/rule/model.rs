//! 规则数据模型定义
//! 原始规则（松散类型）与归一化规则（规范形态）的数据结构

use std::collections::HashMap;
use std::fmt;
use serde::{Deserialize, Serialize};

use crate::compiler::Pattern;

/// 原始技术规则（从规则JSON解析，字段形态松散）
///
/// 列表型字段可能缺失、为单个字符串或字符串数组；
/// `headers`/`meta` 可能缺失或键大小写不一致，统一交由归一化处理。
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawTechRule {
    #[serde(default)]
    pub url: Option<serde_json::Value>,
    #[serde(default)]
    pub html: Option<serde_json::Value>,
    #[serde(rename = "scriptSrc", default)]
    pub script_src: Option<serde_json::Value>,
    #[serde(default)]
    pub headers: Option<serde_json::Value>,
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
    #[serde(default)]
    pub implies: Option<serde_json::Value>,
}

/// 归一化后的技术规则
///
/// 归一化保证所有字段恒存在（可能为空），匹配逻辑不再分支判断字段缺失。
/// 列表字段保持声明顺序；键值字段的键已折叠为小写，
/// 并以有序键值对存储，保证版本收集顺序与碰撞处理的确定性。
#[derive(Debug, Clone)]
pub struct TechRule {
    pub name: String,
    pub url_patterns: Vec<Pattern>,
    pub html_patterns: Vec<Pattern>,
    pub script_src_patterns: Vec<Pattern>,
    pub header_patterns: Vec<(String, Pattern)>,
    pub meta_patterns: Vec<(String, Pattern)>,
    pub implies: Vec<String>,
}

/// 归一化规则库，构建后只读，可跨并发检测调用共享
#[derive(Debug, Clone, Default)]
pub struct RuleLibrary {
    rules: HashMap<String, TechRule>,
}

impl RuleLibrary {
    pub fn new(rules: HashMap<String, TechRule>) -> Self {
        Self { rules }
    }

    pub fn get(&self, name: &str) -> Option<&TechRule> {
        self.rules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TechRule)> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// 技术检测结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technology {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub versions: Vec<String>,
    #[serde(default)]
    pub confidence: u32,
}

// ======== 为 Technology 实现 Display trait（用于 CLI / Report 输出） ========
impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.versions.first() {
            Some(v) if !v.is_empty() => write!(f, "{} {}", self.name, v),
            _ => write!(f, "{}", self.name),
        }
    }
}
