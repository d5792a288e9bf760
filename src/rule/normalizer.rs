//! 规则归一化器
//! 将松散形态的原始规则统一为规范的TechRule，匹配逻辑不再感知原始形态

use std::collections::HashMap;
use serde_json::Value;
use tracing::{debug, warn};

use super::model::{RawTechRule, RuleLibrary, TechRule};
use crate::compiler::{Pattern, PatternCompiler};
use crate::error::{TdResult, TechDetectError};

/// 规则归一化器
pub struct RuleNormalizer;

impl RuleNormalizer {
    /// 归一化整个原始规则集合并构建规则库
    ///
    /// 单条技术归一化失败只记录日志并跳过，不中断其余技术的构建。
    pub fn build_library(raw_rules: &HashMap<String, RawTechRule>) -> RuleLibrary {
        let mut rules = HashMap::with_capacity(raw_rules.len());
        let mut skipped = 0usize;

        for (name, raw) in raw_rules {
            match Self::normalize(name, raw) {
                Ok(rule) => {
                    rules.insert(name.clone(), rule);
                }
                Err(e) => {
                    warn!("技术规则归一化失败，已跳过：{}", e);
                    skipped += 1;
                }
            }
        }

        debug!("规则库构建完成，有效规则{}条，跳过{}条", rules.len(), skipped);
        RuleLibrary::new(rules)
    }

    /// 归一化单条技术规则
    pub fn normalize(name: &str, raw: &RawTechRule) -> TdResult<TechRule> {
        let url_strings = Self::coerce_string_list(name, "url", raw.url.as_ref())?;
        let html_strings = Self::coerce_string_list(name, "html", raw.html.as_ref())?;
        let script_strings = Self::coerce_string_list(name, "scriptSrc", raw.script_src.as_ref())?;
        let implies = Self::coerce_string_list(name, "implies", raw.implies.as_ref())?;

        let header_patterns = Self::coerce_keyed_patterns(name, "headers", raw.headers.as_ref())?;
        let meta_patterns = Self::coerce_meta_patterns(name, raw.meta.as_ref())?;

        Ok(TechRule {
            name: name.to_string(),
            url_patterns: Self::compile_list(&url_strings),
            html_patterns: Self::compile_list(&html_strings),
            script_src_patterns: Self::compile_list(&script_strings),
            header_patterns,
            meta_patterns,
            implies,
        })
    }

    /// 列表型字段统一：缺失→空列表，单个字符串→单元素列表，数组→保持声明顺序
    fn coerce_string_list(tech: &str, field: &str, value: Option<&Value>) -> TdResult<Vec<String>> {
        let Some(value) = value else {
            return Ok(Vec::new());
        };

        match value {
            Value::String(s) => Ok(vec![s.clone()]),
            Value::Array(items) => {
                let mut strings = Vec::with_capacity(items.len());
                for item in items {
                    let Value::String(s) = item else {
                        return Err(Self::malformed(tech, field));
                    };
                    strings.push(s.clone());
                }
                Ok(strings)
            }
            _ => Err(Self::malformed(tech, field)),
        }
    }

    /// 键值型字段统一（headers）：键折叠小写，碰撞时后处理者覆盖
    ///
    /// serde_json::Map 按键有序遍历，碰撞处理与最终顺序均为确定性行为。
    fn coerce_keyed_patterns(
        tech: &str,
        field: &str,
        value: Option<&Value>,
    ) -> TdResult<Vec<(String, Pattern)>> {
        let Some(value) = value else {
            return Ok(Vec::new());
        };

        let Value::Object(map) = value else {
            return Err(Self::malformed(tech, field));
        };

        let mut patterns: Vec<(String, Pattern)> = Vec::with_capacity(map.len());
        for (key, val) in map {
            let Value::String(raw_pattern) = val else {
                return Err(Self::malformed(tech, field));
            };
            Self::insert_keyed(&mut patterns, key.to_lowercase(), PatternCompiler::compile(raw_pattern));
        }
        Ok(patterns)
    }

    /// meta字段统一：裸标量视为合成generator键的值，列表值只取首元素
    fn coerce_meta_patterns(tech: &str, value: Option<&Value>) -> TdResult<Vec<(String, Pattern)>> {
        let Some(value) = value else {
            return Ok(Vec::new());
        };

        let map = match value {
            Value::Object(map) => map,
            // 非映射形态：包装为 {"generator": value}
            other => {
                let Some(raw_pattern) = Self::first_scalar(other) else {
                    return Err(Self::malformed(tech, "meta"));
                };
                return Ok(vec![("generator".to_string(), PatternCompiler::compile(raw_pattern))]);
            }
        };

        let mut patterns: Vec<(String, Pattern)> = Vec::with_capacity(map.len());
        for (key, val) in map {
            let raw_pattern = match val {
                Value::String(s) => s.as_str(),
                Value::Array(items) => match items.first() {
                    Some(Value::String(s)) => s.as_str(),
                    Some(_) => return Err(Self::malformed(tech, "meta")),
                    // 空列表值没有可用模式，跳过该键
                    None => continue,
                },
                _ => return Err(Self::malformed(tech, "meta")),
            };
            Self::insert_keyed(&mut patterns, key.to_lowercase(), PatternCompiler::compile(raw_pattern));
        }
        Ok(patterns)
    }

    /// 取标量字符串或列表首元素
    fn first_scalar(value: &Value) -> Option<&str> {
        match value {
            Value::String(s) => Some(s),
            Value::Array(items) => match items.first() {
                Some(Value::String(s)) => Some(s),
                _ => None,
            },
            _ => None,
        }
    }

    /// 小写键插入，重复键以后处理者为准
    fn insert_keyed(patterns: &mut Vec<(String, Pattern)>, key: String, pattern: Pattern) {
        if let Some(existing) = patterns.iter_mut().find(|(k, _)| *k == key) {
            existing.1 = pattern;
        } else {
            patterns.push((key, pattern));
        }
    }

    fn malformed(tech: &str, field: &str) -> TechDetectError {
        TechDetectError::MalformedRule {
            tech: tech.to_string(),
            field: field.to_string(),
        }
    }

    fn compile_list(raw_patterns: &[String]) -> Vec<Pattern> {
        raw_patterns.iter().map(|raw| PatternCompiler::compile(raw)).collect()
    }
}
