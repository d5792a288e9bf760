//! 模式编译器核心
//! 负责解析 `expr\;key:value\;...` 格式的原始模式字符串并编译正则

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::pattern::Pattern;

/// 默认置信度（未指定或解析失败时使用）
pub const DEFAULT_CONFIDENCE: u32 = 100;

/// 模式编译器
pub struct PatternCompiler;

impl PatternCompiler {
    /// 编译单条原始模式字符串
    ///
    /// 按转义分号 `\;` 拆分：分段0为匹配表达式（统一加 `(?i)` 前缀编译），
    /// 后续分段为 `key:value` 属性，当前识别 `confidence` 与 `version`。
    /// 表达式编译失败时返回惰性模式，不中断规则归一化流程。
    pub fn compile(raw: &str) -> Pattern {
        let mut expression = "";
        let mut confidence = DEFAULT_CONFIDENCE;
        let mut version_template = None;
        let mut extra_attrs = Vec::new();

        for (index, segment) in raw.split("\\;").enumerate() {
            if index == 0 {
                expression = segment;
                continue;
            }

            let Some((key, value)) = segment.split_once(':') else {
                // 无冒号的属性分段，原样保留
                extra_attrs.push((segment.to_string(), String::new()));
                continue;
            };

            match key {
                "confidence" => {
                    confidence = value.parse().unwrap_or(DEFAULT_CONFIDENCE);
                }
                "version" => {
                    version_template = Some(value.to_string());
                }
                _ => {
                    extra_attrs.push((key.to_string(), value.to_string()));
                }
            }
        }

        let regex = Self::compile_expression(expression);
        if regex.is_none() {
            debug!("表达式编译失败，模式转为惰性：{}", expression);
        }

        Pattern {
            raw: expression.to_string(),
            regex,
            confidence,
            version_template,
            extra_attrs,
        }
    }

    /// 编译匹配表达式（大小写不敏感）
    ///
    /// 首次编译失败时，移除regex crate不支持的PCRE环视语法后重试一次，
    /// 仍失败则放弃，模式保持惰性。
    fn compile_expression(expression: &str) -> Option<Regex> {
        static LOOK_AROUND_REGEX: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r#"\(\?[=!<>].*?\)"#).unwrap()
        });

        let case_insensitive = format!("(?i){}", expression);
        if let Ok(regex) = Regex::new(&case_insensitive) {
            return Some(regex);
        }

        let stripped = LOOK_AROUND_REGEX.replace_all(&case_insensitive, "");
        Regex::new(&stripped).ok()
    }
}
