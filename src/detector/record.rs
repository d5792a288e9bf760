//! 单技术检测记录
//! 一次查询内某技术的全部命中及其置信度/版本簿记

use std::collections::HashMap;

use crate::compiler::Pattern;
use crate::utils::VersionExtractor;

/// 单技术、单次查询的检测记录
///
/// 生命周期限定在一次 analyze 调用内，绝不挂在检测器实例上共享。
#[derive(Debug, Clone, Default)]
pub struct DetectionRecord {
    /// 复合键（类别 + 字段名 + 模式raw） -> 该命中记录的置信度
    /// 同键重复命中直接覆盖，天然去重
    pub matched_pattern_keys: HashMap<String, u32>,
    /// 全部复合键置信度之和，匹配完成后一次性计算
    pub confidence_total: u32,
    /// 去重后的版本列表，插入顺序跟随模式声明顺序与信号求值顺序
    pub versions: Vec<String>,
}

impl DetectionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次成功命中
    ///
    /// 复合键格式：`类别 字段名 模式raw`，字段名为空时省略且不留多余分隔符。
    /// 模式带版本模板时，对命中值重新应用正则并提取版本，
    /// 空版本丢弃，非空版本按串相等去重后追加。
    pub fn record_match(&mut self, category: &str, field: &str, pattern: &Pattern, matched_value: &str) {
        let key = if field.is_empty() {
            format!("{} {}", category, pattern.raw)
        } else {
            format!("{} {} {}", category, field, pattern.raw)
        };
        self.matched_pattern_keys.insert(key, pattern.confidence);

        if pattern.version_template.is_some() {
            if let Some(captures) = pattern.captures(matched_value) {
                if let Some(version) = VersionExtractor::extract(&pattern.version_template, &captures) {
                    if !self.versions.contains(&version) {
                        self.versions.push(version);
                    }
                }
            }
        }
    }

    /// 汇总置信度总分
    pub fn finalize(&mut self) {
        self.confidence_total = self.matched_pattern_keys.values().sum();
    }

    pub fn is_empty(&self) -> bool {
        self.matched_pattern_keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::PatternCompiler;

    #[test]
    fn test_record_same_key_not_doubled() {
        // 测试场景：同一模式重复命中，置信度只计一次
        let pattern = PatternCompiler::compile(r"jquery\;confidence:30");
        let mut record = DetectionRecord::new();
        record.record_match("scriptSrc", "", &pattern, "/jquery-1.js");
        record.record_match("scriptSrc", "", &pattern, "/jquery-2.js");
        record.finalize();

        assert_eq!(record.matched_pattern_keys.len(), 1);
        assert_eq!(record.confidence_total, 30);
    }

    #[test]
    fn test_composite_key_formats() {
        let pattern = PatternCompiler::compile("nginx");
        let mut record = DetectionRecord::new();
        record.record_match("headers", "server", &pattern, "nginx/1.18.0");
        record.record_match("url", "", &pattern, "https://nginx.example/");

        assert!(record.matched_pattern_keys.contains_key("headers server nginx"));
        assert!(record.matched_pattern_keys.contains_key("url nginx"));
    }

    #[test]
    fn test_confidence_total_sums_distinct_keys() {
        let header_pattern = PatternCompiler::compile(r"nginx\;confidence:60");
        let html_pattern = PatternCompiler::compile(r"nginx\;confidence:50");
        let mut record = DetectionRecord::new();
        record.record_match("headers", "server", &header_pattern, "nginx");
        record.record_match("html", "", &html_pattern, "<html>nginx</html>");
        record.finalize();

        // 总分为各键简单求和，不封顶
        assert_eq!(record.confidence_total, 110);
    }

    #[test]
    fn test_versions_deduped_in_insertion_order() {
        let pattern = PatternCompiler::compile(r"app-([\d.]+)\.js\;version:\1");
        let mut record = DetectionRecord::new();
        record.record_match("scriptSrc", "", &pattern, "/app-2.0.js");
        record.record_match("scriptSrc", "", &pattern, "/app-1.5.js");
        record.record_match("scriptSrc", "", &pattern, "/app-2.0.js");

        assert_eq!(record.versions, vec!["2.0".to_string(), "1.5".to_string()]);
    }
}
