//! 规则匹配器
//! 针对单个技术规则，对一束页面信号逐类别求值并记录全部命中

use tracing::debug;

use super::record::DetectionRecord;
use crate::rule::TechRule;
use crate::signal::SignalBundle;

/// 单技术匹配结果
///
/// `found` 与记录分离：url类别的命中只进簿记不置found，
/// 这是沿袭参考实现的既有行为（见检测器测试中的对应用例）。
#[derive(Debug)]
pub struct MatchOutcome {
    pub record: DetectionRecord,
    pub found: bool,
}

/// 规则匹配器
pub struct RuleMatcher;

impl RuleMatcher {
    /// 对一个技术规则求值全部模式类别
    ///
    /// 类别之间不短路，同一技术的多个模式各自独立记账；
    /// 无任何命中时返回 None。
    pub fn evaluate(rule: &TechRule, signals: &SignalBundle) -> Option<MatchOutcome> {
        let mut record = DetectionRecord::new();
        let mut found = false;

        // 1. url：只更新记录，不置found
        for pattern in &rule.url_patterns {
            if pattern.is_match(&signals.url) {
                record.record_match("url", "", pattern, &signals.url);
            }
        }

        // 2. headers：取同名响应头的首个值，空值不参与匹配
        for (header_name, pattern) in &rule.header_patterns {
            let Some(first_value) = signals.headers.get(header_name).and_then(|v| v.first()) else {
                continue;
            };
            if first_value.is_empty() {
                continue;
            }
            if pattern.is_match(first_value) {
                record.record_match("headers", header_name, pattern, first_value);
                found = true;
            }
        }

        // 3. scriptSrc：模式×脚本列表做笛卡尔积，一个模式可命中多个脚本
        for pattern in &rule.script_src_patterns {
            for src in &signals.script_srcs {
                if pattern.is_match(src) {
                    record.record_match("scriptSrc", "", pattern, src);
                    found = true;
                }
            }
        }

        // 4. meta：取同名meta值，空值不参与匹配
        for (meta_name, pattern) in &rule.meta_patterns {
            let Some(content) = signals.meta.get(meta_name) else {
                continue;
            };
            if content.is_empty() {
                continue;
            }
            if pattern.is_match(content) {
                record.record_match("meta", meta_name, pattern, content);
                found = true;
            }
        }

        // 5. html：对完整原始标记求值
        for pattern in &rule.html_patterns {
            if pattern.is_match(&signals.raw_markup) {
                record.record_match("html", "", pattern, &signals.raw_markup);
                found = true;
            }
        }

        if record.is_empty() {
            return None;
        }

        record.finalize();
        debug!(
            "技术匹配命中：{}，found={}，命中{}条，总置信度{}",
            rule.name,
            found,
            record.matched_pattern_keys.len(),
            record.confidence_total
        );
        Some(MatchOutcome { record, found })
    }
}
