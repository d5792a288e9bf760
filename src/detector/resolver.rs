//! 关联技术推导
//! 对已检出集合按implies关系做不动点闭包扩展

use std::collections::HashSet;

use crate::rule::RuleLibrary;

/// implies闭包解析器
pub struct ImpliedResolver;

impl ImpliedResolver {
    /// 计算已检出集合在implies关系下的闭包
    ///
    /// 两阶段循环：整轮扫描收集新增，再统一并入，直到一轮无新增为止。
    /// 集合只增不减，implies图存在环也必然终止。
    /// implies引用了规则库中不存在的名字时静默忽略。
    pub fn resolve(initially_found: &HashSet<String>, library: &RuleLibrary) -> HashSet<String> {
        let mut closed = initially_found.clone();

        loop {
            let mut additions = Vec::new();
            for name in &closed {
                let Some(rule) = library.get(name) else {
                    continue;
                };
                for implied in &rule.implies {
                    if library.contains(implied) && !closed.contains(implied) {
                        additions.push(implied.clone());
                    }
                }
            }

            if additions.is_empty() {
                break;
            }
            closed.extend(additions);
        }

        closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use serde_json::json;
    use crate::rule::{RawTechRule, RuleNormalizer};

    fn library(defs: serde_json::Value) -> RuleLibrary {
        let raw_rules: HashMap<String, RawTechRule> = serde_json::from_value(defs).unwrap();
        RuleNormalizer::build_library(&raw_rules)
    }

    fn set(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_transitive_chain() {
        // 测试场景：A→B→C 传递闭包
        let lib = library(json!({
            "A": { "implies": "B" },
            "B": { "implies": "C" },
            "C": {}
        }));
        assert_eq!(ImpliedResolver::resolve(&set(&["A"]), &lib), set(&["A", "B", "C"]));
    }

    #[test]
    fn test_resolve_cycle_terminates() {
        // 测试场景：A↔B互相implies，闭包必须终止且包含两者
        let lib = library(json!({
            "A": { "implies": "B" },
            "B": { "implies": "A" }
        }));
        assert_eq!(ImpliedResolver::resolve(&set(&["A"]), &lib), set(&["A", "B"]));
    }

    #[test]
    fn test_resolve_unknown_implied_name_ignored() {
        let lib = library(json!({
            "A": { "implies": ["Ghost", "B"] },
            "B": {}
        }));
        assert_eq!(ImpliedResolver::resolve(&set(&["A"]), &lib), set(&["A", "B"]));
    }

    #[test]
    fn test_resolve_is_monotonic_and_idempotent() {
        // 测试场景：输出恒为输入超集；对已闭合集合再解析不再变化
        let lib = library(json!({
            "Drupal": { "implies": "PHP" },
            "PHP": {}
        }));
        let initial = set(&["Drupal"]);
        let closed = ImpliedResolver::resolve(&initial, &lib);
        assert!(closed.is_superset(&initial));

        let reclosed = ImpliedResolver::resolve(&closed, &lib);
        assert_eq!(reclosed, closed);
    }
}
