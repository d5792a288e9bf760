//! 检测器核心：编排 匹配 → 置信度汇总 → implies闭包，输出检测结果

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use super::matcher::RuleMatcher;
use super::record::DetectionRecord;
use super::resolver::ImpliedResolver;
use crate::config::GlobalConfig;
use crate::error::TdResult;
use crate::rule::{RuleLibrary, RuleLoader, RuleNormalizer, Technology};
use crate::signal::SignalBundle;

/// 技术检测器
///
/// 只持有构建后只读的规则库，可经Clone/Arc跨并发检测调用共享；
/// 每次 analyze 的匹配记录均为调用内新分配的局部状态，调用间零泄漏。
#[derive(Debug, Clone)]
pub struct TechDetector {
    library: Arc<RuleLibrary>,
}

impl TechDetector {
    /// 创建检测器：加载原始规则并归一化为规则库
    ///
    /// 规则源不可用时构建直接失败，不会返回零规则的降级实例。
    pub async fn new(config: GlobalConfig) -> TdResult<Self> {
        // 1. 加载合并后的原始规则
        let raw_rules = RuleLoader::load(&config).await?;

        // 2. 归一化构建规则库（单条失败跳过，不中断）
        let library = RuleNormalizer::build_library(&raw_rules);
        debug!("检测器构建完成，规则库规则数：{}", library.len());

        Ok(Self::from_library(library))
    }

    /// 从已归一化的规则库直接构建（规则由调用方自备时使用）
    pub fn from_library(library: RuleLibrary) -> Self {
        Self {
            library: Arc::new(library),
        }
    }

    pub fn library(&self) -> &RuleLibrary {
        &self.library
    }

    /// 核心检测接口
    ///
    /// 对规则库全量规则逐一匹配，implies闭包扩展后输出按名称排序的结果；
    /// 仅经implies引入的技术无直接命中记录，版本为空、置信度为0。
    pub fn analyze(&self, signals: &SignalBundle) -> Vec<Technology> {
        // 每次调用独立的记录与found集合
        let mut records: HashMap<String, DetectionRecord> = HashMap::new();
        let mut found: HashSet<String> = HashSet::new();

        for (name, rule) in self.library.iter() {
            if let Some(outcome) = RuleMatcher::evaluate(rule, signals) {
                if outcome.found {
                    found.insert(name.clone());
                }
                // url-only命中也保留记录，供闭包引入该技术时附带版本信息
                records.insert(name.clone(), outcome.record);
            }
        }

        let closed = ImpliedResolver::resolve(&found, &self.library);

        let mut technologies: Vec<Technology> = closed
            .into_iter()
            .map(|name| match records.get(&name) {
                Some(record) => Technology {
                    versions: record.versions.clone(),
                    confidence: record.confidence_total,
                    name,
                },
                None => Technology {
                    versions: Vec::new(),
                    confidence: 0,
                    name,
                },
            })
            .collect();

        // 结果语义为集合，这里按名称排序只为输出稳定
        technologies.sort_by(|a, b| a.name.cmp(&b.name));
        technologies
    }

    /// 精简检测接口：只返回技术名称集合
    pub fn analyze_names(&self, signals: &SignalBundle) -> HashSet<String> {
        self.analyze(signals)
            .into_iter()
            .map(|tech| tech.name)
            .collect()
    }
}
