//! 规则缓存管理
//! 仅处理合并后原始规则的本地序列化（MessagePack）和反序列化

use std::collections::HashMap;
use rmp_serde::{Serializer, from_slice};
use serde::Serialize;
use tracing::debug;

use super::model::RawTechRule;
use crate::error::{TdResult, TechDetectError};
use crate::config::GlobalConfig;

/// 规则缓存管理器
pub struct RuleCacheManager;

impl RuleCacheManager {
    /// 从本地缓存加载合并后的原始规则
    pub async fn load_from_cache(config: &GlobalConfig) -> TdResult<HashMap<String, RawTechRule>> {
        let cache_path = &config.rule_cache_path;
        let cache_data = tokio::fs::read(cache_path).await?;

        // MessagePack反序列化
        let raw_rules: HashMap<String, RawTechRule> = from_slice(&cache_data)
            .map_err(|e| TechDetectError::MsgPackError(format!("反序列化失败：{}", e)))?;

        debug!("缓存文件反序列化成功，原始规则数：{}", raw_rules.len());

        Ok(raw_rules)
    }

    /// 将合并后的原始规则缓存到本地
    pub async fn save_to_cache(
        config: &GlobalConfig,
        raw_rules: &HashMap<String, RawTechRule>,
    ) -> TdResult<()> {
        let cache_path = &config.rule_cache_path;
        let mut cache_data = Vec::new();

        // MessagePack序列化
        raw_rules.serialize(&mut Serializer::new(&mut cache_data))
            .map_err(|e| TechDetectError::MsgPackError(format!("序列化失败：{}", e)))?;

        debug!("规则序列化成功，序列化后数据大小：{} 字节", cache_data.len());

        // 写入文件
        tokio::fs::write(cache_path, cache_data).await?;
        Ok(())
    }

    /// 清除本地缓存
    pub async fn clear_cache(config: &GlobalConfig) -> TdResult<()> {
        let cache_path = &config.rule_cache_path;
        if cache_path.exists() {
            tokio::fs::remove_file(cache_path).await?;
        }
        Ok(())
    }
}
