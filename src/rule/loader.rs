//! 规则加载管理器
//! 负责从本地规则目录、本地缓存或远程镜像获取原始规则

use std::collections::HashMap;
use std::path::Path;
use reqwest::Client;
use tracing::{debug, warn};
use serde_json::Value;

use super::model::RawTechRule;
use super::cache::RuleCacheManager;
use crate::error::{TdResult, TechDetectError};
use crate::config::GlobalConfig;

/// 远程镜像的分片文件名（按首字母拆分的规则文件）
const RULE_FILE_LETTERS: &str = "abcdefghijklmnopqrstuvwxyz_";

/// 规则加载管理器
pub struct RuleLoader;

impl RuleLoader {
    /// 加载合并后的原始规则（优先本地缓存，其次规则目录）
    ///
    /// `force_update` 开启时先拉取远程镜像刷新规则目录再加载。
    /// 规则目录缺失或不可读时直接失败，不返回部分可用的规则集。
    pub async fn load(config: &GlobalConfig) -> TdResult<HashMap<String, RawTechRule>> {
        if config.force_update {
            Self::fetch_remote(config).await?;
        } else if let Ok(raw_rules) = RuleCacheManager::load_from_cache(config).await {
            debug!("从本地缓存加载规则成功，规则数：{}", raw_rules.len());
            return Ok(raw_rules);
        }

        let raw_rules = Self::load_from_dir(&config.rule_dir).await?;

        // 刷新缓存，失败只降级告警
        if let Err(e) = RuleCacheManager::save_to_cache(config, &raw_rules).await {
            warn!("规则缓存到本地失败：{}", e);
        } else {
            debug!("规则已缓存到本地：{}", config.rule_cache_path.display());
        }

        Ok(raw_rules)
    }

    /// 从规则目录加载并合并所有*.json规则文件
    ///
    /// 文件按文件名排序依次合并，同名技术以后处理的文件为准。
    /// 目录缺失/不可读 ⇒ RuleSourceUnavailable；
    /// 单个文件JSON损坏或单条技术定义非对象 ⇒ 告警跳过。
    pub async fn load_from_dir(rule_dir: &Path) -> TdResult<HashMap<String, RawTechRule>> {
        let mut dir_entries = tokio::fs::read_dir(rule_dir).await.map_err(|e| {
            TechDetectError::RuleSourceUnavailable(format!(
                "规则目录不可读：{}，{}",
                rule_dir.display(),
                e
            ))
        })?;

        let mut file_names = Vec::new();
        while let Some(entry) = dir_entries.next_entry().await.map_err(|e| {
            TechDetectError::RuleSourceUnavailable(format!(
                "规则目录遍历失败：{}，{}",
                rule_dir.display(),
                e
            ))
        })? {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.ends_with(".json") {
                file_names.push(name);
            }
        }
        file_names.sort();

        let mut raw_rules = HashMap::new();
        for name in &file_names {
            let path = rule_dir.join(name);
            let bytes = tokio::fs::read(&path).await.map_err(|e| {
                TechDetectError::RuleSourceUnavailable(format!(
                    "规则文件不可读：{}，{}",
                    path.display(),
                    e
                ))
            })?;

            let content: HashMap<String, Value> = match serde_json::from_slice(&bytes) {
                Ok(content) => content,
                Err(e) => {
                    warn!("规则文件JSON解析失败，已跳过：{}，{}", path.display(), e);
                    continue;
                }
            };

            for (tech_name, definition) in content {
                match serde_json::from_value::<RawTechRule>(definition) {
                    // 后加载的文件覆盖先加载文件中的同名技术
                    Ok(raw) => {
                        raw_rules.insert(tech_name, raw);
                    }
                    Err(e) => {
                        warn!("技术定义非对象形态，已跳过：{}，{}", tech_name, e);
                    }
                }
            }
        }

        debug!("规则目录加载完成，文件{}个，原始规则{}条", file_names.len(), raw_rules.len());
        Ok(raw_rules)
    }

    /// 拉取远程镜像的分片规则文件并写入规则目录
    pub async fn fetch_remote(config: &GlobalConfig) -> TdResult<()> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.http_timeout))
            .build()
            .map_err(|e| TechDetectError::RuleSourceUnavailable(format!("HTTP客户端构建失败：{}", e)))?;

        tokio::fs::create_dir_all(&config.rule_dir).await?;

        for letter in RULE_FILE_LETTERS.chars() {
            let raw_url = format!("{}{}.json", config.rule_mirror_url, letter);
            // 构建代理URL（原始URL失败时回退）
            let proxy_path = raw_url.trim_start_matches("https://");
            let fallback_url = format!("{}{}", config.gh_proxy_url, proxy_path);

            let bytes = match Self::fetch_rule_file(&client, &raw_url).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!("拉取 {} 失败：{}，尝试代理URL：{}", raw_url, e, fallback_url);
                    Self::fetch_rule_file(&client, &fallback_url).await?
                }
            };

            let target = config.rule_dir.join(format!("{}.json", letter));
            tokio::fs::write(&target, bytes).await?;
            debug!("规则分片已写入：{}", target.display());
        }

        Ok(())
    }

    /// 拉取单个规则分片文件
    async fn fetch_rule_file(client: &Client, url: &str) -> TdResult<Vec<u8>> {
        let response = client.get(url)
            .header("User-Agent", "Rstechdetect/0.1.0")
            .header("Accept-Encoding", "gzip, deflate")
            .send()
            .await
            .map_err(|e| TechDetectError::RuleSourceUnavailable(format!("请求 {} 失败：{}", url, e)))?;

        if !response.status().is_success() {
            return Err(TechDetectError::RuleSourceUnavailable(format!(
                "URL {} 返回状态码 {}",
                url,
                response.status()
            )));
        }

        let bytes = response.bytes().await.map_err(|e| {
            TechDetectError::RuleSourceUnavailable(format!("读取 {} 响应体失败：{}", url, e))
        })?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_from_dir_merges_with_later_file_override() {
        // 测试场景：两个规则文件含同名技术，按文件名序后者覆盖前者
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(
            dir.path().join("a.json"),
            r#"{"Nginx": {"headers": {"Server": "nginx-old"}}, "OnlyA": {"html": "a"}}"#,
        )
        .await
        .unwrap();
        tokio::fs::write(
            dir.path().join("b.json"),
            r#"{"Nginx": {"headers": {"Server": "nginx-new"}}}"#,
        )
        .await
        .unwrap();

        let raw_rules = RuleLoader::load_from_dir(dir.path()).await.unwrap();
        assert_eq!(raw_rules.len(), 2);
        let nginx = &raw_rules["Nginx"];
        assert_eq!(
            nginx.headers.as_ref().unwrap()["Server"],
            serde_json::json!("nginx-new")
        );
    }

    #[tokio::test]
    async fn test_load_from_missing_dir_is_source_unavailable() {
        let err = RuleLoader::load_from_dir(Path::new("/nonexistent/techdetect-rules"))
            .await
            .unwrap_err();
        assert!(matches!(err, TechDetectError::RuleSourceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_load_from_empty_dir_yields_zero_rules() {
        // 测试场景：目录可读但无规则文件，零规则不视为加载失败
        let dir = tempfile::tempdir().unwrap();
        let raw_rules = RuleLoader::load_from_dir(dir.path()).await.unwrap();
        assert!(raw_rules.is_empty());
    }

    #[tokio::test]
    async fn test_load_prefers_cache_over_rule_dir() {
        // 测试场景：缓存命中时直接返回，规则目录缺失也不影响加载
        let dir = tempfile::tempdir().unwrap();
        let config = crate::config::ConfigManager::custom()
            .rule_dir(dir.path().join("no-such-rule-dir"))
            .rule_cache_path(dir.path().join("rules.mp"))
            .build();

        let mut cached: HashMap<String, RawTechRule> = HashMap::new();
        cached.insert(
            "Cached".to_string(),
            serde_json::from_value(serde_json::json!({ "html": "cached-marker" })).unwrap(),
        );
        RuleCacheManager::save_to_cache(&config, &cached).await.unwrap();

        let raw_rules = RuleLoader::load(&config).await.unwrap();
        assert_eq!(raw_rules.len(), 1);
        assert!(raw_rules.contains_key("Cached"));
    }

    #[tokio::test]
    async fn test_load_falls_back_to_dir_and_refreshes_cache() {
        // 测试场景：无缓存时回退规则目录加载，并在加载后刷新缓存
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("a.json"), r#"{"FromDir": {"html": "dir-marker"}}"#)
            .await
            .unwrap();
        let config = crate::config::ConfigManager::custom()
            .rule_dir(dir.path().to_path_buf())
            .rule_cache_path(dir.path().join("rules.mp"))
            .build();

        let raw_rules = RuleLoader::load(&config).await.unwrap();
        assert!(raw_rules.contains_key("FromDir"));

        // 第二次加载走刷新后的缓存，结果一致
        let cached = RuleCacheManager::load_from_cache(&config).await.unwrap();
        assert!(cached.contains_key("FromDir"));
    }

    #[tokio::test]
    async fn test_load_from_dir_skips_corrupt_json_file() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("a.json"), b"{not json")
            .await
            .unwrap();
        tokio::fs::write(dir.path().join("b.json"), r#"{"Good": {"html": "ok"}}"#)
            .await
            .unwrap();

        let raw_rules = RuleLoader::load_from_dir(dir.path()).await.unwrap();
        assert_eq!(raw_rules.len(), 1);
        assert!(raw_rules.contains_key("Good"));
    }
}
