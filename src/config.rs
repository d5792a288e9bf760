//! 全局配置管理,存储所有可配置项

use std::path::PathBuf;

/// 全局配置
#[derive(Debug, Clone)]
pub struct GlobalConfig {
    // 规则目录（存放按字母拆分的*.json规则文件）
    pub rule_dir: PathBuf,
    // 规则缓存路径（合并后的MessagePack文件）
    pub rule_cache_path: PathBuf,
    // GitHub代理URL
    pub gh_proxy_url: String,
    // 远程规则镜像基础URL（按字母拼接 {letter}.json）
    pub rule_mirror_url: String,
    // 超时配置（单位：秒）
    pub http_timeout: u64,
    // 构建检测器前是否强制拉取远程规则
    pub force_update: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            rule_dir: PathBuf::from("technologies"),
            rule_cache_path: PathBuf::from("techdetect_rules.mp"),
            gh_proxy_url: "https://ghfast.top/".to_string(),
            rule_mirror_url: "https://raw.githubusercontent.com/wappalyzer/wappalyzer/master/src/technologies/"
                .to_string(),
            http_timeout: 30,
            force_update: false,
        }
    }
}

/// 配置管理器（单例）
pub struct ConfigManager;

impl ConfigManager {
    /// 获取默认配置
    pub fn get_default() -> GlobalConfig {
        GlobalConfig::default()
    }

    /// 自定义配置
    pub fn custom() -> CustomConfigBuilder {
        CustomConfigBuilder::new()
    }
}

/// 配置构建器（便于自定义配置）
#[derive(Debug, Clone)]
pub struct CustomConfigBuilder {
    config: GlobalConfig,
}

impl CustomConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: GlobalConfig::default(),
        }
    }

    pub fn rule_dir(mut self, dir: PathBuf) -> Self {
        self.config.rule_dir = dir;
        self
    }

    pub fn rule_cache_path(mut self, path: PathBuf) -> Self {
        self.config.rule_cache_path = path;
        self
    }

    pub fn gh_proxy_url(mut self, url: String) -> Self {
        self.config.gh_proxy_url = url;
        self
    }

    pub fn rule_mirror_url(mut self, url: String) -> Self {
        self.config.rule_mirror_url = url;
        self
    }

    pub fn http_timeout(mut self, timeout: u64) -> Self {
        self.config.http_timeout = timeout;
        self
    }

    pub fn force_update(mut self, update: bool) -> Self {
        self.config.force_update = update;
        self
    }

    pub fn build(self) -> GlobalConfig {
        self.config
    }
}

impl Default for CustomConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
