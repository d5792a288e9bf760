//! 全局检测器单例管理
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::OnceCell;

use super::detector::TechDetector;
use crate::error::{TdResult, TechDetectError};
use crate::config::{ConfigManager, GlobalConfig};
use crate::rule::Technology;
use crate::signal::SignalBundle;

/// 全局检测器实例
static GLOBAL_DETECTOR: Lazy<Arc<OnceCell<TechDetector>>> = Lazy::new(|| {
    Arc::new(OnceCell::new())
});

/// 初始化全局检测器（默认配置）
pub async fn init_detector() -> TdResult<()> {
    init_detector_with_config(ConfigManager::get_default()).await
}

/// 带自定义配置初始化全局检测器
pub async fn init_detector_with_config(config: GlobalConfig) -> TdResult<()> {
    if GLOBAL_DETECTOR.get().is_some() {
        return Ok(());
    }

    let detector = TechDetector::new(config).await?;
    GLOBAL_DETECTOR.set(detector).map_err(|_| {
        TechDetectError::DetectorNotInitialized
    })?;

    Ok(())
}

/// 获取全局检测器
pub(crate) fn get_global_detector() -> TdResult<&'static TechDetector> {
    GLOBAL_DETECTOR.get()
        .ok_or(TechDetectError::DetectorNotInitialized)
}

// 对外暴露的简化接口（基于全局检测器）
pub fn detect_technologies(signals: &SignalBundle) -> TdResult<Vec<Technology>> {
    let detector = get_global_detector()?;
    Ok(detector.analyze(signals))
}

pub fn detect_technology_names(signals: &SignalBundle) -> TdResult<HashSet<String>> {
    let detector = get_global_detector()?;
    Ok(detector.analyze_names(signals))
}
