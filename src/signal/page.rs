//! 页面抓取协作方
//! 负责抓取目标URL并产出信号束，抓取/解析失败以SignalUnavailable上抛

use reqwest::Client;
use tracing::debug;
use url::Url;

use super::SignalBundle;
use crate::error::{TdResult, TechDetectError};
use crate::utils::HeaderConverter;

/// 页面抓取器
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// 创建抓取器（超时单位：秒）
    pub fn new(http_timeout: u64) -> TdResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(http_timeout))
            .build()
            .map_err(|e| TechDetectError::SignalUnavailable(format!("HTTP客户端构建失败：{}", e)))?;
        Ok(Self { client })
    }

    /// 抓取目标URL并构建信号束
    ///
    /// 使用重定向后的最终URL作为信号束的规范URL。
    pub async fn fetch(&self, target_url: &str) -> TdResult<SignalBundle> {
        // URL先行校验，非法URL不发起请求
        Url::parse(target_url)?;

        let response = self.client.get(target_url)
            .header("User-Agent", "Rstechdetect/0.1.0")
            .send()
            .await
            .map_err(|e| TechDetectError::SignalUnavailable(format!("请求 {} 失败：{}", target_url, e)))?;

        let final_url = response.url().to_string();
        let headers = HeaderConverter::to_hashmap(response.headers());

        let body = response.text().await.map_err(|e| {
            TechDetectError::SignalUnavailable(format!("读取 {} 响应体失败：{}", target_url, e))
        })?;

        debug!("页面抓取完成：{}，响应体{}字节", final_url, body.len());
        Ok(SignalBundle::from_parts(final_url, headers, body))
    }
}
