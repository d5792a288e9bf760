//! 信号模块：检测引擎的输入信号束
//!
//! 信号束由外部协作方（抓取/解析页面的一侧）产出，引擎只消费不生产。
pub mod page;

pub use self::page::PageFetcher;

use std::collections::HashMap;

use crate::extractor::HtmlExtractor;

/// 一次查询的页面信号束
///
/// `headers`/`meta` 的键在构造时已折叠小写，匹配阶段按小写键直接查找。
#[derive(Debug, Clone, Default)]
pub struct SignalBundle {
    pub url: String,
    pub raw_markup: String,
    pub headers: HashMap<String, Vec<String>>,
    pub script_srcs: Vec<String>,
    pub meta: HashMap<String, String>,
}

impl SignalBundle {
    /// 从已抓取的响应要素构建信号束
    ///
    /// script-src与meta由HTML提取器从原始标记中抽取，
    /// meta同名时文档序靠后的覆盖靠前的。
    pub fn from_parts(
        url: impl Into<String>,
        headers: HashMap<String, Vec<String>>,
        raw_markup: impl Into<String>,
    ) -> Self {
        let raw_markup = raw_markup.into();
        let extracted = HtmlExtractor::new().extract(&raw_markup);

        let mut meta = HashMap::new();
        for (name, content) in extracted.meta_tags() {
            meta.insert(name, content);
        }

        Self {
            url: url.into(),
            raw_markup,
            headers: Self::fold_header_keys(headers),
            script_srcs: extracted.script_srcs(),
            meta,
        }
    }

    /// 直接以全部信号构建（信号已在外部提取好时使用）
    pub fn from_signals(
        url: impl Into<String>,
        raw_markup: impl Into<String>,
        headers: HashMap<String, Vec<String>>,
        script_srcs: Vec<String>,
        meta: HashMap<String, String>,
    ) -> Self {
        Self {
            url: url.into(),
            raw_markup: raw_markup.into(),
            headers: Self::fold_header_keys(headers),
            script_srcs,
            meta: meta
                .into_iter()
                .map(|(name, content)| (name.to_lowercase(), content))
                .collect(),
        }
    }

    fn fold_header_keys(headers: HashMap<String, Vec<String>>) -> HashMap<String, Vec<String>> {
        headers
            .into_iter()
            .map(|(name, values)| (name.to_lowercase(), values))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_extracts_and_folds_keys() {
        let mut headers = HashMap::new();
        headers.insert("Server".to_string(), vec!["nginx/1.18.0".to_string()]);

        let bundle = SignalBundle::from_parts(
            "https://example.com/",
            headers,
            r#"<meta name="Generator" content="Drupal 9"><script src="/app.js"></script>"#,
        );

        assert_eq!(bundle.headers["server"], vec!["nginx/1.18.0".to_string()]);
        assert_eq!(bundle.meta["generator"], "Drupal 9");
        assert_eq!(bundle.script_srcs, vec!["/app.js".to_string()]);
    }

    #[test]
    fn test_from_signals_folds_header_and_meta_keys() {
        // 测试场景：外部已提取好的信号直接构建，键照样折叠小写
        let mut headers = HashMap::new();
        headers.insert("X-Powered-By".to_string(), vec!["Express".to_string()]);
        let mut meta = HashMap::new();
        meta.insert("Generator".to_string(), "Joomla! 4".to_string());

        let bundle = SignalBundle::from_signals(
            "https://example.com/",
            "<html></html>",
            headers,
            vec!["/vendor.js".to_string()],
            meta,
        );

        assert_eq!(bundle.headers["x-powered-by"], vec!["Express".to_string()]);
        assert_eq!(bundle.meta["generator"], "Joomla! 4");
        assert_eq!(bundle.script_srcs, vec!["/vendor.js".to_string()]);
    }
}
