//! 版本提取工具模块
//! 负责从正则捕获结果中，根据版本模板提取合法的技术版本号
//! 支持 \1/\2 或 $1/$2 两种分组引用格式，自动过滤无效版本

use regex::Captures;

/// 版本提取工具类
pub struct VersionExtractor;

impl VersionExtractor {
    /// 从正则捕获结果中提取有效版本号
    ///
    /// # 参数
    /// - `version_template`: 版本模板（可选字符串），支持 \1/\2 或 $1/$2 分组引用
    /// - `captures`: 正则捕获结果，包含整体匹配和自定义分组匹配信息
    ///
    /// # 返回值
    /// - `Some(String)`: 提取到的有效版本号
    /// - `None`: 未提取到有效版本（模板无效/未替换/替换后为空）
    pub fn extract(version_template: &Option<String>, captures: &Captures) -> Option<String> {
        // 1. 前置过滤：排除 None 模板 和 空白模板
        version_template
            .as_ref()
            .filter(|template| !template.trim().is_empty())
            .and_then(|template| {
                let mut version = template.clone();
                // 标记是否发生过有效的分组替换（避免无替换却返回模板本身）
                let mut replaced = false;

                // 2. 遍历所有自定义捕获分组（从 1 开始，0 是整体匹配，不参与版本提取）
                for group_index in 1..captures.len() {
                    let placeholder_backslash = format!("\\{}", group_index); // \1 格式
                    let placeholder_dollar = format!("${}", group_index); // $1 格式

                    if let Some(matched) = captures.get(group_index) {
                        // 清理分组值前后空白，避免将无效空白带入最终版本
                        let matched_str = matched.as_str().trim();
                        version = version.replace(&placeholder_backslash, matched_str);
                        version = version.replace(&placeholder_dollar, matched_str);
                        replaced = true;
                    } else {
                        // 分组未参与匹配时，占位符替换为空
                        version = version.replace(&placeholder_backslash, "");
                        version = version.replace(&placeholder_dollar, "");
                    }
                }

                // 3. 最终清理与无效版本过滤：未替换 / 为空 / 残留占位符 均视为无效
                let final_version = version.trim().to_string();
                let is_valid = replaced
                    && !final_version.is_empty()
                    && !final_version.contains('\\')
                    && !final_version.contains('$');

                is_valid.then_some(final_version)
            })
    }
}
