//! 全局错误类型定义

use thiserror::Error;
use regex::Error as RegexError;
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;
use url::ParseError as UrlParseError;

#[derive(Error, Debug)]
pub enum TechDetectError {
    // 规则相关错误
    #[error("规则源不可用：{0}")]
    RuleSourceUnavailable(String),
    #[error("规则格式错误：技术 {tech} 的 {field} 字段类型异常")]
    MalformedRule { tech: String, field: String },
    #[error("规则缓存失败：{0}")]
    RuleCacheError(String),

    // 编译相关错误
    #[error("正则编译失败：{0}")]
    PatternCompile(#[from] RegexError),

    // 信号采集相关错误
    #[error("页面信号获取失败：{0}")]
    SignalUnavailable(String),

    // 检测相关错误
    #[error("检测器未初始化")]
    DetectorNotInitialized,

    // 序列化/反序列化错误
    #[error("JSON解析失败：{0}")]
    JsonError(#[from] SerdeJsonError),
    #[error("MessagePack序列化/反序列化失败：{0}")]
    MsgPackError(String),

    // 基础错误
    #[error("IO操作失败：{0}")]
    IoError(#[from] IoError),
    #[error("URL解析失败：{0}")]
    UrlError(#[from] UrlParseError),
    #[error("无效输入：{0}")]
    InvalidInput(String),
}

// 全局Result类型
pub type TdResult<T> = Result<T, TechDetectError>;
