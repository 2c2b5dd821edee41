//! 错误类型定义
//!
//! 三类错误的处理方式不同：
//! - `ConfigError`：致命错误，在任何审计开始之前终止进程（退出码 1）
//! - `EngineError`：请求级错误，在引擎内部被捕获并转换为空分数结果
//! - `StoreError`：单个结果写入失败，记录警告后继续运行

use std::path::PathBuf;
use thiserror::Error;

/// 配置错误（致命）
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件不存在
    #[error("配置文件不存在: {}", .path.display())]
    NotFound { path: PathBuf },

    /// JSON 解析失败
    #[error("配置文件解析失败 ({}): {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// 必需的配置项缺失或为空
    #[error("配置项 '{key}' 缺失或为空")]
    MissingKey { key: &'static str },

    /// 指定的分组不存在
    #[error("配置分组不存在: {group}")]
    UnknownGroup { group: String },

    /// URL 无法解析
    #[error("无效的 URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// 审计引擎错误（请求级，不会向上抛出）
///
/// 在 `AuditEngine::run_audit` 内部被捕获，只作为日志诊断出现，
/// 对应的结果是一个空分数的 `AuditResult`。
#[derive(Debug, Error)]
pub enum EngineError {
    /// 网络请求失败
    #[error("API 请求失败 ({url}): {source}")]
    Request {
        url: String,
        source: reqwest::Error,
    },

    /// API 返回了非 2xx 状态码
    #[error("API 返回错误状态 ({url}): {status}")]
    BadStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// 响应缺少分类分数结构
    #[error("API 响应格式错误 ({url}): {reason}")]
    MalformedResponse { url: String, reason: String },

    /// 本地工具启动或执行失败
    #[error("lighthouse 执行失败 ({url}): {source}")]
    ToolFailed {
        url: String,
        source: std::io::Error,
    },

    /// 本地工具退出码非零或输出无法解析
    #[error("lighthouse 输出异常 ({url}): {reason}")]
    ToolOutput { url: String, reason: String },
}

/// 结果持久化错误（单个结果级别）
#[derive(Debug, Error)]
pub enum StoreError {
    /// 结果目录创建失败
    #[error("无法创建结果目录 ({}): {}", .dir.display(), .source)]
    CreateDir {
        dir: PathBuf,
        source: std::io::Error,
    },

    /// 结果文件写入失败
    #[error("写入结果文件失败 ({}): {}", .path.display(), .source)]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// 结果序列化失败
    #[error("结果序列化失败: {0}")]
    Serialize(#[from] serde_json::Error),
}
