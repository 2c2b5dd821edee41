//! 本地 lighthouse 运行器 - 本地审计后端
//!
//! 通过命令行驱动本地安装的 lighthouse（自带 headless Chrome）。
//! 工具独占本地的 Chrome 实例和调试端口，调度层保证同一时刻
//! 只有一次审计在执行。

use crate::error::EngineError;
use crate::models::{AuditRequest, AuditResult};
use serde::Deserialize;
use std::collections::HashMap;
use tokio::process::Command;
use tracing::debug;

/// 本地 lighthouse 命令行驱动器
pub struct LighthouseRunner {
    command: String,
}

/// lighthouse JSON 报告中参与评分的部分
#[derive(Debug, Deserialize)]
struct LighthouseReport {
    categories: HashMap<String, CategoryEntry>,
}

#[derive(Debug, Deserialize)]
struct CategoryEntry {
    score: Option<f64>,
}

impl LighthouseRunner {
    /// 创建新的运行器
    pub fn new() -> Self {
        Self {
            command: "lighthouse".to_string(),
        }
    }

    /// 使用自定义命令创建（测试用，可指向假脚本）
    pub fn with_command(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// 审计单个页面
    ///
    /// 策略只影响 lighthouse 的设备模拟参数（desktop 使用官方预设，
    /// mobile 为默认行为），不改变调用契约。
    pub async fn audit(&self, request: &AuditRequest) -> Result<AuditResult, EngineError> {
        let mut command = Command::new(&self.command);
        command
            .arg(&request.url)
            .arg("--output=json")
            .arg("--quiet")
            .arg("--chrome-flags=--headless --no-sandbox")
            .arg(format!(
                "--only-categories={}",
                request.categories.join(",")
            ));

        if request.strategy == "desktop" {
            command.arg("--preset=desktop");
        }

        debug!("启动 lighthouse: {} [{}]", request.url, request.strategy);

        let output = command
            .output()
            .await
            .map_err(|source| EngineError::ToolFailed {
                url: request.url.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(EngineError::ToolOutput {
                url: request.url.clone(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let raw: serde_json::Value =
            serde_json::from_slice(&output.stdout).map_err(|e| EngineError::ToolOutput {
                url: request.url.clone(),
                reason: format!("JSON 解析失败: {}", e),
            })?;

        let report: LighthouseReport =
            serde_json::from_value(raw.clone()).map_err(|e| EngineError::ToolOutput {
                url: request.url.clone(),
                reason: format!("报告缺少分类结构: {}", e),
            })?;

        let scores = report
            .categories
            .iter()
            .filter_map(|(id, entry)| entry.score.map(|s| (id.clone(), s * 100.0)))
            .collect();

        Ok(AuditResult {
            url: request.url.clone(),
            strategy: request.strategy.clone(),
            scores,
            raw: Some(raw),
        })
    }
}

impl Default for LighthouseRunner {
    fn default() -> Self {
        Self::new()
    }
}
