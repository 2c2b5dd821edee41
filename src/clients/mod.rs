//! 审计引擎层
//!
//! ## 职责
//!
//! 两个后端实现同一个能力：`run_audit(请求) -> 结果`。
//!
//! - `PsiClient` - 远程托管评分 API（PageSpeed Insights）
//! - `LighthouseRunner` - 本地 lighthouse 命令行工具
//!
//! 引擎在启动时根据配置选择一次（带标签的变体），
//! 之后不再按字符串逐次分发。

pub mod lighthouse_runner;
pub mod psi_client;

pub use lighthouse_runner::LighthouseRunner;
pub use psi_client::PsiClient;

use crate::config::{ActiveConfig, EngineKind};
use crate::models::{AuditRequest, AuditResult};
use tracing::error;

/// 审计引擎
///
/// `run_audit` 永不向上抛错：后端错误（网络失败、响应格式错误、
/// 工具崩溃）在这里被捕获，记录诊断日志后转换为空分数结果。
pub enum AuditEngine {
    RemoteApi(PsiClient),
    LocalTool(LighthouseRunner),
}

impl AuditEngine {
    /// 根据有效配置构造引擎
    ///
    /// 整个运行期间只构造一次。
    pub fn from_config(config: &ActiveConfig) -> Self {
        match config.engine {
            EngineKind::RemoteApi => {
                AuditEngine::RemoteApi(PsiClient::new(config.api_key.clone()))
            }
            EngineKind::LocalTool => AuditEngine::LocalTool(LighthouseRunner::new()),
        }
    }

    /// 引擎是否要求串行调度
    ///
    /// 本地 lighthouse 独占一个 Chrome 实例，不能并发执行。
    pub fn requires_sequential(&self) -> bool {
        matches!(self, AuditEngine::LocalTool(_))
    }

    /// 执行一次审计
    pub async fn run_audit(&self, request: &AuditRequest) -> AuditResult {
        let outcome = match self {
            AuditEngine::RemoteApi(client) => client.audit(request).await,
            AuditEngine::LocalTool(runner) => runner.audit(request).await,
        };

        match outcome {
            Ok(result) => result,
            Err(e) => {
                error!(
                    "❌ 审计失败 [{} | {}]: {}",
                    request.strategy, request.url, e
                );
                AuditResult::empty(request)
            }
        }
    }
}
