//! 审计请求与结果模型

use serde_json::Value;
use std::collections::HashMap;

/// 一次审计请求（一个 URL × 一个策略）
#[derive(Debug, Clone)]
pub struct AuditRequest {
    pub url: String,
    pub strategy: String,
    /// 请求后端评分的分类列表，与之后参与判定的分类完全一致
    pub categories: Vec<String>,
}

/// 一次审计的结果
///
/// 引擎失败时 `scores` 为空、`raw` 为 `None`，而不是向上抛出错误。
#[derive(Debug, Clone)]
pub struct AuditResult {
    pub url: String,
    pub strategy: String,
    /// 分类 → 分数（0-100）
    pub scores: HashMap<String, f64>,
    /// 后端返回的原始载荷，用于持久化
    pub raw: Option<Value>,
}

impl AuditResult {
    /// 构造引擎失败时的空分数结果
    pub fn empty(request: &AuditRequest) -> Self {
        Self {
            url: request.url.clone(),
            strategy: request.strategy.clone(),
            scores: HashMap::new(),
            raw: None,
        }
    }

    /// 引擎是否没有返回任何分数
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}
