//! PageSpeed Insights 客户端 - 远程审计后端
//!
//! 每次审计对应一个 GET 请求，查询参数为 `url` / `strategy` /
//! 重复的 `category` / 可选的 `key`。响应中
//! `lighthouseResult.categories` 的分数在 [0,1] 区间，
//! 内部统一放大为 [0,100]。

use crate::error::EngineError;
use crate::models::{AuditRequest, AuditResult};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

/// PageSpeed Insights v5 端点
const PSI_ENDPOINT: &str = "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";

/// 远程评分 API 客户端
pub struct PsiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

/// PSI 响应中参与评分的部分
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PsiResponse {
    lighthouse_result: LighthouseResult,
}

#[derive(Debug, Deserialize)]
struct LighthouseResult {
    categories: HashMap<String, CategoryEntry>,
}

#[derive(Debug, Deserialize)]
struct CategoryEntry {
    score: Option<f64>,
}

impl PsiClient {
    /// 创建新的 PSI 客户端
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: PSI_ENDPOINT.to_string(),
            api_key,
        }
    }

    /// 使用自定义端点创建（测试用）
    pub fn with_endpoint(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key,
        }
    }

    /// 审计单个页面
    ///
    /// # 参数
    /// - `request`: 审计请求（URL × 策略 × 分类列表）
    ///
    /// # 返回
    /// 返回带原始载荷的审计结果；响应缺少分数结构视为后端失败
    pub async fn audit(&self, request: &AuditRequest) -> Result<AuditResult, EngineError> {
        let mut query: Vec<(&str, &str)> = vec![
            ("url", request.url.as_str()),
            ("strategy", request.strategy.as_str()),
        ];
        for category in &request.categories {
            query.push(("category", category.as_str()));
        }
        if let Some(key) = &self.api_key {
            query.push(("key", key.as_str()));
        }

        debug!("请求 PSI: {} [{}]", request.url, request.strategy);

        let response = self
            .http
            .get(&self.endpoint)
            .query(&query)
            .send()
            .await
            .map_err(|source| EngineError::Request {
                url: request.url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::BadStatus {
                url: request.url.clone(),
                status,
            });
        }

        let raw: serde_json::Value =
            response
                .json()
                .await
                .map_err(|source| EngineError::Request {
                    url: request.url.clone(),
                    source,
                })?;

        let parsed: PsiResponse =
            serde_json::from_value(raw.clone()).map_err(|e| EngineError::MalformedResponse {
                url: request.url.clone(),
                reason: e.to_string(),
            })?;

        Ok(AuditResult {
            url: request.url.clone(),
            strategy: request.strategy.clone(),
            scores: scale_scores(&parsed.lighthouse_result.categories),
            raw: Some(raw),
        })
    }
}

/// 将 [0,1] 区间的分类分数放大为 [0,100]
///
/// 后端未能评分的分类（score 为 null）直接跳过。
fn scale_scores(categories: &HashMap<String, CategoryEntry>) -> HashMap<String, f64> {
    categories
        .iter()
        .filter_map(|(id, entry)| entry.score.map(|s| (id.clone(), s * 100.0)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_scores() {
        let body = r#"{
            "performance": { "score": 0.65 },
            "seo": { "score": 1.0 },
            "accessibility": { "score": null }
        }"#;
        let categories: HashMap<String, CategoryEntry> = serde_json::from_str(body).unwrap();

        let scores = scale_scores(&categories);

        assert_eq!(scores.get("performance"), Some(&65.0));
        assert_eq!(scores.get("seo"), Some(&100.0));
        // 未评分的分类不出现在结果里
        assert!(!scores.contains_key("accessibility"));
    }

    #[test]
    fn test_response_without_categories_is_malformed() {
        let raw: serde_json::Value = serde_json::from_str(r#"{ "error": "quota" }"#).unwrap();
        let parsed: Result<PsiResponse, _> = serde_json::from_value(raw);
        assert!(parsed.is_err(), "缺少分数结构的响应应该解析失败");
    }
}
