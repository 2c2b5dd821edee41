//! 配置解析与合并
//!
//! ## 职责
//!
//! 1. **加载**：从 JSON 文件读取配置（只作为数据解析，绝不执行）
//! 2. **分组合并**：将指定分组浅合并到顶层配置
//! 3. **校验**：检查必需键和 URL 合法性
//! 4. **定型**：生成本次运行的不可变 `ActiveConfig`
//!
//! 配置在进程启动时解析一次，之后作为参数传递给各组件，
//! 运行期间不再重新读取文件。

use crate::error::ConfigError;
use reqwest::Url;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// 策略未配置及格线时的默认值
pub const DEFAULT_THRESHOLD: f64 = 90.0;
/// 策略未配置不及格线时的默认值
pub const DEFAULT_LOWER_THRESHOLD: f64 = 50.0;
/// remote-api 引擎单批最大并发请求数的默认值
pub const DEFAULT_BATCH_SIZE: usize = 400;
/// 结果文件输出目录的默认值
pub const DEFAULT_RESULTS_DIR: &str = "lighthouse-reports";

/// 单个审计分类的阈值规则
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRule {
    /// 策略 → 及格线（分数 ≥ 该值为通过）
    #[serde(default)]
    pub threshold: BTreeMap<String, f64>,
    /// 策略 → 不及格线（分数 < 该值为失败）
    #[serde(default)]
    pub lower_threshold: BTreeMap<String, f64>,
}

impl CategoryRule {
    /// 取指定策略的及格线，未配置时使用默认值 90
    pub fn threshold_for(&self, strategy: &str) -> f64 {
        self.threshold
            .get(strategy)
            .copied()
            .unwrap_or(DEFAULT_THRESHOLD)
    }

    /// 取指定策略的不及格线，未配置时使用默认值 50
    pub fn lower_threshold_for(&self, strategy: &str) -> f64 {
        self.lower_threshold
            .get(strategy)
            .copied()
            .unwrap_or(DEFAULT_LOWER_THRESHOLD)
    }
}

/// 审计引擎种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum EngineKind {
    /// 远程托管评分 API（PageSpeed Insights）
    #[serde(rename = "remote-api")]
    RemoteApi,
    /// 本地 lighthouse 命令行工具
    #[serde(rename = "local-tool")]
    LocalTool,
}

/// 配置文件的原始形态
///
/// 所有键都是可选的，分组（`groups`）复用同一形态作为部分覆盖。
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    categories: Option<BTreeMap<String, CategoryRule>>,
    strategies: Option<Vec<String>>,
    urls: Option<Vec<String>>,
    engine: Option<EngineKind>,
    search_params: Option<BTreeMap<String, String>>,
    batch_size: Option<usize>,
    results_dir: Option<String>,
    api_key: Option<String>,
    groups: Option<BTreeMap<String, RawConfig>>,
}

/// 本次运行的有效配置
///
/// 分组合并、默认值填充和 URL 校验都已完成，
/// `urls` 中的地址已追加 `searchParams`。运行期间不可变。
#[derive(Debug, Clone)]
pub struct ActiveConfig {
    pub categories: BTreeMap<String, CategoryRule>,
    pub strategies: Vec<String>,
    pub urls: Vec<String>,
    pub engine: EngineKind,
    pub batch_size: usize,
    pub results_dir: String,
    pub api_key: Option<String>,
}

impl ActiveConfig {
    /// 从 JSON 文件加载配置并定型
    ///
    /// # 参数
    /// - `path`: 配置文件路径
    /// - `group`: 可选的分组名，指定时该分组的键整体覆盖顶层
    ///
    /// # 返回
    /// 返回合并、校验后的有效配置
    pub fn load(path: &Path, group: Option<&str>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|_| ConfigError::NotFound {
            path: path.to_path_buf(),
        })?;

        let raw: RawConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let selected = match group {
            Some(name) => {
                let group_config = raw
                    .groups
                    .as_ref()
                    .and_then(|groups| groups.get(name))
                    .cloned()
                    .ok_or_else(|| ConfigError::UnknownGroup {
                        group: name.to_string(),
                    })?;
                merge_group(raw, group_config)
            }
            None => raw,
        };

        Self::from_raw(selected)
    }

    /// 校验必需键并填充默认值
    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let categories = raw
            .categories
            .filter(|m| !m.is_empty())
            .ok_or(ConfigError::MissingKey { key: "categories" })?;
        let strategies = raw
            .strategies
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingKey { key: "strategies" })?;
        let urls = raw
            .urls
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::MissingKey { key: "urls" })?;

        let search_params = raw.search_params.unwrap_or_default();
        let urls = urls
            .iter()
            .map(|url| append_search_params(url, &search_params))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            categories,
            strategies,
            urls,
            engine: raw.engine.unwrap_or(EngineKind::RemoteApi),
            // 批大小至少为 1
            batch_size: raw.batch_size.unwrap_or(DEFAULT_BATCH_SIZE).max(1),
            results_dir: raw
                .results_dir
                .unwrap_or_else(|| DEFAULT_RESULTS_DIR.to_string()),
            api_key: raw.api_key,
        })
    }

    /// 按配置顺序收集待审计的分类名
    pub fn category_names(&self) -> Vec<String> {
        self.categories.keys().cloned().collect()
    }
}

/// 分组浅合并
///
/// 合并契约：分组中出现的顶层键，其值**整体替换**顶层值（不做嵌套的
/// 深合并）；分组中未出现的键原样继承顶层。分组不再嵌套分组。
fn merge_group(top: RawConfig, group: RawConfig) -> RawConfig {
    RawConfig {
        categories: group.categories.or(top.categories),
        strategies: group.strategies.or(top.strategies),
        urls: group.urls.or(top.urls),
        engine: group.engine.or(top.engine),
        search_params: group.search_params.or(top.search_params),
        batch_size: group.batch_size.or(top.batch_size),
        results_dir: group.results_dir.or(top.results_dir),
        api_key: group.api_key.or(top.api_key),
        groups: None,
    }
}

/// 将 searchParams 追加到目标 URL 的查询串
fn append_search_params(
    url: &str,
    params: &BTreeMap<String, String>,
) -> Result<String, ConfigError> {
    let mut parsed = Url::parse(url).map_err(|e| ConfigError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    if !params.is_empty() {
        parsed.query_pairs_mut().extend_pairs(params.iter());
    }

    Ok(parsed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_from_json(json: &str) -> RawConfig {
        serde_json::from_str(json).expect("测试配置应该能解析")
    }

    #[test]
    fn test_merge_group_replaces_whole_key() {
        let top = raw_from_json(
            r#"{
                "urls": ["https://a.test/", "https://b.test/"],
                "strategies": ["mobile", "desktop"],
                "batchSize": 10
            }"#,
        );
        let group = raw_from_json(r#"{ "urls": ["https://staging.test/"] }"#);

        let merged = merge_group(top, group);

        // 分组的 urls 整体替换顶层
        assert_eq!(merged.urls, Some(vec!["https://staging.test/".to_string()]));
        // 分组未出现的键继承顶层
        assert_eq!(
            merged.strategies,
            Some(vec!["mobile".to_string(), "desktop".to_string()])
        );
        assert_eq!(merged.batch_size, Some(10));
    }

    #[test]
    fn test_missing_required_keys() {
        let raw = raw_from_json(r#"{ "urls": ["https://a.test/"] }"#);
        let err = ActiveConfig::from_raw(raw).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingKey { key: "categories" }
        ));

        let raw = raw_from_json(
            r#"{
                "categories": { "performance": { "threshold": { "mobile": 70 } } },
                "strategies": [],
                "urls": ["https://a.test/"]
            }"#,
        );
        let err = ActiveConfig::from_raw(raw).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingKey { key: "strategies" }
        ));
    }

    #[test]
    fn test_defaults_applied() {
        let raw = raw_from_json(
            r#"{
                "categories": { "performance": {} },
                "strategies": ["mobile"],
                "urls": ["https://a.test/"]
            }"#,
        );
        let config = ActiveConfig::from_raw(raw).unwrap();

        assert_eq!(config.engine, EngineKind::RemoteApi);
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(config.results_dir, DEFAULT_RESULTS_DIR);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_search_params_appended_to_every_url() {
        let raw = raw_from_json(
            r#"{
                "categories": { "seo": {} },
                "strategies": ["mobile"],
                "urls": ["https://a.test/", "https://b.test/page?x=1"],
                "searchParams": { "nocache": "1" }
            }"#,
        );
        let config = ActiveConfig::from_raw(raw).unwrap();

        assert_eq!(config.urls[0], "https://a.test/?nocache=1");
        // 已有查询串的 URL 追加而不是覆盖
        assert_eq!(config.urls[1], "https://b.test/page?x=1&nocache=1");
    }

    #[test]
    fn test_invalid_url_rejected() {
        let raw = raw_from_json(
            r#"{
                "categories": { "seo": {} },
                "strategies": ["mobile"],
                "urls": ["not a url"]
            }"#,
        );
        let err = ActiveConfig::from_raw(raw).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }

    #[test]
    fn test_threshold_defaults() {
        let rule = CategoryRule::default();
        assert_eq!(rule.threshold_for("mobile"), DEFAULT_THRESHOLD);
        assert_eq!(rule.lower_threshold_for("mobile"), DEFAULT_LOWER_THRESHOLD);

        let rule: CategoryRule = serde_json::from_str(
            r#"{ "threshold": { "mobile": 70 }, "lowerThreshold": { "mobile": 40 } }"#,
        )
        .unwrap();
        assert_eq!(rule.threshold_for("mobile"), 70.0);
        assert_eq!(rule.lower_threshold_for("mobile"), 40.0);
        // 未配置的策略回落到默认值
        assert_eq!(rule.threshold_for("desktop"), DEFAULT_THRESHOLD);
    }
}
