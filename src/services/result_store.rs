//! 结果持久化 - 能力层
//!
//! 只负责"把原始审计载荷写成 JSON 文件"，不关心调度顺序。

use crate::error::StoreError;
use chrono::Local;
use regex::Regex;
use serde_json::Value;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

/// 结果存储
///
/// 文件路径由日期、slug 化的 URL 和策略推导：
/// `{resultsDir}/{YYYY-MM-DD}-{slug}-{strategy}.json`。
/// 同一天对同一 URL × 策略的重复保存会静默覆盖之前的文件。
pub struct ResultStore {
    results_dir: PathBuf,
}

impl ResultStore {
    /// 创建新的结果存储
    pub fn new(results_dir: impl Into<PathBuf>) -> Self {
        Self {
            results_dir: results_dir.into(),
        }
    }

    /// 保存一次审计的原始载荷
    ///
    /// 目录不存在时先创建。
    ///
    /// # 返回
    /// 返回写入的文件路径
    pub async fn save(
        &self,
        url: &str,
        strategy: &str,
        payload: &Value,
    ) -> Result<PathBuf, StoreError> {
        fs::create_dir_all(&self.results_dir)
            .await
            .map_err(|source| StoreError::CreateDir {
                dir: self.results_dir.clone(),
                source,
            })?;

        let path = self.result_path(url, strategy);
        let body = serde_json::to_vec_pretty(payload)?;
        fs::write(&path, body)
            .await
            .map_err(|source| StoreError::Write {
                path: path.clone(),
                source,
            })?;

        debug!("结果已保存: {}", path.display());
        Ok(path)
    }

    /// 推导结果文件路径
    pub fn result_path(&self, url: &str, strategy: &str) -> PathBuf {
        let date = Local::now().format("%Y-%m-%d");
        self.results_dir
            .join(format!("{}-{}-{}.json", date, slugify(url), strategy))
    }
}

/// URL slug 化
///
/// 小写后把连续的非字母数字字符折叠为单个连字符，去掉首尾连字符。
fn slugify(url: &str) -> String {
    let lowered = url.to_lowercase();
    match Regex::new("[^a-z0-9]+") {
        Ok(re) => re.replace_all(&lowered, "-").trim_matches('-').to_string(),
        // 模式是常量，这个分支实际不会走到
        Err(_) => lowered.replace(|c: char| !c.is_ascii_alphanumeric(), "-"),
    }
}
