//! 批量审计调度器 - 编排层
//!
//! ## 职责
//!
//! 为一个策略派发全部 URL 的审计请求，并保证结果顺序与配置的
//! URL 顺序一致（与后端的完成顺序无关）。
//!
//! ## 两种并发策略
//!
//! - **remote-api**：URL 列表按 `batchSize` 切成连续的分批，
//!   一批内的请求并发派发，整批全部完成后再开始下一批，
//!   任一时刻在途请求数不超过 `batchSize`
//! - **local-tool**：严格串行，整个运行期间同一时刻最多一次审计
//!   （本地工具独占 Chrome 实例，无法分时共享）
//!
//! ## 失败隔离
//!
//! 单个请求失败不会取消同批的其他请求，也不影响后续批次和策略，
//! 其结果只是一个空分数的 `AuditResult`。

use crate::clients::AuditEngine;
use crate::config::ActiveConfig;
use crate::models::{AuditRequest, AuditResult};
use crate::services::ResultStore;
use futures::future::join_all;
use std::future::Future;
use tracing::{info, warn};

/// 为一个策略派发全部审计请求
///
/// 每个请求完成后其原始载荷立即落盘；写入失败只记录警告，
/// 不影响本次运行。
///
/// # 返回
/// 与配置 URL 顺序对齐的结果列表
pub async fn run_strategy(
    engine: &AuditEngine,
    store: &ResultStore,
    strategy: &str,
    config: &ActiveConfig,
) -> Vec<AuditResult> {
    let requests = build_requests(strategy, config);
    info!("📦 策略 {}: 共 {} 个页面待审计", strategy, requests.len());

    let audit_and_store = |request: AuditRequest| async move {
        let result = engine.run_audit(&request).await;
        if let Some(raw) = &result.raw {
            if let Err(e) = store.save(&result.url, &result.strategy, raw).await {
                warn!("⚠️ {}", e);
            }
        }
        result
    };

    if engine.requires_sequential() {
        run_sequential(requests, audit_and_store).await
    } else {
        run_batched(requests, config.batch_size, audit_and_store).await
    }
}

/// 按配置的 URL 顺序构造请求列表
fn build_requests(strategy: &str, config: &ActiveConfig) -> Vec<AuditRequest> {
    let categories = config.category_names();
    config
        .urls
        .iter()
        .map(|url| AuditRequest {
            url: url.clone(),
            strategy: strategy.to_string(),
            categories: categories.clone(),
        })
        .collect()
}

/// 分批并发派发
///
/// 一批内用 `join_all` 并发等待（其输出顺序与输入顺序一致），
/// 整批完成后才开始下一批，在途请求数因此不超过 `batch_size`。
async fn run_batched<F, Fut>(
    requests: Vec<AuditRequest>,
    batch_size: usize,
    audit: F,
) -> Vec<AuditResult>
where
    F: Fn(AuditRequest) -> Fut,
    Fut: Future<Output = AuditResult>,
{
    let total = requests.len();
    let total_batches = (total + batch_size - 1) / batch_size;
    let mut results = Vec::with_capacity(total);

    for (batch_index, chunk) in requests.chunks(batch_size).enumerate() {
        info!(
            "📄 第 {}/{} 批: {} 个请求并发派发",
            batch_index + 1,
            total_batches,
            chunk.len()
        );

        let batch_futures: Vec<_> = chunk.iter().cloned().map(&audit).collect();
        let mut batch_results = join_all(batch_futures).await;
        results.append(&mut batch_results);
    }

    results
}

/// 严格串行派发，一次只有一个审计在执行
async fn run_sequential<F, Fut>(requests: Vec<AuditRequest>, audit: F) -> Vec<AuditResult>
where
    F: Fn(AuditRequest) -> Fut,
    Fut: Future<Output = AuditResult>,
{
    let mut results = Vec::with_capacity(requests.len());
    for request in requests {
        results.push(audit(request).await);
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::sleep;

    fn test_requests(count: usize) -> Vec<AuditRequest> {
        (0..count)
            .map(|i| AuditRequest {
                url: format!("https://site.test/p{}", i),
                strategy: "mobile".to_string(),
                categories: vec!["performance".to_string()],
            })
            .collect()
    }

    fn scored_result(request: &AuditRequest, score: f64) -> AuditResult {
        AuditResult {
            url: request.url.clone(),
            strategy: request.strategy.clone(),
            scores: HashMap::from([("performance".to_string(), score)]),
            raw: None,
        }
    }

    /// 在途计数器：进入时 +1 并记录高水位，退出时 -1
    struct InFlight {
        current: AtomicUsize,
        peak: AtomicUsize,
    }

    impl InFlight {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                current: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            })
        }

        fn enter(&self) {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
        }

        fn exit(&self) {
            self.current.fetch_sub(1, Ordering::SeqCst);
        }

        fn peak(&self) -> usize {
            self.peak.load(Ordering::SeqCst)
        }
    }

    #[tokio::test]
    async fn test_batched_preserves_url_order() {
        let requests = test_requests(6);
        let expected: Vec<String> = requests.iter().map(|r| r.url.clone()).collect();

        // 故意让前面的请求完成得更晚
        let results = run_batched(requests, 3, |request| async move {
            let index: u64 = request
                .url
                .rsplit('p')
                .next()
                .and_then(|s| s.parse().ok())
                .unwrap_or(0);
            sleep(Duration::from_millis((6 - index) * 10)).await;
            scored_result(&request, index as f64)
        })
        .await;

        let actual: Vec<String> = results.iter().map(|r| r.url.clone()).collect();
        assert_eq!(actual, expected, "结果顺序应与输入 URL 顺序一致");
    }

    #[tokio::test]
    async fn test_batched_bounds_in_flight_requests() {
        let requests = test_requests(10);
        let in_flight = InFlight::new();
        let tracker = in_flight.clone();

        run_batched(requests, 3, move |request| {
            let tracker = tracker.clone();
            async move {
                tracker.enter();
                sleep(Duration::from_millis(30)).await;
                tracker.exit();
                scored_result(&request, 100.0)
            }
        })
        .await;

        // 一批最多 3 个请求同时在途
        assert_eq!(in_flight.peak(), 3);
    }

    #[tokio::test]
    async fn test_sequential_runs_one_at_a_time() {
        let requests = test_requests(5);
        let in_flight = InFlight::new();
        let tracker = in_flight.clone();

        let results = run_sequential(requests, move |request| {
            let tracker = tracker.clone();
            async move {
                tracker.enter();
                sleep(Duration::from_millis(10)).await;
                tracker.exit();
                scored_result(&request, 100.0)
            }
        })
        .await;

        assert_eq!(results.len(), 5);
        assert_eq!(in_flight.peak(), 1, "本地工具同一时刻只能有一次审计");
    }

    #[tokio::test]
    async fn test_single_failure_does_not_block_siblings() {
        let requests = test_requests(4);

        let results = run_batched(requests, 4, |request| async move {
            if request.url.ends_with("p1") {
                // 模拟引擎失败：空分数结果
                AuditResult::empty(&request)
            } else {
                scored_result(&request, 90.0)
            }
        })
        .await;

        assert_eq!(results.len(), 4, "失败的请求不应影响其他请求的结果");
        assert!(results[1].is_empty());
        assert!(results.iter().enumerate().all(|(i, r)| i == 1 || !r.is_empty()));
    }
}
