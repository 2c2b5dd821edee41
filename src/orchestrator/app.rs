//! 审计运行编排 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责一次完整运行的生命周期。
//!
//! ## 核心功能
//!
//! 1. **资源持有**：唯一持有审计引擎和结果存储
//! 2. **策略循环**：按配置顺序逐个策略调度审计（策略之间串行）
//! 3. **判定与输出**：每个策略完成后立即判定并渲染成绩单
//! 4. **全局统计**：汇总各策略的失败计数，得出整体结论和退出码
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单个请求的细节，向下委托 batch_scheduler
//! - **配置即上下文**：有效配置在启动时解析一次，作为参数传递，
//!   运行期间不再读取文件

use crate::clients::AuditEngine;
use crate::config::ActiveConfig;
use crate::orchestrator::batch_scheduler;
use crate::services::{grade_strategy, render, ResultStore};
use anyhow::Result;
use tracing::info;

/// 应用主结构
pub struct App {
    config: ActiveConfig,
    engine: AuditEngine,
    store: ResultStore,
}

/// 一次完整运行的结论
#[derive(Debug, Default)]
pub struct RunOutcome {
    /// 各策略的失败计数，顺序与配置的策略顺序一致
    pub strategy_failures: Vec<(String, usize)>,
}

impl RunOutcome {
    /// 所有策略的失败计数都为零时运行成功
    pub fn success(&self) -> bool {
        self.strategy_failures.iter().all(|(_, fails)| *fails == 0)
    }

    /// 进程退出码：成功 0，任一策略有失败 1
    pub fn exit_code(&self) -> i32 {
        if self.success() {
            0
        } else {
            1
        }
    }
}

impl App {
    /// 用有效配置初始化应用
    ///
    /// 引擎和结果存储在这里构造一次，之后不再切换。
    pub fn new(config: ActiveConfig) -> Self {
        let engine = AuditEngine::from_config(&config);
        let store = ResultStore::new(config.results_dir.clone());
        Self {
            config,
            engine,
            store,
        }
    }

    /// 运行全部策略的审计
    pub async fn run(&self) -> Result<RunOutcome> {
        log_startup(&self.config);

        let mut outcome = RunOutcome::default();

        // 策略之间串行：一个策略的全部请求完成后才进入下一个
        for strategy in &self.config.strategies {
            let results =
                batch_scheduler::run_strategy(&self.engine, &self.store, strategy, &self.config)
                    .await;
            let report = grade_strategy(&results, strategy, &self.config);

            println!("{}", render(&report));

            outcome
                .strategy_failures
                .push((strategy.clone(), report.summary.fail));
        }

        log_final_stats(&outcome);

        Ok(outcome)
    }
}

fn log_startup(config: &ActiveConfig) {
    info!("{}", "=".repeat(60));
    info!("🚀 页面质量审计启动");
    info!(
        "📊 引擎: {:?} | 策略: {} 个 | 页面: {} 个",
        config.engine,
        config.strategies.len(),
        config.urls.len()
    );
    info!("{}", "=".repeat(60));
}

fn log_final_stats(outcome: &RunOutcome) {
    info!("{}", "=".repeat(60));
    info!("📊 全部策略完成");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    for (strategy, fails) in &outcome.strategy_failures {
        if *fails > 0 {
            info!("❌ {}: {} 项失败", strategy, fails);
        } else {
            info!("✅ {}: 无失败", strategy);
        }
    }
    info!("{}", "=".repeat(60));
}
