//! # Lighthouse Batch Check
//!
//! 一个批量页面质量审计工具：按配置对一组页面在多个设备策略下
//! 运行 lighthouse 审计，将分数与阈值比对后输出成绩单，
//! 退出码可直接用作 CI 门禁。
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 引擎层（Clients）
//! - `clients/` - 两个可互换的审计后端，共享同一个能力契约
//! - `PsiClient` - 远程托管评分 API（PageSpeed Insights）
//! - `LighthouseRunner` - 本地 lighthouse 命令行工具
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个策略的数据
//! - `grader` - 阈值判定能力
//! - `reporter` - 成绩单渲染能力
//! - `ResultStore` - 原始载荷持久化能力
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/app` - 运行编排器，管理资源和策略循环
//! - `orchestrator/batch_scheduler` - 批量调度器，双并发策略
//!
//! ### 横切模块
//! - `config` - 配置加载、分组合并、校验（解析一次，整个运行不可变）
//! - `error` - 错误分类（致命配置错误 / 请求级引擎错误 / 写入错误）
//! - `models` - 审计请求、结果与判定模型
//! - `logger` - tracing 日志初始化

pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;

// 重新导出常用类型
pub use clients::{AuditEngine, LighthouseRunner, PsiClient};
pub use config::{ActiveConfig, CategoryRule, EngineKind};
pub use error::{ConfigError, EngineError, StoreError};
pub use models::{AuditRequest, AuditResult, GradedCell, StrategyReport, Summary, Verdict};
pub use orchestrator::{App, RunOutcome};
pub use services::{grade_strategy, render, ResultStore};
