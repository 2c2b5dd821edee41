//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量调度和运行生命周期，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 运行编排器
//! - 持有引擎和结果存储
//! - 按配置顺序串行处理各策略
//! - 每个策略完成后判定并渲染成绩单
//! - 汇总失败计数，得出退出码
//!
//! ### `batch_scheduler` - 批量审计调度器
//! - 为一个策略构造全部审计请求
//! - 按引擎选择并发策略（分批并发 / 严格串行）
//! - 保证结果顺序与配置的 URL 顺序一致
//! - 每个请求完成后立即持久化原始载荷
//!
//! ## 层次关系
//!
//! ```text
//! app (处理 Vec<策略>)
//!     ↓
//! batch_scheduler (处理 Vec<AuditRequest>)
//!     ↓
//! clients::AuditEngine (处理单个请求)
//!     ↓
//! services (能力层：grade / render / store)
//! ```

pub mod app;
pub mod batch_scheduler;

// 重新导出主要类型
pub use app::{App, RunOutcome};
pub use batch_scheduler::run_strategy;
