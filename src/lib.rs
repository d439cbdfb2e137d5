//! # Reddit Post Filter
//!
//! 抓取 Reddit 版块的帖子，按分数过滤，导出为 CSV 和分页 PDF 报告
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure / Clients）
//! - `clients/` - `ListingClient` 接口和 `RedditClient` 实现
//! - `infrastructure/` - `PdfDocument`，分页文本排版
//!
//! ### ② 业务能力层（Services）
//! - `Fetcher` - 抓取 + 分数过滤
//! - `table_exporter` - 写/读 CSV
//! - `ReportWriter` - 生成 PDF 报告
//!
//! ### ③ 流程层（Workflow）
//! - `RunRequest` - 一次运行的参数
//!
//! ### ④ 编排层（Orchestration）
//! - `Pipeline` - 校验 → 抓取 → 导出，维护状态机
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{ListingClient, RedditClient};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{ListingType, PostRecord, RawPost};
pub use orchestrator::{ExportSummary, Pipeline, PipelineState, RunOutcome};
pub use services::{Fetcher, ReportWriter};
pub use workflow::RunRequest;
