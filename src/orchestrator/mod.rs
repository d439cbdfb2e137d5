//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责一次运行的流程调度，是整个系统的"指挥中心"。
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::Pipeline (校验 + 状态机 + 分阶段提交)
//!     ↓
//! services (能力层：fetcher / table_exporter / report_exporter)
//!     ↓
//! clients / infrastructure (RedditClient / PdfDocument)
//! ```
//!
//! ## 设计原则
//!
//! 1. **向下依赖**：编排层 → services → clients / infrastructure
//! 2. **依赖注入**：客户端由调用方构造后传入
//! 3. **无业务逻辑**：只做调度和统计，过滤规则在 services 中

pub mod pipeline;

pub use pipeline::{ExportSummary, Pipeline, PipelineState, RunOutcome};
