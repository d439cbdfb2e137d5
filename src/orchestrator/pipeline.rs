//! 流水线 - 编排层
//!
//! ## 职责
//!
//! 一次运行的完整流程：校验 → 抓取 → 写 CSV → 写 PDF。
//!
//! ## 状态机
//!
//! ```text
//! Idle → Validating → Fetching → ExportingTable → ExportingDocument → Done
//!   任何阶段出错 → Aborted
//! ```
//!
//! 两个文件先写到输出目录中的临时文件，全部成功后才改名为最终文件名，
//! 所以失败时不会只留下其中一个

use crate::clients::ListingClient;
use crate::config::{Config, REPORT_FILE_NAME, TABLE_FILE_NAME};
use crate::error::{AppError, AppResult};
use crate::models::ListingType;
use crate::services::fetcher::{self, Fetcher};
use crate::services::{write_table, ReportWriter};
use crate::utils::logging;
use crate::workflow::RunRequest;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// 流水线状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Validating,
    Fetching,
    ExportingTable,
    ExportingDocument,
    Done,
    Aborted,
}

/// 导出结果
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// 导出的记录数
    pub records: usize,
    /// CSV 文件路径
    pub table_path: PathBuf,
    /// PDF 文件路径
    pub report_path: PathBuf,
    /// PDF 页数
    pub report_pages: usize,
}

/// 运行结果
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// 没有符合条件的帖子，未写任何文件
    NoResults,
    /// 两个文件都已写入
    Exported(ExportSummary),
}

/// 校验通过后的参数
struct ValidatedRequest {
    name: String,
    listing_type: ListingType,
}

/// 流水线
pub struct Pipeline<C> {
    fetcher: Fetcher<C>,
    lossy_text: bool,
    state: PipelineState,
}

impl<C: ListingClient> Pipeline<C> {
    /// 创建流水线
    pub fn new(client: C, config: &Config) -> Self {
        Self {
            fetcher: Fetcher::new(client, config.max_limit),
            lossy_text: config.lossy_text,
            state: PipelineState::Idle,
        }
    }

    /// 当前状态
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// 执行一次完整流程
    ///
    /// 成功（包括没有结果）时结束于 `Done`，出错时结束于 `Aborted`
    pub async fn run(&mut self, request: &RunRequest) -> AppResult<RunOutcome> {
        if self.state != PipelineState::Idle {
            return Err(AppError::invalid_argument(format!(
                "流水线只能运行一次 (当前状态: {:?})",
                self.state
            )));
        }

        logging::log_startup(request);

        match self.execute(request).await {
            Ok(outcome) => {
                self.transition(PipelineState::Done);
                Ok(outcome)
            }
            Err(e) => {
                debug!("{:?} 阶段失败，流水线终止", self.state);
                self.transition(PipelineState::Aborted);
                Err(e)
            }
        }
    }

    async fn execute(&mut self, request: &RunRequest) -> AppResult<RunOutcome> {
        // ========== 校验 ==========
        self.transition(PipelineState::Validating);
        let validated = validate_request(request, self.fetcher.max_limit())?;

        // ========== 抓取 ==========
        self.transition(PipelineState::Fetching);
        let posts = self
            .fetcher
            .fetch(&validated.name, validated.listing_type, request.score, request.limit)
            .await?;

        if posts.is_empty() {
            warn!(
                "⚠️ r/{} 中没有分数 >= {} 的帖子，不生成文件",
                validated.name, request.score
            );
            return Ok(RunOutcome::NoResults);
        }

        info!("📋 过滤后的帖子 (score >= {}):", request.score);
        for (index, post) in posts.iter().enumerate() {
            logging::log_post(index + 1, post);
        }

        let table_path = request.output_dir.join(TABLE_FILE_NAME);
        let report_path = request.output_dir.join(REPORT_FILE_NAME);

        // ========== 写 CSV ==========
        self.transition(PipelineState::ExportingTable);
        let staged_table = stage_file(&request.output_dir, ".csv")?;
        write_table(&posts, staged_table.path())?;

        // ========== 写 PDF ==========
        self.transition(PipelineState::ExportingDocument);
        let staged_report = stage_file(&request.output_dir, ".pdf")?;
        let caption = format!(
            "r/{} - {} - score >= {}",
            validated.name, validated.listing_type, request.score
        );
        let report = ReportWriter::new(caption)
            .lossy_text(self.lossy_text)
            .write_report(&posts, staged_report.path())?;

        commit(staged_table, &table_path, staged_report, &report_path)?;

        info!("✓ CSV 已保存: {}", table_path.display());
        info!("✓ PDF 已保存: {} ({} 页)", report_path.display(), report.pages);

        Ok(RunOutcome::Exported(ExportSummary {
            records: posts.len(),
            table_path,
            report_path,
            report_pages: report.pages,
        }))
    }

    fn transition(&mut self, next: PipelineState) {
        debug!("状态: {:?} → {:?}", self.state, next);
        self.state = next;
    }
}

/// 校验运行参数（不发起任何网络请求）
fn validate_request(request: &RunRequest, max_limit: u32) -> AppResult<ValidatedRequest> {
    let name = fetcher::normalize_listing_name(&request.subreddit)?;
    let listing_type: ListingType = request.listing_type.parse()?;
    fetcher::validate_threshold(request.score)?;
    fetcher::validate_limit(request.limit, max_limit)?;
    ensure_writable_dir(&request.output_dir)?;

    Ok(ValidatedRequest { name, listing_type })
}

/// 确认输出目录存在且可写
fn ensure_writable_dir(dir: &Path) -> AppResult<()> {
    if !dir.is_dir() {
        return Err(AppError::io_failure(
            dir,
            io::Error::new(io::ErrorKind::NotFound, "目录不存在"),
        ));
    }
    tempfile::tempfile_in(dir).map_err(|e| AppError::io_failure(dir, e))?;
    Ok(())
}

/// 在输出目录中创建临时文件
fn stage_file(dir: &Path, suffix: &str) -> AppResult<NamedTempFile> {
    tempfile::Builder::new()
        .prefix(".filtered_posts-")
        .suffix(suffix)
        .tempfile_in(dir)
        .map_err(|e| AppError::io_failure(dir, e))
}

/// 把两个临时文件改名为最终文件
fn commit(
    staged_table: NamedTempFile,
    table_path: &Path,
    staged_report: NamedTempFile,
    report_path: &Path,
) -> AppResult<()> {
    staged_table
        .persist(table_path)
        .map_err(|e| AppError::io_failure(table_path, e.error))?;

    if let Err(e) = staged_report.persist(report_path) {
        if let Err(cleanup) = std::fs::remove_file(table_path) {
            warn!("⚠️ 无法删除 {}: {}", table_path.display(), cleanup);
        }
        return Err(AppError::io_failure(report_path, e.error));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawPost;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticClient {
        scores: Vec<i64>,
        calls: AtomicUsize,
    }

    impl StaticClient {
        fn new(scores: &[i64]) -> Self {
            Self {
                scores: scores.to_vec(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ListingClient for StaticClient {
        async fn listing(&self, _: &str, _: ListingType, limit: u32) -> AppResult<Vec<RawPost>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .scores
                .iter()
                .take(limit as usize)
                .enumerate()
                .map(|(i, score)| RawPost {
                    title: Some(format!("Post {}", i)),
                    score: Some(*score),
                    url: Some(format!("https://reddit.com/r/test/{}", i)),
                    ..Default::default()
                })
                .collect())
        }
    }

    fn output_files(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn exports_both_files_and_ends_done() {
        let dir = tempfile::tempdir().unwrap();
        let mut pipeline = Pipeline::new(StaticClient::new(&[3, 15, 10, 20, 1]), &Config::default());

        let outcome = pipeline
            .run(&RunRequest::new("test", 10, 5, dir.path()))
            .await
            .unwrap();

        let RunOutcome::Exported(summary) = outcome else {
            panic!("expected exported outcome");
        };
        assert_eq!(summary.records, 3);
        assert_eq!(pipeline.state(), PipelineState::Done);
        assert_eq!(output_files(dir.path()), vec!["Filtered_Posts.pdf", "filtered_posts.csv"]);
    }

    #[tokio::test]
    async fn no_results_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut pipeline = Pipeline::new(StaticClient::new(&[1, 2, 3]), &Config::default());

        let outcome = pipeline
            .run(&RunRequest::new("test", 50, 3, dir.path()))
            .await
            .unwrap();

        assert!(matches!(outcome, RunOutcome::NoResults));
        assert_eq!(pipeline.state(), PipelineState::Done);
        assert!(output_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn invalid_listing_type_aborts_before_fetching() {
        let dir = tempfile::tempdir().unwrap();
        let client = StaticClient::new(&[100]);
        let mut pipeline = Pipeline::new(client, &Config::default());

        let request = RunRequest::new("test", 0, 5, dir.path()).with_listing_type("controversial");
        let err = pipeline.run(&request).await.unwrap_err();

        assert!(matches!(err, AppError::InvalidListingType(_)));
        assert_eq!(pipeline.state(), PipelineState::Aborted);
        assert_eq!(pipeline.fetcher_calls(), 0);
    }

    #[tokio::test]
    async fn missing_output_dir_aborts_before_fetching() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let mut pipeline = Pipeline::new(StaticClient::new(&[100]), &Config::default());

        let err = pipeline
            .run(&RunRequest::new("test", 0, 5, &missing))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::IoFailure { .. }));
        assert_eq!(pipeline.fetcher_calls(), 0);
        assert!(!missing.exists());
    }

    #[tokio::test]
    async fn limit_above_configured_maximum_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            max_limit: 10,
            ..Config::default()
        };
        let mut pipeline = Pipeline::new(StaticClient::new(&[100]), &config);

        let err = pipeline
            .run(&RunRequest::new("test", 0, 11, dir.path()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn render_failure_leaves_no_partial_output() {
        struct EmojiClient;

        #[async_trait]
        impl ListingClient for EmojiClient {
            async fn listing(&self, _: &str, _: ListingType, _: u32) -> AppResult<Vec<RawPost>> {
                Ok(vec![RawPost {
                    title: Some("Launch day 🚀".into()),
                    score: Some(99),
                    url: Some("https://example.com".into()),
                    ..Default::default()
                }])
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let mut pipeline = Pipeline::new(EmojiClient, &Config::default());

        let err = pipeline
            .run(&RunRequest::new("test", 0, 5, dir.path()))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::RenderFailure(_)));
        assert_eq!(pipeline.state(), PipelineState::Aborted);
        assert!(output_files(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn failed_report_commit_removes_committed_table() {
        let dir = tempfile::tempdir().unwrap();
        // 同名的非空目录让 PDF 改名失败
        let blocker = dir.path().join(REPORT_FILE_NAME);
        std::fs::create_dir(&blocker).unwrap();
        std::fs::write(blocker.join("keep"), b"x").unwrap();

        let mut pipeline = Pipeline::new(StaticClient::new(&[30, 40]), &Config::default());
        let err = pipeline
            .run(&RunRequest::new("test", 10, 5, dir.path()))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::IoFailure { .. }));
        assert_eq!(pipeline.state(), PipelineState::Aborted);
        assert!(!dir.path().join(TABLE_FILE_NAME).exists());
        assert_eq!(output_files(dir.path()), vec![REPORT_FILE_NAME.to_string()]);
    }

    #[tokio::test]
    async fn pipeline_runs_only_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut pipeline = Pipeline::new(StaticClient::new(&[]), &Config::default());
        let request = RunRequest::new("test", 0, 5, dir.path());

        pipeline.run(&request).await.unwrap();
        assert!(pipeline.run(&request).await.is_err());
    }

    impl Pipeline<StaticClient> {
        fn fetcher_calls(&self) -> usize {
            self.fetcher.client().calls.load(Ordering::SeqCst)
        }
    }
}
