//! PDF 报告服务 - 业务能力层
//!
//! 把记录排版成分页报告：顶部标题块，每条记录一个带标签的块，记录之间用分隔线

use crate::error::AppResult;
use crate::infrastructure::{FontStyle, PdfDocument};
use crate::models::PostRecord;
use std::path::Path;
use tracing::debug;

const TITLE_SIZE: i64 = 16;
const META_SIZE: i64 = 10;
const BODY_SIZE: i64 = 12;

/// 报告统计
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSummary {
    /// 页数
    pub pages: usize,
    /// 记录块数量
    pub records: usize,
}

/// 报告生成器
pub struct ReportWriter {
    caption: String,
    lossy_text: bool,
}

impl ReportWriter {
    /// 创建报告生成器
    ///
    /// # 参数
    /// - `caption`: 标题块中的说明行，例如 `r/python - hot - score >= 10`
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            lossy_text: false,
        }
    }

    /// 不支持的字符替换为 '?'
    pub fn lossy_text(mut self, lossy: bool) -> Self {
        self.lossy_text = lossy;
        self
    }

    /// 生成报告并写入文件（覆盖已有文件）
    pub fn write_report(&self, posts: &[PostRecord], destination: &Path) -> AppResult<ReportSummary> {
        let (document, summary) = self.layout(posts)?;
        document.save(destination)?;
        debug!(
            "PDF 已写入 {} 条记录, {} 页: {}",
            summary.records,
            summary.pages,
            destination.display()
        );
        Ok(summary)
    }

    /// 生成报告字节
    pub fn render_report(&self, posts: &[PostRecord]) -> AppResult<(Vec<u8>, ReportSummary)> {
        let (document, summary) = self.layout(posts)?;
        Ok((document.to_bytes()?, summary))
    }

    fn layout(&self, posts: &[PostRecord]) -> AppResult<(PdfDocument, ReportSummary)> {
        let mut doc = PdfDocument::new().with_lossy_text(self.lossy_text);
        doc.add_page();

        self.write_title_block(&mut doc, posts.len())?;

        let mut records = 0;
        for (index, post) in posts.iter().enumerate() {
            write_record_block(&mut doc, index + 1, post)?;
            records += 1;
        }

        let summary = ReportSummary {
            pages: doc.page_count(),
            records,
        };
        Ok((doc, summary))
    }

    fn write_title_block(&self, doc: &mut PdfDocument, total: usize) -> AppResult<()> {
        doc.set_font(FontStyle::Bold, TITLE_SIZE);
        doc.write_line("Filtered Posts")?;

        doc.set_font(FontStyle::Regular, META_SIZE);
        doc.write_line(&self.caption)?;
        doc.write_line(&format!(
            "Generated: {}",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        ))?;
        doc.write_line(&format!("Records: {}", total))?;

        doc.set_font(FontStyle::Regular, BODY_SIZE);
        separator(doc)?;
        doc.blank_line();
        Ok(())
    }
}

fn write_record_block(doc: &mut PdfDocument, number: usize, post: &PostRecord) -> AppResult<()> {
    let created = post
        .created_at()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| post.created_utc().to_string());

    doc.set_font(FontStyle::Bold, BODY_SIZE);
    doc.write_line(&format!("Title: {}", post.title()))?;
    doc.set_font(FontStyle::Regular, BODY_SIZE);
    doc.write_line(&format!("Score: {}", post.score()))?;
    doc.write_line(&format!("URL: {}", post.url()))?;
    doc.write_line(&format!("Author: {}", post.author()))?;
    doc.write_line(&format!("Comments: {}", post.num_comments()))?;
    doc.write_line(&format!("Created: {}", created))?;
    doc.write_line(&format!("Flair: {}", post.flair().unwrap_or("-")))?;
    separator(doc)?;

    debug!("记录块 #{} 已排版", number);
    Ok(())
}

fn separator(doc: &mut PdfDocument) -> AppResult<()> {
    let width = doc.chars_per_line();
    doc.write_line(&"=".repeat(width))
}
