//! 单次运行的请求参数
//!
//! 封装"抓哪个版块、用什么条件、写到哪里"这一信息

use std::fmt::Display;
use std::path::PathBuf;

/// 运行请求
///
/// 保存命令行传入的原始值，校验在流水线的 Validating 阶段完成
#[derive(Debug, Clone)]
pub struct RunRequest {
    /// 版块名
    pub subreddit: String,

    /// 列表类型（原始文本，例如 "hot"）
    pub listing_type: String,

    /// 最低分数
    pub score: i64,

    /// 请求的最大条数
    pub limit: i64,

    /// 输出目录
    pub output_dir: PathBuf,
}

impl RunRequest {
    /// 创建新的运行请求（列表类型默认 hot）
    pub fn new(subreddit: impl Into<String>, score: i64, limit: i64, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            subreddit: subreddit.into(),
            listing_type: "hot".to_string(),
            score,
            limit,
            output_dir: output_dir.into(),
        }
    }

    /// 指定列表类型
    pub fn with_listing_type(mut self, listing_type: impl Into<String>) -> Self {
        self.listing_type = listing_type.into();
        self
    }
}

impl Display for RunRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[r/{} 类型#{} 分数>={} 数量#{}]",
            self.subreddit, self.listing_type, self.score, self.limit
        )
    }
}
