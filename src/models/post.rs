use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 已删除/注销账号的占位作者名
pub const DELETED_AUTHOR: &str = "[deleted]";

const PERMALINK_HOST: &str = "https://www.reddit.com";

/// API 返回的原始帖子（`data.children[].data`）
///
/// 所有字段都允许缺失或为 null，规范化在 [`PostRecord::from_raw`] 中完成
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawPost {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub score: Option<i64>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub created_utc: Option<f64>,
    #[serde(default)]
    pub num_comments: Option<u64>,
    #[serde(default)]
    pub link_flair_text: Option<String>,
}

impl RawPost {
    /// 分数（缺失时为 0）
    pub fn score(&self) -> i64 {
        self.score.unwrap_or(0)
    }
}

/// 过滤后的帖子记录
///
/// 构造后不可变，两个导出器只读取它。字段顺序即 CSV 列顺序
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    title: String,
    score: i64,
    url: String,
    author: String,
    num_comments: u64,
    created_utc: f64,
    flair: Option<String>,
}

impl PostRecord {
    /// CSV 表头
    pub const HEADER: [&'static str; 7] = [
        "title",
        "score",
        "url",
        "author",
        "num_comments",
        "created_utc",
        "flair",
    ];

    /// 从原始帖子构造记录
    ///
    /// 标题为空，或者 url 和 permalink 都缺失时返回 `None`
    pub fn from_raw(raw: RawPost) -> Option<Self> {
        let title = non_blank(raw.title)?;
        let url = non_blank(raw.url).or_else(|| {
            non_blank(raw.permalink).map(|p| format!("{}{}", PERMALINK_HOST, p))
        })?;

        Some(Self {
            title,
            score: raw.score.unwrap_or(0),
            url,
            author: non_blank(raw.author).unwrap_or_else(|| DELETED_AUTHOR.to_string()),
            num_comments: raw.num_comments.unwrap_or(0),
            created_utc: raw.created_utc.unwrap_or(0.0),
            flair: non_blank(raw.link_flair_text),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn num_comments(&self) -> u64 {
        self.num_comments
    }

    pub fn created_utc(&self) -> f64 {
        self.created_utc
    }

    pub fn flair(&self) -> Option<&str> {
        self.flair.as_deref()
    }

    /// 发布时间（时间戳无效时为 `None`）
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        if !self.created_utc.is_finite() {
            return None;
        }
        DateTime::from_timestamp(self.created_utc.trunc() as i64, 0)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
