//! 抓取服务 - 业务能力层
//!
//! 调用列表接口并按分数过滤，只负责"拿到过滤后的帖子"

use crate::clients::ListingClient;
use crate::error::{AppError, AppResult};
use crate::models::{ListingType, PostRecord, RawPost};
use tracing::{debug, info, warn};

/// 抓取服务
///
/// 客户端由调用方构造并注入
pub struct Fetcher<C> {
    client: C,
    max_limit: u32,
}

impl<C: ListingClient> Fetcher<C> {
    /// 创建新的抓取服务
    pub fn new(client: C, max_limit: u32) -> Self {
        Self { client, max_limit }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn max_limit(&self) -> u32 {
        self.max_limit
    }

    /// 抓取并过滤帖子
    ///
    /// # 参数
    /// - `listing_name`: 版块名（可带 `r/` 前缀）
    /// - `listing_type`: 列表类型
    /// - `score_threshold`: 最低分数（包含）
    /// - `limit`: 向 API 请求的最大条数
    ///
    /// # 返回
    /// 保持 API 原始顺序的记录列表，可能为空
    pub async fn fetch(
        &self,
        listing_name: &str,
        listing_type: ListingType,
        score_threshold: i64,
        limit: i64,
    ) -> AppResult<Vec<PostRecord>> {
        let name = normalize_listing_name(listing_name)?;
        validate_threshold(score_threshold)?;
        let limit = validate_limit(limit, self.max_limit)?;

        info!(
            "🔍 正在抓取 r/{} 的 {} 列表 (limit={}, score >= {})",
            name, listing_type, limit, score_threshold
        );

        let raw_posts = self.client.listing(&name, listing_type, limit).await?;
        let fetched = raw_posts.len();
        let posts = filter_posts(raw_posts, score_threshold);

        info!("✓ 抓取 {} 条，过滤后剩余 {} 条", fetched, posts.len());
        Ok(posts)
    }
}

/// 分数过滤条件：分数不低于阈值
pub fn passes_threshold(score: i64, score_threshold: i64) -> bool {
    score >= score_threshold
}

/// 过滤原始帖子并转换为记录，保持原有顺序
pub fn filter_posts(raw_posts: Vec<RawPost>, score_threshold: i64) -> Vec<PostRecord> {
    raw_posts
        .into_iter()
        .filter(|raw| passes_threshold(raw.score(), score_threshold))
        .filter_map(|raw| {
            let title = raw.title.clone().unwrap_or_default();
            let record = PostRecord::from_raw(raw);
            if record.is_none() {
                warn!("⚠️ 跳过缺少标题或链接的帖子: {:?}", title);
            }
            record
        })
        .collect()
}

/// 校验并规范化版块名
pub fn normalize_listing_name(listing_name: &str) -> AppResult<String> {
    let trimmed = listing_name.trim();
    let name = trimmed
        .strip_prefix("r/")
        .or_else(|| trimmed.strip_prefix("/r/"))
        .unwrap_or(trimmed);

    if name.is_empty() {
        return Err(AppError::invalid_argument("版块名不能为空"));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(AppError::invalid_argument(format!(
            "版块名只能包含字母、数字和下划线: {}",
            listing_name
        )));
    }

    debug!("版块名: {}", name);
    Ok(name.to_string())
}

/// 校验分数阈值
pub fn validate_threshold(score_threshold: i64) -> AppResult<()> {
    if score_threshold < 0 {
        return Err(AppError::invalid_argument(format!(
            "score 不能为负数: {}",
            score_threshold
        )));
    }
    Ok(())
}

/// 校验 limit，返回可直接用于请求的值
pub fn validate_limit(limit: i64, max_limit: u32) -> AppResult<u32> {
    if limit <= 0 {
        return Err(AppError::invalid_argument(format!(
            "limit 必须为正整数: {}",
            limit
        )));
    }
    if limit > i64::from(max_limit) {
        return Err(AppError::invalid_argument(format!(
            "limit 不能超过 {}: {}",
            max_limit, limit
        )));
    }
    Ok(limit as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MockClient {
        posts: Vec<RawPost>,
        calls: Mutex<Vec<(String, ListingType, u32)>>,
    }

    impl MockClient {
        fn with_scores(scores: &[i64]) -> Self {
            let posts = scores
                .iter()
                .enumerate()
                .map(|(i, score)| RawPost {
                    title: Some(format!("post {}", i)),
                    score: Some(*score),
                    url: Some(format!("https://example.com/{}", i)),
                    ..Default::default()
                })
                .collect();
            Self {
                posts,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ListingClient for MockClient {
        async fn listing(
            &self,
            name: &str,
            listing_type: ListingType,
            limit: u32,
        ) -> AppResult<Vec<RawPost>> {
            self.calls
                .lock()
                .unwrap()
                .push((name.to_string(), listing_type, limit));
            Ok(self.posts.iter().take(limit as usize).cloned().collect())
        }
    }

    struct FailingClient;

    #[async_trait]
    impl ListingClient for FailingClient {
        async fn listing(&self, name: &str, t: ListingType, _: u32) -> AppResult<Vec<RawPost>> {
            Err(AppError::upstream(format!("/r/{}/{}", name, t), "HTTP 401"))
        }
    }

    #[tokio::test]
    async fn keeps_scores_at_or_above_threshold_in_order() {
        let fetcher = Fetcher::new(MockClient::with_scores(&[3, 15, 10, 20, 1]), 100);

        let posts = fetcher.fetch("test", ListingType::Hot, 10, 5).await.unwrap();

        let scores: Vec<i64> = posts.iter().map(|p| p.score()).collect();
        assert_eq!(scores, vec![15, 10, 20]);
        let titles: Vec<&str> = posts.iter().map(|p| p.title()).collect();
        assert_eq!(titles, vec!["post 1", "post 2", "post 3"]);

        let calls = fetcher.client.calls.lock().unwrap();
        assert_eq!(calls.as_slice(), &[("test".to_string(), ListingType::Hot, 5)]);
    }

    #[tokio::test]
    async fn invalid_arguments_never_reach_the_client() {
        let fetcher = Fetcher::new(MockClient::with_scores(&[1, 2]), 100);

        for (name, threshold, limit) in [("", 0, 5), ("test", -1, 5), ("test", 0, 0), ("test", 0, 101), ("bad/name", 0, 5)] {
            let err = fetcher
                .fetch(name, ListingType::New, threshold, limit)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::InvalidArgument(_)), "{name} {threshold} {limit}");
        }
        assert_eq!(fetcher.client.call_count(), 0);
    }

    #[tokio::test]
    async fn upstream_errors_are_surfaced() {
        let fetcher = Fetcher::new(FailingClient, 100);
        let err = fetcher.fetch("test", ListingType::Top, 0, 10).await.unwrap_err();
        assert!(matches!(err, AppError::UpstreamUnavailable { .. }));
    }

    #[tokio::test]
    async fn empty_listing_yields_empty_result() {
        let fetcher = Fetcher::new(MockClient::with_scores(&[]), 100);
        let posts = fetcher.fetch("r/test", ListingType::Rising, 0, 10).await.unwrap();
        assert!(posts.is_empty());
        assert_eq!(fetcher.client.calls.lock().unwrap()[0].0, "test");
    }

    #[test]
    fn filtering_is_monotonic_in_threshold() {
        let scores = [-5, 0, 3, 3, 10, 42, 7, 100, -1, 15];
        let raw: Vec<RawPost> = MockClient::with_scores(&scores).posts;

        let mut previous = usize::MAX;
        for threshold in 0..=120 {
            let count = filter_posts(raw.clone(), threshold).len();
            assert!(count <= previous, "threshold {} increased the count", threshold);
            previous = count;
        }
    }

    #[test]
    fn threshold_is_inclusive() {
        assert!(!passes_threshold(-1, 0));
        assert!(passes_threshold(0, 0));
        assert!(passes_threshold(10, 10));
        assert!(!passes_threshold(9, 10));
    }

    #[test]
    fn items_without_title_are_dropped_after_filtering() {
        let raw = vec![
            RawPost {
                score: Some(50),
                url: Some("https://example.com".into()),
                ..Default::default()
            },
            RawPost {
                title: Some("kept".into()),
                score: Some(50),
                url: Some("https://example.com/kept".into()),
                ..Default::default()
            },
        ];
        let posts = filter_posts(raw, 10);
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title(), "kept");
    }
}
