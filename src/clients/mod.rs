//! 外部 API 客户端
//!
//! `ListingClient` 是抓取层依赖的唯一接口，生产环境使用 `RedditClient`，
//! 测试中可以注入任意实现

pub mod reddit_client;

pub use reddit_client::RedditClient;

use crate::error::AppResult;
use crate::models::{ListingType, RawPost};
use async_trait::async_trait;

/// 列表接口能力
#[async_trait]
pub trait ListingClient: Send + Sync {
    /// 获取指定版块某个排序下的前 `limit` 条原始帖子（保持 API 的排序）
    async fn listing(
        &self,
        name: &str,
        listing_type: ListingType,
        limit: u32,
    ) -> AppResult<Vec<RawPost>>;
}
