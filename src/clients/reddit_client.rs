/// Reddit API 客户端
///
/// 封装 application-only OAuth 认证和列表接口调用
use crate::clients::ListingClient;
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{ListingType, RawPost};
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const TOKEN_PATH: &str = "/api/v1/access_token";

/// Reddit 客户端
pub struct RedditClient {
    http: reqwest::Client,
    auth_url: String,
    api_base_url: String,
    client_id: String,
    client_secret: String,
    user_agent: String,
    has_credentials: bool,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: RawPost,
}

impl RedditClient {
    /// 创建新的 Reddit 客户端
    ///
    /// 这里不校验凭据，缺失的凭据在第一次调用 API 时才报错
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::Config(format!("无法创建 HTTP 客户端: {}", e)))?;

        Ok(Self {
            http,
            auth_url: config.auth_url.trim_end_matches('/').to_string(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            user_agent: config.user_agent.clone(),
            has_credentials: config.has_credentials(),
        })
    }

    /// 获取 access token
    async fn access_token(&self) -> AppResult<String> {
        if !self.has_credentials {
            return Err(AppError::upstream(
                TOKEN_PATH,
                "缺少凭据 (REDDIT_CLIENT_ID / REDDIT_CLIENT_SECRET / REDDIT_USER_AGENT)",
            ));
        }

        let url = format!("{}{}", self.auth_url, TOKEN_PATH);
        debug!("正在获取 access token: {}", url);

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header(USER_AGENT, &self.user_agent)
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| AppError::upstream(TOKEN_PATH, describe_reqwest_error(&e)))?;

        let response = check_status(TOKEN_PATH, response)?;
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::upstream(TOKEN_PATH, format!("响应解析失败: {}", e)))?;

        match (token.access_token, token.error) {
            (Some(access_token), _) if !access_token.is_empty() => Ok(access_token),
            (_, Some(error)) => Err(AppError::upstream(TOKEN_PATH, format!("认证失败: {}", error))),
            _ => Err(AppError::upstream(TOKEN_PATH, "认证失败: 响应中没有 access_token")),
        }
    }
}

#[async_trait]
impl ListingClient for RedditClient {
    async fn listing(
        &self,
        name: &str,
        listing_type: ListingType,
        limit: u32,
    ) -> AppResult<Vec<RawPost>> {
        let token = self.access_token().await?;

        let endpoint = format!("/r/{}/{}", name, listing_type);
        let url = format!("{}{}", self.api_base_url, endpoint);
        debug!("请求列表: {} (limit={})", url, limit);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .header(USER_AGENT, &self.user_agent)
            .query(&[("limit", limit.to_string()), ("raw_json", "1".to_string())])
            .send()
            .await
            .map_err(|e| AppError::upstream(&endpoint, describe_reqwest_error(&e)))?;

        let response = check_status(&endpoint, response)?;
        let listing: Listing = response
            .json()
            .await
            .map_err(|e| AppError::upstream(&endpoint, format!("响应解析失败: {}", e)))?;

        let mut posts: Vec<RawPost> = listing.data.children.into_iter().map(|c| c.data).collect();
        // API 偶尔会多返回置顶帖
        posts.truncate(limit as usize);
        debug!("列表返回 {} 条原始帖子", posts.len());

        Ok(posts)
    }
}

/// 检查 HTTP 状态码
fn check_status(endpoint: &str, response: Response) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let reset = response
            .headers()
            .get("x-ratelimit-reset")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("?")
            .to_string();
        warn!("请求频率限制: {} (重置时间: {} 秒)", endpoint, reset);
        return Err(AppError::upstream(
            endpoint,
            format!("请求过于频繁 (HTTP 429), 建议等待 {} 秒", reset),
        ));
    }

    let message = match status {
        StatusCode::UNAUTHORIZED => format!("认证失败 (HTTP {})", status.as_u16()),
        StatusCode::FORBIDDEN => format!("无权访问 (HTTP {})", status.as_u16()),
        StatusCode::NOT_FOUND => format!("版块不存在 (HTTP {})", status.as_u16()),
        _ => format!("HTTP {}", status),
    };
    Err(AppError::upstream(endpoint, message))
}

fn describe_reqwest_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("请求超时: {}", err)
    } else if err.is_connect() {
        format!("无法连接: {}", err)
    } else {
        format!("请求失败: {}", err)
    }
}
