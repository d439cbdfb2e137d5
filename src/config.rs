use crate::error::{AppError, AppResult};
use serde::Deserialize;
use std::path::Path;

/// 输出的 CSV 文件名（固定）
pub const TABLE_FILE_NAME: &str = "filtered_posts.csv";
/// 输出的 PDF 文件名（固定）
pub const REPORT_FILE_NAME: &str = "Filtered_Posts.pdf";

/// 程序配置
///
/// 加载顺序：默认值 → TOML 文件（可选） → 环境变量
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- Reddit 凭据（只允许来自环境变量） ---
    #[serde(skip)]
    pub client_id: String,
    #[serde(skip)]
    pub client_secret: String,
    #[serde(skip)]
    pub user_agent: String,
    // --- Reddit API 配置 ---
    /// 获取 access token 的地址
    pub auth_url: String,
    /// 列表接口的地址
    pub api_base_url: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 允许的最大 limit
    pub max_limit: u32,
    // --- 报告配置 ---
    /// PDF 中遇到不支持的字符时替换为 '?' 而不是报错
    pub lossy_text: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            user_agent: String::new(),
            auth_url: "https://www.reddit.com".to_string(),
            api_base_url: "https://oauth.reddit.com".to_string(),
            request_timeout_secs: 30,
            max_limit: 100,
            lossy_text: false,
        }
    }
}

impl Config {
    /// 加载配置：可选的 TOML 文件，然后用环境变量覆盖
    pub fn load(config_file: Option<&Path>) -> AppResult<Self> {
        let base = match config_file {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        let config = base.with_env();
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件读取非敏感配置
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("无法读取配置文件 {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
            .map_err(|e| AppError::Config(format!("{} ({})", e, path.display())))
    }

    /// 解析 TOML 文本
    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        toml::from_str(content).map_err(|e| AppError::Config(format!("TOML 解析失败: {}", e)))
    }

    fn with_env(self) -> Self {
        Self {
            client_id: std::env::var("REDDIT_CLIENT_ID").unwrap_or(self.client_id),
            client_secret: std::env::var("REDDIT_CLIENT_SECRET")
                .or_else(|_| std::env::var("REDDIT_SECRET"))
                .unwrap_or(self.client_secret),
            user_agent: std::env::var("REDDIT_USER_AGENT").unwrap_or(self.user_agent),
            auth_url: std::env::var("REDDIT_AUTH_URL").unwrap_or(self.auth_url),
            api_base_url: std::env::var("REDDIT_API_BASE_URL").unwrap_or(self.api_base_url),
            request_timeout_secs: std::env::var("REDDIT_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.request_timeout_secs),
            max_limit: std::env::var("REDDIT_MAX_LIMIT").ok().and_then(|v| v.parse().ok()).unwrap_or(self.max_limit),
            lossy_text: std::env::var("REPORT_LOSSY_TEXT").ok().and_then(|v| v.parse().ok()).unwrap_or(self.lossy_text),
        }
    }

    fn validate(&self) -> AppResult<()> {
        if self.max_limit == 0 {
            return Err(AppError::Config("max_limit 必须大于 0".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(AppError::Config("request_timeout_secs 必须大于 0".to_string()));
        }
        Ok(())
    }

    /// 凭据是否齐全
    pub fn has_credentials(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty() && !self.user_agent.is_empty()
    }
}
