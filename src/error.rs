use std::path::{Path, PathBuf};
use thiserror::Error;

/// 应用程序错误类型
///
/// 每个变体对应一类失败原因，全部向上传播，不做重试
#[derive(Debug, Error)]
pub enum AppError {
    /// 命令行参数无效（在任何 I/O 之前发现）
    #[error("参数无效: {0}")]
    InvalidArgument(String),

    /// 不支持的列表类型
    #[error("不支持的列表类型 '{0}' (可选: hot, new, top, rising)")]
    InvalidListingType(String),

    /// 上游 API 不可用（认证失败、网络错误、频率限制、超时）
    #[error("上游服务不可用 ({endpoint}): {message}")]
    UpstreamUnavailable { endpoint: String, message: String },

    /// 文件无法写入
    #[error("文件写入失败 ({}): {source}", path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 报告渲染失败
    #[error("报告渲染失败: {0}")]
    RenderFailure(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    Config(String),
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建参数错误
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        AppError::InvalidArgument(message.into())
    }

    /// 创建上游不可用错误
    pub fn upstream(endpoint: impl Into<String>, message: impl ToString) -> Self {
        AppError::UpstreamUnavailable {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }

    /// 创建文件写入错误
    pub fn io_failure(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        AppError::IoFailure {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// 创建渲染错误
    pub fn render(message: impl ToString) -> Self {
        AppError::RenderFailure(message.to_string())
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
