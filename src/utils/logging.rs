/// 日志工具模块
///
/// 提供日志初始化和格式化输出的辅助函数
use crate::models::PostRecord;
use crate::workflow::RunRequest;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 日志写到 stderr，stdout 只留给运行结果。`RUST_LOG` 优先于 `verbose`
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(request: &RunRequest) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 {}", request);
    info!("📁 输出目录: {}", request.output_dir.display());
    info!("{}", "=".repeat(60));
}

/// 记录一条过滤后的帖子
///
/// # 参数
/// - `index`: 序号（从 1 开始）
/// - `post`: 帖子记录
pub fn log_post(index: usize, post: &PostRecord) {
    info!(
        "  {}. [{}] {} - {}",
        index,
        post.score(),
        truncate_text(post.title(), 60),
        post.url()
    );
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_by_characters_not_bytes() {
        assert_eq!(truncate_text("héllo wörld", 5), "héllo...");
        assert_eq!(truncate_text("short", 10), "short");
    }
}
