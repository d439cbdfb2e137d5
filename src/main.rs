use anyhow::{Context, Result};
use clap::Parser;
use reddit_post_filter::utils::logging;
use reddit_post_filter::{Config, Pipeline, RedditClient, RunOutcome, RunRequest};
use std::path::PathBuf;
use std::process::ExitCode;

/// 抓取 Reddit 版块帖子，按分数过滤后导出 CSV 和 PDF
#[derive(Parser, Debug)]
#[command(name = "reddit_post_filter")]
#[command(version, allow_negative_numbers = true)]
struct Cli {
    /// 版块名
    #[arg(long)]
    subreddit: String,

    /// 最低分数（包含）
    #[arg(long)]
    score: i64,

    /// 向 API 请求的最大条数
    #[arg(long)]
    limit: i64,

    /// 列表类型: hot, new, top, rising
    #[arg(long = "type", default_value = "hot")]
    listing_type: String,

    /// 输出目录（必须已存在）
    #[arg(long)]
    path: PathBuf,

    /// 可选的 TOML 配置文件
    #[arg(long)]
    config: Option<PathBuf>,

    /// 输出调试日志
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // 加载 .env（不存在时忽略）
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).context("加载配置失败")?;
    let client = RedditClient::new(&config)?;
    let mut pipeline = Pipeline::new(client, &config);

    let request = RunRequest::new(cli.subreddit, cli.score, cli.limit, cli.path)
        .with_listing_type(cli.listing_type);

    match pipeline.run(&request).await? {
        RunOutcome::NoResults => {
            println!(
                "没有结果: r/{} 中没有分数 >= {} 的帖子，未生成文件",
                request.subreddit, request.score
            );
        }
        RunOutcome::Exported(summary) => {
            println!("✅ 已导出 {} 条帖子", summary.records);
            println!("  CSV: {}", summary.table_path.display());
            println!("  PDF: {} ({} 页)", summary.report_path.display(), summary.report_pages);
        }
    }

    Ok(())
}
