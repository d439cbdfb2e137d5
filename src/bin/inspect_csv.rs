//! 查看导出的 CSV 文件：先打印表头，再逐行打印记录

use anyhow::{Context, Result};
use clap::Parser;
use reddit_post_filter::config::TABLE_FILE_NAME;
use reddit_post_filter::services::table_exporter::{read_header, read_table};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "inspect_csv", version)]
struct Args {
    /// CSV 文件路径
    #[arg(default_value = TABLE_FILE_NAME)]
    file: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let header = read_header(&args.file).with_context(|| format!("无法读取 {}", args.file.display()))?;
    println!("Header: {:?}", header);

    let rows = read_table(&args.file).with_context(|| format!("无法解析 {}", args.file.display()))?;
    println!("Rows:");
    for row in &rows {
        println!(
            "[{:?}, {}, {:?}, {:?}, {}, {}, {:?}]",
            row.title(),
            row.score(),
            row.url(),
            row.author(),
            row.num_comments(),
            row.created_utc(),
            row.flair().unwrap_or("")
        );
    }
    println!("共 {} 行", rows.len());

    Ok(())
}
