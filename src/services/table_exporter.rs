//! CSV 导出服务 - 业务能力层
//!
//! 只负责"写/读 filtered_posts.csv"，不关心流程

use crate::error::{AppError, AppResult};
use crate::models::PostRecord;
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::debug;

/// 写入 CSV 文件（覆盖已有文件）
///
/// 即使没有记录也会写入表头
pub fn write_table(posts: &[PostRecord], destination: &Path) -> AppResult<()> {
    let file = File::create(destination).map_err(|e| AppError::io_failure(destination, e))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    write_records(&mut writer, posts)
        .and_then(|_| writer.flush().map_err(csv::Error::from))
        .map_err(|e| AppError::io_failure(destination, csv_io_error(e)))?;

    debug!("CSV 已写入 {} 行: {}", posts.len(), destination.display());
    Ok(())
}

/// 读取 CSV 文件
pub fn read_table(path: &Path) -> AppResult<Vec<PostRecord>> {
    let file = File::open(path).map_err(|e| AppError::io_failure(path, e))?;
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(file);

    reader
        .deserialize()
        .collect::<Result<Vec<PostRecord>, csv::Error>>()
        .map_err(|e| AppError::io_failure(path, csv_io_error(e)))
}

/// 读取 CSV 表头
pub fn read_header(path: &Path) -> AppResult<Vec<String>> {
    let file = File::open(path).map_err(|e| AppError::io_failure(path, e))?;
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::io_failure(path, csv_io_error(e)))?;
    Ok(headers.iter().map(str::to_string).collect())
}

fn write_records<W: io::Write>(
    writer: &mut csv::Writer<W>,
    posts: &[PostRecord],
) -> Result<(), csv::Error> {
    writer.write_record(PostRecord::HEADER)?;
    for post in posts {
        writer.serialize(post)?;
    }
    Ok(())
}

fn csv_io_error(err: csv::Error) -> io::Error {
    match err.into_kind() {
        csv::ErrorKind::Io(e) => e,
        other => io::Error::new(io::ErrorKind::InvalidData, format!("{:?}", other)),
    }
}
