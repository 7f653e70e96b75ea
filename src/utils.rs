// src/utils.rs

use crate::error::*;
use anyhow::Context;
use chrono::{DateTime, Local};
use indicatif::HumanBytes;
use md5::{Digest, Md5};
use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
    time::SystemTime,
};

/// 流式计算文件内容的 MD5 摘要。
pub fn calculate_file_md5(path: &Path) -> AppResult<String> {
    let file = File::open(path).with_context(|| format!("打开 {:?} 计算摘要失败", path))?;
    let mut reader = BufReader::new(file);
    let mut hasher = Md5::new();
    let mut buffer = [0; 8192];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 { break; }
        hasher.update(&buffer[..bytes_read]);
    }
    let result = hasher.finalize();
    Ok(format!("{:x}", result))
}

/// 解析 HTTP 日期 (RFC 2822 形式，如 `Last-Modified` 头的取值)。
pub fn parse_http_date(value: &str) -> Option<SystemTime> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(SystemTime::from)
}

/// 生成文件的单行概况（路径、大小、修改时间），用于运行报告。
/// 文件不存在或不可读时返回 None，由调用方决定措辞。
pub fn describe_file(path: &Path) -> Option<String> {
    let metadata = std::fs::metadata(path).ok()?;
    let size = HumanBytes(metadata.len());
    let modified = metadata
        .modified()
        .ok()
        .map(|t| DateTime::<Local>::from(t).format("%Y-%m-%d %H:%M:%S").to_string());
    Some(match modified {
        Some(ts) => format!("{} ({}, 修改于 {})", path.display(), size, ts),
        None => format!("{} ({})", path.display(), size),
    })
}
