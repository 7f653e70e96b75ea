// src/cache.rs

use crate::{constants, error::*};
use regex::Regex;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

/// 上一次成功下载留下的响应验证器。ETag 原样保存（含引号），不做解读。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheMetadata {
    pub etag: Option<String>,
    pub last_modified: Option<String>,
}

/// 本次请求要附加的条件请求头。至多一个验证器生效。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionalHeaders {
    pub if_none_match: Option<String>,
    pub if_modified_since: Option<String>,
}

impl ConditionalHeaders {
    pub fn is_unconditional(&self) -> bool {
        self.if_none_match.is_none() && self.if_modified_since.is_none()
    }
}

static METADATA_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)([a-zA-Z-]+)\s*:\s*(.*)$").unwrap());

impl CacheMetadata {
    pub fn from_validators(etag: Option<String>, last_modified: Option<String>) -> Self {
        Self { etag, last_modified }
    }

    pub fn is_empty(&self) -> bool {
        self.etag.is_none() && self.last_modified.is_none()
    }
}

/// 计算目标文件对应的元数据边车路径：同目录下的隐藏文件 `.<文件名>.cache`。
/// 点前缀加固定后缀使它在目录里与目标本身以及备份链在视觉和模式上都区分开。
pub fn metadata_path_for(target: &Path) -> Option<PathBuf> {
    let name = target.file_name()?.to_str()?;
    let dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Some(dir.join(format!(".{}.{}", name, constants::METADATA_SUFFIX)))
}

/// 读取边车元数据。容忍 CRLF 行尾与大小写不一致的键名，无法解读的行跳过。
pub fn load(path: &Path) -> AppResult<Option<CacheMetadata>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let mut metadata = CacheMetadata::default();
    for line in content.lines() {
        let line = line.trim_end_matches('\r');
        let Some(caps) = METADATA_LINE_RE.captures(line) else {
            continue;
        };
        let value = caps[2].trim().to_string();
        if value.is_empty() {
            continue;
        }
        match caps[1].to_ascii_lowercase().as_str() {
            "etag" => metadata.etag = Some(value),
            "last-modified" => metadata.last_modified = Some(value),
            _ => {}
        }
    }
    Ok(Some(metadata))
}

/// 将元数据写到给定路径。调用方负责把它原子地挪到最终位置，
/// 运行过程中边车文件从不被就地改写。
pub fn save(path: &Path, metadata: &CacheMetadata) -> AppResult<()> {
    let mut content = String::new();
    if let Some(etag) = &metadata.etag {
        content.push_str(&format!("etag: {}\n", etag));
    }
    if let Some(last_modified) = &metadata.last_modified {
        content.push_str(&format!("last-modified: {}\n", last_modified));
    }
    fs::write(path, content)?;
    Ok(())
}

/// 由既有元数据构建条件请求头。两个验证器都可用时 ETag 优先；
/// ETag 校验被关闭时退回 Last-Modified。
pub fn conditional_headers(metadata: &CacheMetadata, etag_enabled: bool) -> ConditionalHeaders {
    if etag_enabled && metadata.etag.is_some() {
        return ConditionalHeaders {
            if_none_match: metadata.etag.clone(),
            if_modified_since: None,
        };
    }
    ConditionalHeaders {
        if_none_match: None,
        if_modified_since: metadata.last_modified.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CacheMetadata {
        CacheMetadata {
            etag: Some("\"abc-123\"".to_string()),
            last_modified: Some("Sun, 06 Nov 1994 08:49:37 GMT".to_string()),
        }
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta");
        save(&path, &sample()).unwrap();
        let loaded = load(&path).unwrap().unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_load_tolerates_crlf_and_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta");
        fs::write(
            &path,
            "ETag: \"abc-123\"\r\nLAST-MODIFIED: Sun, 06 Nov 1994 08:49:37 GMT\r\n",
        )
        .unwrap();
        let loaded = load(&path).unwrap().unwrap();
        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_load_skips_unknown_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meta");
        fs::write(&path, "x-custom: y\ngarbage line\netag: \"t\"\n").unwrap();
        let loaded = load(&path).unwrap().unwrap();
        assert_eq!(loaded.etag.as_deref(), Some("\"t\""));
        assert!(loaded.last_modified.is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(&dir.path().join("absent")).unwrap().is_none());
    }

    #[test]
    fn test_conditional_prefers_etag() {
        let headers = conditional_headers(&sample(), true);
        assert_eq!(headers.if_none_match.as_deref(), Some("\"abc-123\""));
        assert!(headers.if_modified_since.is_none());
    }

    #[test]
    fn test_conditional_falls_back_to_last_modified() {
        let headers = conditional_headers(&sample(), false);
        assert!(headers.if_none_match.is_none());
        assert_eq!(
            headers.if_modified_since.as_deref(),
            Some("Sun, 06 Nov 1994 08:49:37 GMT")
        );

        let only_lm = CacheMetadata {
            etag: None,
            last_modified: sample().last_modified,
        };
        let headers = conditional_headers(&only_lm, true);
        assert!(headers.if_none_match.is_none());
        assert!(headers.if_modified_since.is_some());
    }

    #[test]
    fn test_metadata_path_is_hidden_sidecar() {
        let path = metadata_path_for(Path::new("/data/feed.xml")).unwrap();
        assert_eq!(path, Path::new("/data/.feed.xml.cache"));
    }
}
