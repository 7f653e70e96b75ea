// src/updater/compare.rs

use crate::{error::*, utils};
use std::path::Path;

/// 判断新下载的内容与现有目标文件是否真的不同。
/// 只在条件请求没有给出确定性 304、而服务器仍返回了完整响应体时调用：
/// 有些服务器不带验证器地重发一模一样的内容，照单全收会让备份链空转。
pub fn is_different(old_path: &Path, new_path: &Path) -> AppResult<bool> {
    if !old_path.exists() {
        // 首次运行，没有旧版本可比较
        return Ok(true);
    }
    let old_size = std::fs::metadata(old_path)?.len();
    let new_size = std::fs::metadata(new_path)?.len();
    if old_size != new_size {
        return Ok(true);
    }
    // 大小一致时退化为内容摘要比较
    let old_digest = utils::calculate_file_md5(old_path)?;
    let new_digest = utils::calculate_file_md5(new_path)?;
    Ok(old_digest != new_digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_missing_old_file_is_different() {
        let dir = tempfile::tempdir().unwrap();
        let new = dir.path().join("new");
        fs::write(&new, b"content").unwrap();
        assert!(is_different(&dir.path().join("absent"), &new).unwrap());
    }

    #[test]
    fn test_size_mismatch_is_different() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("old");
        let new = dir.path().join("new");
        fs::write(&old, b"short").unwrap();
        fs::write(&new, b"much longer content").unwrap();
        assert!(is_different(&old, &new).unwrap());
    }

    #[test]
    fn test_identical_content_is_not_different() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("old");
        let new = dir.path().join("new");
        fs::write(&old, b"same bytes").unwrap();
        fs::write(&new, b"same bytes").unwrap();
        assert!(!is_different(&old, &new).unwrap());
    }

    #[test]
    fn test_same_size_different_content() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("old");
        let new = dir.path().join("new");
        fs::write(&old, b"aaaa").unwrap();
        fs::write(&new, b"bbbb").unwrap();
        assert!(is_different(&old, &new).unwrap());
    }
}
