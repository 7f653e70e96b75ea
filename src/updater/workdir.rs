// src/updater/workdir.rs

use crate::{constants, error::*};
use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};
use tempfile::TempDir;

/// 当前运行的工作目录路径，供信号处理在进程退出前做尽力清理。
/// 单次运行只会注册一个目录。
static ACTIVE_WORKDIR: Mutex<Option<PathBuf>> = Mutex::new(None);

/// 信号触发的兜底清理：删除当前注册的工作目录。
pub fn purge_active() {
    if let Ok(mut guard) = ACTIVE_WORKDIR.lock() {
        if let Some(path) = guard.take() {
            let _ = std::fs::remove_dir_all(&path);
        }
    }
}

/// 每次运行独占的临时工作目录，持有下载中间文件与元数据暂存。
/// 正常或失败结束都会回收，除非用户要求保留用于诊断。
pub struct WorkingArea {
    dir: Option<TempDir>,
    keep: bool,
}

impl WorkingArea {
    pub fn create(keep: bool) -> AppResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix(constants::WORKDIR_PREFIX)
            .tempdir()?;
        if let Ok(mut guard) = ACTIVE_WORKDIR.lock() {
            *guard = Some(dir.path().to_path_buf());
        }
        Ok(Self { dir: Some(dir), keep })
    }

    pub fn path(&self) -> &Path {
        self.dir.as_ref().expect("工作目录已被释放").path()
    }

    /// 下载中的响应体
    pub fn download_path(&self) -> PathBuf {
        self.path().join("download.part")
    }

    /// 状态行与响应头留存
    pub fn headers_path(&self) -> PathBuf {
        self.path().join("response-headers.txt")
    }

    /// 待落位的新元数据
    pub fn staged_metadata_path(&self) -> PathBuf {
        self.path().join("metadata.next")
    }

    /// 本次运行开始前既有元数据的副本
    pub fn prev_metadata_path(&self) -> PathBuf {
        self.path().join("metadata.prev")
    }

    /// 结束本次运行。默认删除工作目录；诊断模式下保留并返回其位置。
    pub fn finish(mut self) -> AppResult<Option<PathBuf>> {
        let dir = self.dir.take().expect("工作目录已被释放");
        if let Ok(mut guard) = ACTIVE_WORKDIR.lock() {
            guard.take();
        }
        if self.keep {
            Ok(Some(dir.keep()))
        } else {
            dir.close()?;
            Ok(None)
        }
    }
}

impl Drop for WorkingArea {
    fn drop(&mut self) {
        // 目录本身由 TempDir 的 Drop 删除，这里只撤销信号清理的注册
        if self.dir.is_some() {
            if let Ok(mut guard) = ACTIVE_WORKDIR.lock() {
                guard.take();
            }
        }
    }
}
