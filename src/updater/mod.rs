// src/updater/mod.rs

pub mod compare;
mod engine;
pub mod orchestrator;
pub mod rotate;
pub mod workdir;

pub use engine::UpdateEngine;
pub use workdir::{WorkingArea, purge_active};

/// 一次成功运行的最终结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// 安装了新版本
    Updated,
    /// 本地副本已是最新（304，或内容一致的 200）
    UpToDate,
}

impl RunOutcome {
    /// 写入 syslog 的单行摘要用词。
    pub fn summary(&self) -> &'static str {
        match self {
            RunOutcome::Updated => "updated",
            RunOutcome::UpToDate => "already up to date",
        }
    }
}
