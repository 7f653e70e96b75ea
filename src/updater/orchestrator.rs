// src/updater/orchestrator.rs

use super::{RunOutcome, compare, rotate, workdir::WorkingArea};
use crate::{
    cache::{self, CacheMetadata, ConditionalHeaders},
    client::{TransferClient, TransferOutcome},
    config::RunConfig,
    error::*,
    utils,
};
use log::{debug, info, warn};
use std::fs;
use tempfile::NamedTempFile;

/// 单次抓取结果的归类。
#[derive(Debug, PartialEq, Eq)]
enum FetchClassification {
    Fetched,
    NotModified,
    Failed(String),
}

/// 按原始状态捕获归类抓取结果。
/// 超过 3 个字符或无法解析为状态码的捕获一律折入失败，不猜测成因。
fn classify_status(capture: &str) -> FetchClassification {
    let capture = capture.trim();
    if capture.is_empty() || capture.len() > 3 {
        return FetchClassification::Failed(format!("无法解读的状态捕获 '{}'", capture));
    }
    match capture.parse::<u16>() {
        Ok(200) => FetchClassification::Fetched,
        Ok(304) => FetchClassification::NotModified,
        Ok(code) => FetchClassification::Failed(format!("不支持的 HTTP 状态码 {}", code)),
        Err(_) => FetchClassification::Failed(format!("无法解读的状态捕获 '{}'", capture)),
    }
}

/// 驱动一次完整的更新流程：
/// 解析条件请求 → 抓取 → 归类 → (内容比较、版本轮换) → 原子安装 → 元数据落位 → 淘汰清理。
pub struct TransferOrchestrator<'a> {
    config: &'a RunConfig,
    client: &'a dyn TransferClient,
    workdir: &'a WorkingArea,
}

impl<'a> TransferOrchestrator<'a> {
    pub fn new(
        config: &'a RunConfig,
        client: &'a dyn TransferClient,
        workdir: &'a WorkingArea,
    ) -> Self {
        Self {
            config,
            client,
            workdir,
        }
    }

    pub async fn execute(&self) -> AppResult<RunOutcome> {
        let conditional = self.resolve_conditional()?;
        if conditional.is_unconditional() {
            debug!("执行无条件抓取");
        } else {
            debug!("条件请求头: {:?}", conditional);
        }

        let outcome = self
            .client
            .fetch(
                &self.config.url,
                &conditional,
                &self.workdir.download_path(),
                &self.workdir.headers_path(),
            )
            .await?;
        debug!("状态捕获: '{}'", outcome.status_capture);

        match classify_status(&outcome.status_capture) {
            FetchClassification::NotModified => {
                info!("服务器返回 304，本地副本仍是最新");
                Ok(RunOutcome::UpToDate)
            }
            FetchClassification::Failed(reason) => Err(AppError::Transfer(reason)),
            FetchClassification::Fetched => self.accept_body(&outcome),
        }
    }

    /// PREPARING 阶段：决定本次请求携带哪些条件头。
    fn resolve_conditional(&self) -> AppResult<ConditionalHeaders> {
        let config = self.config;
        if config.force {
            debug!("--force 指定，跳过缓存校验");
            return Ok(ConditionalHeaders::default());
        }
        if !config.cache_enabled {
            return Ok(ConditionalHeaders::default());
        }
        let Some(metadata) = cache::load(&config.metadata_path)? else {
            return Ok(ConditionalHeaders::default());
        };
        if !config.target.exists() {
            // 目标已被删除而元数据仍在：清除这份孤儿元数据，本次按首次抓取处理，
            // 而不是替一个不存在的文件出示陈旧验证器
            warn!(
                "目标文件缺失但存在缓存元数据，清除 {:?}",
                config.metadata_path
            );
            fs::remove_file(&config.metadata_path)?;
            return Ok(ConditionalHeaders::default());
        }
        // 在工作目录留存一份进入本次运行时的元数据，配合 --keep-working-dir 诊断
        fs::copy(&config.metadata_path, self.workdir.prev_metadata_path())?;
        Ok(cache::conditional_headers(&metadata, config.etag_enabled))
    }

    /// 处理 200 响应：先确认内容真的变化，再进入安装序列。
    fn accept_body(&self, outcome: &TransferOutcome) -> AppResult<RunOutcome> {
        if !compare::is_different(&self.config.target, &outcome.body_path)? {
            info!("响应体与现有目标一致，跳过轮换与安装");
            return Ok(RunOutcome::UpToDate);
        }
        self.install(outcome)?;
        Ok(RunOutcome::Updated)
    }

    /// INSTALLING 阶段。每一步失败都立即终止本次运行，不自动重试；
    /// 既有目标文件在轮换把它挪走之前始终保持原样。
    fn install(&self, outcome: &TransferOutcome) -> AppResult<()> {
        let evicted = rotate::rotate(&self.config.target, self.config.keep)?;

        self.install_body(outcome)?;
        self.install_metadata(outcome)?;

        // 超出保留上限的版本最后删除：安装中途失败时不会已经毁掉仍然有效的备份
        for path in &evicted {
            debug!("删除超出保留上限的版本: {:?}", path);
            fs::remove_file(path)?;
        }
        Ok(())
    }

    /// 将响应体经同目录临时文件原子落位到目标路径。
    fn install_body(&self, outcome: &TransferOutcome) -> AppResult<()> {
        let staged = NamedTempFile::new_in(&self.config.target_dir)?;
        fs::copy(&outcome.body_path, staged.path())?;
        if self.config.remote_time_enabled {
            if let Some(mtime) = outcome
                .last_modified
                .as_deref()
                .and_then(utils::parse_http_date)
            {
                staged.as_file().set_modified(mtime)?;
            }
        }
        staged.persist(&self.config.target)?;
        info!("已安装新版本: {:?}", self.config.target);
        Ok(())
    }

    /// 元数据落位：启用缓存且响应携带验证器时原子写入边车；
    /// 其余情况清除既有边车，下一次运行不会拿到陈旧的验证器。
    fn install_metadata(&self, outcome: &TransferOutcome) -> AppResult<()> {
        let metadata_path = &self.config.metadata_path;
        let metadata =
            CacheMetadata::from_validators(outcome.etag.clone(), outcome.last_modified.clone());

        if self.config.cache_enabled && !metadata.is_empty() {
            cache::save(&self.workdir.staged_metadata_path(), &metadata)?;
            let staged = NamedTempFile::new_in(&self.config.target_dir)?;
            fs::copy(self.workdir.staged_metadata_path(), staged.path())?;
            staged.persist(metadata_path)?;
            debug!("缓存元数据已更新: {:?}", metadata_path);
        } else if metadata_path.exists() {
            fs::remove_file(metadata_path)?;
            debug!("已移除不再适用的缓存元数据: {:?}", metadata_path);
        }
        Ok(())
    }
}
