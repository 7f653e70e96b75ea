// src/updater/engine.rs

use super::{RunOutcome, orchestrator::TransferOrchestrator, workdir::WorkingArea};
use crate::{UpdateJobContext, error::*, symbols, utils};
use log::{error, info};

/// 顶层协调器：创建工作目录，委派编排器，保证所有出口都经过清理与汇报。
pub struct UpdateEngine {
    context: UpdateJobContext,
}

impl UpdateEngine {
    pub fn new(context: UpdateJobContext) -> Self {
        Self { context }
    }

    pub async fn run(&self) -> AppResult<RunOutcome> {
        let config = &self.context.config;
        let workdir = WorkingArea::create(config.keep_working_dir)?;
        info!("开始更新 {} -> {:?}", config.url, config.target);

        let orchestrator = TransferOrchestrator::new(
            config,
            self.context.http_client.as_ref(),
            &workdir,
        );
        let result = orchestrator.execute().await;

        match result {
            Ok(outcome) => {
                self.report_success(outcome);
                if let Some(kept) = workdir.finish()? {
                    if !config.quiet {
                        println!("{} 工作目录已保留: {}", *symbols::INFO, kept.display());
                    }
                }
                Ok(outcome)
            }
            Err(e) => {
                self.report_failure(&e);
                // 失败路径同样回收工作目录（除非要求保留），随后传播原始错误
                match workdir.finish() {
                    Ok(Some(kept)) => {
                        eprintln!("{} 工作目录已保留: {}", *symbols::INFO, kept.display())
                    }
                    Ok(None) => {}
                    Err(cleanup_err) => error!("清理工作目录失败: {}", cleanup_err),
                }
                Err(e)
            }
        }
    }

    fn report_success(&self, outcome: RunOutcome) {
        let config = &self.context.config;
        info!("{}: {} -> {:?}", outcome.summary(), config.url, config.target);
        if config.quiet {
            return;
        }
        match outcome {
            RunOutcome::Updated => {
                let detail = utils::describe_file(&config.target)
                    .unwrap_or_else(|| config.target.display().to_string());
                println!("{} 已更新: {}", *symbols::OK, detail);
            }
            RunOutcome::UpToDate => {
                println!("{} 已是最新: {}", *symbols::INFO, config.target.display());
            }
        }
    }

    /// 失败汇报附带幸存目标文件的概况，便于运维判断上一个可用版本是否还在。
    fn report_failure(&self, e: &AppError) {
        let config = &self.context.config;
        error!("更新失败: {} ({} -> {:?})", e, config.url, config.target);
        match utils::describe_file(&config.target) {
            Some(detail) => {
                eprintln!("{} 上一个可用版本仍在: {}", *symbols::WARN, detail)
            }
            None => eprintln!("{} 目标文件不存在，没有可回退的版本。", *symbols::WARN),
        }
    }
}
