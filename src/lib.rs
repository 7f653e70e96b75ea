// src/lib.rs

pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod symbols;
pub mod updater;
pub mod utils;

use crate::{
    cli::Cli,
    client::RobustClient,
    config::RunConfig,
    error::AppResult,
    updater::{RunOutcome, UpdateEngine},
};
use log::debug;
use std::sync::Arc;

/// 核心的执行上下文，包含一次运行所需的全部状态和工具
#[derive(Clone)]
pub struct UpdateJobContext {
    pub config: Arc<RunConfig>,
    pub http_client: Arc<RobustClient>,
}

/// 库的公共入口点，由 `main.rs` 调用
pub async fn run_from_cli(args: Arc<Cli>) -> AppResult<RunOutcome> {
    logging::init(&args);
    debug!("CLI 参数: {:?}", args);

    let config = Arc::new(RunConfig::new(&args)?);
    debug!("加载的运行配置: {:?}", config);

    let http_client = Arc::new(RobustClient::new(config.clone())?);

    let context = UpdateJobContext {
        config,
        http_client,
    };

    UpdateEngine::new(context).run().await
}
