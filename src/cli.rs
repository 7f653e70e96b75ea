// src/cli.rs

use crate::constants;
use clap::{Parser, ValueEnum, crate_version};
use std::path::PathBuf;

/// 定义日志输出级别
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Parser, Debug, Clone)]
#[command(
    version = crate_version!(),
    about,
    long_about = None,
    arg_required_else_help = true,
    disable_help_flag = true,
    disable_version_flag = true,
)]
pub struct Cli {
    /// 要获取的远程资源链接 (仅支持 http/https)
    #[arg(value_name = "URL")]
    pub url: String,

    // --- 目标与历史 (Target) ---
    /// 本地目标文件路径
    #[arg(short, long, value_name = "FILE", help_heading = "Target")]
    pub output: PathBuf,
    /// 保留的历史版本数，0 表示不保留
    #[arg(short, long, value_name = "N", default_value_t = constants::DEFAULT_KEEP, help_heading = "Target")]
    pub keep: u32,
    /// 运行结束后保留工作目录，便于诊断
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Target")]
    pub keep_working_dir: bool,

    // --- 缓存校验 (Cache) ---
    /// 启用 HTTP 缓存校验 (ETag / Last-Modified 条件请求)
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Cache")]
    pub enable_caching: bool,
    /// 不使用 ETag 校验，仅依赖 Last-Modified
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Cache")]
    pub disable_etag: bool,
    /// 不将服务器的 Last-Modified 应用为本地文件的修改时间
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Cache")]
    pub disable_remote_time: bool,
    /// 跳过缓存校验，强制执行一次完整下载
    #[arg(short, long, action = clap::ArgAction::SetTrue, help_heading = "Cache")]
    pub force: bool,

    // --- 传输选项 (Transfer) ---
    /// 自定义 User-Agent
    #[arg(long, value_name = "STRING", help_heading = "Transfer")]
    pub user_agent: Option<String>,
    /// curl 风格的附加传输选项 (与内部编排冲突的选项会被拒绝)
    #[arg(long, value_name = "STRING", allow_hyphen_values = true, help_heading = "Transfer")]
    pub curl_options: Option<String>,

    // --- 输出与日志 (Output) ---
    /// 将单行运行摘要写入 syslog
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Output")]
    pub logger: bool,
    /// 安静模式，抑制常规输出
    #[arg(short, long, action = clap::ArgAction::SetTrue, help_heading = "Output")]
    pub quiet: bool,
    /// 输出更详细的运行过程
    #[arg(short, long, action = clap::ArgAction::SetTrue, help_heading = "Output")]
    pub verbose: bool,
    /// 输出调试信息
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Output")]
    pub debug: bool,

    // --- 通用选项 (General) ---
    /// 显示此帮助信息并退出
    #[arg(short = 'h', long, action = clap::ArgAction::Help, global = true, help_heading = "General")]
    _help: Option<bool>,
    /// 显示版本信息并退出
    #[arg(short = 'V', long, action = clap::ArgAction::Version, global = true, help_heading = "General")]
    _version: Option<bool>,
    /// (隐藏参数) 设置日志文件的输出级别，用于调试
    #[arg(long, value_enum, default_value_t = LogLevel::Off, global = true, hide = true)]
    pub log_level: LogLevel,
}
