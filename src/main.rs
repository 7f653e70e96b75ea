// src/main.rs

use clap::error::ErrorKind;
use clap::{CommandFactory, FromArgMatches};
use colored::*;
use cron_dl::{cli::Cli, run_from_cli, updater};
use std::{env, sync::Arc, time::Duration};

#[tokio::main]
async fn main() {
    // 为 Windows 终端启用 ANSI 颜色支持。
    // 仅在 Windows 平台上编译并执行此代码块
    #[cfg(windows)]
    {
        colored::control::set_virtual_terminal(true).ok();
    }
    // 终止信号是收尾器而不是优雅中断：兜底清理工作目录后立即退出
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.unwrap();
        updater::purge_active();
        eprintln!("\n{} 收到中断信号，已清理工作目录。", "[!]".yellow());
        tokio::time::sleep(Duration::from_millis(100)).await;
        std::process::exit(130);
    });

    let bin_name = env::var("CARGO_BIN_NAME").unwrap_or_else(|_| "cron-dl".to_string());

    let after_help = format!(
        "示例:\n  # 周期性刷新一个远程文件 (交给 cron 调度)\n  {bin} -o /var/lib/feeds/feed.xml --enable-caching https://example.com/feed.xml\n\n  # 保留最近 3 个历史版本\n  {bin} -o blocklist.txt -k 3 --enable-caching https://example.com/blocklist.txt\n\n  # 跳过缓存校验，强制重新下载\n  {bin} -o data.bin --force https://example.com/data.bin",
        bin = bin_name
    );

    let cmd = Cli::command().after_help(after_help);
    let args = match cmd.try_get_matches() {
        Ok(matches) => Arc::new(Cli::from_arg_matches(&matches).unwrap()),
        Err(e) => {
            // 帮助与版本正常退出，其余一律按用法错误处理 (64)
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 64,
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    if let Err(e) = run_from_cli(args).await {
        eprintln!("\n{} {}", "[X]".red(), format!("更新失败: {}", e).red());
        std::process::exit(e.exit_code());
    }
}
