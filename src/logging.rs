// src/logging.rs

use crate::{
    cli::{Cli, LogLevel},
    constants,
};
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use std::env;

/// 初始化日志系统：标准错误上的控制台输出、可选的调试日志文件、
/// 以及 `--logger` 指定时的 syslog 摘要通道。
/// 日志初始化的任何失败都只降级为警告，从不让一次更新失败。
pub fn init(args: &Cli) {
    let console_filter = if args.quiet {
        LevelFilter::Error
    } else if args.debug {
        LevelFilter::Debug
    } else if args.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };

    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Cyan)
        .debug(Color::Magenta);

    let mut dispatch = fern::Dispatch::new().chain(
        fern::Dispatch::new()
            .level(console_filter)
            .format(move |out, message, record| {
                out.finish(format_args!("[{}] {}", colors.color(record.level()), message))
            })
            .chain(std::io::stderr()),
    );

    let file_filter = match args.log_level {
        LogLevel::Off => LevelFilter::Off,
        LogLevel::Error => LevelFilter::Error,
        LogLevel::Warn => LevelFilter::Warn,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Debug => LevelFilter::Debug,
        LogLevel::Trace => LevelFilter::Trace,
    };
    if file_filter != LevelFilter::Off {
        match open_log_file() {
            Some(file) => {
                dispatch = dispatch.chain(
                    fern::Dispatch::new()
                        .level(file_filter)
                        .format(|out, message, record| {
                            out.finish(format_args!(
                                "[{}] [{:<5}] [{}:{}] - {}",
                                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                                record.level(),
                                record.target(),
                                record.line().unwrap_or(0),
                                message
                            ))
                        })
                        .chain(file),
                );
            }
            None => eprintln!("警告: 无法打开日志文件，文件日志已禁用。"),
        }
    }

    if args.logger {
        let formatter = syslog::Formatter3164 {
            facility: syslog::Facility::LOG_USER,
            hostname: None,
            process: clap::crate_name!().into(),
            pid: 0,
        };
        match syslog::unix(formatter) {
            Ok(writer) => {
                dispatch = dispatch.chain(
                    fern::Dispatch::new()
                        .level(LevelFilter::Info)
                        .chain(writer),
                );
            }
            Err(e) => eprintln!("警告: 无法连接 syslog: {}", e),
        }
    }

    if let Err(e) = dispatch.apply() {
        eprintln!("警告: 日志系统初始化失败: {}", e);
    }
}

/// 打开调试日志文件，优先放在用户配置目录，失败时回退到临时目录。
fn open_log_file() -> Option<std::fs::File> {
    let log_file_path = match dirs::home_dir() {
        Some(home) => home
            .join(constants::CONFIG_DIR_NAME)
            .join(constants::LOG_FILE_NAME),
        None => env::temp_dir()
            .join(clap::crate_name!())
            .join(constants::LOG_FILE_NAME),
    };
    if let Some(dir) = log_file_path.parent() {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("警告: 无法创建日志目录 {:?}: {}", dir, e);
        }
    }
    match fern::log_file(&log_file_path) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("警告: 无法打开日志文件 {:?}: {}", log_file_path, e);
            let fallback = env::temp_dir().join(format!(
                "{}-{}",
                clap::crate_name!(),
                constants::LOG_FALLBACK_FILE_NAME
            ));
            fern::log_file(&fallback).ok()
        }
    }
}
