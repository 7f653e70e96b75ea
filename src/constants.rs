// src/constants.rs

pub const CONFIG_DIR_NAME: &str = concat!(".", clap::crate_name!());
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOG_FILE_NAME: &str = concat!(clap::crate_name!(), ".log");
pub const LOG_FALLBACK_FILE_NAME: &str = "fallback.log";

/// 缓存元数据边车文件的固定后缀，完整名形如 `.<文件名>.cache`
pub const METADATA_SUFFIX: &str = "cache";
/// 工作目录名前缀
pub const WORKDIR_PREFIX: &str = concat!(clap::crate_name!(), "-");
/// 默认不保留历史版本
pub const DEFAULT_KEEP: u32 = 0;
pub const USER_AGENT: &str = concat!(clap::crate_name!(), "/", clap::crate_version!());

pub mod network {
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;
    pub const TIMEOUT_SECS: u64 = 60;
    pub const MAX_RETRIES: u32 = 3;
}

/// 与内部编排流程冲突的 curl 选项，在解析阶段直接拒绝。
/// 输出路径、断点续传、响应头转储等都由本程序自己接管。
pub const CURL_OPTION_DENYLIST: &[&str] = &[
    "-o", "--output",
    "-O", "--remote-name",
    "-C", "--continue-at",
    "-D", "--dump-header",
    "-w", "--write-out",
    "-I", "--head",
    "-z", "--time-cond",
    "--etag-save", "--etag-compare",
    "-R", "--remote-time",
];
