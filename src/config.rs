// src/config.rs

pub mod file;

use self::file::load_or_create_external_config;
use crate::{
    cache,
    cli::Cli,
    constants,
    error::{AppError, AppResult},
};
use std::{path::PathBuf, time::Duration};
use url::Url;

/// 解析自 `--curl-options` 的附加传输选项。
/// 不透传字符串，而是收敛为客户端实际支持的一组固定字段。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransferOptions {
    pub insecure: bool,
    pub proxy: Option<String>,
    pub headers: Vec<(String, String)>,
    pub basic_auth: Option<(String, Option<String>)>,
    pub max_time: Option<Duration>,
    pub connect_timeout: Option<Duration>,
}

impl TransferOptions {
    /// 解析 curl 风格的选项字符串。
    /// denylist 中的选项与无法识别的选项都在这里拒绝，不会进入任何 I/O 阶段。
    pub fn parse(raw: &str) -> AppResult<Self> {
        let mut opts = Self::default();
        let tokens = tokenize(raw);
        let mut iter = tokens.into_iter();
        while let Some(token) = iter.next() {
            if constants::CURL_OPTION_DENYLIST.contains(&token.as_str()) {
                return Err(AppError::Usage(format!(
                    "传输选项 '{}' 与内部编排冲突，已拒绝",
                    token
                )));
            }
            match token.as_str() {
                "-k" | "--insecure" => opts.insecure = true,
                // 重定向跟随与压缩协商默认已开启
                "-L" | "--location" | "--compressed" => {}
                "--proxy" => opts.proxy = Some(expect_value(&mut iter, &token)?),
                "-H" | "--header" => {
                    let value = expect_value(&mut iter, &token)?;
                    let (name, val) = value.split_once(':').ok_or_else(|| {
                        AppError::Usage(format!("无效的请求头 '{}'，应为 'Name: Value' 形式", value))
                    })?;
                    opts.headers
                        .push((name.trim().to_string(), val.trim().to_string()));
                }
                "-u" | "--user" => {
                    let value = expect_value(&mut iter, &token)?;
                    let auth = match value.split_once(':') {
                        Some((user, pass)) => (user.to_string(), Some(pass.to_string())),
                        None => (value, None),
                    };
                    opts.basic_auth = Some(auth);
                }
                "--max-time" => {
                    opts.max_time = Some(Duration::from_secs(expect_secs(&mut iter, &token)?));
                }
                "--connect-timeout" => {
                    opts.connect_timeout =
                        Some(Duration::from_secs(expect_secs(&mut iter, &token)?));
                }
                other => {
                    return Err(AppError::Usage(format!("无法识别的传输选项 '{}'", other)));
                }
            }
        }
        Ok(opts)
    }
}

/// 简易的 shell 风格拆分，支持单双引号包裹带空格的取值。
fn tokenize(raw: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    for c in raw.chars() {
        match (c, quote) {
            (q @ ('\'' | '"'), None) => quote = Some(q),
            (c, Some(q)) if c == q => quote = None,
            (c, None) if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            (c, _) => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn expect_value(iter: &mut impl Iterator<Item = String>, flag: &str) -> AppResult<String> {
    iter.next()
        .ok_or_else(|| AppError::Usage(format!("传输选项 '{}' 缺少取值", flag)))
}

fn expect_secs(iter: &mut impl Iterator<Item = String>, flag: &str) -> AppResult<u64> {
    let value = expect_value(iter, flag)?;
    value
        .parse::<u64>()
        .map_err(|_| AppError::Usage(format!("传输选项 '{}' 的取值 '{}' 不是合法秒数", flag, value)))
}

/// 一次运行的完整配置。构建时一次性校验，之后不再变化。
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub url: Url,
    pub target: PathBuf,
    pub target_dir: PathBuf,
    pub metadata_path: PathBuf,
    pub keep: u32,
    pub cache_enabled: bool,
    pub etag_enabled: bool,
    pub remote_time_enabled: bool,
    pub force: bool,
    pub keep_working_dir: bool,
    pub user_agent: String,
    pub transfer_options: TransferOptions,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub max_retries: u32,
    pub quiet: bool,
}

impl RunConfig {
    /// 校验并构建运行配置。这是任何副作用发生之前的唯一校验入口，
    /// 这里失败时磁盘上还没有写入过任何东西。
    pub fn new(args: &Cli) -> AppResult<Self> {
        let transfer_options = match &args.curl_options {
            Some(raw) => TransferOptions::parse(raw)?,
            None => TransferOptions::default(),
        };

        if args.quiet && (args.verbose || args.debug) {
            return Err(AppError::Config(
                "--quiet 与 --verbose/--debug 互相矛盾".to_string(),
            ));
        }

        let url = Url::parse(&args.url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::Config(format!(
                "不支持的 URL 协议 '{}'，仅支持 http/https",
                url.scheme()
            )));
        }

        let file_name = args
            .output
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                AppError::Config(format!("无法从 {:?} 提取目标文件名", args.output))
            })?
            .to_string();
        let parent = match args.output.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let target_dir = dunce::canonicalize(&parent).map_err(|e| {
            AppError::Config(format!("目标目录 {:?} 不存在或无法访问: {}", parent, e))
        })?;
        let target = target_dir.join(&file_name);
        let metadata_path = cache::metadata_path_for(&target).ok_or_else(|| {
            AppError::Config(format!("无法为 {:?} 计算元数据路径", target))
        })?;

        let external = load_or_create_external_config()?;
        let network = external.network;

        Ok(Self {
            url,
            target,
            target_dir,
            metadata_path,
            keep: args.keep,
            cache_enabled: args.enable_caching,
            etag_enabled: !args.disable_etag,
            remote_time_enabled: !args.disable_remote_time,
            force: args.force,
            keep_working_dir: args.keep_working_dir,
            user_agent: args
                .user_agent
                .clone()
                .or(network.user_agent)
                .unwrap_or_else(|| constants::USER_AGENT.to_string()),
            connect_timeout: transfer_options.connect_timeout.unwrap_or(
                Duration::from_secs(
                    network
                        .connect_timeout_secs
                        .unwrap_or(constants::network::CONNECT_TIMEOUT_SECS),
                ),
            ),
            timeout: transfer_options.max_time.unwrap_or(Duration::from_secs(
                network.timeout_secs.unwrap_or(constants::network::TIMEOUT_SECS),
            )),
            max_retries: network.max_retries.unwrap_or(constants::network::MAX_RETRIES),
            transfer_options,
            quiet: args.quiet,
        })
    }
}

#[cfg(any(test, feature = "testing"))]
impl RunConfig {
    /// 测试专用的最小配置，目标目录取自传入路径。
    pub fn for_testing(target: PathBuf) -> Self {
        let target_dir = target
            .parent()
            .expect("测试目标必须带有父目录")
            .to_path_buf();
        let metadata_path = cache::metadata_path_for(&target).unwrap();
        Self {
            url: Url::parse("http://localhost/resource").unwrap(),
            target,
            target_dir,
            metadata_path,
            keep: 0,
            cache_enabled: false,
            etag_enabled: true,
            remote_time_enabled: true,
            force: false,
            keep_working_dir: false,
            user_agent: "test-agent/1.0".to_string(),
            transfer_options: TransferOptions::default(),
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(15),
            max_retries: 3,
            quiet: true,
        }
    }
}
