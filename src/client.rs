// src/client.rs

use crate::{cache::ConditionalHeaders, config::RunConfig, error::*};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{ETAG, HeaderMap, HeaderName, HeaderValue, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use std::{
    fs::File,
    io::Write as IoWrite,
    path::{Path, PathBuf},
    sync::Arc,
};
use url::Url;

/// 单次抓取的结果。状态码以原始字符串捕获，与响应体严格分离，
/// 如何解读交给编排器。
#[derive(Debug)]
pub struct TransferOutcome {
    pub status_capture: String,
    pub body_path: PathBuf,
    pub headers_path: PathBuf,
    pub etag: Option<String>,
    pub last_modified: Option<String>,
}

/// 传输客户端接口。编排器只依赖这个接口，测试中可以替换为桩实现。
#[async_trait]
pub trait TransferClient: Send + Sync {
    async fn fetch(
        &self,
        url: &Url,
        conditional: &ConditionalHeaders,
        body_path: &Path,
        headers_path: &Path,
    ) -> AppResult<TransferOutcome>;
}

#[derive(Clone)]
pub struct RobustClient {
    pub client: ClientWithMiddleware,
    config: Arc<RunConfig>,
}

impl RobustClient {
    pub fn new(config: Arc<RunConfig>) -> AppResult<Self> {
        let retry_policy =
            ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .gzip(true)
            .redirect(reqwest::redirect::Policy::limited(10));
        if config.transfer_options.insecure {
            builder = builder.danger_accept_invalid_certs(true);
        }
        if let Some(proxy) = &config.transfer_options.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }
        let client = ClientBuilder::new(builder.build()?)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self { client, config })
    }

    fn extra_headers(&self) -> AppResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.config.transfer_options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| AppError::Usage(format!("无效的请求头名称 '{}'", name)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| AppError::Usage(format!("请求头 '{}' 的取值不合法", name)))?;
            headers.append(name, value);
        }
        Ok(headers)
    }
}

#[async_trait]
impl TransferClient for RobustClient {
    /// 执行一次（可能是条件式的）抓取：响应体流式写入 body_path，
    /// 状态行与响应头以 curl -D 的方式留存到 headers_path。
    async fn fetch(
        &self,
        url: &Url,
        conditional: &ConditionalHeaders,
        body_path: &Path,
        headers_path: &Path,
    ) -> AppResult<TransferOutcome> {
        let mut headers = self.extra_headers()?;
        if let Some(etag) = &conditional.if_none_match {
            if let Ok(value) = HeaderValue::from_str(etag) {
                headers.insert(IF_NONE_MATCH, value);
            }
        }
        if let Some(date) = &conditional.if_modified_since {
            if let Ok(value) = HeaderValue::from_str(date) {
                headers.insert(IF_MODIFIED_SINCE, value);
            }
        }

        let mut request = self.client.get(url.clone()).headers(headers);
        if let Some((user, pass)) = &self.config.transfer_options.basic_auth {
            request = request.basic_auth(user, pass.as_deref());
        }

        // 传输层失败（含重试预算用尽）在这里直接向上冒泡
        let response = request.send().await?;

        let status = response.status();
        let status_capture = status.as_str().to_string();

        let mut capture = File::create(headers_path)?;
        writeln!(
            capture,
            "{:?} {} {}",
            response.version(),
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        )?;
        for (name, value) in response.headers() {
            writeln!(capture, "{}: {}", name, String::from_utf8_lossy(value.as_bytes()))?;
        }

        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let last_modified = response
            .headers()
            .get(LAST_MODIFIED)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        // 响应体与状态严格分离地落盘；304 没有响应体，得到的是空文件
        let mut body_file = File::create(body_path)?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            body_file.write_all(&chunk?)?;
        }

        Ok(TransferOutcome {
            status_capture,
            body_path: body_path.to_path_buf(),
            headers_path: headers_path.to_path_buf(),
            etag,
            last_modified,
        })
    }
}
