// src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("参数错误: {0}")]
    Usage(String),
    #[error("配置错误: {0}")]
    Config(String),
    #[error("传输失败: {0}")]
    Transfer(String),
    #[error("网络请求失败: {0}")]
    Network(#[from] reqwest::Error),
    #[error("网络中间件错误: {0}")]
    NetworkMiddleware(#[from] reqwest_middleware::Error),
    #[error("版本轮换中止: {0}")]
    Rotation(String),
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),
    #[error("临时文件持久化失败: {0}")]
    TempFilePersist(#[from] tempfile::PersistError),
    #[error("JSON 解析错误: {0}")]
    Json(#[from] serde_json::Error),
    #[error("URL 解析错误: {0}")]
    Url(#[from] url::ParseError),
    #[error("未知错误: {0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// 错误到进程退出码的唯一映射，只在 `main` 中消费。
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Usage(_) => 64,
            AppError::Config(_) | AppError::Json(_) | AppError::Url(_) => 78,
            AppError::Transfer(_) | AppError::Network(_) | AppError::NetworkMiddleware(_) => 2,
            AppError::Rotation(_) | AppError::Io(_) | AppError::TempFilePersist(_) => 74,
            AppError::Other(_) => 1,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
