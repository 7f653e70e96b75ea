// src/config/file.rs

use crate::{constants, error::AppResult};
use serde::{Deserialize, Serialize};
use std::{fs, io::Write as IoWrite, path::PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    pub connect_timeout_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExternalConfig {
    #[serde(default)]
    pub network: NetworkConfig,
}

impl ExternalConfig {
    pub(crate) fn default_app_config() -> Self {
        // 为 NetworkConfig 提供一组稳健的默认值
        Self {
            network: NetworkConfig {
                connect_timeout_secs: Some(constants::network::CONNECT_TIMEOUT_SECS),
                timeout_secs: Some(constants::network::TIMEOUT_SECS),
                max_retries: Some(constants::network::MAX_RETRIES),
                user_agent: None,
            },
        }
    }
}

fn config_file_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| {
        home.join(constants::CONFIG_DIR_NAME)
            .join(constants::CONFIG_FILE_NAME)
    })
}

/// 加载外部配置文件；文件不存在时写入一份默认配置供用户修改。
/// 配置文件损坏属于配置错误，直接向上报告而不是带着猜测继续跑。
pub fn load_or_create_external_config() -> AppResult<ExternalConfig> {
    let Some(path) = config_file_path() else {
        return Ok(ExternalConfig::default_app_config());
    };
    if path.exists() {
        let content = fs::read_to_string(&path)?;
        let config: ExternalConfig = serde_json::from_str(&content)?;
        return Ok(config);
    }

    // 默认配置同样走临时文件加重命名，避免并发首跑读到写了一半的文件
    let config = ExternalConfig::default_app_config();
    if let Some(dir) = path.parent() {
        if fs::create_dir_all(dir).is_ok() {
            if let Ok(serialized) = serde_json::to_string_pretty(&config) {
                if let Ok(mut tmp) = tempfile::NamedTempFile::new_in(dir) {
                    if tmp.write_all(serialized.as_bytes()).is_ok() {
                        let _ = tmp.persist(&path);
                    }
                }
            }
        }
    }
    Ok(config)
}
