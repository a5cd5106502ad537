use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppResult, ConfigError};

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- Oracle 配置 ---
    pub api_key: String,
    pub api_base_url: String,
    pub model_name: String,
    /// 每次调用成功后的固定等待（毫秒）
    pub pacing_delay_ms: u64,
    // --- 存储 ---
    /// 案例存储文件
    pub case_store_path: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 会话日志文件
    pub session_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model_name: "gemini-2.0-flash".to_string(),
            pacing_delay_ms: 1000,
            case_store_path: ".iso_case_lab/storage.json".to_string(),
            verbose_logging: false,
            session_log_file: "session.log".to_string(),
        }
    }
}

/// TOML 配置文件结构，所有字段可选
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    api_key: Option<String>,
    api_base_url: Option<String>,
    model_name: Option<String>,
    pacing_delay_ms: Option<u64>,
    case_store_path: Option<String>,
    verbose_logging: Option<bool>,
    session_log_file: Option<String>,
}

impl Config {
    /// 从环境变量读取配置，缺失的项使用默认值
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 读取 TOML 配置文件（可选），再应用环境变量覆盖
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let base = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    /// 解析 TOML 配置文件
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileUnreadable {
            path: path.display().to_string(),
            source: e,
        })?;
        let config = Self::from_toml_str(&content).map_err(|e| match e {
            ConfigError::InvalidFile { source, .. } => ConfigError::InvalidFile {
                path: path.display().to_string(),
                source,
            },
            other => other,
        })?;
        Ok(config)
    }

    fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(content).map_err(|e| ConfigError::InvalidFile {
            path: String::new(),
            source: e,
        })?;
        let default = Self::default();
        Ok(Self {
            api_key: file.api_key.unwrap_or(default.api_key),
            api_base_url: file.api_base_url.unwrap_or(default.api_base_url),
            model_name: file.model_name.unwrap_or(default.model_name),
            pacing_delay_ms: file.pacing_delay_ms.unwrap_or(default.pacing_delay_ms),
            case_store_path: file.case_store_path.unwrap_or(default.case_store_path),
            verbose_logging: file.verbose_logging.unwrap_or(default.verbose_logging),
            session_log_file: file.session_log_file.unwrap_or(default.session_log_file),
        })
    }

    fn with_env_overrides(self) -> Self {
        Self {
            api_key: std::env::var("GEMINI_API_KEY").unwrap_or(self.api_key),
            api_base_url: std::env::var("GEMINI_API_BASE_URL").unwrap_or(self.api_base_url),
            model_name: std::env::var("GEMINI_MODEL").unwrap_or(self.model_name),
            pacing_delay_ms: std::env::var("PACING_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.pacing_delay_ms),
            case_store_path: std::env::var("CASE_STORE_PATH").unwrap_or(self.case_store_path),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
            session_log_file: std::env::var("SESSION_LOG_FILE").unwrap_or(self.session_log_file),
        }
    }

    pub fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.pacing_delay_ms)
    }
}
