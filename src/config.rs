use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConfigError;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "ljk_submit.toml";

/// 程序配置文件
///
/// 优先级：环境变量 > TOML 配置文件 > 默认值
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 识别服务地址
    pub api_base_url: String,
    /// 考试ID（答题卡提交到哪场考试）
    pub exam_id: String,
    /// 待提交答题卡所在目录
    pub input_folder: String,
    /// 单个文件大小上限（字节）
    pub max_upload_size: usize,
    /// 单批次文件数量上限，0 表示不限制
    pub max_batch_size: usize,
    /// 单次识别请求超时（秒）
    pub request_timeout_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            exam_id: String::new(),
            input_folder: "ljk_input".to_string(),
            max_upload_size: 10 * 1024 * 1024,
            max_batch_size: 50,
            request_timeout_secs: 120,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    /// 加载配置：存在配置文件时先读文件，再用环境变量覆盖
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let base = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        base.with_overrides(|name| std::env::var(name).ok())
    }

    /// 只从环境变量读取
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|name| std::env::var(name).ok())
    }

    /// 从 TOML 文件读取，缺失的字段使用默认值
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    /// 用外部变量覆盖配置
    pub fn with_overrides<F>(self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            api_base_url: lookup("LJK_API_BASE_URL").unwrap_or(self.api_base_url),
            exam_id: lookup("LJK_EXAM_ID").unwrap_or(self.exam_id),
            input_folder: lookup("LJK_INPUT_FOLDER").unwrap_or(self.input_folder),
            max_upload_size: parse_var(&lookup, "LJK_MAX_UPLOAD_SIZE", "usize")?
                .unwrap_or(self.max_upload_size),
            max_batch_size: parse_var(&lookup, "LJK_MAX_BATCH_SIZE", "usize")?
                .unwrap_or(self.max_batch_size),
            request_timeout_secs: parse_var(&lookup, "LJK_REQUEST_TIMEOUT_SECS", "u64")?
                .unwrap_or(self.request_timeout_secs),
            verbose_logging: parse_var(&lookup, "VERBOSE_LOGGING", "bool")?
                .unwrap_or(self.verbose_logging),
            output_log_file: lookup("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
        })
    }

    /// 批次上限（None 表示不限制）
    pub fn batch_cap(&self) -> Option<usize> {
        (self.max_batch_size > 0).then_some(self.max_batch_size)
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, expected_type: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::env_parse_failed(name, raw, expected_type)),
    }
}
