use thiserror::Error;

use crate::models::document::DocumentId;
use crate::models::submission::ItemStateKind;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 采集（入队前校验）错误
    #[error("采集错误: {0}")]
    Capture(#[from] CaptureError),
    /// 队列操作错误
    #[error("队列错误: {0}")]
    Queue(#[from] QueueError),
    /// 批次编排错误
    #[error("批次错误: {0}")]
    Batch(#[from] BatchError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件操作错误
    #[error("文件错误 ({path}): {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
}

/// 采集被拒绝（类型、大小、空内容）
///
/// 只在入队前同步返回给调用方，不会产生任何队列状态。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// 文件类型不在允许列表中
    #[error("不支持的文件类型: {file_name}")]
    UnsupportedType { file_name: String },
    /// 文件超过大小上限
    #[error("文件过大: {file_name} ({size} 字节, 上限 {max} 字节)")]
    TooLarge {
        file_name: String,
        size: usize,
        max: usize,
    },
    /// 内容为空（包括相机快照）
    #[error("采集内容为空")]
    Empty,
}

/// 识别服务错误
///
/// 外部服务返回的任何失败都会在边界处规整成一个字符串原因，
/// 只记录在对应的条目上，不会向批次传播。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct RecognitionError {
    pub reason: String,
}

impl RecognitionError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// 队列操作错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// 批次已开始，队列已冻结
    #[error("批次已开始，队列已冻结")]
    Frozen,
    /// 队列中不存在该文档
    #[error("队列中不存在文档: {0}")]
    NotFound(DocumentId),
    /// 超过单批次数量上限
    #[error("超过单批次上限: 当前 {current}, 新增 {incoming}, 上限 {max}")]
    CapacityExceeded {
        current: usize,
        incoming: usize,
        max: usize,
    },
}

/// 条目状态机的非法迁移
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("非法状态迁移: {from:?} -> {to:?}")]
pub struct TransitionError {
    pub from: ItemStateKind,
    pub to: ItemStateKind,
}

/// 批次编排错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    /// 批次已经开始
    #[error("批次已经开始，请先重置")]
    AlreadyStarted,
    /// 批次尚未开始
    #[error("批次尚未开始")]
    NotStarted,
    #[error(transparent)]
    Queue(#[from] QueueError),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置文件读取失败
    #[error("无法读取配置文件 {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件解析失败
    #[error("配置文件解析失败 {path}: {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File {
            path: path.into(),
            source,
        }
    }
}

impl ConfigError {
    /// 创建环境变量解析错误
    pub fn env_parse_failed(
        var_name: impl Into<String>,
        value: impl Into<String>,
        expected_type: impl Into<String>,
    ) -> Self {
        ConfigError::EnvVarParseFailed {
            var_name: var_name.into(),
            value: value.into(),
            expected_type: expected_type.into(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
