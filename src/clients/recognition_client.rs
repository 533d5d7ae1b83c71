/// 识别服务客户端
///
/// 封装答题卡识别接口（`POST /api/process-ljk`）的调用逻辑，
/// 并在边界处把各种错误格式规整成 `RecognitionError { reason }`。
use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::{debug, warn};

use crate::capture::media_type_of;
use crate::config::Config;
use crate::error::RecognitionError;
use crate::models::document::{DocumentHandle, MediaType};
use crate::models::outcome::RecognitionOutcome;

const PROCESS_ENDPOINT: &str = "api/process-ljk";

/// 识别服务
///
/// 对核心来说是一个不透明的异步调用，只有两种结果：识别结果或错误。
#[async_trait]
pub trait RecognitionService: Send + Sync {
    async fn submit_document(
        &self,
        exam_id: &str,
        payload: &[u8],
        display_name: Option<&str>,
    ) -> Result<RecognitionOutcome, RecognitionError>;

    /// 提交一个已通过采集校验的句柄
    async fn submit_handle(
        &self,
        exam_id: &str,
        handle: &DocumentHandle,
    ) -> Result<RecognitionOutcome, RecognitionError> {
        self.submit_document(exam_id, handle.payload(), Some(handle.display_name()))
            .await
    }
}

/// 基于 HTTP 的识别服务客户端
pub struct HttpRecognitionClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpRecognitionClient {
    /// 创建新的识别服务客户端
    pub fn new(config: &Config) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/{}", self.base_url, PROCESS_ENDPOINT)
    }

    /// 构建 multipart 表单
    fn build_form(
        exam_id: &str,
        payload: &[u8],
        display_name: Option<&str>,
        media_type: MediaType,
    ) -> Result<Form, RecognitionError> {
        let file_name = display_name.unwrap_or("ljk.jpg").to_string();

        let file_part = Part::bytes(payload.to_vec())
            .file_name(file_name.clone())
            .mime_str(media_type.mime())
            .map_err(|e| RecognitionError::new(format!("无效的 MIME 类型: {}", e)))?;

        let mut form = Form::new()
            .text("exam_id", exam_id.to_string())
            .part("file", file_part);

        if display_name.is_some() {
            form = form.text("student_name", student_name_from(&file_name));
        }

        Ok(form)
    }

    /// 发送表单并解析识别结果
    async fn post_form(
        &self,
        exam_id: &str,
        payload: &[u8],
        display_name: Option<&str>,
        media_type: MediaType,
    ) -> Result<RecognitionOutcome, RecognitionError> {
        let form = Self::build_form(exam_id, payload, display_name, media_type)?;

        debug!(
            "提交答题卡: exam_id={}, 文件={:?}, {} 字节",
            exam_id,
            display_name,
            payload.len()
        );

        let response = self
            .http
            .post(self.endpoint())
            .multipart(form)
            .send()
            .await
            .map_err(transport_reason)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_reason)?;

        if !status.is_success() {
            let reason = normalize_error_body(status.as_u16(), &body);
            warn!("识别服务返回错误 ({}): {}", status, reason);
            return Err(RecognitionError::new(reason));
        }

        serde_json::from_str::<RecognitionOutcome>(&body)
            .map_err(|e| RecognitionError::new(format!("无法解析识别结果: {}", e)))
    }
}

#[async_trait]
impl RecognitionService for HttpRecognitionClient {
    async fn submit_document(
        &self,
        exam_id: &str,
        payload: &[u8],
        display_name: Option<&str>,
    ) -> Result<RecognitionOutcome, RecognitionError> {
        // 没有句柄时按文件名推断，推断不出按 JPEG 处理
        let media_type = display_name.and_then(media_type_of).unwrap_or(MediaType::Jpeg);
        self.post_form(exam_id, payload, display_name, media_type).await
    }

    async fn submit_handle(
        &self,
        exam_id: &str,
        handle: &DocumentHandle,
    ) -> Result<RecognitionOutcome, RecognitionError> {
        self.post_form(
            exam_id,
            handle.payload(),
            Some(handle.display_name()),
            handle.media_type(),
        )
        .await
    }
}

/// 从显示名推导学生姓名：去掉图片扩展名
pub fn student_name_from(display_name: &str) -> String {
    static IMAGE_EXT: OnceLock<Regex> = OnceLock::new();
    let re = IMAGE_EXT
        .get_or_init(|| Regex::new(r"(?i)\.(jpg|jpeg|png)$").expect("valid extension regex"));
    re.replace(display_name, "").into_owned()
}

/// 把传输层错误转换成失败原因
fn transport_reason(err: reqwest::Error) -> RecognitionError {
    if err.is_timeout() {
        RecognitionError::new("请求超时")
    } else if err.is_connect() {
        RecognitionError::new(format!("无法连接识别服务: {}", err))
    } else {
        RecognitionError::new(format!("请求失败: {}", err))
    }
}

/// 规整错误响应体
///
/// 支持 `{"detail": "..."}`、校验错误列表 `{"detail": [{"msg": ...}]}`、
/// `{"message": "..."}`，其余 JSON 原样输出，非 JSON 使用原始文本。
pub fn normalize_error_body(status: u16, body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return format!("HTTP {}", status);
    }

    let Ok(value) = serde_json::from_str::<Value>(trimmed) else {
        return trimmed.to_string();
    };

    let reason = match value.get("detail") {
        Some(Value::String(detail)) => detail.clone(),
        Some(Value::Array(entries)) => entries
            .iter()
            .map(|entry| match entry.get("msg").and_then(Value::as_str) {
                Some(msg) => msg.to_string(),
                None => entry.to_string(),
            })
            .collect::<Vec<_>>()
            .join("; "),
        Some(other) => other.to_string(),
        None => match value.get("message").and_then(Value::as_str) {
            Some(message) => message.to_string(),
            None => value.to_string(),
        },
    };

    if reason.trim().is_empty() {
        format!("HTTP {}", status)
    } else {
        reason
    }
}
