//! 文档句柄
//!
//! 一张待提交的答题卡（LJK），入队前由采集适配器创建。

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 文档ID（批次内唯一，采集时分配）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 文档来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureOrigin {
    /// 文件选择
    FilePicker,
    /// 相机快照
    Camera,
}

/// 允许提交的文件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaType {
    Jpeg,
    Png,
    /// PDF 由识别服务转换为图片
    Pdf,
}

impl MediaType {
    /// MIME 类型
    pub fn mime(self) -> &'static str {
        match self {
            MediaType::Jpeg => "image/jpeg",
            MediaType::Png => "image/png",
            MediaType::Pdf => "application/pdf",
        }
    }
}

/// 文档句柄
///
/// 在提交之前独占持有图片内容。内容只读，批次快照之间共享同一份数据。
#[derive(Clone, PartialEq, Eq)]
pub struct DocumentHandle {
    id: DocumentId,
    display_name: String,
    payload: Arc<[u8]>,
    origin: CaptureOrigin,
    media_type: MediaType,
}

impl DocumentHandle {
    pub(crate) fn new(
        display_name: impl Into<String>,
        payload: Vec<u8>,
        origin: CaptureOrigin,
        media_type: MediaType,
    ) -> Self {
        Self {
            id: DocumentId::new(),
            display_name: display_name.into(),
            payload: Arc::from(payload),
            origin,
            media_type,
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn size(&self) -> usize {
        self.payload.len()
    }

    pub fn origin(&self) -> CaptureOrigin {
        self.origin
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }
}

// 图片内容不打印到日志里
impl fmt::Debug for DocumentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentHandle")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("size", &self.payload.len())
            .field("origin", &self.origin)
            .field("media_type", &self.media_type)
            .finish()
    }
}
