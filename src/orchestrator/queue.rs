//! 提交队列
//!
//! 保存尚未开始处理的文档句柄。追加顺序即处理顺序。
//! 批次开始后队列被冻结，只能按顺序读取。

use crate::error::QueueError;
use crate::models::document::{DocumentHandle, DocumentId};

#[derive(Debug, Default)]
pub struct SubmissionQueue {
    handles: Vec<DocumentHandle>,
    frozen: bool,
    max_len: Option<usize>,
}

impl SubmissionQueue {
    pub fn new(max_len: Option<usize>) -> Self {
        Self {
            handles: Vec::new(),
            frozen: false,
            max_len,
        }
    }

    /// 追加句柄；超过上限时整批拒绝，队列保持不变
    pub fn append(&mut self, handles: Vec<DocumentHandle>) -> Result<(), QueueError> {
        self.ensure_mutable()?;

        if let Some(max) = self.max_len {
            if self.handles.len() + handles.len() > max {
                return Err(QueueError::CapacityExceeded {
                    current: self.handles.len(),
                    incoming: handles.len(),
                    max,
                });
            }
        }

        self.handles.extend(handles);
        Ok(())
    }

    /// 移除一个句柄（提交前丢弃）
    pub fn remove(&mut self, id: DocumentId) -> Result<DocumentHandle, QueueError> {
        self.ensure_mutable()?;

        let position = self
            .handles
            .iter()
            .position(|handle| handle.id() == id)
            .ok_or(QueueError::NotFound(id))?;
        Ok(self.handles.remove(position))
    }

    pub fn clear(&mut self) -> Result<(), QueueError> {
        self.ensure_mutable()?;
        self.handles.clear();
        Ok(())
    }

    /// 冻结队列并交出句柄（按追加顺序）
    pub(crate) fn freeze(&mut self) -> Vec<DocumentHandle> {
        self.frozen = true;
        std::mem::take(&mut self.handles)
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocumentHandle> {
        self.handles.iter()
    }

    fn ensure_mutable(&self) -> Result<(), QueueError> {
        if self.frozen {
            Err(QueueError::Frozen)
        } else {
            Ok(())
        }
    }
}
