//! 条目状态机
//!
//! ```text
//! Pending ──▶ Processing ──▶ Succeeded
//!                      └───▶ Failed
//! ```
//!
//! `Succeeded` / `Failed` 为终态，同一次批次运行内不再迁移。
//! 识别结果和失败原因放在对应的终态里，不会同时存在。

use crate::error::TransitionError;
use crate::models::document::{DocumentHandle, DocumentId};
use crate::models::outcome::RecognitionOutcome;

/// 外部服务没有给出原因时使用的默认失败信息
pub const DEFAULT_FAILURE_REASON: &str = "答题卡处理失败";

/// 条目状态
#[derive(Debug, Clone, PartialEq)]
pub enum ItemState {
    /// 等待处理
    Pending,
    /// 正在提交
    Processing,
    /// 识别成功
    Succeeded(RecognitionOutcome),
    /// 识别失败
    Failed { reason: String },
}

/// 不带数据的状态标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemStateKind {
    Pending,
    Processing,
    Succeeded,
    Failed,
}

impl ItemState {
    pub fn kind(&self) -> ItemStateKind {
        match self {
            ItemState::Pending => ItemStateKind::Pending,
            ItemState::Processing => ItemStateKind::Processing,
            ItemState::Succeeded(_) => ItemStateKind::Succeeded,
            ItemState::Failed { .. } => ItemStateKind::Failed,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ItemState::Succeeded(_) | ItemState::Failed { .. })
    }
}

/// 进度提示（仅用于展示，不是传输进度）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressHint {
    Idle,
    InFlight,
    Done,
}

/// 提交条目：文档句柄 + 处理状态
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionItem {
    handle: DocumentHandle,
    state: ItemState,
}

impl SubmissionItem {
    /// 新条目总是从 Pending 开始
    pub fn new(handle: DocumentHandle) -> Self {
        Self {
            handle,
            state: ItemState::Pending,
        }
    }

    pub fn id(&self) -> DocumentId {
        self.handle.id()
    }

    pub fn display_name(&self) -> &str {
        self.handle.display_name()
    }

    pub fn handle(&self) -> &DocumentHandle {
        &self.handle
    }

    pub fn state(&self) -> &ItemState {
        &self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// 仅在 Succeeded 时存在
    pub fn outcome(&self) -> Option<&RecognitionOutcome> {
        match &self.state {
            ItemState::Succeeded(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// 仅在 Failed 时存在
    pub fn failure_reason(&self) -> Option<&str> {
        match &self.state {
            ItemState::Failed { reason } => Some(reason),
            _ => None,
        }
    }

    pub fn progress_hint(&self) -> ProgressHint {
        match self.state {
            ItemState::Pending => ProgressHint::Idle,
            ItemState::Processing => ProgressHint::InFlight,
            ItemState::Succeeded(_) | ItemState::Failed { .. } => ProgressHint::Done,
        }
    }

    /// Pending -> Processing
    pub fn begin_processing(&mut self) -> Result<(), TransitionError> {
        self.ensure(ItemStateKind::Pending, ItemStateKind::Processing)?;
        self.state = ItemState::Processing;
        Ok(())
    }

    /// Processing -> Succeeded
    pub fn succeed(&mut self, outcome: RecognitionOutcome) -> Result<(), TransitionError> {
        self.ensure(ItemStateKind::Processing, ItemStateKind::Succeeded)?;
        self.state = ItemState::Succeeded(outcome);
        Ok(())
    }

    /// Processing -> Failed，原因为空时使用默认信息
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), TransitionError> {
        self.ensure(ItemStateKind::Processing, ItemStateKind::Failed)?;
        let reason = reason.into();
        let reason = if reason.trim().is_empty() {
            DEFAULT_FAILURE_REASON.to_string()
        } else {
            reason
        };
        self.state = ItemState::Failed { reason };
        Ok(())
    }

    fn ensure(&self, expected: ItemStateKind, to: ItemStateKind) -> Result<(), TransitionError> {
        let from = self.state.kind();
        if from == expected {
            Ok(())
        } else {
            Err(TransitionError { from, to })
        }
    }
}
