//! 批次快照
//!
//! 有序的提交条目加上派生计数。计数和完成状态每次都从条目状态重新计算，
//! 不单独保存。

use chrono::{DateTime, Local};

use crate::models::submission::{ItemState, SubmissionItem};

/// 批次阶段（由编排器维护）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchPhase {
    /// 收集文档中，尚未开始
    Collecting,
    /// 正在运行
    Running,
    /// 运行已结束（可能是完成，也可能是中途停止）
    Halted,
}

/// 面向展示层的批次状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    /// 没有任何条目
    Idle,
    /// 已开始但还没运行
    Ready,
    Running,
    /// 中途停止，仍有 Pending 条目
    Paused,
    /// 所有条目都已进入终态
    Complete,
}

/// 批次
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub(crate) exam_id: String,
    pub(crate) items: Vec<SubmissionItem>,
    pub(crate) phase: BatchPhase,
    pub(crate) started_at: Option<DateTime<Local>>,
    pub(crate) finished_at: Option<DateTime<Local>>,
}

impl Batch {
    pub fn new(exam_id: impl Into<String>) -> Self {
        Self {
            exam_id: exam_id.into(),
            items: Vec::new(),
            phase: BatchPhase::Collecting,
            started_at: None,
            finished_at: None,
        }
    }

    pub fn exam_id(&self) -> &str {
        &self.exam_id
    }

    pub fn items(&self) -> &[SubmissionItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn phase(&self) -> BatchPhase {
        self.phase
    }

    pub fn started_at(&self) -> Option<DateTime<Local>> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Local>> {
        self.finished_at
    }

    pub fn succeeded_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item.state(), ItemState::Succeeded(_)))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item.state(), ItemState::Failed { .. }))
            .count()
    }

    pub fn pending_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item.state(), ItemState::Pending))
            .count()
    }

    /// 所有条目都处于终态（空批次也算完成）
    pub fn is_complete(&self) -> bool {
        self.items.iter().all(SubmissionItem::is_terminal)
    }

    pub fn status(&self) -> BatchStatus {
        if self.items.is_empty() {
            return BatchStatus::Idle;
        }
        if self.is_complete() {
            return BatchStatus::Complete;
        }
        match self.phase {
            BatchPhase::Collecting => BatchStatus::Ready,
            BatchPhase::Running => BatchStatus::Running,
            BatchPhase::Halted => BatchStatus::Paused,
        }
    }
}
