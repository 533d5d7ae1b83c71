//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批次提交和状态调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `queue` - 提交队列
//! - 保存待提交的文档句柄，追加顺序即处理顺序
//! - 批次开始后冻结
//!
//! ### `batch_processor` - 批次编排器
//! - 逐个提交答题卡（严格串行）
//! - 驱动条目状态机，每次迁移后发布快照
//! - 停止 / 恢复 / 重置
//!
//! ### `aggregator` - 结果汇总
//! - 从快照派生成功 / 失败数量和完成状态
//!
//! ## 层次关系
//!
//! ```text
//! capture (SelectedFile / 相机快照 → DocumentHandle)
//!     ↓
//! orchestrator::queue (Vec<DocumentHandle>)
//!     ↓
//! orchestrator::batch_processor (Vec<SubmissionItem>)
//!     ↓
//! clients::RecognitionService (单个答题卡)
//! ```

pub mod aggregator;
pub mod batch_processor;
pub mod queue;

// 重新导出主要类型
pub use aggregator::BatchSummary;
pub use batch_processor::{BatchOrchestrator, StopHandle};
pub use queue::SubmissionQueue;
