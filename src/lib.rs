//! # LJK Batch Submit
//!
//! 答题卡（LJK）批量提交客户端：把本地选择或相机拍摄的答题卡图片逐个提交给
//! 识别服务，跟踪每张答题卡的处理状态，并汇总批次结果。
//!
//! ## 架构设计
//!
//! ### ① 采集层（Capture）
//! - `capture/` - 文件选择 / 相机快照 → `DocumentHandle`，只做校验，不做网络请求
//!
//! ### ② 模型层（Models）
//! - `models/` - 文档句柄、条目状态机、批次快照、识别结果
//!
//! ### ③ 客户端层（Clients）
//! - `clients/` - `RecognitionService` 接口及 HTTP 实现，错误在此规整
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/queue` - 提交队列
//! - `orchestrator/batch_processor` - 批次编排器（严格串行、失败隔离）
//! - `orchestrator/aggregator` - 结果汇总
//!
//! ## 模块结构

pub mod app;
pub mod capture;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod utils;

// 重新导出常用类型
pub use app::App;
pub use capture::{CaptureAdapter, IntakeReport, SelectedFile};
pub use clients::{HttpRecognitionClient, RecognitionService};
pub use config::Config;
pub use error::{
    AppError, AppResult, BatchError, CaptureError, QueueError, RecognitionError, TransitionError,
};
pub use models::{Batch, BatchStatus, DocumentHandle, ItemState, RecognitionOutcome, SubmissionItem};
pub use orchestrator::{BatchOrchestrator, BatchSummary, StopHandle};
