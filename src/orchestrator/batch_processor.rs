//! 批次编排器 - 编排层
//!
//! ## 职责
//!
//! 驱动冻结后的队列，逐个把答题卡提交给识别服务，并在每次状态迁移后
//! 发布批次快照供展示层读取。
//!
//! ## 核心规则
//!
//! 1. **严格串行**：同一批次同一时刻最多只有一个请求在途
//! 2. **顺序固定**：处理顺序即入队顺序，不因成功 / 失败或响应快慢调整
//! 3. **失败隔离**：单个条目失败只记录在该条目上，继续处理下一个，不重试
//! 4. **幂等**：已完成的批次再次 `run()` 不会产生任何迁移或提交
//! 5. **停止**：只在开始下一个条目之前检查停止请求，在途请求不会被中断
//!
//! `run(&mut self)` 独占编排器，运行期间其他代码只能通过快照订阅
//! 和 `StopHandle` 与之交互。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::clients::RecognitionService;
use crate::config::Config;
use crate::error::BatchError;
use crate::models::batch::{Batch, BatchPhase};
use crate::models::document::{DocumentHandle, DocumentId};
use crate::models::submission::{ItemState, SubmissionItem};
use crate::orchestrator::aggregator::BatchSummary;
use crate::orchestrator::queue::SubmissionQueue;
use crate::utils::logging;

/// 停止句柄
///
/// 可以跨任务克隆；停止请求在开始下一个条目之前生效，生效后即被消耗。
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    fn take(&self) -> bool {
        self.flag.swap(false, Ordering::SeqCst)
    }

    fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// 批次编排器
pub struct BatchOrchestrator {
    service: Arc<dyn RecognitionService>,
    queue: SubmissionQueue,
    batch: Batch,
    max_batch_size: Option<usize>,
    snapshot_tx: watch::Sender<Batch>,
    stop: StopHandle,
}

impl BatchOrchestrator {
    /// 创建编排器
    ///
    /// # 参数
    /// - `service`: 识别服务
    /// - `exam_id`: 考试ID
    /// - `max_batch_size`: 单批次上限（None 表示不限制）
    pub fn new(
        service: Arc<dyn RecognitionService>,
        exam_id: impl Into<String>,
        max_batch_size: Option<usize>,
    ) -> Self {
        let batch = Batch::new(exam_id);
        let (snapshot_tx, _) = watch::channel(batch.clone());

        Self {
            service,
            queue: SubmissionQueue::new(max_batch_size),
            batch,
            max_batch_size,
            snapshot_tx,
            stop: StopHandle::default(),
        }
    }

    /// 按配置创建编排器
    pub fn from_config(service: Arc<dyn RecognitionService>, config: &Config) -> Self {
        Self::new(service, config.exam_id.clone(), config.batch_cap())
    }

    // ========== 队列编辑（批次开始前） ==========

    /// 追加文档
    pub fn enqueue(&mut self, handles: Vec<DocumentHandle>) -> Result<(), BatchError> {
        self.queue.append(handles)?;
        Ok(())
    }

    /// 丢弃一个尚未提交的文档
    pub fn discard(&mut self, id: DocumentId) -> Result<DocumentHandle, BatchError> {
        Ok(self.queue.remove(id)?)
    }

    /// 清空队列
    pub fn clear_queue(&mut self) -> Result<(), BatchError> {
        self.queue.clear()?;
        Ok(())
    }

    /// 当前排队中的文档
    pub fn queued(&self) -> &SubmissionQueue {
        &self.queue
    }

    // ========== 展示层接口 ==========

    /// 开始批次：追加文档、冻结队列、为每个文档创建 Pending 条目
    pub fn start_batch(&mut self, handles: Vec<DocumentHandle>) -> Result<(), BatchError> {
        if self.queue.is_frozen() {
            return Err(BatchError::AlreadyStarted);
        }
        self.queue.append(handles)?;

        self.batch.items = self
            .queue
            .freeze()
            .into_iter()
            .map(SubmissionItem::new)
            .collect();
        self.batch.phase = BatchPhase::Collecting;
        self.batch.started_at = Some(chrono::Local::now());
        self.batch.finished_at = None;

        info!(
            "📦 批次已创建: 考试 {}, 共 {} 张答题卡",
            self.batch.exam_id,
            self.batch.len()
        );
        self.publish();
        Ok(())
    }

    /// 当前批次快照
    pub fn current_snapshot(&self) -> Batch {
        self.batch.clone()
    }

    /// 订阅批次快照（每次状态迁移后更新）
    pub fn subscribe(&self) -> watch::Receiver<Batch> {
        self.snapshot_tx.subscribe()
    }

    /// 当前统计
    pub fn summary(&self) -> BatchSummary {
        BatchSummary::from_batch(&self.batch)
    }

    /// 停止句柄
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// 重置：丢弃批次和队列中的所有文档，回到空队列
    pub fn reset_batch(&mut self) {
        let exam_id = self.batch.exam_id.clone();
        let dropped = self.batch.len() + self.queue.len();

        self.queue = SubmissionQueue::new(self.max_batch_size);
        self.batch = Batch::new(exam_id);
        self.stop.reset();

        debug!("♻️ 批次已重置，释放 {} 个文档", dropped);
        self.publish();
    }

    // ========== 运行 ==========

    /// 运行批次
    ///
    /// 逐个处理 Pending 条目。已完成的批次直接返回统计（不做任何事）；
    /// 停止后的批次再次运行时只处理剩余的 Pending 条目。
    ///
    /// # 返回
    /// 返回本次运行结束时的统计
    pub async fn run(&mut self) -> Result<BatchSummary, BatchError> {
        if !self.queue.is_frozen() {
            return Err(BatchError::NotStarted);
        }

        if self.batch.is_complete() {
            info!("ℹ️ 批次已完成，忽略重复运行");
            return Ok(self.summary());
        }

        let total = self.batch.len();
        logging::log_batch_start(&self.batch.exam_id, self.batch.pending_count(), total);

        self.batch.phase = BatchPhase::Running;
        self.publish();

        for index in 0..total {
            if !matches!(self.batch.items[index].state(), ItemState::Pending) {
                continue;
            }

            if self.stop.take() {
                warn!(
                    "⏸️ 收到停止请求，剩余 {} 张答题卡保持等待",
                    self.batch.pending_count()
                );
                break;
            }

            self.process_item(index).await;
        }

        self.batch.phase = BatchPhase::Halted;
        if self.batch.is_complete() {
            self.batch.finished_at = Some(chrono::Local::now());
        }
        self.publish();

        Ok(self.summary())
    }

    /// 处理单个条目：Pending -> Processing -> Succeeded / Failed
    async fn process_item(&mut self, index: usize) {
        let total = self.batch.len();

        if let Err(e) = self.batch.items[index].begin_processing() {
            error!("[答题卡 {}/{}] {}", index + 1, total, e);
            return;
        }
        logging::log_item_start(index + 1, total, self.batch.items[index].display_name());
        self.publish();

        let result = {
            let handle = self.batch.items[index].handle();
            self.service.submit_handle(&self.batch.exam_id, handle).await
        };

        let item = &mut self.batch.items[index];
        let transition = match result {
            Ok(outcome) => item.succeed(outcome),
            Err(e) => item.fail(e.reason),
        };
        if let Err(e) = transition {
            error!("[答题卡 {}/{}] {}", index + 1, total, e);
        }

        logging::log_item_result(index + 1, total, &self.batch.items[index]);
        self.publish();
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(self.batch.clone());
    }
}
