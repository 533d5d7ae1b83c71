//! 命令行外壳
//!
//! 扫描本地文件夹 → 校验 → 开始批次 → 逐个提交 → 输出统计

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::capture::{self, CaptureAdapter};
use crate::clients::HttpRecognitionClient;
use crate::config::Config;
use crate::orchestrator::{BatchOrchestrator, BatchSummary};
use crate::utils::logging;

/// 应用主结构
pub struct App {
    config: Config,
    adapter: CaptureAdapter,
    orchestrator: BatchOrchestrator,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        if config.exam_id.trim().is_empty() {
            anyhow::bail!("未设置考试ID，请设置 LJK_EXAM_ID 或在配置文件中填写 exam_id");
        }

        // 初始化日志文件
        logging::init_log_file(&config.output_log_file)?;

        logging::log_startup(&config);

        let client = HttpRecognitionClient::new(&config).context("无法创建识别服务客户端")?;
        let orchestrator = BatchOrchestrator::from_config(Arc::new(client), &config);

        Ok(Self {
            adapter: CaptureAdapter::from_config(&config),
            orchestrator,
            config,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&mut self) -> Result<BatchSummary> {
        info!("\n📁 正在扫描待提交的答题卡...");
        let report =
            capture::load_folder(Path::new(&self.config.input_folder), &self.adapter).await?;
        logging::log_intake(&report);

        if report.is_empty() {
            warn!("⚠️ 文件夹 {} 中没有任何文件，程序结束", self.config.input_folder);
            return Ok(self.orchestrator.summary());
        }
        if report.accepted.is_empty() {
            warn!("⚠️ 没有找到可提交的答题卡，程序结束");
            return Ok(self.orchestrator.summary());
        }

        self.orchestrator.start_batch(report.accepted)?;

        // 单个答题卡失败不会中断批次
        let summary = self.orchestrator.run().await?;

        logging::append_batch_report(
            &self.config.output_log_file,
            &self.orchestrator.current_snapshot(),
        )?;
        logging::print_final_stats(&summary, &self.config.output_log_file);

        Ok(summary)
    }
}
