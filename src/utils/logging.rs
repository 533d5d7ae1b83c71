use anyhow::{Context, Result};
/// 日志工具模块
///
/// 提供日志初始化、格式化输出和运行记录文件的辅助函数
use std::fs::{self, OpenOptions};
use std::io::Write;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::capture::IntakeReport;
use crate::config::Config;
use crate::models::batch::Batch;
use crate::models::submission::{ItemState, SubmissionItem};
use crate::orchestrator::BatchSummary;

/// 初始化 tracing 日志
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 debug / info。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n答题卡提交日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)
        .with_context(|| format!("无法写入日志文件: {}", log_file_path))?;
    Ok(())
}

/// 把批次中每个条目的结果追加到日志文件
pub fn append_batch_report(log_file_path: &str, batch: &Batch) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .with_context(|| format!("无法打开日志文件: {}", log_file_path))?;

    for (index, item) in batch.items().iter().enumerate() {
        writeln!(file, "{:>3}. {} | {}", index + 1, item.display_name(), describe(item))?;
    }

    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 答题卡批量提交");
    info!("🌐 识别服务: {}", config.api_base_url);
    info!("📝 考试ID: {}", config.exam_id);
    match config.batch_cap() {
        Some(cap) => info!("📊 单批次上限: {}", cap),
        None => info!("📊 单批次上限: 不限制"),
    }
    info!("{}", "=".repeat(60));
}

/// 记录采集结果
pub fn log_intake(report: &IntakeReport) {
    info!("✓ 接受 {} 个文件", report.accepted.len());
    if !report.rejected.is_empty() {
        warn!("⚠️ 拒绝 {} 个文件:", report.rejected.len());
        for (name, reason) in &report.rejected {
            warn!("   - {}: {}", name, reason);
        }
    }
}

/// 记录批次开始信息
pub fn log_batch_start(exam_id: &str, pending: usize, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理批次 (考试 {})", exam_id);
    info!("📄 待处理: {} / 共 {} 张", pending, total);
    info!("{}", "=".repeat(60));
}

/// 记录单个条目开始处理
pub fn log_item_start(index: usize, total: usize, name: &str) {
    info!("[答题卡 {}/{}] 📤 正在提交: {}", index, total, name);
}

/// 记录单个条目的处理结果
pub fn log_item_result(index: usize, total: usize, item: &SubmissionItem) {
    match item.state() {
        ItemState::Succeeded(outcome) => info!(
            "[答题卡 {}/{}] ✓ 识别成功: {}",
            index,
            total,
            outcome.summary_line()
        ),
        ItemState::Failed { reason } => {
            error!("[答题卡 {}/{}] ❌ 识别失败: {}", index, total, reason)
        }
        _ => {}
    }
}

/// 打印最终统计信息
pub fn print_final_stats(summary: &BatchSummary, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 批次处理统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", summary.succeeded, summary.total);
    info!("❌ 失败: {}", summary.failed);
    if summary.pending > 0 {
        info!("⏸️ 未处理: {}", summary.pending);
    }
    if let Some(average) = summary.average_percentage {
        info!("📈 平均得分: {:.1}%", average);
    }
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

fn describe(item: &SubmissionItem) -> String {
    match item.state() {
        ItemState::Pending => "未处理".to_string(),
        ItemState::Processing => "处理中".to_string(),
        ItemState::Succeeded(outcome) => format!("成功 {}", outcome.summary_line()),
        ItemState::Failed { reason } => format!("失败 {}", truncate_text(reason, 200)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("abc", 5), "abc");
        assert_eq!(truncate_text("答题卡处理失败", 3), "答题卡...");
    }

    #[test]
    fn test_log_file_header_and_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.txt");
        let path = path.to_str().unwrap();

        init_log_file(path).unwrap();
        append_batch_report(path, &Batch::new("exam")).unwrap();

        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("答题卡提交日志"));
    }
}
