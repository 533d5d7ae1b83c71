use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{info, warn};

use crate::capture::adapter::{CaptureAdapter, IntakeReport, SelectedFile};
use crate::error::{AppError, AppResult, CaptureError};

/// 从文件夹中读取所有文件并交给采集适配器校验
///
/// 按文件名排序，保证提交顺序稳定。子目录会被忽略。
/// 类型不支持或超过大小上限的文件根据元数据直接拒绝，不会读取内容。
pub async fn load_folder(folder_path: &Path, adapter: &CaptureAdapter) -> AppResult<IntakeReport> {
    let folder = folder_path.display().to_string();
    if !folder_path.is_dir() {
        return Err(AppError::DirectoryNotFound { path: folder });
    }

    let mut entries_found: Vec<(PathBuf, u64)> = Vec::new();
    let mut entries = fs::read_dir(folder_path)
        .await
        .map_err(|e| AppError::file_read_failed(&folder, e))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::file_read_failed(&folder, e))?
    {
        let metadata = entry
            .metadata()
            .await
            .map_err(|e| AppError::file_read_failed(entry.path().display().to_string(), e))?;
        if metadata.is_file() {
            entries_found.push((entry.path(), metadata.len()));
        }
    }
    entries_found.sort_by(|a, b| a.0.cmp(&b.0));

    let mut files = Vec::with_capacity(entries_found.len());
    let mut skipped: Vec<(String, CaptureError)> = Vec::new();
    for (path, size) in entries_found {
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        if let Err(e) = adapter.precheck(&name, size) {
            warn!("⚠️ 跳过文件 {}: {}", name, e);
            skipped.push((name, e));
            continue;
        }

        info!("正在加载: {}", name);
        let bytes = fs::read(&path)
            .await
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
        files.push(SelectedFile::new(name, bytes));
    }

    let mut report = adapter.from_files(files);
    report.rejected.extend(skipped);
    report.rejected.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(report)
}
