//! 采集适配器
//!
//! 把文件选择和相机快照两种来源统一成 `DocumentHandle`。
//! 只做校验和构造，不做任何网络请求。

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use phf::phf_map;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::CaptureError;
use crate::models::document::{CaptureOrigin, DocumentHandle, MediaType};

/// 允许的扩展名（小写）
static ALLOWED_EXTENSIONS: phf::Map<&'static str, MediaType> = phf_map! {
    "jpg" => MediaType::Jpeg,
    "jpeg" => MediaType::Jpeg,
    "png" => MediaType::Png,
    "pdf" => MediaType::Pdf,
};

/// 文件选择器给出的一个文件
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// 一次文件采集的结果：通过的句柄 + 逐个被拒绝的文件
#[derive(Debug, Default)]
pub struct IntakeReport {
    pub accepted: Vec<DocumentHandle>,
    pub rejected: Vec<(String, CaptureError)>,
}

impl IntakeReport {
    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty() && self.rejected.is_empty()
    }
}

/// 采集适配器
pub struct CaptureAdapter {
    max_upload_size: usize,
    camera_seq: AtomicUsize,
}

impl CaptureAdapter {
    pub fn new(max_upload_size: usize) -> Self {
        Self {
            max_upload_size,
            camera_seq: AtomicUsize::new(0),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_upload_size)
    }

    pub fn max_upload_size(&self) -> usize {
        self.max_upload_size
    }

    /// 从文件列表创建句柄
    ///
    /// 不合格的文件单独拒绝，其余文件照常通过，顺序保持不变。
    pub fn from_files(&self, files: Vec<SelectedFile>) -> IntakeReport {
        let mut report = IntakeReport::default();

        for file in files {
            match self.validate(&file) {
                Ok(media_type) => {
                    debug!("✓ 接受文件: {} ({} 字节)", file.name, file.bytes.len());
                    report.accepted.push(DocumentHandle::new(
                        file.name,
                        file.bytes,
                        CaptureOrigin::FilePicker,
                        media_type,
                    ));
                }
                Err(e) => {
                    warn!("⚠️ 拒绝文件 {}: {}", file.name, e);
                    report.rejected.push((file.name, e));
                }
            }
        }

        report
    }

    /// 从相机快照创建句柄，内容为空时返回 `CaptureError::Empty`
    pub fn from_camera_snapshot(
        &self,
        image_bytes: Vec<u8>,
    ) -> Result<DocumentHandle, CaptureError> {
        if image_bytes.is_empty() {
            return Err(CaptureError::Empty);
        }

        let seq = self.camera_seq.fetch_add(1, Ordering::Relaxed) + 1;
        let display_name = format!(
            "LJK_{:03}_{}.jpg",
            seq,
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        );
        debug!("📷 相机快照: {} ({} 字节)", display_name, image_bytes.len());

        Ok(DocumentHandle::new(
            display_name,
            image_bytes,
            CaptureOrigin::Camera,
            MediaType::Jpeg,
        ))
    }

    /// 只根据文件名和大小做校验，不需要文件内容
    ///
    /// 读取文件之前先调用，避免把超限文件整个读进内存。
    pub fn precheck(&self, file_name: &str, size: u64) -> Result<MediaType, CaptureError> {
        let media_type = media_type_of(file_name).ok_or_else(|| CaptureError::UnsupportedType {
            file_name: file_name.to_string(),
        })?;

        if size > self.max_upload_size as u64 {
            return Err(CaptureError::TooLarge {
                file_name: file_name.to_string(),
                size: usize::try_from(size).unwrap_or(usize::MAX),
                max: self.max_upload_size,
            });
        }

        Ok(media_type)
    }

    fn validate(&self, file: &SelectedFile) -> Result<MediaType, CaptureError> {
        let media_type = self.precheck(&file.name, file.bytes.len() as u64)?;

        if file.bytes.is_empty() {
            return Err(CaptureError::Empty);
        }

        Ok(media_type)
    }
}

/// 按扩展名判断文件类型（大小写不敏感）
pub fn media_type_of(file_name: &str) -> Option<MediaType> {
    let ext = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.get(ext.as_str()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_of() {
        assert_eq!(media_type_of("a.JPG"), Some(MediaType::Jpeg));
        assert_eq!(media_type_of("scan.jpeg"), Some(MediaType::Jpeg));
        assert_eq!(media_type_of("scan.png"), Some(MediaType::Png));
        assert_eq!(media_type_of("batch.pdf"), Some(MediaType::Pdf));
        assert_eq!(media_type_of("notes.txt"), None);
        assert_eq!(media_type_of("no_extension"), None);
    }

    #[test]
    fn test_from_files_rejects_individually() {
        let adapter = CaptureAdapter::new(8);
        let report = adapter.from_files(vec![
            SelectedFile::new("a.jpg", vec![1, 2, 3]),
            SelectedFile::new("b.gif", vec![1]),
            SelectedFile::new("c.png", vec![0; 9]),
            SelectedFile::new("d.png", vec![]),
            SelectedFile::new("e.pdf", vec![0; 8]),
        ]);

        let names: Vec<_> = report.accepted.iter().map(|h| h.display_name()).collect();
        assert_eq!(names, vec!["a.jpg", "e.pdf"]);
        assert!(report
            .accepted
            .iter()
            .all(|h| h.origin() == CaptureOrigin::FilePicker));

        assert_eq!(report.rejected.len(), 3);
        assert!(matches!(report.rejected[0].1, CaptureError::UnsupportedType { .. }));
        assert!(matches!(
            report.rejected[1].1,
            CaptureError::TooLarge { size: 9, max: 8, .. }
        ));
        assert_eq!(report.rejected[2].1, CaptureError::Empty);
    }

    #[test]
    fn test_camera_snapshot() {
        let adapter = CaptureAdapter::new(1024);

        let first = adapter.from_camera_snapshot(vec![0xFF, 0xD8]).unwrap();
        let second = adapter.from_camera_snapshot(vec![0xFF, 0xD8]).unwrap();

        assert!(first.display_name().starts_with("LJK_001_"));
        assert!(second.display_name().starts_with("LJK_002_"));
        assert_ne!(first.id(), second.id());
        assert_eq!(first.origin(), CaptureOrigin::Camera);
        assert_eq!(first.media_type(), MediaType::Jpeg);
    }

    #[test]
    fn test_empty_camera_snapshot() {
        let adapter = CaptureAdapter::new(1024);
        assert_eq!(adapter.from_camera_snapshot(Vec::new()), Err(CaptureError::Empty));
    }
}
