//! 采集层
//!
//! - `adapter` - 文件选择 / 相机快照 → `DocumentHandle`
//! - `loader` - 从本地文件夹批量读取（命令行使用）

pub mod adapter;
pub mod loader;

pub use adapter::{media_type_of, CaptureAdapter, IntakeReport, SelectedFile};
pub use loader::load_folder;
