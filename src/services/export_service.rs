//! 批量导出服务 - 业务能力层
//!
//! 把所有已完成工作项的结果打包成一个 ZIP 归档。
//!
//! 导出是全有或全无的：先在内存里把归档完整构建出来，
//! 任何一个结果文件读取失败都让整次导出失败，磁盘上不会留下残缺的归档。

use std::io::{Cursor, Write};
use std::path::PathBuf;

use tracing::{debug, info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{ExportError, FetchFailure};
use crate::models::{result_file_name, WorkItem};

/// 一次成功导出的产物信息
#[derive(Debug, Clone)]
pub struct Bundle {
    /// 归档文件路径
    pub path: PathBuf,
    /// 归档内的条目数量
    pub entries: usize,
    /// 归档字节大小
    pub bytes: u64,
}

/// 归档内的一个条目
struct ArchiveEntry {
    name: String,
    bytes: Vec<u8>,
}

/// 批量导出服务
pub struct ExportService {
    export_dir: PathBuf,
}

impl ExportService {
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
        }
    }

    /// 导出全部已完成的工作项
    ///
    /// 没有结果的工作项被静默跳过；没有任何已完成工作项时不产出归档，
    /// 返回 `Ok(None)`
    pub async fn export_all(&self, items: &[WorkItem]) -> Result<Option<Bundle>, ExportError> {
        let completed: Vec<_> = items
            .iter()
            .filter_map(|item| item.result_ref().map(|result| (item, result)))
            .collect();

        if completed.is_empty() {
            info!("没有已完成的图片，跳过导出");
            return Ok(None);
        }

        info!("📦 正在导出 {} 张已完成的图片...", completed.len());

        // 并发读取全部结果字节；失败的全部收集进一个聚合错误
        let fetches = completed.iter().map(|(item, result)| async move {
            let name = result_file_name(item.id(), result.mime());
            match tokio::fs::read(result.path()).await {
                Ok(bytes) => Ok(ArchiveEntry { name, bytes }),
                Err(e) => Err(FetchFailure {
                    item_id: item.id().to_string(),
                    path: result.path().display().to_string(),
                    reason: e.to_string(),
                }),
            }
        });

        let mut entries = Vec::new();
        let mut failures = Vec::new();
        for fetched in futures::future::join_all(fetches).await {
            match fetched {
                Ok(entry) => entries.push(entry),
                Err(failure) => failures.push(failure),
            }
        }
        if !failures.is_empty() {
            for failure in &failures {
                warn!("⚠️ 结果读取失败: {}", failure);
            }
            return Err(ExportError::FetchFailed { failures });
        }

        let archive = build_archive(&entries)?;
        let total_bytes = archive.len() as u64;

        tokio::fs::create_dir_all(&self.export_dir)
            .await
            .map_err(|e| ExportError::WriteFailed {
                path: self.export_dir.display().to_string(),
                source: e,
            })?;

        let file_name = format!(
            "batch-export-{}.zip",
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        );
        let path = self.export_dir.join(file_name);
        tokio::fs::write(&path, archive)
            .await
            .map_err(|e| ExportError::WriteFailed {
                path: path.display().to_string(),
                source: e,
            })?;

        Ok(Some(Bundle {
            path,
            entries: entries.len(),
            bytes: total_bytes,
        }))
    }
}

/// 在内存中构建 ZIP 归档
fn build_archive(entries: &[ArchiveEntry]) -> Result<Vec<u8>, ExportError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for entry in entries {
        debug!("归档条目: {} ({} 字节)", entry.name, entry.bytes.len());
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        writer.start_file(entry.name.as_str(), options)?;
        writer
            .write_all(&entry.bytes)
            .map_err(|e| ExportError::ArchiveFailed {
                source: zip::result::ZipError::Io(e),
            })?;
    }

    let cursor = writer.finish()?;
    Ok(cursor.into_inner())
}
