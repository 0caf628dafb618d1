//! 编辑调用器 - 流程层
//!
//! 对单个工作项执行恰好一次处理尝试：
//! 读原图字节 → 识别格式 → 调用外部编辑能力 → 结果落盘并换回新的结果引用。
//!
//! 所有失败路径都折叠为 [`EditError`]；
//! 调用器不碰工作项仓库，状态写回是编排层的事。

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::error::EditError;
use crate::models::{result_file_name, AspectRatio, ResultRef, WorkItem};
use crate::services::{EditRequest, ImageEditCapability};
use crate::utils::mime;

/// 编辑调用器
pub struct EditInvoker {
    capability: Arc<dyn ImageEditCapability>,
    results_dir: PathBuf,
}

impl EditInvoker {
    pub fn new(capability: Arc<dyn ImageEditCapability>, results_dir: impl Into<PathBuf>) -> Self {
        Self {
            capability,
            results_dir: results_dir.into(),
        }
    }

    /// 对一个工作项执行一次编辑尝试
    ///
    /// 成功返回新的结果引用；结果文件名由工作项 id 和返回的内容类型确定，
    /// 与导出条目的命名保持一致
    pub async fn invoke(
        &self,
        item: &WorkItem,
        instruction: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<ResultRef, EditError> {
        let original_path = item.original().path();

        let bytes = tokio::fs::read(original_path)
            .await
            .map_err(|e| EditError::OriginalUnreadable {
                path: original_path.display().to_string(),
                source: e,
            })?;

        let original_mime =
            mime::sniff(&bytes).ok_or_else(|| EditError::UnrecognizedFormat {
                path: original_path.display().to_string(),
            })?;

        debug!(
            "[图片 {}] 原图 {} 字节 ({}), 画幅 {}",
            item.id().short(),
            bytes.len(),
            original_mime,
            aspect_ratio
        );

        let edited = self
            .capability
            .edit(EditRequest {
                bytes,
                mime: original_mime.to_string(),
                instruction: instruction.to_string(),
                aspect_ratio,
            })
            .await?;

        tokio::fs::create_dir_all(&self.results_dir)
            .await
            .map_err(|e| EditError::PersistFailed {
                path: self.results_dir.display().to_string(),
                source: e,
            })?;

        let target = self
            .results_dir
            .join(result_file_name(item.id(), &edited.mime));
        tokio::fs::write(&target, &edited.bytes)
            .await
            .map_err(|e| EditError::PersistFailed {
                path: target.display().to_string(),
                source: e,
            })?;

        Ok(ResultRef::new(target, edited.mime))
    }
}
