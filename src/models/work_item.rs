//! 工作项模型
//!
//! 一个工作项对应一张上传的图片及其完整的处理生命周期：
//! `idle → processing → completed | error`，失败后可重试回到 `processing`。
//!
//! 结果引用与错误信息直接编码在状态枚举里，
//! "有结果当且仅当已完成、有错误信息当且仅当失败"由类型保证。

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::utils::mime;

/// 工作项的唯一标识
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemId(Uuid);

impl ItemId {
    /// 生成新的随机标识
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// 取前 8 位用于日志显示
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 原图引用
///
/// 指向调用方提供的原图文件。句柄由工作项独占，
/// 随工作项一起销毁；底层文件归调用方所有，从不删除。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalRef {
    path: PathBuf,
}

impl OriginalRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// 结果引用
///
/// 指向本应用写出的结果文件，随引用的释放一起删除
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRef {
    path: PathBuf,
    mime: String,
}

impl ResultRef {
    pub fn new(path: impl Into<PathBuf>, mime: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            mime: mime.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 结果字节流声明的内容类型
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// 释放结果引用，删除对应的结果文件
    pub async fn release(self) {
        match tokio::fs::remove_file(&self.path).await {
            Ok(_) => debug!("已释放结果文件: {}", self.path.display()),
            Err(e) => warn!("⚠️ 释放结果文件失败 ({}): {}", self.path.display(), e),
        }
    }
}

/// 由工作项标识和结果内容类型确定的结果文件名
///
/// 同一工作项重复导出会得到同名条目
pub fn result_file_name(id: &ItemId, mime: &str) -> String {
    format!("edited-{}.{}", id, mime::extension_for(mime))
}

/// 工作项状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemStatus {
    /// 等待处理
    Idle,
    /// 处理中（瞬态，最终回到 completed 或 error）
    Processing,
    /// 处理完成，持有结果引用
    Completed(ResultRef),
    /// 处理失败，持有展示用的错误信息
    Error(String),
}

impl ItemStatus {
    pub fn name(&self) -> &'static str {
        match self {
            ItemStatus::Idle => "idle",
            ItemStatus::Processing => "processing",
            ItemStatus::Completed(_) => "completed",
            ItemStatus::Error(_) => "error",
        }
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 对单个工作项的一次状态变更
#[derive(Debug, Clone)]
pub enum ItemPatch {
    /// 进入处理中：记录本次使用的指令，清除旧错误；旧结果被替换
    Processing { instruction: String },
    /// 处理成功：写入新的结果引用
    Completed { result: ResultRef },
    /// 处理失败：写入展示用的错误信息
    Failed { message: String },
}

/// 工作项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub(crate) id: ItemId,
    pub(crate) original: OriginalRef,
    pub(crate) instruction: String,
    pub(crate) status: ItemStatus,
}

impl WorkItem {
    /// 创建新的工作项，初始状态为等待处理
    pub fn new(original: OriginalRef, instruction: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            original,
            instruction: instruction.into(),
            status: ItemStatus::Idle,
        }
    }

    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn original(&self) -> &OriginalRef {
        &self.original
    }

    /// 最近一次（或进行中的）处理尝试所用的有效指令
    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn status(&self) -> &ItemStatus {
        &self.status
    }

    /// 是否可以参加批量处理（等待中或失败的工作项）
    pub fn is_eligible(&self) -> bool {
        matches!(self.status, ItemStatus::Idle | ItemStatus::Error(_))
    }

    /// 结果引用，仅在已完成时存在
    pub fn result_ref(&self) -> Option<&ResultRef> {
        match &self.status {
            ItemStatus::Completed(result) => Some(result),
            _ => None,
        }
    }

    /// 错误信息，仅在失败时存在
    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            ItemStatus::Error(message) => Some(message),
            _ => None,
        }
    }

    /// 释放工作项持有的资源
    ///
    /// 结果文件被删除；原图句柄随之丢弃（底层文件不动）
    pub async fn release(self) {
        if let ItemStatus::Completed(result) = self.status {
            result.release().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item_is_idle() {
        let item = WorkItem::new(OriginalRef::new("/tmp/a.png"), "去掉背景");
        assert_eq!(item.status(), &ItemStatus::Idle);
        assert!(item.is_eligible());
        assert!(item.result_ref().is_none());
        assert!(item.error_message().is_none());
    }

    #[test]
    fn test_status_payload_accessors() {
        let mut item = WorkItem::new(OriginalRef::new("/tmp/a.png"), "去掉背景");

        item.status = ItemStatus::Error("网络超时".to_string());
        assert_eq!(item.error_message(), Some("网络超时"));
        assert!(item.result_ref().is_none());
        assert!(item.is_eligible());

        item.status = ItemStatus::Completed(ResultRef::new("/tmp/out.png", "image/png"));
        assert!(item.error_message().is_none());
        assert_eq!(item.result_ref().map(|r| r.mime()), Some("image/png"));
        assert!(!item.is_eligible());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = WorkItem::new(OriginalRef::new("/tmp/a.png"), "");
        let b = WorkItem::new(OriginalRef::new("/tmp/b.png"), "");
        assert_ne!(a.id(), b.id());
        assert_eq!(a.id().short().len(), 8);
    }

    #[test]
    fn test_result_file_name_is_deterministic() {
        let id = ItemId::new();
        let name = result_file_name(&id, "image/jpeg");
        assert_eq!(name, format!("edited-{}.jpg", id));
        assert_eq!(name, result_file_name(&id, "image/jpeg"));
    }
}
