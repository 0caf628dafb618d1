//! 工作项仓库 - 基础设施层
//!
//! 持有唯一的可变共享状态（按加入顺序排列的工作项集合），
//! 只暴露受控的变更能力。
//!
//! - 所有变更经由同一把互斥锁串行化，不会出现丢失更新
//! - 并发读取方只能通过 [`snapshot`](ItemStore::snapshot) 拿到只读副本，
//!   不会在迭代时与增删操作互相踩踏
//! - 不认识编辑服务，不处理业务流程

use parking_lot::Mutex;

use crate::models::{ItemId, ItemPatch, ItemStatus, ResultRef, WorkItem};

/// 工作项仓库
pub struct ItemStore {
    items: Mutex<Vec<WorkItem>>,
}

impl ItemStore {
    /// 创建空仓库
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }

    /// 追加一批工作项，保持加入顺序
    pub fn add(&self, items: Vec<WorkItem>) {
        self.items.lock().extend(items);
    }

    /// 对指定工作项应用一次状态变更
    ///
    /// 按 id 查找，找不到时静默忽略（调用方自行确认存在性）。
    /// 返回被替换下来的旧结果引用，由调用方负责释放。
    pub fn update(&self, id: &ItemId, patch: ItemPatch) -> Option<ResultRef> {
        let mut items = self.items.lock();
        let item = items.iter_mut().find(|item| item.id == *id)?;

        match patch {
            ItemPatch::Processing { instruction } => {
                let previous = std::mem::replace(&mut item.status, ItemStatus::Processing);
                item.instruction = instruction;
                match previous {
                    ItemStatus::Completed(result) => Some(result),
                    _ => None,
                }
            }
            ItemPatch::Completed { result } => {
                item.status = ItemStatus::Completed(result);
                None
            }
            ItemPatch::Failed { message } => {
                item.status = ItemStatus::Error(message);
                None
            }
        }
    }

    /// 移除指定工作项并交还给调用方
    ///
    /// 调用方负责释放其持有的资源；该 id 上仍在进行中的处理
    /// 视为已取消，其最终结果会被丢弃而不是写回
    pub fn remove(&self, id: &ItemId) -> Option<WorkItem> {
        let mut items = self.items.lock();
        let index = items.iter().position(|item| item.id == *id)?;
        Some(items.remove(index))
    }

    /// 清空仓库，交还全部工作项供调用方释放资源
    pub fn clear(&self) -> Vec<WorkItem> {
        std::mem::take(&mut *self.items.lock())
    }

    /// 当前全部工作项的只读快照，按加入顺序
    pub fn snapshot(&self) -> Vec<WorkItem> {
        self.items.lock().clone()
    }

    /// 按 id 取单个工作项的副本
    pub fn get(&self, id: &ItemId) -> Option<WorkItem> {
        self.items.lock().iter().find(|item| item.id == *id).cloned()
    }

    /// 指定 id 是否仍在仓库中
    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.lock().iter().any(|item| item.id == *id)
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// 已完成的工作项数量
    ///
    /// 进度信息每次扫描集合推导，不维护单独的计数器
    pub fn completed_count(&self) -> usize {
        self.items
            .lock()
            .iter()
            .filter(|item| item.result_ref().is_some())
            .count()
    }
}

impl Default for ItemStore {
    fn default() -> Self {
        Self::new()
    }
}
