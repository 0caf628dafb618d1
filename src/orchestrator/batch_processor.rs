//! 批量编辑处理器 - 编排层
//!
//! ## 职责
//!
//! 驱动工作项走完处理状态机，是唯一向仓库写状态的模块。
//!
//! ## 核心功能
//!
//! 1. **单项处理**：`process_one` 对任意状态的工作项发起一次尝试
//! 2. **批量处理**：`process_all` 在固定的资格快照上严格串行地逐张处理
//! 3. **失败隔离**：单张失败只落在对应工作项上，不中断整轮处理
//! 4. **结果作废**：处理期间被移除的工作项，其迟到结果被丢弃而不是写回
//! 5. **进度统计**：已完成数量随时从仓库扫描推导
//!
//! ## 设计特点
//!
//! - **一次一张**：同一时刻只有一个外部调用在途，限制外部服务的并发压力，
//!   完成顺序等于尝试顺序
//! - **不可重入**：`process_all` 进行中再次调用会被拒绝
//! - **无自动重试**：重试永远由用户显式触发

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info, warn};

use crate::infrastructure::{ItemStore, Selections};
use crate::models::{AspectRatio, ItemId, ItemPatch, PresetCatalog};
use crate::services::compose;
use crate::utils::logging::truncate_text;
use crate::workflow::EditInvoker;

/// 单个工作项的一次处理结局
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// 处理成功
    Completed,
    /// 处理失败（失败信息已写入工作项）
    Failed,
    /// 跳过（工作项不存在或处理期间被移除）
    Skipped,
}

/// 一轮批量处理的统计
#[derive(Debug, Default, Clone, Copy)]
pub struct SweepStats {
    pub attempted: usize,
    pub completed: usize,
    pub failed: usize,
}

/// 批量编辑处理器
pub struct BatchOrchestrator {
    store: Arc<ItemStore>,
    selections: Arc<Selections>,
    presets: Arc<PresetCatalog>,
    invoker: EditInvoker,
    sweep_guard: tokio::sync::Mutex<()>,
}

impl BatchOrchestrator {
    pub fn new(
        store: Arc<ItemStore>,
        selections: Arc<Selections>,
        presets: Arc<PresetCatalog>,
        invoker: EditInvoker,
    ) -> Self {
        Self {
            store,
            selections,
            presets,
            invoker,
            sweep_guard: tokio::sync::Mutex::new(()),
        }
    }

    /// 对单个工作项发起一次处理
    ///
    /// 有效指令按调用那一刻的全局选择合成，不沿用工作项创建时的指令
    pub async fn process_one(&self, id: &ItemId) -> ProcessOutcome {
        let selection = self.selections.current();
        let instruction = compose(
            &selection.instruction,
            self.presets.find(&selection.preset_id),
        );
        self.process_item(id, &instruction, selection.aspect_ratio)
            .await
    }

    /// 批量处理当前所有等待中或失败的工作项
    ///
    /// 资格快照在开始时固定，之后加入的工作项不参与本轮；
    /// 整轮统一使用开始时的全局选择。已有一轮在进行时本次调用被拒绝。
    pub async fn process_all(&self) -> Result<SweepStats> {
        let Ok(_guard) = self.sweep_guard.try_lock() else {
            anyhow::bail!("已有批量处理正在进行，本次调用被拒绝");
        };

        let pending: Vec<ItemId> = self
            .store
            .snapshot()
            .iter()
            .filter(|item| item.is_eligible())
            .map(|item| item.id().clone())
            .collect();

        if pending.is_empty() {
            info!("没有待处理的图片");
            return Ok(SweepStats::default());
        }

        let selection = self.selections.current();
        let instruction = compose(
            &selection.instruction,
            self.presets.find(&selection.preset_id),
        );

        log_sweep_start(pending.len(), &instruction, selection.aspect_ratio);

        let mut stats = SweepStats {
            attempted: pending.len(),
            ..Default::default()
        };

        // 严格串行：等上一张落定再开始下一张
        for (index, id) in pending.iter().enumerate() {
            log_item_start(index + 1, pending.len(), id);
            match self
                .process_item(id, &instruction, selection.aspect_ratio)
                .await
            {
                ProcessOutcome::Completed => stats.completed += 1,
                ProcessOutcome::Failed => stats.failed += 1,
                ProcessOutcome::Skipped => {}
            }
        }

        log_sweep_complete(&stats);
        Ok(stats)
    }

    /// 已完成的工作项数量
    pub fn completed_count(&self) -> usize {
        self.store.completed_count()
    }

    /// 用给定指令对一个工作项执行一次尝试并写回状态
    async fn process_item(
        &self,
        id: &ItemId,
        instruction: &str,
        aspect_ratio: AspectRatio,
    ) -> ProcessOutcome {
        let Some(item) = self.store.get(id) else {
            warn!("[图片 {}] 工作项不存在，跳过处理", id.short());
            return ProcessOutcome::Skipped;
        };

        // 进入处理中：记录本次指令，清除旧错误；被替换的旧结果随即释放
        if let Some(displaced) = self.store.update(
            id,
            ItemPatch::Processing {
                instruction: instruction.to_string(),
            },
        ) {
            displaced.release().await;
        }

        let attempt = self.invoker.invoke(&item, instruction, aspect_ratio).await;

        // 处理期间被移除的工作项：迟到的结果作废，不写回任何状态
        if !self.store.contains(id) {
            warn!("[图片 {}] 工作项已被移除，丢弃本次处理结果", id.short());
            if let Ok(result) = attempt {
                result.release().await;
            }
            return ProcessOutcome::Skipped;
        }

        match attempt {
            Ok(result) => {
                self.store.update(id, ItemPatch::Completed { result });
                info!("[图片 {}] ✓ 处理完成", id.short());
                ProcessOutcome::Completed
            }
            Err(e) => {
                error!("[图片 {}] ❌ 处理失败: {}", id.short(), e);
                self.store.update(
                    id,
                    ItemPatch::Failed {
                        message: e.to_string(),
                    },
                );
                ProcessOutcome::Failed
            }
        }
    }
}

// ========== 日志辅助函数 ==========

fn log_sweep_start(total: usize, instruction: &str, aspect_ratio: AspectRatio) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始批量处理，共 {} 张图片", total);
    info!("📋 有效指令: {}", truncate_text(instruction, 80));
    info!("📐 画幅比例: {}", aspect_ratio);
    info!("{}", "=".repeat(60));
}

fn log_item_start(current: usize, total: usize, id: &ItemId) {
    info!("\n{}", "─".repeat(30));
    info!("处理第 {}/{} 张图片 [图片 {}]", current, total, id.short());
}

fn log_sweep_complete(stats: &SweepStats) {
    info!("\n{}", "─".repeat(60));
    info!(
        "✓ 本轮完成: 成功 {}/{}, 失败 {}",
        stats.completed, stats.attempted, stats.failed
    );
    info!("{}", "─".repeat(60));
}
