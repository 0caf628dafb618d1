//! # Batch Image Edit
//!
//! 一个用于批量 AI 图片编辑的 Rust 应用程序：
//! 上传多张图片，用一条文本指令（可叠加风格预设和画幅比例）
//! 逐张调用外部编辑服务，失败可单独重试，结果可一键打包导出。
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有可变共享状态，只暴露受控的变更能力
//! - `ItemStore` - 唯一的工作项集合，单一写入方，快照式读取
//! - `Selections` - 当前全局指令 / 预设 / 画幅比例
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个输入
//! - `EditService` - 调用外部图片编辑能力（Gemini）
//! - `prompt_composer` - 全局指令与预设片段的合成（纯函数）
//! - `ExportService` - 把全部已完成的结果打包成 ZIP
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一张图片"的一次完整处理尝试
//! - `EditInvoker` - 读原图 → 调用能力 → 结果落盘
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 状态机驱动、串行批量调度、失败隔离
//! - `app` - 应用生命周期（登记图片 → 批量处理 → 导出 → 统计）

pub mod app;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use config::Config;
pub use error::{EditError, ExportError, FetchFailure};
pub use infrastructure::{ItemStore, SelectionSnapshot, Selections};
pub use models::{
    AspectRatio, FilterPreset, ItemId, ItemPatch, ItemStatus, OriginalRef, PresetCatalog,
    PresetCategory, ResultRef, WorkItem,
};
pub use orchestrator::{BatchOrchestrator, ProcessOutcome, SweepStats};
pub use services::{
    compose, Bundle, EditRequest, EditService, EditedImage, ExportService, ImageEditCapability,
};
pub use workflow::EditInvoker;
