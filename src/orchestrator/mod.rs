//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量调度和状态机驱动，是整个系统的"指挥中心"。
//!
//! ## 层次关系
//!
//! ```text
//! app::App (应用生命周期：登记图片 → 批量处理 → 导出)
//!     ↓
//! orchestrator::BatchOrchestrator (驱动 Vec<WorkItem> 的状态机)
//!     ↓
//! workflow::EditInvoker (单张图片的一次完整尝试)
//!     ↓
//! services (能力层：compose / edit / export)
//!     ↓
//! infrastructure (基础设施：ItemStore / Selections)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一写入方**：只有编排层向仓库写状态
//! 2. **串行外呼**：同一时刻至多一个外部编辑调用在途
//! 3. **失败隔离**：单张失败不中断整轮处理
//! 4. **无业务逻辑**：只做调度和统计，具体编辑交给下层

pub mod batch_processor;

pub use batch_processor::{BatchOrchestrator, ProcessOutcome, SweepStats};
