//! 流程层（Workflow Layer）
//!
//! 定义"一张图片"的一次完整处理尝试，不持有共享状态，
//! 只依赖业务能力（services）。

pub mod edit_invoker;

pub use edit_invoker::EditInvoker;
