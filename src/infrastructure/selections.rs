//! 全局选择状态 - 基础设施层
//!
//! 当前的全局指令、选中的滤镜预设与画幅比例。
//! 调用方在需要时读取一份快照，而不是持有活引用：
//! 重试用哪份指令，以"调用那一刻的选择"为准。

use parking_lot::Mutex;

use crate::models::AspectRatio;

/// 某一时刻的全局选择
#[derive(Debug, Clone)]
pub struct SelectionSnapshot {
    /// 全局编辑指令（自由文本）
    pub instruction: String,
    /// 选中的滤镜预设 id
    pub preset_id: String,
    /// 输出画幅比例
    pub aspect_ratio: AspectRatio,
}

/// 全局选择状态
pub struct Selections {
    inner: Mutex<SelectionSnapshot>,
}

impl Selections {
    pub fn new(
        instruction: impl Into<String>,
        preset_id: impl Into<String>,
        aspect_ratio: AspectRatio,
    ) -> Self {
        Self {
            inner: Mutex::new(SelectionSnapshot {
                instruction: instruction.into(),
                preset_id: preset_id.into(),
                aspect_ratio,
            }),
        }
    }

    /// 读取当前选择的快照
    pub fn current(&self) -> SelectionSnapshot {
        self.inner.lock().clone()
    }

    pub fn set_instruction(&self, instruction: impl Into<String>) {
        self.inner.lock().instruction = instruction.into();
    }

    pub fn set_preset(&self, preset_id: impl Into<String>) {
        self.inner.lock().preset_id = preset_id.into();
    }

    pub fn set_aspect_ratio(&self, aspect_ratio: AspectRatio) {
        self.inner.lock().aspect_ratio = aspect_ratio;
    }
}
