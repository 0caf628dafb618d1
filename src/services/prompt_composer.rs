//! 指令合成 - 业务能力层
//!
//! 把全局指令与预设的风格片段拼成一条有效指令。
//! 纯函数，无状态，任何时刻用当前选择调用都得到可复现的结果。

use crate::models::FilterPreset;

/// 合成有效指令
///
/// 预设缺失或片段为空时，返回去掉首尾空白的全局指令本身；
/// 否则返回 `全局指令 + 空格 + 片段` 再去掉首尾空白。
pub fn compose(global_instruction: &str, preset: Option<&FilterPreset>) -> String {
    let fragment = preset.map(|p| p.prompt.as_str()).unwrap_or("");
    format!("{global_instruction} {fragment}").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PresetCategory;

    fn preset_with_fragment(fragment: &str) -> FilterPreset {
        FilterPreset {
            id: "test".to_string(),
            category: PresetCategory::Artistic,
            name_en: "Test".to_string(),
            name_zh: "测试".to_string(),
            description_en: String::new(),
            description_zh: String::new(),
            prompt: fragment.to_string(),
        }
    }

    #[test]
    fn test_compose_appends_fragment() {
        let preset = preset_with_fragment("add soft light");
        assert_eq!(
            compose("Remove background", Some(&preset)),
            "Remove background add soft light"
        );
    }

    #[test]
    fn test_compose_empty_fragment_returns_instruction() {
        let preset = preset_with_fragment("");
        assert_eq!(
            compose("Remove background", Some(&preset)),
            "Remove background"
        );
    }

    #[test]
    fn test_compose_without_preset() {
        assert_eq!(compose("Remove background", None), "Remove background");
    }

    #[test]
    fn test_compose_trims_whitespace() {
        let preset = preset_with_fragment("add soft light");
        assert_eq!(
            compose("  Remove background ", Some(&preset)),
            "Remove background  add soft light"
        );
        assert_eq!(compose("  Remove background  ", None), "Remove background");
    }
}
