//! 滤镜预设目录
//!
//! 只读的静态配置：启动时从内置 TOML 解析一次，运行期间不再变更

use anyhow::{Context, Result};
use serde::Deserialize;

/// 内置预设目录数据
const BUILTIN_PRESETS: &str = include_str!("presets.toml");

/// 预设分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetCategory {
    /// 艺术创意滤镜
    Artistic,
    /// 电商场景
    Product,
}

/// 滤镜预设
///
/// `prompt` 是附加到全局指令后的风格片段，空串表示"原图"不附加任何效果
#[derive(Debug, Clone, Deserialize)]
pub struct FilterPreset {
    pub id: String,
    pub category: PresetCategory,
    pub name_en: String,
    pub name_zh: String,
    pub description_en: String,
    pub description_zh: String,
    #[serde(default)]
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    presets: Vec<FilterPreset>,
}

/// 预设目录
#[derive(Debug, Clone)]
pub struct PresetCatalog {
    presets: Vec<FilterPreset>,
}

impl PresetCatalog {
    /// 解析内置预设目录
    pub fn builtin() -> Result<Self> {
        let file: CatalogFile =
            toml::from_str(BUILTIN_PRESETS).context("无法解析内置滤镜预设目录")?;
        Ok(Self {
            presets: file.presets,
        })
    }

    /// 按 id 查找预设
    pub fn find(&self, id: &str) -> Option<&FilterPreset> {
        self.presets.iter().find(|p| p.id == id)
    }

    /// 目录中的全部预设，按定义顺序
    pub fn all(&self) -> &[FilterPreset] {
        &self.presets
    }
}
