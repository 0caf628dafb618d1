//! 应用主结构 - 应用生命周期
//!
//! ## 职责
//!
//! 1. **应用初始化**：解析预设目录、校验配置、装配各层组件
//! 2. **图片登记**：扫描输入目录，把图片登记为待处理工作项
//! 3. **批量处理**：委托 BatchOrchestrator 逐张处理
//! 4. **批量导出**：处理完成后打包 ZIP 归档
//! 5. **资源管理**：移除/清空工作项时释放其持有的结果文件
//! 6. **全局统计**：汇总并输出最终处理结果

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::infrastructure::{ItemStore, Selections};
use crate::models::{AspectRatio, ItemId, OriginalRef, PresetCatalog, WorkItem};
use crate::orchestrator::{BatchOrchestrator, SweepStats};
use crate::services::{compose, EditService, ExportService, ImageEditCapability};
use crate::utils::logging::truncate_text;
use crate::workflow::EditInvoker;

/// 应用主结构
pub struct App {
    config: Config,
    store: Arc<ItemStore>,
    selections: Arc<Selections>,
    presets: Arc<PresetCatalog>,
    orchestrator: BatchOrchestrator,
    exporter: ExportService,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let presets = Arc::new(PresetCatalog::builtin()?);
        if presets.find(&config.preset_id).is_none() {
            warn!("⚠️ 未知的滤镜预设: {}，将不附加风格片段", config.preset_id);
        }

        let aspect_ratio = AspectRatio::from_str(&config.aspect_ratio)
            .with_context(|| format!("无法解析画幅比例: {}", config.aspect_ratio))?;

        if config.gemini_api_key.is_empty() {
            warn!("⚠️ 未设置 GEMINI_API_KEY，编辑请求将会失败");
        }

        let selections = Arc::new(Selections::new(
            config.default_instruction.clone(),
            config.preset_id.clone(),
            aspect_ratio,
        ));
        let store = Arc::new(ItemStore::new());

        let capability: Arc<dyn ImageEditCapability> = Arc::new(EditService::new(&config)?);
        let invoker = EditInvoker::new(capability, &config.results_folder);
        let orchestrator = BatchOrchestrator::new(
            store.clone(),
            selections.clone(),
            presets.clone(),
            invoker,
        );
        let exporter = ExportService::new(&config.export_folder);

        Ok(Self {
            config,
            store,
            selections,
            presets,
            orchestrator,
            exporter,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        let added = self.ingest_folder().await?;
        if added == 0 {
            warn!("⚠️ 没有找到待处理的图片，程序结束");
            return Ok(());
        }

        let stats = self.orchestrator.process_all().await?;
        print_final_stats(&stats, self.orchestrator.completed_count());

        // 详细日志（如果启用）
        if self.config.verbose_logging {
            for item in self.store.snapshot() {
                info!(
                    "[图片 {}] 状态: {} | 指令: {}",
                    item.id().short(),
                    item.status(),
                    truncate_text(item.instruction(), 60)
                );
            }
        }

        // 导出失败与单张失败分开报告，不影响已有的处理结果
        match self.exporter.export_all(&self.store.snapshot()).await {
            Ok(Some(bundle)) => info!(
                "📦 导出完成: {} ({} 个文件, {} 字节)",
                bundle.path.display(),
                bundle.entries,
                bundle.bytes
            ),
            Ok(None) => {}
            Err(e) => error!("❌ 批量导出失败: {}", e),
        }

        Ok(())
    }

    /// 扫描输入目录，把图片登记为待处理工作项
    ///
    /// 入列时按当前全局选择合成并记录指令；
    /// 之后改变全局选择不影响已入列的工作项，直到它们被重新提交
    pub async fn ingest_folder(&self) -> Result<usize> {
        let folder = PathBuf::from(&self.config.input_folder);
        if !folder.exists() {
            anyhow::bail!("输入目录不存在: {}", self.config.input_folder);
        }

        let selection = self.selections.current();
        let instruction = compose(
            &selection.instruction,
            self.presets.find(&selection.preset_id),
        );

        let mut paths = Vec::new();
        let mut entries = tokio::fs::read_dir(&folder)
            .await
            .with_context(|| format!("无法读取输入目录: {}", self.config.input_folder))?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if is_supported_image(&path) {
                paths.push(path);
            }
        }
        // 固定加入顺序
        paths.sort();

        let mut items = Vec::new();
        for path in paths {
            info!(
                "正在加入: {}",
                path.file_name().unwrap_or_default().to_string_lossy()
            );
            items.push(WorkItem::new(OriginalRef::new(path), instruction.clone()));
        }

        let count = items.len();
        if count > 0 {
            info!("✓ 找到 {} 张待处理的图片\n", count);
            self.store.add(items);
        }
        Ok(count)
    }

    /// 移除单个工作项并释放其持有的资源
    pub async fn remove_image(&self, id: &ItemId) {
        if let Some(item) = self.store.remove(id) {
            item.release().await;
            info!("🗑️ 已移除图片 {}", id.short());
        }
    }

    /// 清空图库，释放全部工作项持有的资源
    pub async fn clear_gallery(&self) {
        let removed = self.store.clear();
        let count = removed.len();
        for item in removed {
            item.release().await;
        }
        info!("🗑️ 已清空图库 ({} 项)", count);
    }

    /// 工作项仓库（供其他界面层读取状态）
    pub fn store(&self) -> &Arc<ItemStore> {
        &self.store
    }

    /// 批量编辑处理器
    pub fn orchestrator(&self) -> &BatchOrchestrator {
        &self.orchestrator
    }

    /// 全局选择状态
    pub fn selections(&self) -> &Arc<Selections> {
        &self.selections
    }
}

/// 输入目录只接收这几种扩展名，真正的格式识别在处理时按魔数进行
fn is_supported_image(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
        return false;
    };
    matches!(
        ext.to_ascii_lowercase().as_str(),
        "jpg" | "jpeg" | "png" | "webp" | "gif"
    )
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量图片编辑模式");
    info!("📊 编辑模型: {}", config.gemini_model_name);
    info!("🎨 滤镜预设: {}", config.preset_id);
    info!("📐 画幅比例: {}", config.aspect_ratio);
    info!("{}", "=".repeat(60));
}

fn print_final_stats(stats: &SweepStats, completed_total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", stats.completed, stats.attempted);
    info!("❌ 失败: {}", stats.failed);
    info!("🖼️ 当前已完成总数: {}", completed_total);
    info!("{}", "=".repeat(60));
}
