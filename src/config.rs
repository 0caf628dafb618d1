/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 待处理图片所在目录
    pub input_folder: String,
    /// 编辑结果输出目录
    pub results_folder: String,
    /// 批量导出归档目录
    pub export_folder: String,
    /// 默认的全局编辑指令
    pub default_instruction: String,
    /// 默认选中的滤镜预设
    pub preset_id: String,
    /// 输出画幅比例
    pub aspect_ratio: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- 编辑服务配置 ---
    pub gemini_api_key: String,
    pub gemini_api_base_url: String,
    pub gemini_model_name: String,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_folder: "photos".to_string(),
            results_folder: "edited".to_string(),
            export_folder: "exports".to_string(),
            default_instruction: "移除背景，仅保留主体并使其清晰锐利。".to_string(),
            preset_id: "none".to_string(),
            aspect_ratio: "1:1".to_string(),
            verbose_logging: false,
            gemini_api_key: String::new(),
            gemini_api_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            gemini_model_name: "gemini-2.5-flash-image-preview".to_string(),
            request_timeout_secs: 120,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            input_folder: std::env::var("INPUT_FOLDER").unwrap_or(default.input_folder),
            results_folder: std::env::var("RESULTS_FOLDER").unwrap_or(default.results_folder),
            export_folder: std::env::var("EXPORT_FOLDER").unwrap_or(default.export_folder),
            default_instruction: std::env::var("DEFAULT_INSTRUCTION").unwrap_or(default.default_instruction),
            preset_id: std::env::var("FILTER_PRESET").unwrap_or(default.preset_id),
            aspect_ratio: std::env::var("ASPECT_RATIO").unwrap_or(default.aspect_ratio),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            gemini_api_key: std::env::var("GEMINI_API_KEY").unwrap_or(default.gemini_api_key),
            gemini_api_base_url: std::env::var("GEMINI_API_BASE_URL").unwrap_or(default.gemini_api_base_url),
            gemini_model_name: std::env::var("GEMINI_MODEL_NAME").unwrap_or(default.gemini_model_name),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
        }
    }
}
