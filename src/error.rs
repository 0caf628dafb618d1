//! 错误类型定义
//!
//! 错误分为两个层面：
//!
//! - [`EditError`]：单张图片的一次处理尝试失败，只影响对应的工作项，
//!   其展示文案会被写入工作项的错误状态
//! - [`ExportError`]：批量导出失败，作用于整次导出操作；任何一个结果
//!   文件读取失败都会让导出整体失败，不会产出不完整的归档
//!
//! 应用层和编排层统一使用 `anyhow::Result` 向上传递。

use thiserror::Error;

/// 单张图片处理错误
#[derive(Debug, Error)]
pub enum EditError {
    /// 原图读取失败
    #[error("无法读取原图 ({path}): {source}")]
    OriginalUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 原图字节无法识别为支持的图片格式
    #[error("无法识别的图片格式: {path}")]
    UnrecognizedFormat { path: String },

    /// 网络请求失败
    #[error("编辑服务请求失败: {source}")]
    RequestFailed {
        #[source]
        source: reqwest::Error,
    },

    /// 编辑服务返回了非成功状态码
    #[error("编辑服务返回错误 (HTTP {status}): {message}")]
    ServiceRejected { status: u16, message: String },

    /// 响应中没有图片数据
    #[error("编辑服务未返回图片数据 (模型: {model}): {detail}")]
    NoImageReturned { model: String, detail: String },

    /// 返回的图片数据无法解码
    #[error("无法解码返回的图片数据: {source}")]
    DecodeFailed {
        #[source]
        source: base64::DecodeError,
    },

    /// 结果文件落盘失败
    #[error("无法保存编辑结果 ({path}): {source}")]
    PersistFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 单个结果文件读取失败的明细
#[derive(Debug)]
pub struct FetchFailure {
    pub item_id: String,
    pub path: String,
    pub reason: String,
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "图片 {} ({}): {}", self.item_id, self.path, self.reason)
    }
}

/// 批量导出错误
#[derive(Debug, Error)]
pub enum ExportError {
    /// 一个或多个结果文件读取失败，导出整体作废
    #[error("导出失败: {} 个结果文件无法读取", .failures.len())]
    FetchFailed { failures: Vec<FetchFailure> },

    /// ZIP 归档构建失败
    #[error("打包导出文件失败: {source}")]
    ArchiveFailed {
        #[from]
        source: zip::result::ZipError,
    },

    /// 归档写入目标路径失败
    #[error("写入导出文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
