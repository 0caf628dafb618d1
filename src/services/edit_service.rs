//! 图片编辑服务 - 业务能力层
//!
//! 只负责"调用外部编辑能力"这一件事，不关心流程：
//! 给定原图字节、MIME 类型、指令文本和画幅比例，换回一张新图或一个错误。
//!
//! ## 技术栈
//! - 通过 `reqwest` 直连 Gemini `generateContent` REST 接口
//! - 原图以 `inline_data`（base64）形式随请求发送
//! - 画幅比例通过 `generationConfig.imageConfig.aspectRatio` 传递
//!
//! 所有失败路径都折叠为 [`EditError`]，不会向调用方抛出未包装的异常。
//! 接口内部不做自动重试，重试始终由用户显式触发。

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::EditError;
use crate::models::AspectRatio;

/// 一次编辑调用的输入
#[derive(Debug, Clone)]
pub struct EditRequest {
    /// 原图字节
    pub bytes: Vec<u8>,
    /// 原图 MIME 类型
    pub mime: String,
    /// 有效指令文本
    pub instruction: String,
    /// 输出画幅比例
    pub aspect_ratio: AspectRatio,
}

/// 一次编辑调用的输出
#[derive(Debug, Clone)]
pub struct EditedImage {
    /// 新图字节
    pub bytes: Vec<u8>,
    /// 新图声明的 MIME 类型
    pub mime: String,
}

/// 外部图片编辑能力
///
/// 真实实现是 [`EditService`]；测试中用桩实现替换
#[async_trait]
pub trait ImageEditCapability: Send + Sync {
    /// 执行一次图片编辑调用
    async fn edit(&self, request: EditRequest) -> Result<EditedImage, EditError>;
}

/// Gemini 图片编辑服务
pub struct EditService {
    http: reqwest::Client,
    api_base_url: String,
    api_key: String,
    model_name: String,
}

impl EditService {
    /// 从配置创建编辑服务
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_base_url: config.gemini_api_base_url.clone(),
            api_key: config.gemini_api_key.clone(),
            model_name: config.gemini_model_name.clone(),
        })
    }
}

#[async_trait]
impl ImageEditCapability for EditService {
    async fn edit(&self, request: EditRequest) -> Result<EditedImage, EditError> {
        debug!(
            "调用编辑接口，模型: {}, 原图 {} 字节 ({}), 指令长度: {} 字符",
            self.model_name,
            request.bytes.len(),
            request.mime,
            request.instruction.chars().count()
        );

        let url = format!(
            "{}/models/{}:generateContent",
            self.api_base_url.trim_end_matches('/'),
            self.model_name
        );
        let body = build_request_body(&request);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| EditError::RequestFailed { source: e })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(EditError::ServiceRejected {
                status: status.as_u16(),
                message: parse_error_message(&text),
            });
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| EditError::RequestFailed { source: e })?;

        debug!("编辑接口调用成功，候选数量: {}", payload.candidates.len());

        extract_image(payload, &self.model_name)
    }
}

// ========== Gemini 请求/响应数据结构 ==========

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
    image_config: ImageConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

// ========== 请求构建与响应解析 ==========

fn build_request_body(request: &EditRequest) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![
                Part {
                    inline_data: Some(InlineData {
                        mime_type: request.mime.clone(),
                        data: STANDARD.encode(&request.bytes),
                    }),
                    text: None,
                },
                Part {
                    text: Some(request.instruction.clone()),
                    inline_data: None,
                },
            ],
        }],
        generation_config: GenerationConfig {
            response_modalities: vec!["TEXT", "IMAGE"],
            image_config: ImageConfig {
                aspect_ratio: request.aspect_ratio.id().to_string(),
            },
        },
    }
}

/// 从错误响应体中提取可展示的错误信息
fn parse_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .and_then(|e| e.message)
        .unwrap_or_else(|| crate::utils::logging::truncate_text(body.trim(), 200))
}

/// 在响应中寻找第一个图片分片并解码
///
/// 没有图片时，把候选里的文本分片拼成错误明细（模型可能用文字说明拒绝原因）
fn extract_image(
    payload: GenerateContentResponse,
    model_name: &str,
) -> Result<EditedImage, EditError> {
    if let Some(feedback) = &payload.prompt_feedback {
        if let Some(reason) = &feedback.block_reason {
            return Err(EditError::NoImageReturned {
                model: model_name.to_string(),
                detail: format!("请求被拒绝: {reason}"),
            });
        }
    }

    let mut text_parts = Vec::new();
    for candidate in &payload.candidates {
        let Some(content) = &candidate.content else {
            continue;
        };
        for part in &content.parts {
            if let Some(inline) = &part.inline_data {
                let bytes = STANDARD
                    .decode(&inline.data)
                    .map_err(|e| EditError::DecodeFailed { source: e })?;
                return Ok(EditedImage {
                    bytes,
                    mime: inline.mime_type.clone(),
                });
            }
            if let Some(text) = &part.text {
                text_parts.push(text.clone());
            }
        }
    }

    Err(EditError::NoImageReturned {
        model: model_name.to_string(),
        detail: if text_parts.is_empty() {
            "响应中没有图片分片".to_string()
        } else {
            text_parts.join(" ")
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_shape() {
        let request = EditRequest {
            bytes: vec![1, 2, 3],
            mime: "image/png".to_string(),
            instruction: "Remove background".to_string(),
            aspect_ratio: AspectRatio::Widescreen,
        };
        let value = serde_json::to_value(build_request_body(&request)).unwrap();

        assert_eq!(
            value["contents"][0]["parts"][0]["inlineData"]["mimeType"],
            "image/png"
        );
        assert_eq!(
            value["contents"][0]["parts"][0]["inlineData"]["data"],
            STANDARD.encode([1u8, 2, 3])
        );
        assert_eq!(
            value["contents"][0]["parts"][1]["text"],
            "Remove background"
        );
        assert_eq!(
            value["generationConfig"]["imageConfig"]["aspectRatio"],
            "16:9"
        );
    }

    #[test]
    fn test_extract_image_from_response() {
        let json = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "Here is the edited image." },
                        { "inlineData": { "mimeType": "image/png", "data": STANDARD.encode(b"fake-image") } }
                    ]
                }
            }]
        });
        let payload: GenerateContentResponse = serde_json::from_value(json).unwrap();

        let image = extract_image(payload, "gemini-test").unwrap();
        assert_eq!(image.bytes, b"fake-image");
        assert_eq!(image.mime, "image/png");
    }

    #[test]
    fn test_extract_image_text_only_response() {
        let json = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "I cannot edit this image." }] }
            }]
        });
        let payload: GenerateContentResponse = serde_json::from_value(json).unwrap();

        let err = extract_image(payload, "gemini-test").unwrap_err();
        assert!(err.to_string().contains("I cannot edit this image."));
    }

    #[test]
    fn test_extract_image_blocked_prompt() {
        let json = serde_json::json!({
            "candidates": [],
            "promptFeedback": { "blockReason": "SAFETY" }
        });
        let payload: GenerateContentResponse = serde_json::from_value(json).unwrap();

        let err = extract_image(payload, "gemini-test").unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_parse_error_message() {
        let body = r#"{"error": {"code": 400, "message": "Invalid API key", "status": "INVALID_ARGUMENT"}}"#;
        assert_eq!(parse_error_message(body), "Invalid API key");
        assert_eq!(parse_error_message("plain text failure"), "plain text failure");
    }
}
