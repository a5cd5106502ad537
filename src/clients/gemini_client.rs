/// Gemini API 客户端
///
/// 封装 `generateContent` 接口的 HTTP 调用
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clients::Oracle;
use crate::config::Config;
use crate::error::{AppResult, ConfigError, UpstreamError};

/// 请求体 `{contents: [{parts: [{text}]}]}`
#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// 成功响应 `{candidates: [{content: {parts: [{text}]}}]}`
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// 错误响应 `{error: {message}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Gemini 客户端
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
    model_name: String,
}

impl GeminiClient {
    /// 创建新的 Gemini 客户端
    ///
    /// 没有配置 API 密钥时返回 [`ConfigError::MissingApiKey`]。
    pub fn new(config: &Config) -> AppResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey.into());
        }

        let http = reqwest::Client::builder()
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            endpoint: endpoint_for(&config.api_base_url, &config.model_name),
            model_name: config.model_name.clone(),
        })
    }
}

#[async_trait]
impl Oracle for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, UpstreamError> {
        debug!("调用 Gemini API，模型: {}", self.model_name);
        debug!("提示词长度: {} 字符", prompt.chars().count());

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!("Gemini API 请求失败: {}", e);
                UpstreamError::request_failed(&self.endpoint, e)
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| UpstreamError::request_failed(&self.endpoint, e))?;

        if !status.is_success() {
            let message = extract_error_message(&text);
            warn!("Gemini API 返回错误 {}: {:?}", status, message);
            return Err(UpstreamError::BadStatus {
                status: status.as_u16(),
                message,
            });
        }

        debug!("Gemini API 调用成功");
        parse_success_body(&text)
    }
}

/// 拼接 `{base}/models/{model}:generateContent`
fn endpoint_for(base_url: &str, model: &str) -> String {
    format!(
        "{}/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        model
    )
}

/// 从成功响应中取出第一个候选的文本
fn parse_success_body(body: &str) -> Result<String, UpstreamError> {
    let parsed: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| UpstreamError::malformed(format!("无法解析响应 JSON: {}", e)))?;

    let candidate = parsed
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| UpstreamError::malformed("响应中没有候选结果"))?;

    candidate
        .content
        .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
        .ok_or_else(|| UpstreamError::malformed("候选结果中没有文本"))
}

/// 提取上游错误信息（如果有）
fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.error.message)
}
