pub mod gemini_client;
pub mod scripted;

pub use gemini_client::GeminiClient;
pub use scripted::ScriptedOracle;

use async_trait::async_trait;

use crate::error::UpstreamError;

/// 文本生成 Oracle
///
/// 输入提示词，返回生成的文本。实现方只负责一次调用，不做重试。
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, UpstreamError>;
}
