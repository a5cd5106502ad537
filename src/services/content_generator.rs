//! 内容生成服务 - 业务能力层
//!
//! 只负责"把提示词交给 Oracle 并拿回文本"，不关心流程

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::clients::Oracle;
use crate::error::UpstreamError;
use crate::services::prompts;
use crate::utils::truncate_text;

/// 内容生成服务
///
/// 职责：
/// - 每次生成只发起一次 Oracle 调用，失败直接返回，不重试
/// - 调用成功后固定等待一段时间再返回（限速）
#[derive(Clone)]
pub struct ContentGenerator {
    oracle: Arc<dyn Oracle>,
    pacing_delay: Duration,
}

impl ContentGenerator {
    pub fn new(oracle: Arc<dyn Oracle>, pacing_delay: Duration) -> Self {
        Self {
            oracle,
            pacing_delay,
        }
    }

    /// 通用生成接口
    ///
    /// # 参数
    /// - `prompt`: 提示词
    ///
    /// # 返回
    /// Oracle 返回的原始文本
    pub async fn generate(&self, prompt: &str) -> Result<String, UpstreamError> {
        debug!("提示词预览: {}", truncate_text(prompt, 80));

        let text = self.oracle.complete(prompt).await?;

        if !self.pacing_delay.is_zero() {
            tokio::time::sleep(self.pacing_delay).await;
        }

        debug!("生成完成，长度: {} 字符", text.chars().count());
        Ok(text)
    }

    /// 生成一个新的 ISO 9001 案例
    pub async fn generate_case(&self) -> Result<String, UpstreamError> {
        info!("📝 正在生成案例...");
        let case = self.generate(prompts::CASE_PROMPT).await?;
        info!("✓ 案例生成完成");
        Ok(case)
    }

    /// 生成案例的参考解答
    pub async fn generate_ai_resolution(&self, case: &str) -> Result<String, UpstreamError> {
        info!("🤖 正在生成 AI 解答...");
        let resolution = self.generate(&prompts::ai_resolution_prompt(case)).await?;
        info!("✓ AI 解答生成完成");
        Ok(resolution)
    }
}
