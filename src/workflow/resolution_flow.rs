//! 解答流程 - 流程层
//!
//! 核心职责：定义"一个案例"的完整解答流程
//!
//! 流程顺序：
//! 1. 生成 AI 解答
//! 2. 用户提交解答
//! 3. 比较并评分
//!
//! 任一步骤失败时会话状态保持不变，用户可以直接重试。

use tracing::{info, warn};

use crate::error::{AppError, AppResult, ValidationError};
use crate::models::{CaseRecord, ScoreOutcome};
use crate::services::{ComparisonEvaluator, ContentGenerator};
use crate::workflow::session::{SessionState, Step};

/// 解答流程
///
/// - 独占会话状态，所有修改都经过这里
/// - 只依赖业务能力（services）
pub struct ResolutionFlow {
    generator: ContentGenerator,
    evaluator: ComparisonEvaluator,
    state: SessionState,
}

impl ResolutionFlow {
    /// 为给定案例创建新的解答流程
    pub fn new(case: CaseRecord, generator: ContentGenerator) -> Self {
        Self {
            evaluator: ComparisonEvaluator::new(generator.clone()),
            generator,
            state: SessionState::new(case),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// 准备 AI 解答（已存在时直接返回）
    pub async fn prepare_ai_resolution(&mut self) -> AppResult<&str> {
        if self.state.case().content.trim().is_empty() {
            return Err(ValidationError::NoCase.into());
        }

        if !self.state.has_ai_resolution() {
            let resolution = self
                .generator
                .generate_ai_resolution(&self.state.case().content)
                .await
                .map_err(|e| {
                    warn!("⚠️ AI 解答生成失败: {}", e);
                    e
                })?;
            self.state.set_ai_resolution(resolution);
        }

        Ok(self.state.ai_resolution())
    }

    /// 提交用户解答
    ///
    /// 不发起网络请求。空白解答会被拒绝。
    pub fn submit_user_resolution(&mut self, resolution: impl Into<String>) -> AppResult<()> {
        let resolution = resolution.into();
        if resolution.trim().is_empty() {
            return Err(AppError::empty_input("用户解答"));
        }

        info!(
            "✍️ 已提交用户解答 ({} 字符)",
            resolution.chars().count()
        );
        self.state.set_user_resolution(resolution);
        Ok(())
    }

    /// 比较 AI 解答与用户解答
    ///
    /// 如果还没有 AI 解答会先生成。
    pub async fn compare(&mut self) -> AppResult<&ScoreOutcome> {
        if self.state.step() == Step::AwaitingUserResolution {
            return Err(ValidationError::StepOutOfOrder {
                current: self.state.step().name(),
                action: "比较解答",
            }
            .into());
        }

        self.prepare_ai_resolution().await?;

        let outcome = self
            .evaluator
            .compare(self.state.ai_resolution(), self.state.user_resolution())
            .await
            .map_err(|e| {
                warn!("⚠️ 比较失败: {}", e);
                e
            })?;

        Ok(self.state.complete(outcome))
    }

    /// 一次性执行完整流程
    pub async fn run(&mut self, user_resolution: impl Into<String>) -> AppResult<&ScoreOutcome> {
        self.submit_user_resolution(user_resolution)?;
        self.compare().await
    }

    /// 重新开始
    pub fn reset(&mut self) {
        info!("🔄 重新开始解答流程");
        self.state.reset();
    }
}
