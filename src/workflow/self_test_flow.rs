//! 自测流程 - 流程层
//!
//! 生成问题 → 收集回答 → 批改。失败时保持原有状态。

use tracing::info;

use crate::error::{AppResult, ValidationError};
use crate::models::{CaseRecord, GradingOutcome, QuestionSet};
use crate::services::SelfTestService;

/// 自测流程
pub struct SelfTestFlow {
    service: SelfTestService,
    case: CaseRecord,
    questions: QuestionSet,
    answers: Vec<String>,
    outcome: Option<GradingOutcome>,
}

impl SelfTestFlow {
    pub fn new(case: CaseRecord, service: SelfTestService) -> Self {
        Self {
            service,
            case,
            questions: QuestionSet::default(),
            answers: Vec::new(),
            outcome: None,
        }
    }

    pub fn case(&self) -> &CaseRecord {
        &self.case
    }

    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn outcome(&self) -> Option<&GradingOutcome> {
        self.outcome.as_ref()
    }

    /// 生成新一组问题，清空之前的回答和批改结果
    pub async fn start(&mut self) -> AppResult<&QuestionSet> {
        let questions = self.service.generate_questions(&self.case.content).await?;

        self.answers = vec![String::new(); questions.len()];
        self.questions = questions;
        self.outcome = None;
        Ok(&self.questions)
    }

    /// 记录第 `index` 题（从 0 开始）的回答
    pub fn set_answer(&mut self, index: usize, answer: impl Into<String>) -> AppResult<()> {
        match self.answers.get_mut(index) {
            Some(slot) => {
                *slot = answer.into();
                Ok(())
            }
            None => Err(ValidationError::AnswerCountMismatch {
                questions: self.questions.len(),
                answers: index + 1,
            }
            .into()),
        }
    }

    /// 批改当前回答
    pub async fn grade(&mut self) -> AppResult<&GradingOutcome> {
        if self.questions.is_empty() {
            return Err(ValidationError::StepOutOfOrder {
                current: "尚未生成问题",
                action: "批改回答",
            }
            .into());
        }

        let outcome = self
            .service
            .grade_answers(&self.case.content, &self.questions, &self.answers)
            .await?;

        let report = outcome.report();
        info!(
            "✓ 自测完成: {}/{} 正确",
            report.correct_count(),
            self.questions.len()
        );
        Ok(self.outcome.insert(outcome))
    }
}
