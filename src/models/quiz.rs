use serde::{Deserialize, Serialize};

/// 自测题目列表
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSet {
    #[serde(default)]
    pub questions: Vec<String>,
}

impl QuestionSet {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// 单题批改结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerGrade {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub user_answer: String,
    /// 参考答案，兼容旧字段名 `correctAnswer`
    #[serde(default, alias = "correctAnswer")]
    pub ideal_answer: String,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default)]
    pub feedback: String,
}

/// 批改报告
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingReport {
    pub results: Vec<AnswerGrade>,
    pub score: u32,
}

impl GradingReport {
    /// 判定为正确的题目数量
    pub fn correct_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_correct).count()
    }
}

/// 批改结果，区分正常解析与兜底
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradingOutcome {
    Graded(GradingReport),
    Degraded(GradingReport),
}

impl GradingOutcome {
    pub fn report(&self) -> &GradingReport {
        match self {
            GradingOutcome::Graded(report) | GradingOutcome::Degraded(report) => report,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, GradingOutcome::Degraded(_))
    }
}
