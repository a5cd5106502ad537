//! 解答会话状态
//!
//! 保存"当前案例 → AI 解答 → 用户解答 → 比较结果"这一轮的全部数据。
//! 只有流程层可以修改。

use std::fmt::Display;

use crate::models::{CaseRecord, ScoreOutcome};

/// 会话步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// 等待用户提交解答
    AwaitingUserResolution,
    /// 已有用户解答，等待比较
    AwaitingComparison,
    /// 已完成比较
    Completed,
}

impl Step {
    pub fn name(self) -> &'static str {
        match self {
            Step::AwaitingUserResolution => "等待用户解答",
            Step::AwaitingComparison => "等待比较",
            Step::Completed => "已完成",
        }
    }
}

impl Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 会话状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    case: CaseRecord,
    user_resolution: String,
    ai_resolution: String,
    comparison: Option<ScoreOutcome>,
    step: Step,
}

impl SessionState {
    /// 以给定案例创建空会话
    pub fn new(case: CaseRecord) -> Self {
        Self {
            case,
            user_resolution: String::new(),
            ai_resolution: String::new(),
            comparison: None,
            step: Step::AwaitingUserResolution,
        }
    }

    pub fn case(&self) -> &CaseRecord {
        &self.case
    }

    pub fn user_resolution(&self) -> &str {
        &self.user_resolution
    }

    pub fn ai_resolution(&self) -> &str {
        &self.ai_resolution
    }

    pub fn comparison(&self) -> Option<&ScoreOutcome> {
        self.comparison.as_ref()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn has_ai_resolution(&self) -> bool {
        !self.ai_resolution.trim().is_empty()
    }

    /// 回到初始步骤，保留案例
    pub fn reset(&mut self) {
        self.user_resolution.clear();
        self.ai_resolution.clear();
        self.comparison = None;
        self.step = Step::AwaitingUserResolution;
    }

    pub(crate) fn set_ai_resolution(&mut self, resolution: String) {
        self.ai_resolution = resolution;
    }

    /// 修改用户解答会作废已有的比较结果
    pub(crate) fn set_user_resolution(&mut self, resolution: String) {
        self.user_resolution = resolution;
        self.comparison = None;
        self.step = Step::AwaitingComparison;
    }

    pub(crate) fn complete(&mut self, outcome: ScoreOutcome) -> &ScoreOutcome {
        self.step = Step::Completed;
        self.comparison.insert(outcome)
    }
}
