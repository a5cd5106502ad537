//! 自测服务 - 业务能力层
//!
//! 根据案例生成开放式问题，并批改用户的回答。
//! 与比较服务使用同一套 JSON 提取；JSON 不可用时尽量从文本中
//! 挽救可用的部分，实在没有可用内容才报错。

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{AppError, AppResult, ParseError, ValidationError};
use crate::models::{AnswerGrade, GradingOutcome, GradingReport, QuestionSet};
use crate::services::content_generator::ContentGenerator;
use crate::services::prompts;
use crate::utils::numbers::lenient_number;
use crate::utils::parse_json_object;

/// 默认生成的问题数量
pub const DEFAULT_QUESTION_COUNT: usize = 5;

/// 兜底批改时的反馈
pub const UNGRADED_NOTE: &str =
    "No se pudo obtener una corrección estructurada para esta respuesta.";

#[derive(Debug, Deserialize)]
struct RawGrading {
    #[serde(default)]
    results: Vec<AnswerGrade>,
    score: Option<Value>,
}

/// 自测服务
pub struct SelfTestService {
    generator: ContentGenerator,
    question_count: usize,
}

impl SelfTestService {
    pub fn new(generator: ContentGenerator) -> Self {
        Self {
            generator,
            question_count: DEFAULT_QUESTION_COUNT,
        }
    }

    pub fn with_question_count(mut self, count: usize) -> Self {
        self.question_count = count.max(1);
        self
    }

    /// 根据案例生成问题
    pub async fn generate_questions(&self, case: &str) -> AppResult<QuestionSet> {
        if case.trim().is_empty() {
            return Err(ValidationError::NoCase.into());
        }

        info!("❓ 正在生成 {} 个问题...", self.question_count);
        let raw = self
            .generator
            .generate(&prompts::questions_prompt(case, self.question_count))
            .await?;

        let parsed = parse_json_object::<QuestionSet>(&raw).and_then(|set| {
            let mut questions = clean_lines(set.questions);
            questions.truncate(self.question_count);
            if questions.is_empty() {
                Err(ParseError::MissingRequiredField { field: "questions" })
            } else {
                Ok(QuestionSet { questions })
            }
        });

        match parsed {
            Ok(set) => {
                info!("✓ 生成了 {} 个问题", set.len());
                Ok(set)
            }
            Err(e) => {
                warn!("⚠️ 问题 JSON 不可用 ({})，尝试从文本中提取", e);
                let questions = salvage_questions(&raw, self.question_count);
                if questions.is_empty() {
                    return Err(e.into());
                }
                info!("✓ 从文本中提取到 {} 个问题", questions.len());
                Ok(QuestionSet { questions })
            }
        }
    }

    /// 批改用户回答
    ///
    /// # 参数
    /// - `case`: 案例内容
    /// - `questions`: 问题列表
    /// - `answers`: 用户回答，数量必须与问题一致（允许空回答）
    pub async fn grade_answers(
        &self,
        case: &str,
        questions: &QuestionSet,
        answers: &[String],
    ) -> AppResult<GradingOutcome> {
        if case.trim().is_empty() {
            return Err(ValidationError::NoCase.into());
        }
        if questions.is_empty() {
            return Err(AppError::empty_input("questions"));
        }
        if answers.len() != questions.len() {
            return Err(ValidationError::AnswerCountMismatch {
                questions: questions.len(),
                answers: answers.len(),
            }
            .into());
        }

        info!("📝 正在批改 {} 个回答...", answers.len());
        let raw = self
            .generator
            .generate(&prompts::grading_prompt(case, &questions.questions, answers))
            .await?;

        Ok(interpret_grading(&raw, questions, answers))
    }
}

/// 解析批改响应，失败时降级
pub fn interpret_grading(raw: &str, questions: &QuestionSet, answers: &[String]) -> GradingOutcome {
    match parse_json_object::<RawGrading>(raw) {
        Ok(grading) if !grading.results.is_empty() => {
            let mut results = grading.results;
            // 模型可能省略题目或回答原文，按顺序补齐
            for (idx, result) in results.iter_mut().enumerate() {
                if result.question.trim().is_empty() {
                    if let Some(q) = questions.questions.get(idx) {
                        result.question = q.clone();
                    }
                }
                if result.user_answer.trim().is_empty() {
                    if let Some(a) = answers.get(idx) {
                        result.user_answer = a.clone();
                    }
                }
            }

            // 得分不能超过题目数
            let max_score = results.len() as u32;
            let score = grading
                .score
                .as_ref()
                .and_then(lenient_number)
                .filter(|n| n.is_finite() && *n >= 0.0)
                .map(|n| n.round().min(f64::from(max_score)) as u32)
                .unwrap_or_else(|| results.iter().filter(|r| r.is_correct).count() as u32);

            info!("✓ 批改完成，得分: {}", score);
            GradingOutcome::Graded(GradingReport { results, score })
        }
        Ok(_) => {
            warn!("⚠️ 批改 JSON 中没有 results，使用兜底结果");
            GradingOutcome::Degraded(ungraded_report(raw, questions, answers))
        }
        Err(e) => {
            warn!("⚠️ 批改 JSON 不可用 ({})，使用兜底结果", e);
            GradingOutcome::Degraded(ungraded_report(raw, questions, answers))
        }
    }
}

fn ungraded_report(raw: &str, questions: &QuestionSet, answers: &[String]) -> GradingReport {
    let results = questions
        .questions
        .iter()
        .zip(answers)
        .map(|(question, answer)| AnswerGrade {
            question: question.clone(),
            user_answer: answer.clone(),
            ideal_answer: String::new(),
            is_correct: false,
            feedback: UNGRADED_NOTE.to_string(),
        })
        .collect();

    let score = scrape_fraction_score(raw)
        .map(|s| s.min(questions.len() as u32))
        .unwrap_or(0);

    GradingReport { results, score }
}

/// 第一个 `N/M` 中的 N
fn scrape_fraction_score(raw: &str) -> Option<u32> {
    let re = Regex::new(r"(\d+)\s*/\s*\d+").ok()?;
    re.captures(raw)?[1].parse().ok()
}

fn clean_lines(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .collect()
}

/// 从非 JSON 文本中找出像问题的行
///
/// 接受编号行、列表行或以 `?` 结尾的行；去掉引号和末尾逗号后再判断，
/// 这样被截断的 JSON 数组也能挽救。
fn salvage_questions(raw: &str, limit: usize) -> Vec<String> {
    let Ok(marker) = Regex::new(r"^(?:\d+\s*[.)\-:]|[-*•])\s+(.+)$") else {
        return Vec::new();
    };

    raw.lines()
        .map(|line| line.trim().trim_end_matches(',').trim_matches('"').trim())
        .filter_map(|line| {
            if let Some(caps) = marker.captures(line) {
                Some(caps[1].trim().to_string())
            } else if line.ends_with('?') && !line.starts_with('{') {
                Some(line.to_string())
            } else {
                None
            }
        })
        .filter(|q| !q.is_empty())
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::ScriptedOracle;
    use std::sync::Arc;
    use std::time::Duration;

    fn service(oracle: Arc<ScriptedOracle>) -> SelfTestService {
        SelfTestService::new(ContentGenerator::new(oracle, Duration::ZERO))
    }

    fn question_set(n: usize) -> QuestionSet {
        QuestionSet {
            questions: (1..=n).map(|i| format!("¿Pregunta {}?", i)).collect(),
        }
    }

    #[tokio::test]
    async fn test_generate_questions_from_json() {
        let oracle = Arc::new(ScriptedOracle::with_responses([
            r#"Claro: {"questions": ["¿Qué auditorías se hicieron?", "  ", "¿Qué objetivos se fijaron?"]}"#,
        ]));

        let set = service(oracle).generate_questions("caso").await.unwrap();

        assert_eq!(
            set.questions,
            vec!["¿Qué auditorías se hicieron?", "¿Qué objetivos se fijaron?"]
        );
    }

    #[tokio::test]
    async fn test_generate_questions_salvages_numbered_text() {
        let oracle = Arc::new(ScriptedOracle::with_responses([
            "Aquí tienes las preguntas:\n1. ¿Cuál fue el problema principal?\n2) ¿Qué acción correctiva se tomó?\nGracias.",
        ]));

        let set = service(oracle).generate_questions("caso").await.unwrap();

        assert_eq!(
            set.questions,
            vec![
                "¿Cuál fue el problema principal?",
                "¿Qué acción correctiva se tomó?"
            ]
        );
    }

    #[tokio::test]
    async fn test_generate_questions_salvages_truncated_json() {
        let oracle = Arc::new(ScriptedOracle::with_responses([
            "{\n  \"questions\": [\n    \"¿Qué cambió en compras?\",\n    \"¿Cómo se midió la satisfacción?\",\n",
        ]));

        let set = service(oracle).generate_questions("caso").await.unwrap();
        assert_eq!(set.len(), 2);
    }

    #[tokio::test]
    async fn test_generate_questions_unsalvageable_is_error() {
        let oracle = Arc::new(ScriptedOracle::with_responses(["Lo siento, no puedo ayudar."]));

        let err = service(oracle).generate_questions("caso").await.unwrap_err();
        assert!(matches!(err, AppError::Parse(ParseError::NoJsonFound)));
    }

    #[tokio::test]
    async fn test_generate_questions_requires_case() {
        let oracle = Arc::new(ScriptedOracle::new());

        let err = service(oracle.clone()).generate_questions("   ").await.unwrap_err();

        assert!(matches!(err, AppError::Validation(ValidationError::NoCase)));
        assert_eq!(oracle.call_count(), 0);
    }

    #[tokio::test]
    async fn test_grade_answers_parsed() {
        let oracle = Arc::new(ScriptedOracle::with_responses([r#"{
            "results": [
                {"question": "", "userAnswer": "", "correctAnswer": "Auditoría interna", "isCorrect": true, "feedback": "Bien"},
                {"question": "¿Pregunta 2?", "userAnswer": "no sé", "idealAnswer": "Política", "isCorrect": false, "feedback": "Revisa 5.2"}
            ],
            "score": 1
        }"#]));
        let answers = vec!["auditoría".to_string(), "no sé".to_string()];

        let outcome = service(oracle)
            .grade_answers("caso", &question_set(2), &answers)
            .await
            .unwrap();

        assert!(!outcome.is_degraded());
        let report = outcome.report();
        assert_eq!(report.score, 1);
        assert_eq!(report.results[0].question, "¿Pregunta 1?");
        assert_eq!(report.results[0].user_answer, "auditoría");
        assert_eq!(report.results[0].ideal_answer, "Auditoría interna");
        assert_eq!(report.correct_count(), 1);
    }

    #[test]
    fn test_grading_score_defaults_to_correct_count() {
        let raw = r#"{"results": [{"isCorrect": true}, {"isCorrect": true}, {"isCorrect": false}]}"#;
        let outcome = interpret_grading(raw, &question_set(3), &["a".to_string(), "b".to_string(), "c".to_string()]);
        assert_eq!(outcome.report().score, 2);
    }

    #[test]
    fn test_grading_score_capped_at_result_count() {
        let answers = vec!["a".to_string(), "b".to_string()];
        let raw = r#"{"results": [{"isCorrect": true}, {"isCorrect": false}], "score": 80}"#;
        assert_eq!(interpret_grading(raw, &question_set(2), &answers).report().score, 2);

        let raw = r#"{"results": [{"isCorrect": true}, {"isCorrect": false}], "score": 50000000}"#;
        let outcome = interpret_grading(raw, &question_set(2), &answers);
        assert_eq!(outcome.report().score, 2);
        assert!(crate::report::render_grading(&outcome).contains("Puntuación: 2/2"));
    }

    #[tokio::test]
    async fn test_generate_questions_json_respects_count() {
        let oracle = Arc::new(ScriptedOracle::with_responses([
            r#"{"questions": ["¿Uno?", "¿Dos?", "¿Tres?", "¿Cuatro?"]}"#,
        ]));

        let set = service(oracle)
            .with_question_count(2)
            .generate_questions("caso")
            .await
            .unwrap();

        assert_eq!(set.questions, vec!["¿Uno?", "¿Dos?"]);
    }

    #[test]
    fn test_grading_degrades_on_plain_text() {
        let answers = vec!["a".to_string(), "b".to_string()];
        let outcome = interpret_grading("Obtuviste 7/5 respuestas correctas.", &question_set(2), &answers);

        assert!(outcome.is_degraded());
        let report = outcome.report();
        assert_eq!(report.results.len(), 2);
        assert!(report.results.iter().all(|r| !r.is_correct && r.feedback == UNGRADED_NOTE));
        assert_eq!(report.score, 2);
    }

    #[tokio::test]
    async fn test_grade_answers_count_mismatch() {
        let oracle = Arc::new(ScriptedOracle::new());

        let err = service(oracle.clone())
            .grade_answers("caso", &question_set(3), &["solo una".to_string()])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::Validation(ValidationError::AnswerCountMismatch { questions: 3, answers: 1 })
        ));
        assert_eq!(oracle.call_count(), 0);
    }
}
