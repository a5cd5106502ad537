//! 解答比较服务 - 业务能力层
//!
//! 把参考解答和用户解答交给 Oracle 打分，并把返回的半结构化文本
//! 规范化为 [`ScoreRecord`]。
//!
//! ## 解析策略
//! 1. 严格解析：去掉代码块，提取第一个 JSON 对象，`porcentaje` 和
//!    `detalle` 必须存在
//! 2. 对账：最终百分比取 Oracle 报告的百分比与四项得分之和中较小者
//! 3. 兜底：JSON 不可用时从文本中提取百分比和 "Justificación:" 行，
//!    结果标记为 [`ScoreOutcome::Degraded`]

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{ParseError, UpstreamError};
use crate::models::{ScoreOutcome, ScoreRecord, MAX_PERCENTAGE, MAX_SUBSCORE};
use crate::services::content_generator::ContentGenerator;
use crate::services::prompts;
use crate::utils::numbers::{lenient_number, quarter_of, ratio_to_percentage, to_bounded};
use crate::utils::{parse_json_object, truncate_text};

/// 兜底结果中的改进建议
pub const OFF_TOPIC_NOTE: &str =
    "No se pudo confirmar que la respuesta esté relacionada con el caso de estudio.";

/// Oracle 返回的评分 JSON（字段值类型不可信，全部按 `Value` 读取）
#[derive(Debug, Deserialize)]
struct RawScore {
    #[serde(alias = "percentage")]
    porcentaje: Option<Value>,
    #[serde(alias = "comprehensionScore")]
    puntuacion_comprension: Option<Value>,
    #[serde(alias = "iso9001Score")]
    puntuacion_iso9001: Option<Value>,
    #[serde(alias = "structureScore")]
    puntuacion_estructura: Option<Value>,
    #[serde(alias = "completenessScore")]
    puntuacion_completitud: Option<Value>,
    #[serde(alias = "strengths")]
    fortalezas: Option<Value>,
    #[serde(alias = "improvementAreas")]
    areas_mejora: Option<Value>,
    #[serde(alias = "detail")]
    detalle: Option<Value>,
}

/// 解答比较服务
pub struct ComparisonEvaluator {
    generator: ContentGenerator,
}

impl ComparisonEvaluator {
    pub fn new(generator: ContentGenerator) -> Self {
        Self { generator }
    }

    /// 比较两份解答
    ///
    /// # 参数
    /// - `reference`: 参考解答（AI 生成）
    /// - `candidate`: 待评价的解答（用户）
    ///
    /// # 返回
    /// 只有 Oracle 调用本身失败时才返回错误；响应格式再差也会降级
    /// 为兜底结果。
    pub async fn compare(
        &self,
        reference: &str,
        candidate: &str,
    ) -> Result<ScoreOutcome, UpstreamError> {
        info!("📊 正在比较解答...");
        let prompt = prompts::comparison_prompt(reference, candidate);
        let raw = self.generator.generate(&prompt).await?;

        let outcome = evaluate_response(&raw);
        info!(
            "✓ 比较完成: {}%{}",
            outcome.record().percentage,
            if outcome.is_degraded() { " (兜底解析)" } else { "" }
        );
        Ok(outcome)
    }
}

/// 把 Oracle 的原始响应规范化为评分结果
pub fn evaluate_response(raw: &str) -> ScoreOutcome {
    match parse_strict(raw) {
        Ok(record) => ScoreOutcome::Parsed(record),
        Err(e) => {
            warn!("⚠️ 评分 JSON 不可用 ({})，使用文本提取兜底", e);
            debug!("原始响应: {}", truncate_text(raw, 200));
            ScoreOutcome::Degraded(fallback_extract(raw))
        }
    }
}

/// 严格解析并对账
fn parse_strict(raw: &str) -> Result<ScoreRecord, ParseError> {
    let score: RawScore = parse_json_object(raw)?;

    let reported = score
        .porcentaje
        .as_ref()
        .and_then(lenient_number)
        .map(ratio_to_percentage)
        .ok_or(ParseError::MissingRequiredField {
            field: "porcentaje",
        })?;
    let detail = score
        .detalle
        .as_ref()
        .and_then(value_to_text)
        .ok_or(ParseError::MissingRequiredField { field: "detalle" })?;

    let subscore = |v: &Option<Value>| {
        v.as_ref()
            .and_then(lenient_number)
            .map(|n| to_bounded(n, MAX_SUBSCORE))
            .unwrap_or(0)
    };

    let mut record = ScoreRecord {
        percentage: to_bounded(reported, MAX_PERCENTAGE),
        comprehension_score: subscore(&score.puntuacion_comprension),
        iso9001_score: subscore(&score.puntuacion_iso9001),
        structure_score: subscore(&score.puntuacion_estructura),
        completeness_score: subscore(&score.puntuacion_completitud),
        strengths: text_list(score.fortalezas.as_ref()),
        improvement_areas: text_list(score.areas_mejora.as_ref()),
        detail,
    };

    // 不单独信任 Oracle 给出的百分比
    let sum = record.subscore_sum();
    if sum < u32::from(record.percentage) {
        debug!(
            "报告百分比 {} 高于分项之和 {}，按分项之和计",
            record.percentage, sum
        );
        record.percentage = sum as u8;
    }

    Ok(record)
}

/// 兜底：从自由文本中提取评分
fn fallback_extract(raw: &str) -> ScoreRecord {
    let percentage = extract_percentage(raw).unwrap_or(0);
    let detail = extract_justification(raw).unwrap_or_else(|| raw.trim().to_string());
    let quarter = quarter_of(percentage);

    ScoreRecord {
        percentage,
        comprehension_score: quarter,
        iso9001_score: quarter,
        structure_score: quarter,
        completeness_score: quarter,
        strengths: Vec::new(),
        improvement_areas: vec![OFF_TOPIC_NOTE.to_string()],
        detail,
    }
}

/// 第一个 `N%`（允许小数）
fn extract_percentage(raw: &str) -> Option<u8> {
    let re = Regex::new(r"(\d+(?:[.,]\d+)?)\s*%").ok()?;
    let caps = re.captures(raw)?;
    let number: f64 = caps[1].replace(',', ".").parse().ok()?;
    Some(to_bounded(number, MAX_PERCENTAGE))
}

/// 以 "Justificación:" 开头的行（允许 Markdown 加粗、列表符号）
fn extract_justification(raw: &str) -> Option<String> {
    let re = Regex::new(r"(?im)^[\s>*_#-]*justificaci[oó]n[*_]*\s*:[*_]*[ \t]*(.+)$").ok()?;
    let caps = re.captures(raw)?;
    let text = caps[1].trim().trim_end_matches(['*', '_']).trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// 字符串列表；单个字符串视为只有一项
fn text_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(value_to_text)
            .filter(|s| !s.trim().is_empty())
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::ScriptedOracle;
    use std::sync::Arc;
    use std::time::Duration;

    const EXAMPLE: &str = r#"{"porcentaje": 85, "puntuacion_comprension": 20, "puntuacion_iso9001": 22, "puntuacion_estructura": 18, "puntuacion_completitud": 20, "fortalezas": [], "areas_mejora": [], "detalle": "x"}"#;

    #[test]
    fn test_reported_percentage_capped_by_subscores() {
        let outcome = evaluate_response(EXAMPLE);
        assert!(!outcome.is_degraded());
        let record = outcome.record();
        assert_eq!(record.percentage, 80);
        assert_eq!(record.iso9001_score, 22);
        assert_eq!(record.detail, "x");
    }

    #[test]
    fn test_lower_reported_percentage_is_kept() {
        let raw = r#"{"porcentaje": 40, "puntuacion_comprension": 20, "puntuacion_iso9001": 20, "puntuacion_estructura": 20, "puntuacion_completitud": 20, "detalle": "bien"}"#;
        assert_eq!(evaluate_response(raw).record().percentage, 40);
    }

    #[test]
    fn test_missing_subscores_default_to_zero() {
        let raw = r#"{"porcentaje": 70, "puntuacion_comprension": 15, "detalle": "parcial"}"#;
        let record = evaluate_response(raw).into_record();
        assert_eq!(record.structure_score, 0);
        assert_eq!(record.percentage, 15);
        assert!(record.strengths.is_empty());
    }

    #[test]
    fn test_fenced_json_with_string_numbers() {
        let raw = "```json\n{\"porcentaje\": \"60%\", \"puntuacion_comprension\": \"15\", \"puntuacion_iso9001\": 15.4, \"puntuacion_estructura\": 15, \"puntuacion_completitud\": 15, \"fortalezas\": [\"Clara\", \"\"], \"areas_mejora\": \"Citar cláusulas\", \"detalle\": \"ok\"}\n```";
        let outcome = evaluate_response(raw);
        assert!(!outcome.is_degraded());
        let record = outcome.record();
        assert_eq!(record.percentage, 60);
        assert_eq!(record.iso9001_score, 15);
        assert_eq!(record.strengths, vec!["Clara"]);
        assert_eq!(record.improvement_areas, vec!["Citar cláusulas"]);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let raw = r#"{"porcentaje": 140, "puntuacion_comprension": 40, "puntuacion_iso9001": -3, "puntuacion_estructura": 25, "puntuacion_completitud": 25, "detalle": "?"}"#;
        let record = evaluate_response(raw).into_record();
        assert_eq!(record.comprehension_score, 25);
        assert_eq!(record.iso9001_score, 0);
        assert_eq!(record.percentage, 75);
    }

    #[test]
    fn test_missing_required_field_degrades() {
        let raw = r#"{"puntuacion_comprension": 20, "detalle": "sin porcentaje"}"#;
        assert!(matches!(
            parse_strict(raw),
            Err(ParseError::MissingRequiredField { field: "porcentaje" })
        ));

        let raw = r#"{"porcentaje": 50, "puntuacion_comprension": 20}"#;
        assert!(matches!(
            parse_strict(raw),
            Err(ParseError::MissingRequiredField { field: "detalle" })
        ));
        assert!(evaluate_response(raw).is_degraded());
    }

    #[test]
    fn test_english_keys_accepted() {
        let raw = r#"{"percentage": 90, "comprehensionScore": 25, "iso9001Score": 25, "structureScore": 20, "completenessScore": 20, "detail": "en"}"#;
        let outcome = evaluate_response(raw);
        assert!(!outcome.is_degraded());
        assert_eq!(outcome.record().percentage, 90);
    }

    #[test]
    fn test_fallback_percentage_and_rounding() {
        let outcome = evaluate_response("La similitud es 42% entre ambas resoluciones.");
        assert!(outcome.is_degraded());
        let record = outcome.record();
        assert_eq!(record.percentage, 42);
        assert_eq!(record.comprehension_score, 11);
        assert_eq!(record.iso9001_score, 11);
        assert_eq!(record.structure_score, 11);
        assert_eq!(record.completeness_score, 11);
        assert!(record.strengths.is_empty());
        assert_eq!(record.improvement_areas, vec![OFF_TOPIC_NOTE]);
    }

    #[test]
    fn test_fallback_half_boundary_low() {
        let record = evaluate_response("Similitud: 2 %").into_record();
        assert_eq!(record.percentage, 2);
        assert_eq!(record.completeness_score, 1);
    }

    #[test]
    fn test_fallback_justification_line() {
        let raw = "Similitud 30%\n**Justificación:** El estudiante no menciona la cláusula 9.2.\nOtro texto";
        let record = evaluate_response(raw).into_record();
        assert_eq!(record.percentage, 30);
        assert_eq!(record.detail, "El estudiante no menciona la cláusula 9.2.");
    }

    #[test]
    fn test_fallback_without_anything() {
        let raw = "  No puedo evaluar esto.  ";
        let record = evaluate_response(raw).into_record();
        assert_eq!(record.percentage, 0);
        assert_eq!(record.structure_score, 0);
        assert_eq!(record.detail, "No puedo evaluar esto.");
    }

    #[test]
    fn test_fractional_percentage_read_as_ratio() {
        let raw = r#"{"porcentaje": 0.85, "puntuacion_comprension": 20, "puntuacion_iso9001": 22, "puntuacion_estructura": 18, "puntuacion_completitud": 20, "detalle": "x"}"#;
        let outcome = evaluate_response(raw);
        assert!(!outcome.is_degraded());
        assert_eq!(outcome.record().percentage, 80);

        let raw = r#"{"porcentaje": 0.5, "puntuacion_comprension": 25, "puntuacion_iso9001": 25, "puntuacion_estructura": 25, "puntuacion_completitud": 25, "detalle": "x"}"#;
        assert_eq!(evaluate_response(raw).record().percentage, 50);
    }

    #[test]
    fn test_fallback_decimal_percentage() {
        let record = evaluate_response("Resultado: 42,5% aproximado").into_record();
        assert_eq!(record.percentage, 43);
    }

    #[tokio::test]
    async fn test_compare_sends_both_resolutions() {
        let oracle = Arc::new(ScriptedOracle::with_responses([EXAMPLE]));
        let evaluator =
            ComparisonEvaluator::new(ContentGenerator::new(oracle.clone(), Duration::ZERO));

        let outcome = evaluator
            .compare("resolución IA", "resolución usuario")
            .await
            .unwrap();

        assert_eq!(outcome.record().percentage, 80);
        let prompt = &oracle.prompts()[0];
        assert!(prompt.contains("resolución IA"));
        assert!(prompt.contains("resolución usuario"));
    }

    #[tokio::test]
    async fn test_compare_propagates_upstream_error() {
        let oracle = Arc::new(ScriptedOracle::new());
        oracle.push_err(UpstreamError::BadStatus {
            status: 500,
            message: None,
        });
        let evaluator = ComparisonEvaluator::new(ContentGenerator::new(oracle, Duration::ZERO));

        assert!(evaluator.compare("a", "b").await.is_err());
    }
}
