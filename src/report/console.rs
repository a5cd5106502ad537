//! 终端输出格式

use super::labels::{self, score_label};
use super::markdown_lite::to_plain;
use crate::models::{
    GradingOutcome, ScoreBand, ScoreCategory, ScoreOutcome, MAX_PERCENTAGE, MAX_SUBSCORE,
};

/// 评分摘要，带等级符号
pub fn render_scores(outcome: &ScoreOutcome) -> String {
    let record = outcome.record();
    let mut lines = vec![format!(
        "{} Similitud global: {}%",
        ScoreBand::classify(u32::from(record.percentage), u32::from(MAX_PERCENTAGE)).symbol(),
        record.percentage
    )];

    for category in ScoreCategory::ALL {
        let score = record.subscore(category);
        lines.push(format!(
            "  {} {}: {}/{}",
            ScoreBand::classify(u32::from(score), u32::from(MAX_SUBSCORE)).symbol(),
            score_label(category),
            score,
            MAX_SUBSCORE
        ));
    }

    if !record.strengths.is_empty() {
        lines.push(format!("\n{}:", labels::SECTION_STRENGTHS));
        lines.extend(record.strengths.iter().map(|s| format!("  • {}", s)));
    }
    if !record.improvement_areas.is_empty() {
        lines.push(format!("\n{}:", labels::SECTION_IMPROVEMENTS));
        lines.extend(record.improvement_areas.iter().map(|s| format!("  • {}", s)));
    }
    if !record.detail.trim().is_empty() {
        lines.push(format!("\n{}:", labels::SECTION_DETAIL));
        lines.push(to_plain(&record.detail));
    }
    if outcome.is_degraded() {
        lines.push(format!("\n{}", labels::DEGRADED_NOTE));
    }

    lines.join("\n")
}

/// 自测批改结果
pub fn render_grading(outcome: &GradingOutcome) -> String {
    let report = outcome.report();
    let total = report.results.len();
    let mut lines = vec![format!(
        "{} Puntuación: {}/{}",
        ScoreBand::classify(report.score, total as u32).symbol(),
        report.score,
        total
    )];

    for (i, grade) in report.results.iter().enumerate() {
        lines.push(String::new());
        lines.push(format!(
            "{} {}. {}",
            if grade.is_correct { "✓" } else { "✗" },
            i + 1,
            grade.question
        ));
        lines.push(format!("   Tu respuesta: {}", grade.user_answer));
        if !grade.ideal_answer.is_empty() {
            lines.push(format!("   Respuesta ideal: {}", grade.ideal_answer));
        }
        if !grade.feedback.is_empty() {
            lines.push(format!("   {}", to_plain(&grade.feedback)));
        }
    }

    lines.join("\n")
}
