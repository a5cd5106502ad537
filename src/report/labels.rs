//! 报告中使用的固定文案

use phf::phf_map;

use crate::models::ScoreCategory;

/// 评分维度的展示名称，按 Oracle 字段名索引
static SCORE_LABELS: phf::Map<&'static str, &'static str> = phf_map! {
    "puntuacion_comprension" => "Comprensión del problema",
    "puntuacion_iso9001" => "Aplicación ISO 9001",
    "puntuacion_estructura" => "Estructura y organización",
    "puntuacion_completitud" => "Completitud de la solución",
};

pub const REPORT_TITLE: &str = "Informe de resolución del caso ISO 9001";
pub const SECTION_CASE: &str = "Caso de estudio";
pub const SECTION_USER: &str = "Tu resolución";
pub const SECTION_AI: &str = "Resolución de la IA";
pub const SECTION_SCORES: &str = "Análisis de similitud";
pub const SECTION_STRENGTHS: &str = "Fortalezas identificadas";
pub const SECTION_IMPROVEMENTS: &str = "Áreas de mejora";
pub const SECTION_DETAIL: &str = "Análisis detallado";
pub const DEGRADED_NOTE: &str =
    "Nota: la evaluación se obtuvo de una respuesta no estructurada y puede ser menos precisa.";

/// 评分维度的展示名称
pub fn score_label(category: ScoreCategory) -> &'static str {
    let key = category.wire_key();
    SCORE_LABELS.get(key).copied().unwrap_or(key)
}

/// 页脚
pub fn page_footer(page: usize, total: usize) -> String {
    format!("Página {} de {}", page, total)
}
