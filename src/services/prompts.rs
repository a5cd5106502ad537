//! 提示词模板
//!
//! 所有发给 Oracle 的提示词都在这里构建。面向用户的内容使用西班牙语。

/// 生成案例的固定提示词
pub const CASE_PROMPT: &str = "Genera un caso de estudio real o ficticio de 300 a 500 palabras sobre una empresa que implementa ISO 9001.
Incluye el contexto (sector, tamaño, ubicación), los problemas de calidad identificados
(no conformidades, quejas de clientes, procesos sin control, falta de indicadores),
las acciones tomadas para cumplir con ISO 9001 (auditorías internas, política de calidad, objetivos,
gestión de riesgos, acciones correctivas) y los resultados obtenidos (mejoras medibles, certificación, etc.).
El caso debe ser coherente, relevante para ISO 9001 y no contener información contradictoria.
Evita repetir casos que ya hayas generado: varía el sector, el país y los problemas.
Escribe el texto en español.";

/// 提示词：让 Oracle 给出参考解答
pub fn ai_resolution_prompt(case: &str) -> String {
    format!(
        "Resuelve este caso de estudio sobre ISO 9001 de manera detallada y estructurada. Incluye:
1. Análisis del problema
2. Aplicación de principios ISO 9001
3. Plan de implementación
4. Resultados esperados

Caso de estudio:
{}",
        case
    )
}

/// 提示词：比较参考解答与用户解答
pub fn comparison_prompt(reference: &str, candidate: &str) -> String {
    format!(
        r#"Eres un auditor experto en ISO 9001. Compara la resolución del estudiante con la resolución de referencia.

Resolución de referencia:
"""
{reference}
"""

Resolución del estudiante:
"""
{candidate}
"""

Criterios (cada uno de 0 a 25 puntos):
- puntuacion_comprension: comprensión del problema planteado en el caso.
- puntuacion_iso9001: aplicación correcta de los requisitos y principios de ISO 9001.
- puntuacion_estructura: estructura y organización de la respuesta.
- puntuacion_completitud: completitud de la solución propuesta.

Reglas:
- Si la resolución del estudiante no trata sobre el caso, es irrelevante o está vacía de contenido,
  el porcentaje debe estar entre 0 y 5 y todas las puntuaciones deben ser mínimas.
- El porcentaje no puede superar la suma de las cuatro puntuaciones.

Devuelve solo un objeto JSON válido (sin texto adicional ni bloques de código) con esta estructura:
{{
  "porcentaje": 0,
  "puntuacion_comprension": 0,
  "puntuacion_iso9001": 0,
  "puntuacion_estructura": 0,
  "puntuacion_completitud": 0,
  "fortalezas": ["..."],
  "areas_mejora": ["..."],
  "detalle": "..."
}}"#
    )
}

/// 提示词：根据案例生成开放式问题
pub fn questions_prompt(case: &str, count: usize) -> String {
    format!(
        r#"Dado el siguiente caso de estudio sobre la implementación de ISO 9001:
"""
{case}
"""
Genera {count} preguntas abiertas que:
1. Se centren en las acciones tomadas para cumplir ISO 9001.
2. Indaguen en los problemas identificados y sus soluciones.
3. Sean claras y directas.

Devuélvelas solo en JSON puro (sin triple backticks ni texto extra) con esta estructura:
{{
  "questions": ["Pregunta 1", "Pregunta 2"]
}}"#
    )
}

/// 提示词：批改用户回答
pub fn grading_prompt(case: &str, questions: &[String], answers: &[String]) -> String {
    let questions_list = numbered(questions);
    let answers_list = numbered(answers);

    format!(
        r#"Dado el siguiente caso de estudio:
"""
{case}
"""
Y estas preguntas:
{questions_list}

El usuario respondió:
{answers_list}

Ahora:
1. Genera la respuesta ideal a cada pregunta basada en el caso.
2. Para cada pregunta, compara la respuesta del usuario con la ideal e indica si es correcta.
3. Da retroalimentación sobre en qué se equivocó o cómo mejorar.
4. "score" es el número de respuestas correctas.

Devuélvelo solo en JSON puro con esta estructura:
{{
  "results": [
    {{
      "question": "...",
      "userAnswer": "...",
      "idealAnswer": "...",
      "isCorrect": true,
      "feedback": "..."
    }}
  ],
  "score": 0
}}"#
    )
}

fn numbered(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_prompt_lists_wire_fields() {
        let prompt = comparison_prompt("referencia", "estudiante");
        for key in [
            "porcentaje",
            "puntuacion_comprension",
            "puntuacion_iso9001",
            "puntuacion_estructura",
            "puntuacion_completitud",
            "fortalezas",
            "areas_mejora",
            "detalle",
        ] {
            assert!(prompt.contains(key), "缺少字段 {}", key);
        }
        assert!(prompt.contains("entre 0 y 5"));
        assert!(prompt.contains("referencia") && prompt.contains("estudiante"));
    }

    #[test]
    fn test_grading_prompt_numbers_items() {
        let prompt = grading_prompt(
            "caso",
            &["¿Qué?".to_string(), "¿Cómo?".to_string()],
            &["Esto".to_string(), String::new()],
        );
        assert!(prompt.contains("1. ¿Qué?\n2. ¿Cómo?"));
        assert!(prompt.contains("1. Esto\n2. "));
    }
}
