use serde::{Deserialize, Serialize};

/// 案例记录
///
/// 持久化格式为 JSON：`{"content": "...", "isCustom": false}`。
/// 旧版本只保存原始文本，读取时需兼容。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
    pub content: String,
    /// 是否为用户自行提交的案例
    #[serde(default)]
    pub is_custom: bool,
}

impl CaseRecord {
    /// 由 Oracle 生成的案例
    pub fn generated(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_custom: false,
        }
    }

    /// 用户提交的案例
    pub fn custom(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_custom: true,
        }
    }

    /// 从存储的字符串恢复案例
    ///
    /// 先按 JSON 格式的 `CaseRecord` 解析，失败时把原始文本当作
    /// 生成的案例内容（旧格式）。
    pub fn from_stored(raw: &str) -> Self {
        match serde_json::from_str::<CaseRecord>(raw) {
            Ok(record) => record,
            Err(_) => Self::generated(raw),
        }
    }

    /// 编码为存储格式
    pub fn to_stored(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_roundtrip_keeps_flags() {
        let record = CaseRecord::custom("Una empresa textil de Quito...");
        let stored = record.to_stored().unwrap();
        assert!(stored.contains("\"isCustom\":true"));
        assert_eq!(CaseRecord::from_stored(&stored), record);
    }

    #[test]
    fn test_legacy_raw_text_is_generated_case() {
        let record = CaseRecord::from_stored("Caso: planta de alimentos en Cuenca");
        assert_eq!(record.content, "Caso: planta de alimentos en Cuenca");
        assert!(!record.is_custom);
    }

    #[test]
    fn test_json_without_case_shape_is_legacy_text() {
        let raw = r#"{"questions": ["¿Qué hizo la empresa?"]}"#;
        let record = CaseRecord::from_stored(raw);
        assert_eq!(record.content, raw);
        assert!(!record.is_custom);
    }
}
