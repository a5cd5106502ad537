//! 从 Oracle 的自由文本响应中提取 JSON
//!
//! 模型经常在 JSON 前后加说明文字或 Markdown 代码块，这里负责
//! 找出第一个完整的 JSON 对象并解析。失败原因见 [`ParseError`]。

use serde::de::DeserializeOwned;

use crate::error::ParseError;

/// 去掉包裹在外层的 Markdown 代码块标记
///
/// ```
/// use iso_case_lab::utils::json_extract::strip_code_fences;
/// assert_eq!(strip_code_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
/// ```
pub fn strip_code_fences(text: &str) -> &str {
    let mut s = text.trim();
    if let Some(rest) = s.strip_prefix("```") {
        // 跳过语言标记（如 ```json）
        s = match rest.find('\n') {
            Some(pos) => &rest[pos + 1..],
            None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
        };
    }
    if let Some(rest) = s.trim_end().strip_suffix("```") {
        s = rest;
    }
    s.trim()
}

/// 找到文本中第一个括号配平的 JSON 对象
///
/// 会跳过字符串字面量中的括号。如果某个 `{` 始终无法配平，
/// 从下一个 `{` 继续尝试。
pub fn extract_json_object(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut search_from = 0;

    while let Some(offset) = text[search_from..].find('{') {
        let start = search_from + offset;
        if let Some(end) = balanced_end(bytes, start) {
            return Some(&text[start..=end]);
        }
        search_from = start + 1;
    }

    None
}

/// 返回与 `start` 处 `{` 配对的 `}` 的位置
fn balanced_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth: usize = 0;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, &byte) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }

    None
}

/// 去掉代码块、提取第一个 JSON 对象并反序列化
pub fn parse_json_object<T: DeserializeOwned>(text: &str) -> Result<T, ParseError> {
    let stripped = strip_code_fences(text);
    let json = extract_json_object(stripped).ok_or(ParseError::NoJsonFound)?;
    Ok(serde_json::from_str(json)?)
}
