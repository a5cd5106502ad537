//! 分数相关的数值处理
//!
//! 取整规则统一为四舍五入（round half up）：10.5 → 11，0.5 → 1。

use serde_json::Value;

/// 宽松地把 JSON 值读成数字
///
/// 接受整数、浮点数以及数字字符串（允许末尾带 `%`）。
pub fn lenient_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    }
}

/// 四舍五入并限制在 `[0, max]` 区间
pub fn to_bounded(value: f64, max: u8) -> u8 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    // 正数时 f64::round 即 round half up
    let rounded = value.round();
    if rounded >= f64::from(max) {
        max
    } else {
        rounded as u8
    }
}

/// 把 `(0, 1)` 之间的小数视为比例，换算成百分数
///
/// `0.85` → `85.0`；`1.0` 及以上原样返回。
pub fn ratio_to_percentage(value: f64) -> f64 {
    if value > 0.0 && value < 1.0 {
        value * 100.0
    } else {
        value
    }
}

/// 百分比的四分之一，四舍五入
///
/// 用整数运算，避免 `42 * 0.25` 之类的浮点表示问题。
pub fn quarter_of(percentage: u8) -> u8 {
    ((u32::from(percentage) * 25 + 50) / 100) as u8
}
