//! 简易 Markdown 转纯文本
//!
//! Oracle 的输出常带 `**加粗**`、`#` 标题和列表符号，这里转换成
//! 适合终端和纯文本报告的格式。

use regex::Regex;

/// 转换为纯文本
///
/// - `# 标题` → 大写行
/// - `* 项` / `- 项` → `• 项`
/// - 去掉 `**` 和 `__`
/// - 连续空行合并为一行
pub fn to_plain(text: &str) -> String {
    let heading = Regex::new(r"^\s*#{1,6}\s+(.+?)\s*#*\s*$").ok();
    let bullet = Regex::new(r"^(\s*)[*\-+]\s+(.*)$").ok();

    let mut out: Vec<String> = Vec::new();
    let mut previous_blank = false;

    for line in text.lines() {
        let line = line.trim_end();

        if line.trim().is_empty() {
            if !previous_blank && !out.is_empty() {
                out.push(String::new());
            }
            previous_blank = true;
            continue;
        }
        previous_blank = false;

        let converted = if let Some(caps) = heading.as_ref().and_then(|re| re.captures(line)) {
            strip_emphasis(&caps[1]).to_uppercase()
        } else if let Some(caps) = bullet.as_ref().and_then(|re| re.captures(line)) {
            format!("{}• {}", &caps[1], strip_emphasis(&caps[2]))
        } else {
            strip_emphasis(line)
        };
        out.push(converted);
    }

    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }

    out.join("\n")
}

fn strip_emphasis(text: &str) -> String {
    text.replace("**", "").replace("__", "")
}
