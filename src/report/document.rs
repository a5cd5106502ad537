//! 分页报告文档
//!
//! 按固定顺序排列各部分：标题、案例、用户解答、AI 解答、评分、
//! 优点、改进点、详细分析。每页末尾带 `Página N de M` 页脚，
//! 页与页之间以换页符分隔。

use std::path::Path;

use chrono::{DateTime, Local};
use tracing::info;

use super::labels::{self, score_label};
use super::markdown_lite::to_plain;
use crate::error::{AppResult, StorageError, ValidationError};
use crate::models::{ScoreCategory, ScoreOutcome, MAX_SUBSCORE};
use crate::workflow::SessionState;

const PAGE_BREAK: &str = "\u{000C}";
const EMPTY_LIST: &str = "(Sin elementos)";
const EMPTY_TEXT: &str = "(Sin contenido)";

/// 页面尺寸（按字符计）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    /// 每行最多字符数
    pub line_width: usize,
    /// 每页总行数（包含空行和页脚）
    pub lines_per_page: usize,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            line_width: 90,
            lines_per_page: 56,
        }
    }
}

impl PageLayout {
    /// 每页正文可用行数，留出一行空白和一行页脚
    fn body_lines(&self) -> usize {
        self.lines_per_page.saturating_sub(2).max(1)
    }
}

/// 已排版好的报告
#[derive(Debug, Clone)]
pub struct ReportDocument {
    pages: Vec<Vec<String>>,
}

impl ReportDocument {
    /// 用当前时间生成报告
    pub fn from_session(state: &SessionState, layout: PageLayout) -> AppResult<Self> {
        Self::build(state, layout, Local::now())
    }

    /// 生成报告
    ///
    /// # 参数
    /// * `state` - 已完成比较的会话
    /// * `layout` - 页面尺寸
    /// * `generated_at` - 写入标题区的生成时间
    ///
    /// # 返回
    /// 会话尚未完成比较时返回 `ValidationError::StepOutOfOrder`
    pub fn build(
        state: &SessionState,
        layout: PageLayout,
        generated_at: DateTime<Local>,
    ) -> AppResult<Self> {
        let outcome = state.comparison().ok_or(ValidationError::StepOutOfOrder {
            current: state.step().name(),
            action: "导出报告",
        })?;

        let width = layout.line_width.max(20);
        let mut lines = Vec::new();

        lines.push(labels::REPORT_TITLE.to_string());
        lines.push("=".repeat(labels::REPORT_TITLE.chars().count()));
        lines.push(format!("Generado: {}", generated_at.format("%d/%m/%Y %H:%M")));
        lines.push(format!(
            "Tipo de caso: {}",
            if state.case().is_custom {
                "Personalizado"
            } else {
                "Generado por IA"
            }
        ));
        lines.push(String::new());

        push_section(&mut lines, labels::SECTION_CASE, &state.case().content, width);
        push_section(&mut lines, labels::SECTION_USER, state.user_resolution(), width);
        push_section(&mut lines, labels::SECTION_AI, state.ai_resolution(), width);
        push_scores(&mut lines, outcome, width);

        let record = outcome.record();
        push_list(&mut lines, labels::SECTION_STRENGTHS, &record.strengths, width);
        push_list(
            &mut lines,
            labels::SECTION_IMPROVEMENTS,
            &record.improvement_areas,
            width,
        );
        push_section(&mut lines, labels::SECTION_DETAIL, &record.detail, width);

        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }

        let pages = lines
            .chunks(layout.body_lines())
            .map(|chunk| chunk.to_vec())
            .collect();

        Ok(Self { pages })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// 各页正文（不含页脚）
    pub fn pages(&self) -> &[Vec<String>] {
        &self.pages
    }

    /// 渲染为纯文本，每页附带页脚
    pub fn render(&self) -> String {
        let total = self.page_count();
        self.pages
            .iter()
            .enumerate()
            .map(|(i, body)| {
                format!(
                    "{}\n\n{}\n",
                    body.join("\n"),
                    labels::page_footer(i + 1, total)
                )
            })
            .collect::<Vec<_>>()
            .join(PAGE_BREAK)
    }

    /// 写入文件，必要时创建父目录
    pub async fn write_to(&self, path: &Path) -> AppResult<()> {
        let write_failed = |source: std::io::Error| StorageError::WriteFailed {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(write_failed)?;
        }
        tokio::fs::write(path, self.render())
            .await
            .map_err(write_failed)?;

        info!("📄 报告已导出: {} ({} 页)", path.display(), self.page_count());
        Ok(())
    }
}

fn push_heading(lines: &mut Vec<String>, title: &str) {
    lines.push(title.to_uppercase());
    lines.push("-".repeat(title.chars().count()));
}

fn push_section(lines: &mut Vec<String>, title: &str, body: &str, width: usize) {
    push_heading(lines, title);
    let plain = to_plain(body);
    if plain.trim().is_empty() {
        lines.push(EMPTY_TEXT.to_string());
    } else {
        for line in plain.lines() {
            lines.extend(wrap_line(line, width));
        }
    }
    lines.push(String::new());
}

fn push_list(lines: &mut Vec<String>, title: &str, items: &[String], width: usize) {
    push_heading(lines, title);
    if items.is_empty() {
        lines.push(EMPTY_LIST.to_string());
    }
    for item in items {
        lines.extend(wrap_line(&format!("• {}", to_plain(item)), width));
    }
    lines.push(String::new());
}

fn push_scores(lines: &mut Vec<String>, outcome: &ScoreOutcome, width: usize) {
    let record = outcome.record();
    push_heading(lines, labels::SECTION_SCORES);
    lines.push(format!("Similitud global: {}%", record.percentage));
    for category in ScoreCategory::ALL {
        lines.push(format!(
            "  {}: {}/{}",
            score_label(category),
            record.subscore(category),
            MAX_SUBSCORE
        ));
    }
    if outcome.is_degraded() {
        lines.extend(wrap_line(labels::DEGRADED_NOTE, width));
    }
    lines.push(String::new());
}

/// 按单词折行，续行保持原缩进；超长单词按字符硬切
fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let indent: String = line.chars().take_while(|c| c.is_whitespace()).collect();
    let indent_len = indent.chars().count();
    let available = width.saturating_sub(indent_len).max(1);

    let mut out = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in line.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > available {
            if !current.is_empty() {
                out.push(format!("{}{}", indent, current));
                current.clear();
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(available) {
                out.push(format!("{}{}", indent, piece.iter().collect::<String>()));
            }
            continue;
        }

        let needed = if current.is_empty() {
            word_len
        } else {
            current_len + 1 + word_len
        };
        if needed > available {
            out.push(format!("{}{}", indent, current));
            current.clear();
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() || out.is_empty() {
        out.push(format!("{}{}", indent, current));
    }
    out
}
