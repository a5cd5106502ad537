//! 展示层：终端输出与报告导出

pub mod console;
pub mod document;
pub mod labels;
pub mod markdown_lite;

pub use console::{render_grading, render_scores};
pub use document::{PageLayout, ReportDocument};
pub use markdown_lite::to_plain;
