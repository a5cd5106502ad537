//! # ISO Case Lab
//!
//! ISO 9001 案例练习工具：生成案例、生成 AI 解答、与用户解答比较评分、
//! 自测问答，并导出分页报告。
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Clients / Infrastructure）
//! - `clients/` - `Oracle` trait 及其实现（`GeminiClient`、`ScriptedOracle`）
//! - `infrastructure/` - `LocalStore`，基于文件的键值存储
//!
//! ### ② 业务能力层（Services）
//! - `ContentGenerator` - 统一的 Oracle 调用入口，负责调用间隔
//! - `ComparisonEvaluator` - 比较两份解答并标准化评分
//! - `SelfTestService` - 生成问题并批改回答
//!
//! ### ③ 流程层（Workflow）
//! - `ResolutionFlow` - AI 解答 → 用户解答 → 比较
//! - `SelfTestFlow` - 出题 → 作答 → 批改
//! - `SessionState` - 一轮解答的全部状态
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator::App` - 按命令组装流程
//!
//! ### 展示层（Report）
//! - `report/` - 终端输出、Markdown 转纯文本、分页报告导出
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod report;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{GeminiClient, Oracle, ScriptedOracle};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::LocalStore;
pub use models::{CaseRecord, GradingOutcome, QuestionSet, ScoreOutcome, ScoreRecord};
pub use orchestrator::App;
pub use report::{PageLayout, ReportDocument};
pub use workflow::{ResolutionFlow, SelfTestFlow, SessionState, Step};
