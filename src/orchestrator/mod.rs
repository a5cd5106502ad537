//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 为每条命令组装所需的资源和流程，是整个系统的"指挥中心"。
//!
//! ## 层次关系
//!
//! ```text
//! case_lab::App (配置 / 存储 / Oracle)
//!     ↓
//! workflow (ResolutionFlow / SelfTestFlow)
//!     ↓
//! services (生成 / 比较 / 自测)
//!     ↓
//! clients + infrastructure (Oracle / LocalStore)
//! ```
//!
//! ## 设计原则
//!
//! 1. **资源集中**：只有编排层创建 Oracle 客户端和存储
//! 2. **向下依赖**：编排层 → workflow → services → clients / infrastructure
//! 3. **无业务逻辑**：只做组装，不做评分或解析

pub mod case_lab;

pub use case_lab::App;
