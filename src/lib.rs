//! # Doc Quiz
//!
//! 上传文档（PDF / DOCX / TXT），由 LLM 生成摘要和选择题，并导出为 PDF / DOCX / CSV
//!
//! ## 架构设计
//!
//! 本系统采用四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源，只暴露能力
//! - `TempUpload` - 上传临时文件的唯一持有者，离开作用域即删除
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `extractor` - 文档文本提取
//! - `LlmService` - 调用生成式模型（`GenerativeTextService`）
//! - `summarizer` / `question_generator` - 摘要与选择题
//! - `exporter` - 导出下载文件
//!
//! ### ③ 流程层（Workflow）
//! - `UploadCtx` - 上下文封装（请求序号 + 文件 + 当前阶段）
//! - `UploadFlow` - 流程编排（提取 → 摘要 → 出题）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/` - HTTP 入口，路由与错误提示
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::TempUpload;
pub use models::{DocumentKind, ExportFormat, McqQuestion, QuestionSet};
pub use orchestrator::App;
pub use services::{GenerativeTextService, LlmService};
pub use workflow::{StudyResults, UploadCtx, UploadFlow};
