//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层是 HTTP 入口，负责请求分发和用户可见的错误提示。
//!
//! ## 模块划分
//!
//! ### `app` - Web 应用
//! - 管理应用生命周期（初始化、运行、退出）
//! - 装配路由和请求体大小限制
//!
//! ### `handlers` - 请求处理
//! - 校验上传（文件名、类型、大小）
//! - 调用 `UploadFlow` 处理上传
//! - 调用导出服务生成下载文件
//! - 所有失败统一转为重定向 + flash 提示
//!
//! ### `pages` - 页面渲染
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator (HTTP 请求)
//!     ↓
//! workflow::UploadFlow (处理单次上传)
//!     ↓
//! services (能力层：extract / llm / summarize / questions / export)
//!     ↓
//! infrastructure (基础设施：TempUpload)
//! ```

pub mod app;
pub mod handlers;
pub mod pages;

pub use app::{build_router, App, AppState};
