//! Web 应用 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：校验配置、准备上传目录、创建 LLM 服务
//! 2. **路由装配**：上传页、上传处理、结果下载、健康检查
//! 3. **运行服务**：监听端口，收到 Ctrl+C 后优雅退出

use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{DefaultBodyLimit, Extension};
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tracing::info;

use crate::config::Config;
use crate::error::AppResult;
use crate::orchestrator::handlers;
use crate::services::{GenerativeTextService, LlmService};
use crate::utils::logging::log_startup;
use crate::workflow::UploadFlow;

/// multipart 边界和表单头部预留的空间
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// 所有请求共享的只读状态
pub struct AppState {
    pub config: Config,
    pub flow: UploadFlow,
    /// 请求序号，仅用于日志
    pub next_request_id: AtomicU64,
}

/// 应用主结构
pub struct App {
    config: Config,
    router: Router,
}

impl App {
    /// 初始化应用（使用真实的 LLM 服务）
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let service: Arc<dyn GenerativeTextService> = Arc::new(LlmService::new(&config));
        let app = Self::with_service(config, service)?;

        tokio::fs::create_dir_all(&app.config.upload_folder)
            .await
            .with_context(|| format!("无法创建上传目录: {}", app.config.upload_folder))?;

        Ok(app)
    }

    /// 使用指定的生成服务创建应用
    pub fn with_service(config: Config, service: Arc<dyn GenerativeTextService>) -> AppResult<Self> {
        config.validate()?;

        let state = Arc::new(AppState {
            flow: UploadFlow::new(&config, service),
            config: config.clone(),
            next_request_id: AtomicU64::new(0),
        });

        Ok(Self {
            router: build_router(state),
            config,
        })
    }

    /// 获取路由（测试中直接驱动）
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// 运行 HTTP 服务
    pub async fn run(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.config.bind_addr)
            .await
            .with_context(|| format!("无法监听地址: {}", self.config.bind_addr))?;

        info!("✓ 服务已就绪: http://{}", listener.local_addr()?);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP 服务异常退出")?;

        info!("👋 服务已停止");
        Ok(())
    }
}

/// 装配路由
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD;

    Router::new()
        .route("/", get(handlers::handle_index).post(handlers::handle_upload))
        .route("/download", post(handlers::handle_download))
        .route("/health", get(handlers::handle_health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(Extension(state))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("无法监听退出信号: {}", e);
        std::future::pending::<()>().await;
    }
    info!("收到退出信号，正在停止服务...");
}
