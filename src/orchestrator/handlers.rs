//! HTTP 处理函数
//!
//! 每个处理函数把所有失败收敛为一次重定向 + flash 提示，
//! 不返回部分结果

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::rejection::FormRejection;
use axum::extract::{Extension, Form, Query};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{AppError, AppResult, ValidationError};
use crate::models::{sanitize_file_name, DocumentKind, UploadedDocument};
use crate::orchestrator::pages;
use crate::orchestrator::AppState;
use crate::services::exporter;
use crate::workflow::UploadCtx;

#[derive(Debug, Default, Deserialize)]
pub struct FlashQuery {
    pub flash: Option<String>,
}

/// 下载表单
#[derive(Debug, Deserialize)]
pub struct DownloadForm {
    pub summary: String,
    pub mcqs: String,
    #[serde(default = "default_output_format")]
    pub output_format: String,
    #[serde(default = "default_original_filename")]
    pub original_filename: String,
}

fn default_output_format() -> String {
    "pdf".to_string()
}

fn default_original_filename() -> String {
    "output".to_string()
}

/// 重定向回上传页并携带提示信息
pub fn redirect_with_flash(message: &str) -> Response {
    let location = serde_urlencoded::to_string([("flash", message)])
        .map(|query| format!("/?{}", query))
        .unwrap_or_else(|_| "/".to_string());
    Redirect::to(&location).into_response()
}

/// GET / 上传页
pub async fn handle_index(Query(query): Query<FlashQuery>) -> Html<String> {
    Html(pages::render_index(query.flash.as_deref()))
}

/// POST / 上传并处理文档
pub async fn handle_upload(
    Extension(state): Extension<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let request_id = state.next_request_id.fetch_add(1, Ordering::Relaxed) + 1;

    let document = match multipart {
        Ok(multipart) => read_upload(multipart, state.config.max_upload_bytes).await,
        Err(rejection) => Err(ValidationError::MalformedUpload {
            reason: rejection.body_text(),
        }
        .into()),
    };

    let document = match document {
        Ok(document) => document,
        Err(e) => {
            warn!("[上传 #{}] ⚠️ 上传被拒绝: {:?}", request_id, e);
            return redirect_with_flash(&e.user_message());
        }
    };

    let mut ctx = UploadCtx::new(request_id, document.file_name.clone(), document.kind);
    match state.flow.run(document, &mut ctx).await {
        Ok(results) => Html(pages::render_results(&results)).into_response(),
        Err(e) => redirect_with_flash(&e.user_message()),
    }
}

/// 从 multipart 中读取 `file` 字段并校验
///
/// 文件类型和大小都在任何处理之前检查
async fn read_upload(mut multipart: Multipart, max_bytes: usize) -> AppResult<UploadedDocument> {
    loop {
        let field = multipart.next_field().await.map_err(|e| multipart_error(e, max_bytes))?;
        let Some(field) = field else {
            return Err(ValidationError::NoFileSelected.into());
        };
        if field.name() != Some("file") {
            continue;
        }

        let raw_name = field.file_name().unwrap_or_default().to_string();
        if raw_name.is_empty() {
            return Err(ValidationError::NoFileSelected.into());
        }

        let kind = DocumentKind::from_file_name(&raw_name).ok_or_else(|| ValidationError::InvalidFileType {
            file_name: raw_name.clone(),
        })?;

        let bytes = field.bytes().await.map_err(|e| multipart_error(e, max_bytes))?;
        if bytes.len() > max_bytes {
            return Err(ValidationError::FileTooLarge { limit: max_bytes }.into());
        }

        let mut file_name = sanitize_file_name(&raw_name);
        if file_name.is_empty() {
            file_name = format!("upload.{}", kind.extension());
        }

        info!("📥 收到上传: {} ({} 字节)", file_name, bytes.len());
        return Ok(UploadedDocument::new(file_name, kind, bytes.to_vec()));
    }
}

fn multipart_error(e: axum::extract::multipart::MultipartError, max_bytes: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ValidationError::FileTooLarge { limit: max_bytes }.into()
    } else {
        ValidationError::MalformedUpload {
            reason: e.body_text(),
        }
        .into()
    }
}

/// POST /download 导出结果文件
pub async fn handle_download(form: Result<Form<DownloadForm>, FormRejection>) -> Response {
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => {
            warn!("⚠️ 下载表单无效: {}", rejection.body_text());
            return redirect_with_flash("Missing summary or MCQs to export");
        }
    };

    match exporter::export(&form.summary, &form.mcqs, &form.output_format) {
        Ok(document) => {
            let original = sanitize_file_name(&form.original_filename);
            let original = if original.is_empty() { default_original_filename() } else { original };
            let file_name = document.file_name(&original);
            info!("📤 导出 {} ({} 字节)", file_name, document.bytes.len());

            (
                [
                    (header::CONTENT_TYPE, document.mime_type().to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", file_name),
                    ),
                ],
                document.bytes,
            )
                .into_response()
        }
        Err(e) => {
            let e = AppError::from(e);
            warn!("⚠️ 导出失败 ({}): {}", form.output_format, e);
            redirect_with_flash(&e.user_message())
        }
    }
}

/// GET /health
pub async fn handle_health() -> &'static str {
    "ok"
}
