//! 上传处理流程 - 流程层
//!
//! 核心职责：定义"一次上传"的完整处理流程
//!
//! 流程顺序：
//! 1. 暂存上传文件 → 提取文本 → 删除临时文件
//! 2. 文本 → 摘要
//! 3. 摘要 → 选择题
//!
//! 任何一步失败都直接结束，不返回部分结果

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{AppResult, ExtractionError, GenerationError};
use crate::infrastructure::TempUpload;
use crate::models::{QuestionSet, UploadedDocument};
use crate::services::{extractor, question_generator, summarizer, GenerativeTextService};
use crate::utils::logging::truncate_text;
use crate::workflow::upload_ctx::{FlowStage, UploadCtx};

/// 一次上传的处理结果
#[derive(Debug, Clone)]
pub struct StudyResults {
    /// 清洗后的原始文件名，下载时用作文件名前缀
    pub file_name: String,
    pub summary: String,
    pub questions: QuestionSet,
}

/// 上传处理流程
///
/// - 编排 提取 → 摘要 → 出题
/// - 临时文件只在提取期间存在
/// - 只依赖业务能力（services），不处理 HTTP
pub struct UploadFlow {
    service: Arc<dyn GenerativeTextService>,
    upload_folder: PathBuf,
    num_questions: usize,
    summary_max_tokens: u32,
    mcq_max_tokens: u32,
}

impl UploadFlow {
    /// 创建新的上传处理流程
    pub fn new(config: &Config, service: Arc<dyn GenerativeTextService>) -> Self {
        Self {
            service,
            upload_folder: PathBuf::from(&config.upload_folder),
            num_questions: config.num_questions,
            summary_max_tokens: config.summary_max_tokens,
            mcq_max_tokens: config.mcq_max_tokens,
        }
    }

    /// 运行完整流程，结束时 `ctx.stage` 为 `Done` 或 `Failed`
    pub async fn run(&self, document: UploadedDocument, ctx: &mut UploadCtx) -> AppResult<StudyResults> {
        info!("{} 📥 开始处理 ({} 字节)", ctx, document.bytes.len());

        let result = self.run_stages(document, ctx).await;

        match &result {
            Ok(results) => {
                ctx.advance(FlowStage::Done);
                info!("{} ✅ 处理完成，解析出 {} 道选择题", ctx, results.questions.len());
            }
            Err(e) => {
                ctx.advance(FlowStage::Failed(e.user_message()));
                error!("{} ❌ 处理失败: {}", ctx, e);
            }
        }

        result
    }

    async fn run_stages(&self, document: UploadedDocument, ctx: &mut UploadCtx) -> AppResult<StudyResults> {
        // ========== 阶段 1: 提取文本 ==========
        ctx.advance(FlowStage::Extracting);
        info!("{} 📄 {}...", ctx, ctx.stage);

        let text = self.extract(document).await?;
        info!("{} ✓ 提取到 {} 字符", ctx, text.chars().count());

        // ========== 阶段 2: 生成摘要 ==========
        ctx.advance(FlowStage::Summarizing);
        info!("{} 🤖 {}...", ctx, ctx.stage);

        let summary = summarizer::summarize(self.service.as_ref(), &text, self.summary_max_tokens)
            .await
            .ok_or(GenerationError::Summary)?;

        // ========== 阶段 3: 生成选择题 ==========
        ctx.advance(FlowStage::GeneratingQuestions);
        info!("{} 🤖 {} ({} 道)...", ctx, ctx.stage, self.num_questions);

        let raw_questions = question_generator::generate_questions(
            self.service.as_ref(),
            &summary,
            self.num_questions,
            self.mcq_max_tokens,
        )
        .await
        .ok_or(GenerationError::Questions)?;

        let questions = QuestionSet::from_raw(raw_questions);
        if !questions.is_fully_parsed() {
            warn!(
                "{} ⚠️ 只解析出 {}/{} 道选择题，按原文展示: {}",
                ctx,
                questions.len(),
                questions.marker_count(),
                truncate_text(&questions.raw, 80)
            );
        }

        Ok(StudyResults {
            file_name: ctx.file_name.clone(),
            summary,
            questions,
        })
    }

    /// 暂存文件并提取文本，返回前临时文件已删除
    ///
    /// 写盘和解析都在阻塞线程池中完成
    async fn extract(&self, document: UploadedDocument) -> AppResult<String> {
        let folder = self.upload_folder.clone();

        let text = tokio::task::spawn_blocking(move || -> std::io::Result<Option<String>> {
            let upload = TempUpload::store(&folder, &document)?;
            let kind = document.kind;
            drop(document);

            let text = extractor::extract_text(upload.path(), kind);
            drop(upload);
            Ok(text)
        })
        .await
        .unwrap_or_else(|e| {
            error!("提取任务异常结束: {}", e);
            Ok(None)
        })
        .map_err(|source| ExtractionError::Storage { source })?;

        match text {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(ExtractionError::NoText.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::DocumentKind;
    use crate::services::llm_service::mock::MockGenerativeService;

    const MCQS: &str = "Question 1: What does the fox jump over?
A) A fence
B) The lazy dog
C) A river
D) A log
Correct Answer: B";

    fn flow_with(dir: &tempfile::TempDir, service: Arc<MockGenerativeService>) -> UploadFlow {
        let config = Config {
            upload_folder: dir.path().to_string_lossy().to_string(),
            num_questions: 1,
            ..Config::default()
        };
        UploadFlow::new(&config, service)
    }

    fn txt_upload(text: &str) -> (UploadedDocument, UploadCtx) {
        let doc = UploadedDocument::new("fox.txt", DocumentKind::Txt, text.as_bytes().to_vec());
        let ctx = UploadCtx::new(1, "fox.txt", DocumentKind::Txt);
        (doc, ctx)
    }

    fn upload_dir_is_empty(dir: &tempfile::TempDir) -> bool {
        std::fs::read_dir(dir.path()).unwrap().next().is_none()
    }

    #[tokio::test]
    async fn test_full_flow_success() {
        let dir = tempfile::tempdir().unwrap();
        let service = Arc::new(MockGenerativeService::new(vec![
            Ok("A fox jumps over a dog.".to_string()),
            Ok(MCQS.to_string()),
        ]));
        let flow = flow_with(&dir, service.clone());
        let (doc, mut ctx) = txt_upload("The quick brown fox jumps over the lazy dog.");

        let results = flow.run(doc, &mut ctx).await.unwrap();

        assert_eq!(ctx.stage, FlowStage::Done);
        assert_eq!(results.file_name, "fox.txt");
        assert_eq!(results.summary, "A fox jumps over a dog.");
        assert!(results.questions.raw.contains("Question 1:"));
        assert_eq!(results.questions.len(), 1);

        // 摘要提示词带原文，出题提示词带摘要
        let prompts = service.prompts.lock().unwrap();
        assert!(prompts[0].0.contains("The quick brown fox jumps over the lazy dog."));
        assert!(prompts[1].0.contains("A fox jumps over a dog."));

        assert!(upload_dir_is_empty(&dir));
    }

    #[tokio::test]
    async fn test_empty_text_fails_before_llm() {
        let dir = tempfile::tempdir().unwrap();
        let service = Arc::new(MockGenerativeService::new(vec![]));
        let flow = flow_with(&dir, service.clone());
        let (doc, mut ctx) = txt_upload("   \n  ");

        let err = flow.run(doc, &mut ctx).await.unwrap_err();

        assert!(matches!(err, AppError::Extraction(ExtractionError::NoText)));
        assert_eq!(
            ctx.stage,
            FlowStage::Failed("Could not extract text from file".to_string())
        );
        assert!(service.prompts.lock().unwrap().is_empty());
        assert!(upload_dir_is_empty(&dir));
    }

    #[tokio::test]
    async fn test_corrupted_pdf_fails_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let flow = flow_with(&dir, Arc::new(MockGenerativeService::new(vec![])));
        let doc = UploadedDocument::new("bad.pdf", DocumentKind::Pdf, b"not a pdf".to_vec());
        let mut ctx = UploadCtx::new(2, "bad.pdf", DocumentKind::Pdf);

        let err = flow.run(doc, &mut ctx).await.unwrap_err();
        assert!(matches!(err, AppError::Extraction(ExtractionError::NoText)));
        assert!(upload_dir_is_empty(&dir));
    }

    #[tokio::test]
    async fn test_unwritable_upload_folder_reports_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_folder = dir.path().join("occupied");
        std::fs::write(&not_a_folder, b"file in the way").unwrap();

        let config = Config {
            upload_folder: not_a_folder.to_string_lossy().to_string(),
            ..Config::default()
        };
        let service = Arc::new(MockGenerativeService::new(vec![]));
        let flow = UploadFlow::new(&config, service.clone());
        let (doc, mut ctx) = txt_upload("Some text");

        let err = flow.run(doc, &mut ctx).await.unwrap_err();

        assert!(matches!(err, AppError::Extraction(ExtractionError::Storage { .. })));
        assert!(service.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_summary_failure_stops_flow() {
        let dir = tempfile::tempdir().unwrap();
        let service = Arc::new(MockGenerativeService::new(vec![Err("quota".to_string())]));
        let flow = flow_with(&dir, service.clone());
        let (doc, mut ctx) = txt_upload("Some text");

        let err = flow.run(doc, &mut ctx).await.unwrap_err();

        assert!(matches!(err, AppError::Generation(GenerationError::Summary)));
        assert_eq!(service.prompts.lock().unwrap().len(), 1);
        assert!(upload_dir_is_empty(&dir));
    }

    #[tokio::test]
    async fn test_question_failure_reports_mcq_error() {
        let dir = tempfile::tempdir().unwrap();
        let service = Arc::new(MockGenerativeService::new(vec![
            Ok("summary".to_string()),
            Err("timeout".to_string()),
        ]));
        let flow = flow_with(&dir, service);
        let (doc, mut ctx) = txt_upload("Some text");

        let err = flow.run(doc, &mut ctx).await.unwrap_err();

        assert_eq!(err.user_message(), "Failed to generate MCQs");
        assert_eq!(ctx.stage, FlowStage::Failed("Failed to generate MCQs".to_string()));
    }

    #[tokio::test]
    async fn test_unparseable_questions_still_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let service = Arc::new(MockGenerativeService::new(vec![
            Ok("summary".to_string()),
            Ok("Here are some thoughts instead of questions.".to_string()),
        ]));
        let flow = flow_with(&dir, service);
        let (doc, mut ctx) = txt_upload("Some text");

        let results = flow.run(doc, &mut ctx).await.unwrap();
        assert!(results.questions.is_empty());
        assert_eq!(results.questions.raw, "Here are some thoughts instead of questions.");
    }
}
