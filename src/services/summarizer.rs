//! 摘要服务 - 业务能力层

use tracing::{error, info};

use crate::services::llm_service::GenerativeTextService;
use crate::utils::logging::truncate_text;

/// 默认摘要 token 上限
pub const SUMMARY_MAX_TOKENS: u32 = 500;

/// 构建摘要提示词
pub fn build_summary_prompt(text: &str) -> String {
    format!("Summarize the following text clearly and concisely:\n\n{}", text)
}

/// 生成摘要
///
/// 调用失败或返回空内容时记录日志并返回 `None`，不重试
pub async fn summarize(
    service: &dyn GenerativeTextService,
    text: &str,
    max_output_tokens: u32,
) -> Option<String> {
    let prompt = build_summary_prompt(text);

    match service.complete(&prompt, max_output_tokens).await {
        Ok(summary) if !summary.trim().is_empty() => {
            info!("✓ 摘要生成完成: {}", truncate_text(&summary, 60));
            Some(summary)
        }
        Ok(_) => {
            error!("Summarization error: 模型 {} 返回空摘要", service.model_name());
            None
        }
        Err(e) => {
            error!("Summarization error: {:#}", e);
            None
        }
    }
}
