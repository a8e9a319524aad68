//! 选择题生成服务 - 业务能力层

use tracing::{error, info};

use crate::services::llm_service::GenerativeTextService;

/// 默认题目数量
pub const DEFAULT_QUESTION_COUNT: usize = 30;
/// 默认选择题 token 上限
pub const MCQ_MAX_TOKENS: u32 = 1500;

/// 构建选择题提示词
pub fn build_mcq_prompt(summary: &str, count: usize) -> String {
    format!(
        r#"Generate {count} multiple-choice questions with four options and clear correct answers based on:
{summary}
Format each question as:
Question X: [text]
A) [option]
B) [option]
C) [option]
D) [option]
Correct Answer: [Letter]"#
    )
}

/// 基于摘要生成选择题文本
///
/// 返回值是未解析的原始文本，失败时记录日志并返回 `None`
pub async fn generate_questions(
    service: &dyn GenerativeTextService,
    summary: &str,
    count: usize,
    max_output_tokens: u32,
) -> Option<String> {
    let prompt = build_mcq_prompt(summary, count);

    match service.complete(&prompt, max_output_tokens).await {
        Ok(text) if !text.trim().is_empty() => {
            info!("✓ 选择题生成完成: {} 字符", text.chars().count());
            Some(text)
        }
        Ok(_) => {
            error!("MCQ generation error: 模型 {} 返回空内容", service.model_name());
            None
        }
        Err(e) => {
            error!("MCQ generation error: {:#}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::llm_service::mock::MockGenerativeService;

    #[test]
    fn test_prompt_contains_layout() {
        let prompt = build_mcq_prompt("Foxes jump.", 30);
        assert!(prompt.starts_with("Generate 30 multiple-choice questions"));
        assert!(prompt.contains("Foxes jump."));
        assert!(prompt.contains("Question X: [text]"));
        assert!(prompt.contains("D) [option]"));
        assert!(prompt.ends_with("Correct Answer: [Letter]"));
    }

    #[tokio::test]
    async fn test_generate_uses_count_and_cap() {
        let service = MockGenerativeService::new(vec![Ok("Question 1: ...".to_string())]);

        let text = generate_questions(&service, "summary", 5, MCQ_MAX_TOKENS).await;
        assert_eq!(text.as_deref(), Some("Question 1: ..."));

        let prompts = service.prompts.lock().unwrap();
        assert!(prompts[0].0.starts_with("Generate 5 multiple-choice questions"));
        assert_eq!(prompts[0].1, 1500);
    }

    #[tokio::test]
    async fn test_generate_error_is_absent() {
        let service = MockGenerativeService::new(vec![Err("timeout".to_string())]);
        assert!(generate_questions(&service, "summary", DEFAULT_QUESTION_COUNT, MCQ_MAX_TOKENS)
            .await
            .is_none());
    }
}
