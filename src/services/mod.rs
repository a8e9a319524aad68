pub mod exporter;
pub mod extractor;
pub mod llm_service;
mod pdf_font;
pub mod question_generator;
pub mod summarizer;

pub use llm_service::{GenerativeTextService, LlmService};
