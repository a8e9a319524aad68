use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{AppResult, ConfigError};
use crate::services::{question_generator, summarizer};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_FILE: &str = "doc_quiz.toml";

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP 监听地址
    pub bind_addr: String,
    /// 上传文件临时目录
    pub upload_folder: String,
    /// 上传文件大小上限（字节）
    pub max_upload_bytes: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- 生成配置 ---
    /// 每次生成的选择题数量
    pub num_questions: usize,
    /// 摘要输出 token 上限
    pub summary_max_tokens: u32,
    /// 选择题输出 token 上限
    pub mcq_max_tokens: u32,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
            upload_folder: "uploads".to_string(),
            max_upload_bytes: 16 * 1024 * 1024,
            verbose_logging: false,
            num_questions: question_generator::DEFAULT_QUESTION_COUNT,
            summary_max_tokens: summarizer::SUMMARY_MAX_TOKENS,
            mcq_max_tokens: question_generator::MCQ_MAX_TOKENS,
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            llm_model_name: "gemini-1.5-pro-latest".to_string(),
        }
    }
}

impl Config {
    /// 加载配置：默认值 → TOML 文件（可选）→ 环境变量
    pub fn load() -> AppResult<Self> {
        let path = std::env::var("DOC_QUIZ_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let base = if Path::new(&path).exists() {
            info!("📄 读取配置文件: {}", path);
            Self::from_toml_file(&path)?
        } else {
            Self::default()
        };
        Ok(base.with_env_overrides())
    }

    /// 从 TOML 文件读取配置，缺省字段使用默认值
    pub fn from_toml_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadFailed {
            path: path.to_string(),
            source: e,
        })?;
        let config = toml::from_str(&content).map_err(|e| ConfigError::TomlParseFailed {
            path: path.to_string(),
            source: e,
        })?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::TomlParseFailed {
            path: String::new(),
            source: e,
        })
    }

    /// 用环境变量覆盖已有配置
    pub fn with_env_overrides(self) -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(self.bind_addr),
            upload_folder: std::env::var("UPLOAD_FOLDER").unwrap_or(self.upload_folder),
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES").unwrap_or(self.max_upload_bytes),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(self.verbose_logging),
            num_questions: env_parse("NUM_QUESTIONS").unwrap_or(self.num_questions),
            summary_max_tokens: env_parse("SUMMARY_MAX_TOKENS").unwrap_or(self.summary_max_tokens),
            mcq_max_tokens: env_parse("MCQ_MAX_TOKENS").unwrap_or(self.mcq_max_tokens),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(self.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(self.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(self.llm_model_name),
        }
    }

    /// 检查配置是否可用，不可恢复的问题返回错误
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_upload_bytes".to_string(),
                reason: "必须大于 0".to_string(),
            });
        }
        if self.num_questions == 0 {
            return Err(ConfigError::InvalidValue {
                field: "num_questions".to_string(),
                reason: "必须大于 0".to_string(),
            });
        }
        if self.llm_api_key.is_empty() {
            warn!("⚠️ 未配置 LLM_API_KEY，生成摘要和选择题时将会失败");
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(var_name: &str) -> Option<T> {
    std::env::var(var_name).ok().and_then(|v| v.parse().ok())
}
