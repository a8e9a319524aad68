use thiserror::Error;

/// 应用程序错误类型
///
/// 上传与下载流程中的所有失败最终都收敛到前四类，
/// 在编排层统一转换为一条面向用户的提示信息。
#[derive(Debug, Error)]
pub enum AppError {
    /// 上传校验错误
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// 文本提取错误
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    /// LLM 生成错误
    #[error(transparent)]
    Generation(#[from] GenerationError),
    /// 导出错误
    #[error(transparent)]
    Export(#[from] ExportError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// IO 错误（启动阶段）
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 上传校验错误
#[derive(Debug, Error)]
pub enum ValidationError {
    /// 没有选择文件
    #[error("No file selected!")]
    NoFileSelected,
    /// 文件类型不被支持
    #[error("Invalid file type! Allowed: PDF, DOCX, TXT")]
    InvalidFileType { file_name: String },
    /// 文件超过大小限制
    #[error("File too large! Maximum size is {} MB", .limit / (1024 * 1024))]
    FileTooLarge { limit: usize },
    /// multipart 请求体无法解析
    #[error("Malformed upload request")]
    MalformedUpload { reason: String },
}

/// 文本提取错误
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// 提取结果为空或提取失败
    #[error("Could not extract text from file")]
    NoText,
    /// 临时文件写入失败
    #[error("Could not store uploaded file")]
    Storage {
        #[source]
        source: std::io::Error,
    },
}

/// LLM 生成错误
#[derive(Debug, Error)]
pub enum GenerationError {
    /// 摘要生成失败
    #[error("Failed to generate summary")]
    Summary,
    /// 选择题生成失败
    #[error("Failed to generate MCQs")]
    Questions,
}

/// 导出错误
#[derive(Debug, Error)]
pub enum ExportError {
    /// 不支持的导出格式
    #[error("Unsupported file format")]
    UnsupportedFormat(String),
    /// 文档库渲染失败
    #[error("Failed to render {format} document: {reason}")]
    Render { format: String, reason: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("读取配置文件失败 ({path}): {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 配置值不合法
    #[error("配置项 {field} 不合法: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl AppError {
    /// 面向用户的简短提示（用于 flash 消息）
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(e) => e.to_string(),
            AppError::Extraction(e) => e.to_string(),
            AppError::Generation(e) => e.to_string(),
            AppError::Export(ExportError::UnsupportedFormat(_)) => {
                ExportError::UnsupportedFormat(String::new()).to_string()
            }
            AppError::Export(ExportError::Render { .. }) => "Failed to create the download file".to_string(),
            AppError::Config(_) | AppError::Io(_) => "Internal server error".to_string(),
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
