use std::fmt;
use std::str::FromStr;

use crate::error::ExportError;

/// 下载文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Pdf,
    Docx,
    Csv,
}

impl ExportFormat {
    /// 文件扩展名
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
            ExportFormat::Csv => "csv",
        }
    }

    /// 响应使用的 MIME 类型
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ExportFormat::Csv => "text/csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(ExportFormat::Pdf),
            "docx" => Ok(ExportFormat::Docx),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// 内存中的导出文档，不落盘
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

impl ExportedDocument {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// 下载文件名：`<原文件名>_results.<格式>`
    pub fn file_name(&self, original_file_name: &str) -> String {
        format!("{}_results.{}", original_file_name, self.format.extension())
    }
}
