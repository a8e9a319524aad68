use std::fmt;

/// 支持的上传文档类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Txt,
}

impl DocumentKind {
    /// 获取扩展名（小写，不含点）
    pub fn extension(self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Docx => "docx",
            DocumentKind::Txt => "txt",
        }
    }

    /// 从扩展名解析（大小写不敏感）
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            "txt" => Some(DocumentKind::Txt),
            _ => None,
        }
    }

    /// 从文件名解析，文件名必须包含 `.扩展名`
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, ext) = file_name.rsplit_once('.')?;
        Self::from_extension(ext)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// 用户上传的原始文档
///
/// 只在单个请求内存在，提取完文本后即被丢弃
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    /// 清洗后的文件名
    pub file_name: String,
    pub kind: DocumentKind,
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(file_name: impl Into<String>, kind: DocumentKind, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            kind,
            bytes,
        }
    }
}

/// 清洗上传文件名
///
/// 去掉路径部分，只保留 ASCII 字母数字和 `._-`，空白转为下划线，
/// 并去掉开头的点，防止路径穿越和隐藏文件
pub fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = base
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    cleaned.trim_start_matches(['.', '_']).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_file_name() {
        assert_eq!(DocumentKind::from_file_name("report.pdf"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_file_name("Notes.DOCX"), Some(DocumentKind::Docx));
        assert_eq!(DocumentKind::from_file_name("a.b.txt"), Some(DocumentKind::Txt));
        assert_eq!(DocumentKind::from_file_name("image.png"), None);
        assert_eq!(DocumentKind::from_file_name("pdf"), None);
        assert_eq!(DocumentKind::from_file_name(""), None);
    }

    #[test]
    fn test_sanitize_strips_paths() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\notes.txt"), "notes.txt");
        assert_eq!(sanitize_file_name("my lecture notes.pdf"), "my_lecture_notes.pdf");
        assert_eq!(sanitize_file_name(".hidden.txt"), "hidden.txt");
    }

    #[test]
    fn test_sanitize_drops_non_ascii() {
        assert_eq!(sanitize_file_name("résumé.docx"), "rsum.docx");
        assert_eq!(sanitize_file_name("讲义.pdf"), "pdf");
    }
}
