//! 临时上传文件 - 基础设施层
//!
//! 持有上传目录中的临时文件，只暴露"路径"能力

use std::io::Write;
use std::path::Path;

use tempfile::{Builder, NamedTempFile};
use tracing::debug;

use crate::models::UploadedDocument;

/// 临时上传文件
///
/// 职责：
/// - 将上传内容写入上传目录
/// - 文件名带随机后缀，同名上传互不覆盖
/// - 离开作用域时自动删除（成功、失败、panic 都一样）
/// - 不认识文本提取 / LLM
pub struct TempUpload {
    file: NamedTempFile,
}

impl TempUpload {
    /// 将上传文档写入 `upload_folder`
    pub fn store(upload_folder: impl AsRef<Path>, document: &UploadedDocument) -> std::io::Result<Self> {
        let folder = upload_folder.as_ref();
        std::fs::create_dir_all(folder)?;

        let stem = document
            .file_name
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(&document.file_name);
        let prefix = format!("{}-", if stem.is_empty() { "upload" } else { stem });
        let suffix = format!(".{}", document.kind.extension());

        let mut file = Builder::new()
            .prefix(&prefix)
            .suffix(&suffix)
            .tempfile_in(folder)?;
        file.write_all(&document.bytes)?;
        file.flush()?;

        debug!(
            "上传文件已暂存: {} ({} 字节)",
            file.path().display(),
            document.bytes.len()
        );

        Ok(Self { file })
    }

    /// 临时文件路径
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        debug!("删除临时上传文件: {}", self.file.path().display());
    }
}
