//! 文本提取服务 - 业务能力层
//!
//! 只负责"文档 → 纯文本"能力，三种格式各自独立实现

use std::path::Path;

use anyhow::{Context, Result};
use docx_rs::{DocumentChild, InsertChild, Paragraph, ParagraphChild, Run, RunChild};
use lopdf::Document;
use tracing::{debug, error, warn};

use crate::models::DocumentKind;

/// 按文档类型提取文本
///
/// 任何失败（文件损坏、编码错误、IO 错误）都记录日志并返回 `None`，不向上抛出
pub fn extract_text(path: &Path, kind: DocumentKind) -> Option<String> {
    let result = match kind {
        DocumentKind::Pdf => extract_pdf_text(path),
        DocumentKind::Docx => extract_docx_text(path),
        DocumentKind::Txt => extract_txt_text(path),
    };

    match result {
        Ok(text) => {
            debug!("{} 提取完成: {} 字符", kind, text.chars().count());
            Some(text)
        }
        Err(e) => {
            error!("{} extraction error: {:#}", kind.extension().to_uppercase(), e);
            None
        }
    }
}

/// PDF：逐页提取，跳过没有文本的页，用换行连接
///
/// 单页提取失败时记录日志并跳过，所有页都失败才视为整体失败
pub fn extract_pdf_text(path: &Path) -> Result<String> {
    let doc = Document::load(path)
        .with_context(|| format!("无法解析PDF文件: {}", path.display()))?;

    let page_numbers: Vec<u32> = doc.get_pages().into_keys().collect();
    let mut pages = Vec::new();
    let mut last_error = None;

    for &page_num in &page_numbers {
        match doc.extract_text(&[page_num]) {
            Ok(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    pages.push(text.to_string());
                }
            }
            Err(e) => {
                warn!("⚠️ 第 {} 页文本提取失败，已跳过: {}", page_num, e);
                last_error = Some(e);
            }
        }
    }

    if let Some(e) = last_error {
        if pages.is_empty() {
            return Err(e).context("所有页面都无法提取文本");
        }
    }

    Ok(pages.join("\n"))
}

/// DOCX：段落文本用换行连接
pub fn extract_docx_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("无法读取DOCX文件: {}", path.display()))?;

    let docx = docx_rs::read_docx(&bytes)
        .map_err(|e| anyhow::anyhow!("无法解析DOCX文件 {}: {:?}", path.display(), e))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            _ => None,
        })
        .collect();

    Ok(paragraphs.join("\n"))
}

/// 段落 → Run → Text，超链接和修订插入里的 Run 一并读取
fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();
    push_children_text(&mut text, &para.children);
    text
}

fn push_children_text(text: &mut String, children: &[ParagraphChild]) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => push_run_text(text, run),
            ParagraphChild::Hyperlink(link) => push_children_text(text, &link.children),
            ParagraphChild::Insert(insert) => {
                for ic in &insert.children {
                    if let InsertChild::Run(run) = ic {
                        push_run_text(text, run);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Run 内的换行符号转为 `\n`
fn push_run_text(text: &mut String, run: &Run) {
    for rc in &run.children {
        match rc {
            RunChild::Text(t) => text.push_str(&t.text),
            RunChild::Break(_) => text.push('\n'),
            RunChild::Tab(_) => text.push('\t'),
            _ => {}
        }
    }
}

/// TXT：按 UTF-8 读取
pub fn extract_txt_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("无法读取TXT文件: {}", path.display()))?;
    String::from_utf8(bytes).context("TXT文件不是有效的UTF-8编码")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExportFormat;
    use crate::services::exporter;

    fn write_temp(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_extract_txt() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "a.txt", "The quick brown fox jumps over the lazy dog.".as_bytes());

        let text = extract_text(&path, DocumentKind::Txt).unwrap();
        assert_eq!(text, "The quick brown fox jumps over the lazy dog.");
    }

    #[test]
    fn test_extract_txt_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "bad.txt", &[0xff, 0xfe, 0x00, 0xc3]);

        assert!(extract_text(&path, DocumentKind::Txt).is_none());
    }

    #[test]
    fn test_extract_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(extract_text(&dir.path().join("missing.txt"), DocumentKind::Txt).is_none());
    }

    #[test]
    fn test_extract_generated_pdf() {
        let doc = exporter::export_as("Foxes are quick.", "Question 1: Who is lazy?", ExportFormat::Pdf).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "result.pdf", &doc.bytes);

        let text = extract_text(&path, DocumentKind::Pdf).unwrap();
        assert!(!text.trim().is_empty());
        assert!(text.contains("Summary"));
    }

    #[test]
    fn test_extract_corrupted_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "broken.pdf", b"%PDF-1.4\nthis is not really a pdf");

        assert!(extract_text(&path, DocumentKind::Pdf).is_none());
    }

    #[test]
    fn test_extract_generated_docx() {
        let doc = exporter::export_as("Foxes are quick.", "Question 1: Who is lazy?\nA) The dog", ExportFormat::Docx).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "result.docx", &doc.bytes);

        let text = extract_text(&path, DocumentKind::Docx).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Summary");
        assert!(lines.contains(&"Foxes are quick."));
        assert!(lines.contains(&"Question 1: Who is lazy?"));
        assert!(lines.contains(&"A) The dog"));
    }

    #[test]
    fn test_extract_docx_reads_hyperlink_and_insert_runs() {
        use docx_rs::{Docx, Hyperlink, HyperlinkType, Insert};

        let para = Paragraph::new()
            .add_run(Run::new().add_text("Read "))
            .add_hyperlink(
                Hyperlink::new("https://example.com/fox", HyperlinkType::External)
                    .add_run(Run::new().add_text("the fox article")),
            )
            .add_insert(Insert::new(Run::new().add_text(" today")));
        let mut cursor = std::io::Cursor::new(Vec::new());
        Docx::new().add_paragraph(para).build().pack(&mut cursor).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "links.docx", &cursor.into_inner());

        let text = extract_text(&path, DocumentKind::Docx).unwrap();
        assert!(text.starts_with("Read"));
        assert!(text.contains("the fox article"));
        assert!(text.trim_end().ends_with("today"));
    }

    /// 两页 PDF：第 1 页正常，第 2 页字体缺少 ToUnicode 无法解码
    fn pdf_with_broken_second_page() -> Vec<u8> {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Object, Stream, StringFormat};

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let good_font = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let broken_font = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => "Missing",
            "Encoding" => "Identity-H",
        });

        let mut kids = Vec::new();
        for (font_id, text) in [(good_font, "Readable page"), (broken_font, "Broken page")] {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![50.into(), 700.into()]),
                    Operation::new(
                        "Tj",
                        vec![Object::String(text.as_bytes().to_vec(), StringFormat::Literal)],
                    ),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            });
            kids.push(Object::from(page_id));
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Count" => 2,
                "Kids" => kids,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    #[test]
    fn test_extract_pdf_skips_unreadable_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "mixed.pdf", &pdf_with_broken_second_page());

        let text = extract_text(&path, DocumentKind::Pdf).unwrap();
        assert!(text.contains("Readable page"));
        assert!(!text.contains("Broken page"));
    }

    #[test]
    fn test_extract_corrupted_docx() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "broken.docx", b"PK\x03\x04 definitely not a zip");

        assert!(extract_text(&path, DocumentKind::Docx).is_none());
    }
}
