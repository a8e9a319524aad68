//! 结果导出服务 - 业务能力层
//!
//! 只负责"摘要 + 选择题 → 下载文件"能力，全部在内存中完成

use std::io::Cursor;

use docx_rs::{BreakType, Docx, Paragraph, Run, Style, StyleType};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, StringFormat};
use tracing::debug;

use crate::error::ExportError;
use crate::models::{ExportFormat, ExportedDocument};
use crate::services::pdf_font;

// A4，单位 pt
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 28;
const FONT_SIZE: i64 = 12;
const LINE_HEIGHT: i64 = 14;
/// 一行可用宽度，单位为 1/1000 字号，与 AFM 字宽一致
const LINE_WIDTH_UNITS: u32 = ((PAGE_WIDTH - 2 * MARGIN) * 1000 / FONT_SIZE) as u32;

/// 按格式名导出
///
/// 格式名只接受 `pdf` / `docx` / `csv`，其他值返回 `UnsupportedFormat`
pub fn export(summary: &str, questions: &str, format: &str) -> Result<ExportedDocument, ExportError> {
    let format: ExportFormat = format.parse()?;
    export_as(summary, questions, format)
}

/// 按已解析的格式导出
pub fn export_as(
    summary: &str,
    questions: &str,
    format: ExportFormat,
) -> Result<ExportedDocument, ExportError> {
    let bytes = match format {
        ExportFormat::Pdf => render_pdf(summary, questions)?,
        ExportFormat::Docx => render_docx(summary, questions)?,
        ExportFormat::Csv => render_csv(summary, questions)?,
    };

    debug!("导出 {} 完成: {} 字节", format, bytes.len());

    Ok(ExportedDocument { format, bytes })
}

fn render_error(format: ExportFormat, reason: impl std::fmt::Display) -> ExportError {
    ExportError::Render {
        format: format.extension().to_string(),
        reason: reason.to_string(),
    }
}

// ========== PDF ==========

fn render_pdf(summary: &str, questions: &str) -> Result<Vec<u8>, ExportError> {
    let body = format!("Summary:\n\n{}\n\nMCQs:\n{}", summary, questions);
    let lines = wrap_text(&body, LINE_WIDTH_UNITS);
    let lines_per_page = ((PAGE_HEIGHT - 2 * MARGIN) / LINE_HEIGHT) as usize;

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut page_ids: Vec<ObjectId> = Vec::new();
    // 空文本也至少输出一页
    let chunks: Vec<&[String]> = if lines.is_empty() {
        vec![lines.as_slice()]
    } else {
        lines.chunks(lines_per_page).collect()
    };

    for chunk in chunks {
        let content = page_content(chunk);
        let encoded = content
            .encode()
            .map_err(|e| render_error(ExportFormat::Pdf, e))?;
        let content_id = doc.add_object(lopdf::Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        page_ids.push(page_id);
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Count" => page_ids.len() as i64,
        "Kids" => page_ids.iter().map(|&id| Object::from(id)).collect::<Vec<Object>>(),
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| render_error(ExportFormat::Pdf, e))?;
    Ok(buffer)
}

fn page_content(lines: &[String]) -> Content {
    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]),
        Operation::new("TL", vec![LINE_HEIGHT.into()]),
        Operation::new("Td", vec![MARGIN.into(), (PAGE_HEIGHT - MARGIN - FONT_SIZE).into()]),
    ];
    for line in lines {
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(pdf_font::encode(line), StringFormat::Literal)],
        ));
        operations.push(Operation::new("T*", vec![]));
    }
    operations.push(Operation::new("ET", vec![]));
    Content { operations }
}

/// 按实际字宽折行，超宽单词按字符拆开
fn wrap_text(text: &str, max_width: u32) -> Vec<String> {
    let space = pdf_font::char_width(' ');
    let mut lines = Vec::new();

    for paragraph in text.replace('\r', "").replace('\t', "    ").split('\n') {
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        let mut current_width = 0;
        for word in paragraph.split_whitespace() {
            for piece in split_word(word, max_width) {
                let piece_width = pdf_font::text_width(&piece);
                if !current.is_empty() && current_width + space + piece_width > max_width {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                if !current.is_empty() {
                    current.push(' ');
                    current_width += space;
                }
                current.push_str(&piece);
                current_width += piece_width;
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

fn split_word(word: &str, max_width: u32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut width = 0;

    for c in word.chars() {
        let w = pdf_font::char_width(c);
        if !piece.is_empty() && width + w > max_width {
            pieces.push(std::mem::take(&mut piece));
            width = 0;
        }
        piece.push(c);
        width += w;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }

    pieces
}

// ========== DOCX ==========

fn render_docx(summary: &str, questions: &str) -> Result<Vec<u8>, ExportError> {
    let docx = Docx::new()
        .add_style(
            Style::new("Heading1", StyleType::Paragraph)
                .name("Heading 1")
                .size(32)
                .bold(),
        )
        .add_paragraph(heading("Summary"))
        .add_paragraph(text_paragraph(summary))
        .add_paragraph(heading("Multiple Choice Questions"))
        .add_paragraph(text_paragraph(questions));

    let mut cursor = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut cursor)
        .map_err(|e| render_error(ExportFormat::Docx, e))?;
    Ok(cursor.into_inner())
}

fn heading(text: &str) -> Paragraph {
    Paragraph::new()
        .add_run(Run::new().add_text(text))
        .style("Heading1")
}

/// 一个段落承载整段文本，换行转为段内换行
fn text_paragraph(text: &str) -> Paragraph {
    let mut run = Run::new();
    for (i, line) in text.replace('\r', "").split('\n').enumerate() {
        if i > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        run = run.add_text(line);
    }
    Paragraph::new().add_run(run)
}

// ========== CSV ==========

fn render_csv(summary: &str, questions: &str) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["Summary", "MCQs"])
        .map_err(|e| render_error(ExportFormat::Csv, e))?;
    writer
        .write_record([summary, questions])
        .map_err(|e| render_error(ExportFormat::Csv, e))?;
    writer
        .into_inner()
        .map_err(|e| render_error(ExportFormat::Csv, e))
}
