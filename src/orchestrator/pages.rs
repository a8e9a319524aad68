//! 页面渲染
//!
//! 只有上传页和结果页两个页面，直接拼接 HTML

use crate::models::McqQuestion;
use crate::workflow::StudyResults;

const STYLE: &str = "body{font-family:sans-serif;max-width:860px;margin:2em auto;padding:0 1em}\
pre{white-space:pre-wrap;background:#f6f6f6;padding:1em}\
.flash{background:#fde2e2;color:#8a1f1f;padding:.75em;border-radius:4px}\
.answer{color:#1f6f3a}";

/// HTML 转义
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        STYLE,
        body
    )
}

/// 上传页，`flash` 为上一次请求留下的错误提示
pub fn render_index(flash: Option<&str>) -> String {
    let flash_html = flash
        .filter(|msg| !msg.is_empty())
        .map(|msg| format!("<p class=\"flash\">{}</p>\n", escape_html(msg)))
        .unwrap_or_default();

    let body = format!(
        r#"<h1>Document Summarizer &amp; MCQ Generator</h1>
{flash_html}<form method="post" action="/" enctype="multipart/form-data">
<p><input type="file" name="file" accept=".pdf,.docx,.txt"></p>
<p><button type="submit">Upload and process</button></p>
</form>
<p>Allowed file types: PDF, DOCX, TXT (max 16 MB).</p>"#
    );

    layout("Document Summarizer", &body)
}

fn render_question(question: &McqQuestion) -> String {
    let options: String = question
        .options
        .iter()
        .zip(crate::models::question::OPTION_LETTERS)
        .map(|(option, letter)| format!("<li>{}) {}</li>", letter, escape_html(option)))
        .collect();

    format!(
        "<li><p>{}</p><ul>{}</ul><p class=\"answer\">Correct Answer: {}) {}</p></li>\n",
        escape_html(&question.prompt),
        options,
        question.correct_letter(),
        escape_html(question.correct_option())
    )
}

/// 结果页：摘要、选择题和下载表单
///
/// 下载表单把摘要和选择题原文再提交回来，服务端不缓存任何结果。
/// 只有原文中每道题都解析成功时才按列表展示，否则展示原文，
/// 保证页面上看到的和下载的内容一致
pub fn render_results(results: &StudyResults) -> String {
    let questions_html = if results.questions.is_fully_parsed() {
        let items: String = results.questions.questions.iter().map(render_question).collect();
        format!("<ol>\n{}</ol>", items)
    } else {
        format!("<pre>{}</pre>", escape_html(&results.questions.raw))
    };

    let body = format!(
        r#"<h1>Results for {file_name}</h1>
<h2>Summary</h2>
<pre>{summary}</pre>
<h2>Multiple Choice Questions</h2>
{questions_html}
<h2>Download</h2>
<form method="post" action="/download">
<textarea name="summary" hidden>{summary}</textarea>
<textarea name="mcqs" hidden>{mcqs}</textarea>
<input type="hidden" name="original_filename" value="{file_name}">
<select name="output_format">
<option value="pdf">PDF</option>
<option value="docx">DOCX</option>
<option value="csv">CSV</option>
</select>
<button type="submit">Download</button>
</form>
<p><a href="/">Process another document</a></p>"#,
        file_name = escape_html(&results.file_name),
        summary = escape_html(&results.summary),
        mcqs = escape_html(&results.questions.raw),
        questions_html = questions_html,
    );

    layout("Results", &body)
}
