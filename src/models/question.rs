use std::sync::OnceLock;

use regex::Regex;

/// 选项字母
pub const OPTION_LETTERS: [char; 4] = ['A', 'B', 'C', 'D'];

/// 一道四选一选择题
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct McqQuestion {
    /// LLM 给出的题号
    pub number: usize,
    pub prompt: String,
    pub options: [String; 4],
    /// 正确选项下标（0 = A）
    pub correct_index: usize,
}

impl McqQuestion {
    /// 正确选项字母
    pub fn correct_letter(&self) -> char {
        OPTION_LETTERS[self.correct_index]
    }

    /// 正确选项文本
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }
}

/// LLM 生成的整段选择题文本
///
/// 原始文本用于展示和导出，`questions` 是解析后的结构化结果
#[derive(Debug, Clone)]
pub struct QuestionSet {
    pub raw: String,
    pub questions: Vec<McqQuestion>,
}

impl QuestionSet {
    pub fn from_raw(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let questions = parse_question_set(&raw);
        Self { raw, questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// 原文中出现的题号行数量
    pub fn marker_count(&self) -> usize {
        self.raw
            .lines()
            .filter(|line| question_re().is_match(&clean_line(line)))
            .count()
    }

    /// 原文中的每一道题都被解析出来
    pub fn is_fully_parsed(&self) -> bool {
        !self.questions.is_empty() && self.questions.len() == self.marker_count()
    }
}

fn question_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:question|q)\s*(\d+)\s*[:.)]\s*(.*)$").expect("question regex")
    })
}

fn option_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\(?([A-Da-d])\s*[).:]\s*(.*)$").expect("option regex"))
}

fn answer_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^(?:correct\s+answer\s*[:\-]?|answer\s*[:\-])\s*\(?([A-D])\b").expect("answer regex")
    })
}

/// 解析中的题目块
#[derive(Default)]
struct PendingQuestion {
    number: usize,
    prompt: String,
    options: [Option<String>; 4],
    correct_index: Option<usize>,
}

impl PendingQuestion {
    fn finish(self) -> Option<McqQuestion> {
        let [a, b, c, d] = self.options;
        Some(McqQuestion {
            number: self.number,
            prompt: self.prompt.trim().to_string(),
            options: [a?, b?, c?, d?],
            correct_index: self.correct_index?,
        })
    }
}

/// 去掉 markdown 强调符号和列表前缀
fn clean_line(line: &str) -> String {
    line.trim()
        .trim_start_matches(['-', '*', '#', '>'])
        .replace("**", "")
        .replace("__", "")
        .trim()
        .to_string()
}

/// 将 LLM 返回的选择题文本解析为结构化题目
///
/// 期望格式：
/// ```text
/// Question 1: ...
/// A) ...
/// B) ...
/// C) ...
/// D) ...
/// Correct Answer: B
/// ```
///
/// 不完整的题目块（例如被 token 上限截断的最后一题）会被丢弃
pub fn parse_question_set(text: &str) -> Vec<McqQuestion> {
    let mut questions = Vec::new();
    let mut current: Option<PendingQuestion> = None;

    for raw_line in text.lines() {
        let line = clean_line(raw_line);
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = question_re().captures(&line) {
            if let Some(done) = current.take().and_then(PendingQuestion::finish) {
                questions.push(done);
            }
            current = Some(PendingQuestion {
                number: caps[1].parse().unwrap_or(questions.len() + 1),
                prompt: caps[2].to_string(),
                ..Default::default()
            });
            continue;
        }

        let Some(pending) = current.as_mut() else {
            continue;
        };

        if let Some(caps) = answer_re().captures(&line) {
            pending.correct_index = letter_index(&caps[1]);
        } else if let Some(caps) = option_re().captures(&line) {
            if let Some(idx) = letter_index(&caps[1]) {
                pending.options[idx] = Some(caps[2].trim().to_string());
            }
        } else if pending.options.iter().all(Option::is_none) {
            // 题干跨行
            if !pending.prompt.is_empty() {
                pending.prompt.push(' ');
            }
            pending.prompt.push_str(&line);
        }
    }

    if let Some(done) = current.and_then(PendingQuestion::finish) {
        questions.push(done);
    }

    questions
}

fn letter_index(letter: &str) -> Option<usize> {
    let c = letter.chars().next()?.to_ascii_uppercase();
    OPTION_LETTERS.iter().position(|&l| l == c)
}
