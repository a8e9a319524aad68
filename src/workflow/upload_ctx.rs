//! 上传处理上下文
//!
//! 封装"我正在处理哪个上传、处理到哪一步"这一信息

use std::fmt::{self, Display};

use crate::models::DocumentKind;

/// 上传处理阶段
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowStage {
    Received,
    Extracting,
    Summarizing,
    GeneratingQuestions,
    Done,
    Failed(String),
}

impl FlowStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, FlowStage::Done | FlowStage::Failed(_))
    }
}

impl Display for FlowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowStage::Received => write!(f, "已接收"),
            FlowStage::Extracting => write!(f, "提取文本"),
            FlowStage::Summarizing => write!(f, "生成摘要"),
            FlowStage::GeneratingQuestions => write!(f, "生成选择题"),
            FlowStage::Done => write!(f, "完成"),
            FlowStage::Failed(reason) => write!(f, "失败: {}", reason),
        }
    }
}

/// 上传处理上下文
#[derive(Debug, Clone)]
pub struct UploadCtx {
    /// 请求序号（仅用于日志显示）
    pub request_id: u64,
    /// 清洗后的文件名
    pub file_name: String,
    pub kind: DocumentKind,
    pub stage: FlowStage,
}

impl UploadCtx {
    pub fn new(request_id: u64, file_name: impl Into<String>, kind: DocumentKind) -> Self {
        Self {
            request_id,
            file_name: file_name.into(),
            kind,
            stage: FlowStage::Received,
        }
    }

    /// 进入下一阶段，终止状态之后不再变化
    pub fn advance(&mut self, stage: FlowStage) {
        if self.stage.is_terminal() {
            return;
        }
        self.stage = stage;
    }
}

impl Display for UploadCtx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[上传 #{} {} ({})]", self.request_id, self.file_name, self.kind)
    }
}
