pub mod document;
pub mod export;
pub mod question;

pub use document::{sanitize_file_name, DocumentKind, UploadedDocument};
pub use export::{ExportFormat, ExportedDocument};
pub use question::{parse_question_set, McqQuestion, QuestionSet};
