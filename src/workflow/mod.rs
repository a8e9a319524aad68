pub mod upload_ctx;
pub mod upload_flow;

pub use upload_ctx::{FlowStage, UploadCtx};
pub use upload_flow::{StudyResults, UploadFlow};
