pub mod detect_flow;
pub mod practice_flow;
pub mod scan_ctx;
pub mod scan_flow;

pub use detect_flow::{DetectFlow, DetectionReport};
pub use practice_flow::PracticeFlow;
pub use scan_ctx::ScanCtx;
pub use scan_flow::{ScanFlow, ScanReport};
