pub mod arcade_service;
pub mod homework_analyzer;
pub mod llm_service;
pub mod scan_log_store;
pub mod video_service;

pub use arcade_service::ArcadeRequest;
pub use llm_service::{ChatOptions, Explanation, LlmService, SubjectGradeEstimate};
pub use scan_log_store::ScanLogStore;
pub use video_service::{VideoLookup, VideoMatch, VideoRequest, VideoService};
