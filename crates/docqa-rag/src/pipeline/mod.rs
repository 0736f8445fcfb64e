//! Upload and ask orchestration

pub mod confidence;
pub mod service;

pub use confidence::mean_score;
pub use service::RagService;
