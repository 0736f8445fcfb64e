//! Core types for the RAG system

pub mod chunk;
pub mod response;

pub use chunk::{record_key, Chunk, ChunkMetadata, SearchResult, StoredRecord};
pub use response::{
    AnswerResult, AnswerSource, AnswerStatus, ComponentStatus, DeleteResult, DocumentSummary,
    IndexStatus, OperationStatus, ProcessorStatus, StatusReport, UploadResult,
    ERROR_ANSWER_PREFIX, NO_DOCUMENTS_ANSWER, SOURCE_PREVIEW_CHARS,
};
