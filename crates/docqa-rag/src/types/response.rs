//! Result types returned by the orchestration workflows

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::generation::citation::truncate_source_text;

use super::chunk::SearchResult;

/// Answer returned when the index has nothing to retrieve
pub const NO_DOCUMENTS_ANSWER: &str =
    "I don't have any relevant documents to answer your question. Please upload some documents first.";

/// Prefix of the answer text when the ask workflow fails
pub const ERROR_ANSWER_PREFIX: &str = "Error processing your question: ";

/// Characters of chunk text kept in a formatted source
pub const SOURCE_PREVIEW_CHARS: usize = 200;

/// Outcome of an upload or delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    Success,
    Error,
}

/// Result of the upload workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResult {
    /// Base name of the uploaded file
    pub filename: String,
    /// Success or error
    pub status: OperationStatus,
    /// Human-readable outcome
    pub message: String,
    /// Chunks written to the index (0 on error)
    pub chunks_processed: usize,
    /// File size in bytes (0 on error)
    pub file_size: u64,
    /// Wall-clock seconds (0 on error)
    pub processing_time: f64,
}

impl UploadResult {
    /// Successful upload
    pub fn success(filename: String, chunks_processed: usize, file_size: u64, processing_time: f64) -> Self {
        Self {
            filename,
            status: OperationStatus::Success,
            message: format!("Document processed successfully in {:.2}s", processing_time),
            chunks_processed,
            file_size,
            processing_time,
        }
    }

    /// Failed upload with zeroed counters
    pub fn error(filename: String, message: String) -> Self {
        Self {
            filename,
            status: OperationStatus::Error,
            message,
            chunks_processed: 0,
            file_size: 0,
            processing_time: 0.0,
        }
    }

    /// Check if the upload succeeded
    pub fn is_success(&self) -> bool {
        self.status == OperationStatus::Success
    }
}

/// Explicit outcome of the ask workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerStatus {
    /// The language model produced an answer from retrieved passages
    Answered,
    /// Nothing was retrieved; the answer is the fixed fallback
    NoDocuments,
    /// A stage failed; the answer carries the error text
    Error,
}

/// A retrieved passage as shown alongside an answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerSource {
    /// Source document
    pub filename: String,
    /// Chunk position within the document
    pub chunk_id: u32,
    /// First 200 characters of the chunk, `...` appended when cut
    pub text: String,
    /// Similarity score of the chunk
    pub score: f32,
}

impl AnswerSource {
    /// Format a search result for display
    pub fn from_result(result: &SearchResult) -> Self {
        Self {
            filename: result.metadata.filename.clone(),
            chunk_id: result.metadata.chunk_id,
            text: truncate_source_text(&result.text, SOURCE_PREVIEW_CHARS),
            score: result.score,
        }
    }
}

/// Result of the ask workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResult {
    /// The question as asked
    pub question: String,
    /// Generated answer, fallback text, or error text
    pub answer: String,
    /// Retrieved passages in search order
    pub sources: Vec<AnswerSource>,
    /// Mean retrieval score; a heuristic, not a probability
    pub confidence: f32,
    /// Wall-clock seconds
    pub processing_time: f64,
    /// Explicit outcome
    pub status: AnswerStatus,
}

impl AnswerResult {
    /// Fallback result for an empty index
    pub fn no_documents(question: String, processing_time: f64) -> Self {
        Self {
            question,
            answer: NO_DOCUMENTS_ANSWER.to_string(),
            sources: Vec::new(),
            confidence: 0.0,
            processing_time,
            status: AnswerStatus::NoDocuments,
        }
    }

    /// Failed ask, reason carried in the answer text
    pub fn error(question: String, reason: &str, processing_time: f64) -> Self {
        Self {
            question,
            answer: format!("{}{}", ERROR_ANSWER_PREFIX, reason),
            sources: Vec::new(),
            confidence: 0.0,
            processing_time,
            status: AnswerStatus::Error,
        }
    }

    /// Check if the workflow failed
    pub fn is_error(&self) -> bool {
        self.status == AnswerStatus::Error
    }
}

/// Summary of one indexed document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Document name
    pub filename: String,
    /// Bytes of stored chunk text (approximate; overlap is counted twice)
    pub file_size: u64,
    /// Number of stored chunks
    pub chunks_count: usize,
    /// Lower-cased extension including the dot, empty when absent
    pub file_type: String,
}

/// Result of deleting a document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResult {
    /// Document name
    pub filename: String,
    /// Success or error
    pub status: OperationStatus,
    /// Human-readable outcome
    pub message: String,
}

/// Status of a model-backed collaborator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentStatus {
    /// Provider name (e.g. `ollama`)
    pub provider: String,
    /// Model in use
    pub model: String,
    /// `loaded` / `not_loaded`
    pub status: String,
}

/// Status of the vector index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStatus {
    /// Index implementation name
    pub provider: String,
    /// Collection name
    pub collection: String,
    /// Stored record count
    pub document_count: usize,
    /// `ready` / `unavailable`
    pub status: String,
}

/// Status of the chunker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorStatus {
    /// Maximum chunk length in tokens
    pub chunk_size: usize,
    /// Overlap in tokens
    pub chunk_overlap: usize,
    /// Token measure in use
    pub tokenizer: String,
    /// Always `ready` once constructed
    pub status: String,
}

/// Aggregated collaborator status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReport {
    pub embedding_service: ComponentStatus,
    pub vector_store: IndexStatus,
    pub llm_service: ComponentStatus,
    pub document_processor: ProcessorStatus,
    pub checked_at: DateTime<Utc>,
}
