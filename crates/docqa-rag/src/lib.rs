//! docqa-rag: question answering over a private document corpus
//!
//! Documents are split into overlapping, token-bounded chunks, embedded and
//! stored in a persistent SQLite vector index. Questions retrieve the nearest
//! chunks, which are handed to a local language model (Ollama) as numbered
//! context. Answers come back with their sources and a confidence heuristic.

pub mod config;
pub mod error;
pub mod generation;
pub mod index;
pub mod ingestion;
pub mod pipeline;
pub mod providers;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use index::{SqliteVectorIndex, VectorIndex};
pub use ingestion::{FileTextExtractor, RecursiveChunker, TextExtractor};
pub use pipeline::RagService;
pub use providers::{EmbeddingProvider, LlmProvider};
pub use types::{
    AnswerResult, AnswerSource, AnswerStatus, Chunk, ChunkMetadata, DeleteResult, DocumentSummary,
    SearchResult, StatusReport, UploadResult,
};
