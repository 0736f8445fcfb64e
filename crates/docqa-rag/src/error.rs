//! Error types for the RAG system

use thiserror::Error;

/// Result type alias for RAG operations
pub type Result<T> = std::result::Result<T, Error>;

/// RAG system errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Text extraction failed (corrupt or unreadable file)
    #[error("Failed to extract text from '{filename}': {message}")]
    Extraction { filename: String, message: String },

    /// Unsupported file type
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Nothing left to chunk after trimming whitespace
    #[error("Empty text content")]
    EmptyContent,

    /// Writing to the vector index failed
    #[error("Error adding documents to vector store: {0}")]
    IndexWrite(String),

    /// Reading from the vector index failed
    #[error("Error searching vector store: {0}")]
    IndexRead(String),

    /// Embedding model error
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Language model error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Caller supplied an unusable argument
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Workflow exceeded its configured time budget
    #[error("Operation timed out after {0}s")]
    Timeout(u64),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// SQLite error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an extraction error
    pub fn extraction(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Extraction {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an index write error
    pub fn index_write(message: impl Into<String>) -> Self {
        Self::IndexWrite(message.into())
    }

    /// Create an index read error
    pub fn index_read(message: impl Into<String>) -> Self {
        Self::IndexRead(message.into())
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// True for failures raised by the embedding or language model
    pub fn is_model_inference(&self) -> bool {
        matches!(self, Self::Embedding(_) | Self::Llm(_))
    }
}
