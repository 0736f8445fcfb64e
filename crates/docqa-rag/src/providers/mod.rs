//! Provider abstractions for embeddings and text generation
//!
//! The orchestrator only sees these traits; `ollama` holds the HTTP-backed
//! implementations.

pub mod embedding;
pub mod llm;
pub mod ollama;

pub use embedding::EmbeddingProvider;
pub use llm::{CompletionOptions, LlmProvider};
pub use ollama::{OllamaEmbedder, OllamaLlm, OllamaProvider};
