//! Vector index over document chunks
//!
//! The index owns the embedding step: callers hand it chunks and query text,
//! never vectors.

pub mod similarity;
pub mod sqlite;

use async_trait::async_trait;
use std::collections::BTreeSet;

use crate::error::Result;
use crate::providers::EmbeddingProvider;
use crate::types::{Chunk, SearchResult};

pub use similarity::cosine_distance;
pub use sqlite::SqliteVectorIndex;

/// Persistent, embedding-backed store for one named collection
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Embed and upsert `chunks`, keyed by `"{filename}_{chunk_id}"`
    ///
    /// Empty input is a no-op.
    async fn add(&self, chunks: &[Chunk]) -> Result<()>;

    /// Nearest stored chunks to `query`, closest first, at most `top_k`
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>>;

    /// Remove every record of `filename`, returning how many were removed
    async fn delete_by_filename(&self, filename: &str) -> Result<usize>;

    /// Distinct filenames present in the collection
    async fn list_filenames(&self) -> Result<BTreeSet<String>>;

    /// Every stored chunk of `filename`
    async fn get_by_filename(&self, filename: &str) -> Result<Vec<Chunk>>;

    /// Total stored records
    async fn count(&self) -> Result<usize>;

    /// Swap all records of `filename` for `chunks` in one step
    ///
    /// Readers see either the old or the new set, never a mix.
    async fn replace_document(&self, filename: &str, chunks: &[Chunk]) -> Result<usize>;

    /// Check if the backing store answers
    async fn health_check(&self) -> Result<bool>;

    /// Index implementation name
    fn name(&self) -> &str;

    /// Collection this index is scoped to
    fn collection(&self) -> &str;

    /// Provider that embeds both stored chunks and queries
    fn embedder(&self) -> &dyn EmbeddingProvider;
}
