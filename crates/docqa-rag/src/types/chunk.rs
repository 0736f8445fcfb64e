//! Chunk, stored record and search result types

use serde::{Deserialize, Serialize};

/// Provenance and position of a chunk within its source document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Source document name (the document's identity)
    pub filename: String,
    /// 0-based position in the chunker output; basis of the record key
    pub chunk_id: u32,
    /// Same value as `chunk_id`
    pub chunk_index: u32,
    /// Source label shown to users
    pub source: String,
    /// Token count of the chunk text
    pub chunk_size: usize,
}

/// A bounded segment of a document's text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk text
    pub text: String,
    /// Chunk metadata
    pub metadata: ChunkMetadata,
}

impl Chunk {
    /// Create a chunk at `position` within `filename`
    pub fn new(text: String, filename: &str, position: u32, chunk_size: usize) -> Self {
        Self {
            text,
            metadata: ChunkMetadata {
                filename: filename.to_string(),
                chunk_id: position,
                chunk_index: position,
                source: filename.to_string(),
                chunk_size,
            },
        }
    }

    /// Storage identity of this chunk
    pub fn record_key(&self) -> String {
        record_key(&self.metadata.filename, self.metadata.chunk_id)
    }
}

/// Storage identity `"{filename}_{chunk_id}"`
pub fn record_key(filename: &str, chunk_id: u32) -> String {
    format!("{}_{}", filename, chunk_id)
}

/// A chunk together with its embedding, as persisted in the index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// The chunk
    pub chunk: Chunk,
    /// Embedding of `chunk.text`
    pub embedding: Vec<f32>,
}

impl StoredRecord {
    /// Pair a chunk with its embedding
    pub fn new(chunk: Chunk, embedding: Vec<f32>) -> Self {
        Self { chunk, embedding }
    }

    /// Storage identity of this record
    pub fn record_key(&self) -> String {
        self.chunk.record_key()
    }
}

/// A retrieved chunk with its distance to the query
///
/// `score` is `1 - distance`. It is a relevance proxy rather than a
/// probability and is not bounded to `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Chunk text
    pub text: String,
    /// Chunk metadata
    pub metadata: ChunkMetadata,
    /// Cosine distance to the query (>= 0)
    pub distance: f32,
    /// `1 - distance`
    pub score: f32,
}

impl SearchResult {
    /// Build a result from a chunk and its distance
    pub fn from_chunk(chunk: Chunk, distance: f32) -> Self {
        Self {
            text: chunk.text,
            metadata: chunk.metadata,
            distance,
            score: 1.0 - distance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_ids_are_unified() {
        let chunk = Chunk::new("hello".to_string(), "a.txt", 3, 1);
        assert_eq!(chunk.metadata.chunk_id, 3);
        assert_eq!(chunk.metadata.chunk_index, 3);
        assert_eq!(chunk.metadata.source, "a.txt");
        assert_eq!(chunk.record_key(), "a.txt_3");
    }

    #[test]
    fn test_score_is_one_minus_distance() {
        let chunk = Chunk::new("hello".to_string(), "a.txt", 0, 1);
        let result = SearchResult::from_chunk(chunk, 1.25);
        assert!((result.score - -0.25).abs() < 1e-6);
    }
}
