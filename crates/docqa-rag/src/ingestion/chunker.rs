//! Recursive, token-bounded text chunking with overlap

use std::collections::VecDeque;
use std::sync::Arc;

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};
use crate::types::Chunk;

use super::tokens::{TokenCounter, WordTokenCounter};

/// Split points tried in order: paragraph, line, word, character
const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Text chunker that prefers the largest semantic unit that fits
pub struct RecursiveChunker {
    /// Maximum chunk length in tokens
    chunk_size: usize,
    /// Tokens repeated between consecutive chunks
    chunk_overlap: usize,
    /// Token measure for both splitting and `chunk_size` metadata
    counter: Arc<dyn TokenCounter>,
}

impl RecursiveChunker {
    /// Create a chunker with an explicit token measure
    pub fn new(chunk_size: usize, chunk_overlap: usize, counter: Arc<dyn TokenCounter>) -> Result<Self> {
        ChunkingConfig {
            chunk_size,
            chunk_overlap,
            tokenizer_path: None,
        }
        .validate()?;

        Ok(Self {
            chunk_size,
            chunk_overlap,
            counter,
        })
    }

    /// Create a chunker from configuration
    pub fn from_config(config: &ChunkingConfig, counter: Arc<dyn TokenCounter>) -> Result<Self> {
        Self::new(config.chunk_size, config.chunk_overlap, counter)
    }

    /// Create a chunker measuring Unicode words
    pub fn with_word_tokens(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        Self::new(chunk_size, chunk_overlap, Arc::new(WordTokenCounter))
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Name of the token measure
    pub fn tokenizer_name(&self) -> &str {
        self.counter.name()
    }

    /// Measure `text` with this chunker's token counter
    pub fn count_tokens(&self, text: &str) -> usize {
        self.counter.count(text)
    }

    /// Split `text` into ordered chunks attributed to `filename`
    pub fn chunk(&self, text: &str, filename: &str) -> Result<Vec<Chunk>> {
        if text.trim().is_empty() {
            return Err(Error::EmptyContent);
        }

        let pieces = self.split_text(text, &SEPARATORS);

        let chunks: Vec<Chunk> = pieces
            .into_iter()
            .enumerate()
            .map(|(position, piece)| {
                let tokens = self.counter.count(&piece);
                Chunk::new(piece, filename, position as u32, tokens)
            })
            .collect();

        tracing::debug!(
            "Chunked '{}' into {} chunks (size {}, overlap {})",
            filename,
            chunks.len(),
            self.chunk_size,
            self.chunk_overlap
        );

        Ok(chunks)
    }

    /// Split on the first separator present, recursing into oversized pieces
    fn split_text(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let mut separator = "";
        let mut remaining: &[&str] = &[];
        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = candidate;
                break;
            }
            if text.contains(candidate) {
                separator = candidate;
                remaining = &separators[i + 1..];
                break;
            }
        }

        let splits: Vec<&str> = if separator.is_empty() {
            text.char_indices()
                .map(|(i, c)| &text[i..i + c.len_utf8()])
                .collect()
        } else {
            text.split(separator).filter(|s| !s.is_empty()).collect()
        };

        let mut final_chunks = Vec::new();
        let mut fitting: Vec<&str> = Vec::new();

        for split in splits {
            if self.counter.count(split) < self.chunk_size {
                fitting.push(split);
                continue;
            }

            if !fitting.is_empty() {
                final_chunks.extend(self.merge_splits(&fitting, separator));
                fitting.clear();
            }

            if remaining.is_empty() {
                let trimmed = split.trim();
                if !trimmed.is_empty() {
                    final_chunks.push(trimmed.to_string());
                }
            } else {
                final_chunks.extend(self.split_text(split, remaining));
            }
        }

        if !fitting.is_empty() {
            final_chunks.extend(self.merge_splits(&fitting, separator));
        }

        final_chunks
    }

    /// Greedily join small splits up to the size limit, carrying overlap forward
    fn merge_splits(&self, splits: &[&str], separator: &str) -> Vec<String> {
        let separator_len = self.counter.count(separator);

        let mut docs = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for &split in splits {
            let len = self.counter.count(split);
            let joiner = if current.is_empty() { 0 } else { separator_len };

            if total + len + joiner > self.chunk_size {
                if total > self.chunk_size {
                    tracing::warn!(
                        "Created a chunk of {} tokens, longer than the limit of {}",
                        total,
                        self.chunk_size
                    );
                }

                if !current.is_empty() {
                    if let Some(doc) = join_trimmed(&current, separator) {
                        docs.push(doc);
                    }

                    // Drop leading splits until only the overlap remains and the next split fits
                    while let Some(&first) = current.front() {
                        let must_shrink = total > self.chunk_overlap
                            || (total + len + separator_len > self.chunk_size && total > 0);
                        if !must_shrink {
                            break;
                        }
                        let dropped = self.counter.count(first)
                            + if current.len() > 1 { separator_len } else { 0 };
                        total = total.saturating_sub(dropped);
                        current.pop_front();
                    }
                }
            }

            current.push_back(split);
            total += len + if current.len() > 1 { separator_len } else { 0 };
        }

        if let Some(doc) = join_trimmed(&current, separator) {
            docs.push(doc);
        }

        docs
    }
}

fn join_trimmed(parts: &VecDeque<&str>, separator: &str) -> Option<String> {
    let joined = parts.iter().copied().collect::<Vec<_>>().join(separator);
    let trimmed = joined.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
