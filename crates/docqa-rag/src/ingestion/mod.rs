//! Document ingestion: text extraction and chunking

pub mod chunker;
pub mod extractor;
pub mod tokens;

pub use chunker::RecursiveChunker;
pub use extractor::{FileTextExtractor, TextExtractor};
pub use tokens::{token_counter_from_config, HfTokenCounter, TokenCounter, WordTokenCounter};
