//! Token-length measures used to size chunks

use std::path::Path;
use std::sync::Arc;

use tokenizers::Tokenizer;
use unicode_segmentation::UnicodeSegmentation;

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};

/// Measures text length in tokens
pub trait TokenCounter: Send + Sync {
    /// Number of tokens in `text`
    fn count(&self, text: &str) -> usize;

    /// Name for status reporting
    fn name(&self) -> &str;
}

/// Counts UAX #29 word-boundary segments, ignoring whitespace runs
///
/// Words, numbers and each punctuation mark count as one token.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenCounter;

impl TokenCounter for WordTokenCounter {
    fn count(&self, text: &str) -> usize {
        text.split_word_bounds()
            .filter(|segment| !segment.trim().is_empty())
            .count()
    }

    fn name(&self) -> &str {
        "unicode-words"
    }
}

/// Counts ids produced by a Hugging Face tokenizer
pub struct HfTokenCounter {
    tokenizer: Tokenizer,
    name: String,
}

impl HfTokenCounter {
    /// Load a `tokenizer.json`
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut tokenizer = Tokenizer::from_file(path).map_err(|e| {
            Error::Config(format!("Failed to load tokenizer {}: {}", path.display(), e))
        })?;

        // Truncation would cap the count at the model's window
        tokenizer
            .with_truncation(None)
            .map_err(|e| Error::Config(format!("Failed to disable truncation: {}", e)))?;
        tokenizer.with_padding(None);

        Ok(Self {
            tokenizer,
            name: format!("hf:{}", path.display()),
        })
    }
}

impl TokenCounter for HfTokenCounter {
    fn count(&self, text: &str) -> usize {
        match self.tokenizer.encode(text, false) {
            Ok(encoding) => encoding.get_ids().len(),
            Err(e) => {
                tracing::warn!("Tokenizer failed ({}), falling back to word count", e);
                WordTokenCounter.count(text)
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Build the token measure selected by the chunking configuration
pub fn token_counter_from_config(config: &ChunkingConfig) -> Result<Arc<dyn TokenCounter>> {
    match &config.tokenizer_path {
        Some(path) => {
            tracing::info!("Measuring chunks with tokenizer {}", path.display());
            Ok(Arc::new(HfTokenCounter::from_file(path)?))
        }
        None => Ok(Arc::new(WordTokenCounter)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_counter() {
        let counter = WordTokenCounter;
        assert_eq!(counter.count(""), 0);
        assert_eq!(counter.count("   \n\n "), 0);
        assert_eq!(counter.count("The quick brown fox."), 5);
        assert_eq!(counter.count("can't stop, won't stop"), 5);
    }

    #[test]
    fn test_word_counter_is_additive_over_whitespace() {
        let counter = WordTokenCounter;
        let a = "alpha beta.";
        let b = "gamma, delta";
        assert_eq!(
            counter.count(&format!("{}\n\n{}", a, b)),
            counter.count(a) + counter.count(b)
        );
    }

    #[test]
    fn test_missing_tokenizer_is_config_error() {
        let config = ChunkingConfig {
            tokenizer_path: Some("/nonexistent/tokenizer.json".into()),
            ..ChunkingConfig::default()
        };
        assert!(matches!(token_counter_from_config(&config), Err(Error::Config(_))));
    }
}
