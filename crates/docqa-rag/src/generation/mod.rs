//! Answer generation: prompts, model client and source formatting

pub mod citation;
pub mod ollama;
pub mod prompt;

pub use citation::truncate_source_text;
pub use ollama::OllamaClient;
pub use prompt::PromptBuilder;
