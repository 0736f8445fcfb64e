//! Prompt templates for RAG generation

use crate::config::PromptFormat;
use crate::types::SearchResult;

/// Instruction given to instruction-tuned models
const MISTRAL_INSTRUCTION: &str = "You are a helpful AI assistant. Use the following context to answer the question. If you cannot find the answer in the context, say \"I cannot find the answer in the provided documents.\"";

/// Prompt builder for RAG queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Number the retrieved passages in search order
    pub fn build_context(results: &[SearchResult]) -> String {
        let mut context = String::new();

        for (i, result) in results.iter().enumerate() {
            context.push_str(&format!(
                "Document {} (from {}):\n{}\n\n",
                i + 1,
                result.metadata.filename,
                result.text
            ));
        }

        context
    }

    /// Build the full prompt for `format`
    pub fn build_prompt(format: PromptFormat, question: &str, results: &[SearchResult]) -> String {
        let context = Self::build_context(results);

        match format {
            PromptFormat::Mistral => format!(
                "<s>[INST] {}\n\nContext:\n{}\n\nQuestion: {}\n\nAnswer: [/INST]",
                MISTRAL_INSTRUCTION, context, question
            ),
            PromptFormat::Generic => {
                format!("Context:\n{}\n\nQuestion: {}\n\nAnswer:", context, question)
            }
        }
    }

    /// Trim model output and drop an echoed `Answer:` label
    pub fn clean_answer(raw: &str) -> String {
        let answer = raw.trim();
        answer
            .strip_prefix("Answer:")
            .map(str::trim)
            .unwrap_or(answer)
            .to_string()
    }
}
