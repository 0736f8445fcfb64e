//! The RAG service: upload, ask and document management

use chrono::Utc;
use futures::future::try_join_all;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::index::{SqliteVectorIndex, VectorIndex};
use crate::ingestion::{token_counter_from_config, FileTextExtractor, RecursiveChunker, TextExtractor};
use crate::providers::{CompletionOptions, EmbeddingProvider, LlmProvider, OllamaProvider};
use crate::types::{
    AnswerResult, AnswerSource, AnswerStatus, Chunk, ComponentStatus, DeleteResult, DocumentSummary,
    IndexStatus, OperationStatus, ProcessorStatus, StatusReport, UploadResult,
};

use super::confidence::mean_score;

/// Orchestrates extraction, chunking, indexing and generation
///
/// All collaborators are long-lived handles built once and shared; the
/// service is `Send + Sync` and can serve concurrent requests behind an `Arc`.
pub struct RagService {
    config: RagConfig,
    extractor: Arc<dyn TextExtractor>,
    chunker: RecursiveChunker,
    index: Arc<dyn VectorIndex>,
    llm: Arc<dyn LlmProvider>,
    completion: CompletionOptions,
}

impl RagService {
    /// Assemble a service from injected collaborators
    pub fn new(
        config: RagConfig,
        extractor: Arc<dyn TextExtractor>,
        chunker: RecursiveChunker,
        index: Arc<dyn VectorIndex>,
        llm: Arc<dyn LlmProvider>,
    ) -> Self {
        let completion = CompletionOptions::from_config(&config.llm);
        Self {
            config,
            extractor,
            chunker,
            index,
            llm,
            completion,
        }
    }

    /// Build the Ollama + SQLite stack described by `config`
    pub fn from_config(config: RagConfig) -> Result<Self> {
        config.validate()?;
        tracing::info!("Initializing RAG service...");

        let (embedder, llm) = OllamaProvider::new(&config.llm, &config.embeddings)?.split();
        tracing::info!(
            "Ollama at {} (embeddings: {}, generation: {})",
            config.llm.base_url,
            config.embeddings.model,
            config.llm.model
        );

        let embedder: Arc<dyn EmbeddingProvider> = Arc::new(embedder);
        let index = SqliteVectorIndex::open(&config, embedder)?;

        let counter = token_counter_from_config(&config.chunking)?;
        let chunker = RecursiveChunker::from_config(&config.chunking, counter)?;

        Ok(Self::new(
            config,
            Arc::new(FileTextExtractor::new()),
            chunker,
            Arc::new(index),
            Arc::new(llm),
        ))
    }

    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    pub fn index(&self) -> &Arc<dyn VectorIndex> {
        &self.index
    }

    /// Ingest a file, replacing any earlier version with the same name
    ///
    /// Never fails: errors are reported in the returned result.
    pub async fn upload(&self, path: impl AsRef<Path>) -> UploadResult {
        let path = path.as_ref();
        let filename = file_name(path).unwrap_or_else(|| "unknown".to_string());

        match self.try_upload(path).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Upload of '{}' failed: {}", filename, e);
                UploadResult::error(filename, e.to_string())
            }
        }
    }

    /// Ingest a file, propagating the first error
    ///
    /// `upload_timeout_secs` bounds reading, extraction and chunking only.
    /// Once indexing starts it runs to completion, so an upload never
    /// reports a timeout for a document that was in fact stored.
    pub async fn try_upload(&self, path: impl AsRef<Path>) -> Result<UploadResult> {
        let start = Instant::now();
        let path = path.as_ref();
        let filename = file_name(path)
            .ok_or_else(|| Error::InvalidInput(format!("'{}' has no file name", path.display())))?;

        let (file_size, chunks) =
            within(self.config.processing.upload_timeout_secs, self.prepare(path, &filename)).await?;
        let written = self.index.replace_document(&filename, &chunks).await?;

        let elapsed = start.elapsed().as_secs_f64();
        tracing::info!(
            "Processed '{}': {} chunks from {} bytes in {:.2}s",
            filename,
            written,
            file_size,
            elapsed
        );

        Ok(UploadResult::success(filename, written, file_size, elapsed))
    }

    /// Read and chunk a file without touching the index
    async fn prepare(&self, path: &Path, filename: &str) -> Result<(u64, Vec<Chunk>)> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if !self.extractor.supports(&extension) {
            return Err(Error::UnsupportedFileType(format!(".{}", extension)));
        }

        let file_size = tokio::fs::metadata(path).await?.len();

        // A panicking decoder surfaces as a join error instead of taking the process down
        let extractor = Arc::clone(&self.extractor);
        let owned = path.to_path_buf();
        let text = tokio::task::spawn_blocking(move || extractor.extract(&owned))
            .await
            .map_err(|e| Error::Internal(format!("Task join error: {}", e)))??;

        let chunks = self.chunker.chunk(&text, filename)?;
        Ok((file_size, chunks))
    }

    /// Answer a question from the indexed documents
    ///
    /// Never fails: errors become an `error`-status result whose answer
    /// carries the reason.
    pub async fn ask(&self, question: &str, top_k: usize) -> AnswerResult {
        let start = Instant::now();

        match within(self.config.processing.ask_timeout_secs, self.try_ask(question, top_k)).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Ask failed: {}", e);
                AnswerResult::error(question.to_string(), &e.to_string(), start.elapsed().as_secs_f64())
            }
        }
    }

    /// Answer with the configured default `top_k`
    pub async fn ask_default(&self, question: &str) -> AnswerResult {
        self.ask(question, self.config.processing.default_top_k).await
    }

    /// Answer a question, propagating the first error
    ///
    /// Any question text is accepted; an empty index always yields the
    /// no-documents fallback.
    pub async fn try_ask(&self, question: &str, top_k: usize) -> Result<AnswerResult> {
        let start = Instant::now();

        if top_k == 0 {
            return Err(Error::InvalidInput("top_k must be at least 1".to_string()));
        }

        let results = self.index.search(question, top_k).await?;
        if results.is_empty() {
            tracing::info!("No documents retrieved for question");
            return Ok(AnswerResult::no_documents(
                question.to_string(),
                start.elapsed().as_secs_f64(),
            ));
        }

        let prompt = PromptBuilder::build_prompt(self.config.llm.prompt_format, question, &results);
        let raw = self.llm.complete(&prompt, &self.completion).await?;
        let answer = PromptBuilder::clean_answer(&raw);

        let confidence = mean_score(&results);
        let sources: Vec<AnswerSource> = results.iter().map(AnswerSource::from_result).collect();

        let processing_time = start.elapsed().as_secs_f64();
        tracing::info!(
            "Answered from {} sources (confidence {:.3}) in {:.2}s",
            sources.len(),
            confidence,
            processing_time
        );

        Ok(AnswerResult {
            question: question.to_string(),
            answer,
            sources,
            confidence,
            processing_time,
            status: AnswerStatus::Answered,
        })
    }

    /// Summaries of every indexed document, ordered by filename
    pub async fn list_documents(&self) -> Result<Vec<DocumentSummary>> {
        let filenames = self.index.list_filenames().await?;

        let lookups = filenames.into_iter().map(|filename| async move {
            let chunks = self.index.get_by_filename(&filename).await?;
            let file_size = chunks.iter().map(|c| c.text.len() as u64).sum();
            let file_type = Path::new(&filename)
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
                .unwrap_or_default();

            Ok::<_, Error>(DocumentSummary {
                filename,
                file_size,
                chunks_count: chunks.len(),
                file_type,
            })
        });

        try_join_all(lookups).await
    }

    /// Remove a document; deleting an unknown name still succeeds
    pub async fn delete_document(&self, filename: &str) -> DeleteResult {
        match self.index.delete_by_filename(filename).await {
            Ok(removed) => {
                tracing::info!("Deleted '{}' ({} chunks)", filename, removed);
                DeleteResult {
                    filename: filename.to_string(),
                    status: OperationStatus::Success,
                    message: format!("Document '{}' deleted successfully", filename),
                }
            }
            Err(e) => {
                tracing::warn!("Delete of '{}' failed: {}", filename, e);
                DeleteResult {
                    filename: filename.to_string(),
                    status: OperationStatus::Error,
                    message: e.to_string(),
                }
            }
        }
    }

    /// Probe every collaborator
    pub async fn system_status(&self) -> StatusReport {
        let embedder = self.index.embedder();
        let (embedding_health, llm_health, index_health, count) = futures::join!(
            embedder.health_check(),
            self.llm.health_check(),
            self.index.health_check(),
            self.index.count(),
        );

        let embedding_loaded = embedding_health.unwrap_or(false);
        let llm_loaded = llm_health.unwrap_or(false);
        let index_ready = index_health.unwrap_or(false);
        let document_count = match count {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!("Could not count records: {}", e);
                0
            }
        };

        StatusReport {
            embedding_service: ComponentStatus {
                provider: embedder.name().to_string(),
                model: embedder.model().to_string(),
                status: loaded(embedding_loaded),
            },
            vector_store: IndexStatus {
                provider: self.index.name().to_string(),
                collection: self.index.collection().to_string(),
                document_count,
                status: if index_ready { "ready" } else { "unavailable" }.to_string(),
            },
            llm_service: ComponentStatus {
                provider: self.llm.name().to_string(),
                model: self.llm.model().to_string(),
                status: loaded(llm_loaded),
            },
            document_processor: ProcessorStatus {
                chunk_size: self.chunker.chunk_size(),
                chunk_overlap: self.chunker.chunk_overlap(),
                tokenizer: self.chunker.tokenizer_name().to_string(),
                status: "ready".to_string(),
            },
            checked_at: Utc::now(),
        }
    }
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().to_string())
}

fn loaded(ok: bool) -> String {
    let status = if ok { "loaded" } else { "not_loaded" };
    status.to_string()
}

/// Bound `fut` by `secs` when set
async fn within<T>(secs: Option<u64>, fut: impl Future<Output = Result<T>>) -> Result<T> {
    match secs {
        Some(secs) => tokio::time::timeout(Duration::from_secs(secs), fut)
            .await
            .map_err(|_| Error::Timeout(secs))?,
        None => fut.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::SqliteVectorIndex;
    use crate::testing::{FailingEmbedder, FailingLlm, MockEmbedder, ScriptedLlm};
    use crate::types::{ERROR_ANSWER_PREFIX, NO_DOCUMENTS_ANSWER};
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct PanickingExtractor;

    impl TextExtractor for PanickingExtractor {
        fn extract(&self, _path: &Path) -> Result<String> {
            panic!("malformed font dictionary");
        }

        fn supports(&self, _extension: &str) -> bool {
            true
        }
    }

    struct SlowExtractor(Duration);

    impl TextExtractor for SlowExtractor {
        fn extract(&self, _path: &Path) -> Result<String> {
            std::thread::sleep(self.0);
            Ok("late text".to_string())
        }

        fn supports(&self, _extension: &str) -> bool {
            true
        }
    }

    struct Fixture {
        service: RagService,
        llm: Arc<ScriptedLlm>,
        dir: TempDir,
    }

    impl Fixture {
        fn write(&self, name: &str, content: &str) -> PathBuf {
            let path = self.dir.path().join(name);
            std::fs::write(&path, content).unwrap();
            path
        }
    }

    fn service_with(config: RagConfig, llm: Arc<dyn LlmProvider>, embedder: Arc<dyn EmbeddingProvider>) -> RagService {
        let index = SqliteVectorIndex::open_in_memory("documents", embedder).unwrap();
        let chunker = RecursiveChunker::with_word_tokens(8, 2).unwrap();
        RagService::new(config, Arc::new(FileTextExtractor::new()), chunker, Arc::new(index), llm)
    }

    fn fixture(reply: &str) -> Fixture {
        let llm = Arc::new(ScriptedLlm::replying(reply));
        let service = service_with(RagConfig::default(), llm.clone(), Arc::new(MockEmbedder::new(64)));
        Fixture {
            service,
            llm,
            dir: tempfile::tempdir().unwrap(),
        }
    }

    #[tokio::test]
    async fn test_ask_on_empty_index_returns_fallback() {
        let fx = fixture("unused");
        let result = fx.service.ask("What is X?", 5).await;

        assert_eq!(result.answer, NO_DOCUMENTS_ANSWER);
        assert_eq!(result.status, AnswerStatus::NoDocuments);
        assert!(result.sources.is_empty());
        assert_eq!(result.confidence, 0.0);
        assert!(fx.llm.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_empty_file_upload_fails_without_indexing() {
        let fx = fixture("unused");
        let path = fx.write("empty.txt", "");

        let result = fx.service.upload(&path).await;
        assert_eq!(result.status, OperationStatus::Error);
        assert_eq!(result.message, "Empty text content");
        assert_eq!(result.filename, "empty.txt");
        assert_eq!(result.chunks_processed, 0);
        assert_eq!(result.file_size, 0);
        assert_eq!(result.processing_time, 0.0);
        assert_eq!(fx.service.index().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_upload_then_ask() {
        let fx = fixture("Answer: The fox is quick.");
        let path = fx.write("a.txt", "The quick brown fox.\n\nJumps over the lazy dog.");

        let upload = fx.service.upload(&path).await;
        assert!(upload.is_success(), "{}", upload.message);
        assert_eq!(upload.chunks_processed, 2);
        assert_eq!(upload.file_size, 46);
        assert!(upload.message.starts_with("Document processed successfully in "));

        let result = fx.service.ask("fox", 1).await;
        assert_eq!(result.status, AnswerStatus::Answered);
        assert_eq!(result.answer, "The fox is quick.");
        assert_eq!(result.sources.len(), 1);
        assert_eq!(result.sources[0].text, "The quick brown fox.");
        assert_eq!(result.sources[0].filename, "a.txt");
        assert!((result.confidence - result.sources[0].score).abs() < 1e-6);

        let prompts = fx.llm.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Document 1 (from a.txt):\nThe quick brown fox.\n\n"));
        assert!(prompts[0].ends_with("Question: fox\n\nAnswer: [/INST]"));
    }

    #[tokio::test]
    async fn test_sources_are_truncated() {
        let llm = Arc::new(ScriptedLlm::replying("ok"));
        let index = SqliteVectorIndex::open_in_memory("documents", Arc::new(MockEmbedder::new(64))).unwrap();
        let chunker = RecursiveChunker::with_word_tokens(200, 10).unwrap();
        let service = RagService::new(
            RagConfig::default(),
            Arc::new(FileTextExtractor::new()),
            chunker,
            Arc::new(index),
            llm,
        );

        let dir = tempfile::tempdir().unwrap();
        let long: Vec<String> = (0..80).map(|i| format!("topic{}", i)).collect();
        let path = dir.path().join("long.txt");
        std::fs::write(&path, format!("{}\n\n{}", long.join(" "), long.join(" "))).unwrap();
        assert!(service.upload(&path).await.is_success());

        let result = service.ask("What is topic1?", 2).await;
        assert_eq!(result.status, AnswerStatus::Answered);
        assert!(!result.sources.is_empty() && result.sources.len() <= 2);
        for source in &result.sources {
            assert!(source.text.chars().count() <= 203);
            assert!(source.text.ends_with("..."));
        }
    }

    #[tokio::test]
    async fn test_llm_failure_becomes_error_answer() {
        let fx = fixture("unused");
        let path = fx.write("a.txt", "The quick brown fox.");
        assert!(fx.service.upload(&path).await.is_success());

        let service = RagService::new(
            RagConfig::default(),
            Arc::new(FileTextExtractor::new()),
            RecursiveChunker::with_word_tokens(8, 2).unwrap(),
            Arc::clone(fx.service.index()),
            Arc::new(FailingLlm),
        );

        let result = service.ask("fox", 3).await;
        assert!(result.is_error());
        assert!(result.answer.starts_with(ERROR_ANSWER_PREFIX));
        assert!(result.answer.contains("model not loaded"));
        assert!(result.sources.is_empty());
        assert_eq!(result.confidence, 0.0);

        assert!(matches!(service.try_ask("fox", 3).await, Err(Error::Llm(_))));
    }

    #[tokio::test]
    async fn test_embedding_failure_during_upload_keeps_index_empty() {
        let llm = Arc::new(ScriptedLlm::replying("unused"));
        let service = service_with(RagConfig::default(), llm, Arc::new(FailingEmbedder));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "some text").unwrap();

        let result = service.upload(&path).await;
        assert_eq!(result.status, OperationStatus::Error);
        assert!(result.message.starts_with("Error adding documents to vector store"));
        assert_eq!(service.index().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reupload_replaces_previous_chunks() {
        let fx = fixture("unused");
        let words: Vec<String> = (0..50).map(|i| format!("w{}", i)).collect();
        let path = fx.write("doc.txt", &words.join(" "));
        let first = fx.service.upload(&path).await;
        assert!(first.chunks_processed > 1);

        fx.write("doc.txt", "short replacement");
        let second = fx.service.upload(&path).await;
        assert_eq!(second.chunks_processed, 1);

        let stored = fx.service.index().get_by_filename("doc.txt").await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].text, "short replacement");
    }

    #[tokio::test]
    async fn test_zero_top_k_is_invalid() {
        let fx = fixture("unused");
        assert!(matches!(fx.service.try_ask("q", 0).await, Err(Error::InvalidInput(_))));
        assert!(fx.service.ask("q", 0).await.is_error());
    }

    #[tokio::test]
    async fn test_any_question_on_empty_index_gets_fallback() {
        let fx = fixture("unused");
        for question in ["", "   ", "What is X?"] {
            let result = fx.service.ask(question, 5).await;
            assert_eq!(result.answer, NO_DOCUMENTS_ANSWER, "question {:?}", question);
            assert_eq!(result.status, AnswerStatus::NoDocuments);
            assert_eq!(result.question, question);
        }

        let result = fx.service.ask("What is X?", 25).await;
        assert_eq!(result.status, AnswerStatus::NoDocuments);
        assert!(fx.llm.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_large_top_k_returns_every_chunk() {
        let fx = fixture("ok");
        let path = fx.write("a.txt", "The quick brown fox.\n\nJumps over the lazy dog.");
        assert!(fx.service.upload(&path).await.is_success());

        let result = fx.service.ask("fox", 25).await;
        assert_eq!(result.status, AnswerStatus::Answered);
        assert_eq!(result.sources.len(), 2);
    }

    #[tokio::test]
    async fn test_extractor_panic_becomes_error_result() {
        let llm = Arc::new(ScriptedLlm::replying("unused"));
        let index = SqliteVectorIndex::open_in_memory("documents", Arc::new(MockEmbedder::new(64))).unwrap();
        let service = RagService::new(
            RagConfig::default(),
            Arc::new(PanickingExtractor),
            RecursiveChunker::with_word_tokens(8, 2).unwrap(),
            Arc::new(index),
            llm,
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"%PDF-1.4 garbage").unwrap();

        let result = service.upload(&path).await;
        assert_eq!(result.status, OperationStatus::Error);
        assert!(result.message.contains("Task join error"), "{}", result.message);
        assert_eq!(service.index().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_upload_timeout_stops_before_indexing() {
        let mut config = RagConfig::default();
        config.processing.upload_timeout_secs = Some(1);
        let llm = Arc::new(ScriptedLlm::replying("unused"));
        let index = SqliteVectorIndex::open_in_memory("documents", Arc::new(MockEmbedder::new(64))).unwrap();
        let service = RagService::new(
            config,
            Arc::new(SlowExtractor(Duration::from_secs(2))),
            RecursiveChunker::with_word_tokens(8, 2).unwrap(),
            Arc::new(index),
            llm,
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "unused").unwrap();

        let result = service.upload(&path).await;
        assert_eq!(result.status, OperationStatus::Error);
        assert_eq!(result.message, "Operation timed out after 1s");
        assert_eq!(service.index().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_upload_timeout_does_not_cut_indexing() {
        let mut config = RagConfig::default();
        config.processing.upload_timeout_secs = Some(1);
        let embedder = Arc::new(MockEmbedder::new(64).with_delay(Duration::from_millis(1500)));
        let service = service_with(config, Arc::new(ScriptedLlm::replying("unused")), embedder);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "The quick brown fox.").unwrap();

        let result = service.upload(&path).await;
        assert!(result.is_success(), "{}", result.message);
        assert_eq!(service.index().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unsupported_upload_is_error_result() {
        let fx = fixture("unused");
        let path = fx.write("sheet.xlsx", "binary");
        let result = fx.service.upload(&path).await;
        assert_eq!(result.status, OperationStatus::Error);
        assert_eq!(result.message, "Unsupported file type: .xlsx");
    }

    #[tokio::test]
    async fn test_list_and_delete_documents() {
        let fx = fixture("unused");
        let a = fx.write("Report.MD", "alpha beta");
        let b = fx.write("notes.txt", "gamma");
        assert!(fx.service.upload(&a).await.is_success());
        assert!(fx.service.upload(&b).await.is_success());

        let docs = fx.service.list_documents().await.unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].filename, "Report.MD");
        assert_eq!(docs[0].file_type, ".md");
        assert_eq!(docs[0].file_size, 10);
        assert_eq!(docs[0].chunks_count, 1);
        assert_eq!(docs[1].file_type, ".txt");

        let deleted = fx.service.delete_document("Report.MD").await;
        assert_eq!(deleted.status, OperationStatus::Success);
        assert_eq!(deleted.message, "Document 'Report.MD' deleted successfully");

        let again = fx.service.delete_document("Report.MD").await;
        assert_eq!(again.status, OperationStatus::Success);

        let docs = fx.service.list_documents().await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].filename, "notes.txt");
    }

    #[tokio::test]
    async fn test_system_status() {
        let fx = fixture("unused");
        let path = fx.write("a.txt", "one two three");
        assert!(fx.service.upload(&path).await.is_success());

        let status = fx.service.system_status().await;
        assert_eq!(status.embedding_service.status, "loaded");
        assert_eq!(status.embedding_service.provider, "mock");
        assert_eq!(status.llm_service.status, "loaded");
        assert_eq!(status.vector_store.provider, "sqlite");
        assert_eq!(status.vector_store.collection, "documents");
        assert_eq!(status.vector_store.document_count, 1);
        assert_eq!(status.vector_store.status, "ready");
        assert_eq!(status.document_processor.chunk_size, 8);
        assert_eq!(status.document_processor.chunk_overlap, 2);

        let degraded = service_with(RagConfig::default(), Arc::new(FailingLlm), Arc::new(FailingEmbedder));
        let status = degraded.system_status().await;
        assert_eq!(status.llm_service.status, "not_loaded");
        assert_eq!(status.embedding_service.status, "not_loaded");
    }

    #[tokio::test]
    async fn test_ask_timeout() {
        let mut config = RagConfig::default();
        config.processing.ask_timeout_secs = Some(1);
        let llm = Arc::new(ScriptedLlm::replying("late").with_delay(Duration::from_secs(5)));
        let service = service_with(config, llm, Arc::new(MockEmbedder::new(64)));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, "The quick brown fox.").unwrap();
        assert!(service.upload(&path).await.is_success());

        let result = service.ask("fox", 1).await;
        assert!(result.is_error());
        assert_eq!(result.answer, format!("{}Operation timed out after 1s", ERROR_ANSWER_PREFIX));
    }

    #[test]
    fn test_service_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RagService>();
    }
}
