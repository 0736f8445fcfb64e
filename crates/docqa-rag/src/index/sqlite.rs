//! SQLite-backed vector index with exact cosine search
//!
//! One table per collection. Embeddings are stored as little-endian `f32`
//! blobs and compared by brute force, which keeps results exact.

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{params, Connection, Transaction};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;
use crate::types::{Chunk, ChunkMetadata, SearchResult, StoredRecord};

use super::similarity::cosine_distance;
use super::VectorIndex;

const DEFAULT_BATCH_SIZE: usize = 32;

/// Synchronous record store; callers move work onto the blocking pool
struct RecordStore {
    conn: Mutex<Connection>,
    table: String,
}

impl RecordStore {
    fn new(conn: Connection, collection: &str) -> Result<Self> {
        if collection.is_empty()
            || !collection.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(Error::Config(format!("Invalid collection name '{}'", collection)));
        }

        let store = Self {
            conn: Mutex::new(conn),
            table: collection.to_string(),
        };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            "#,
        )
        .map_err(|e| Error::Internal(format!("Failed to set pragmas: {}", e)))?;

        conn.execute_batch(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS "{table}" (
                key TEXT PRIMARY KEY,
                text TEXT NOT NULL,
                filename TEXT NOT NULL,
                chunk_id INTEGER NOT NULL,
                chunk_index INTEGER NOT NULL,
                source TEXT NOT NULL,
                chunk_size INTEGER NOT NULL,
                embedding BLOB NOT NULL
            );

            CREATE INDEX IF NOT EXISTS "idx_{table}_filename" ON "{table}"(filename);
            "#,
            table = self.table
        ))
        .map_err(|e| Error::Internal(format!("Failed to create collection '{}': {}", self.table, e)))?;

        Ok(())
    }

    fn insert(&self, tx: &Transaction<'_>, records: &[StoredRecord]) -> rusqlite::Result<()> {
        let mut stmt = tx.prepare_cached(&format!(
            r#"INSERT OR REPLACE INTO "{}"
               (key, text, filename, chunk_id, chunk_index, source, chunk_size, embedding)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"#,
            self.table
        ))?;

        for record in records {
            let meta = &record.chunk.metadata;
            stmt.execute(params![
                record.record_key(),
                record.chunk.text,
                meta.filename,
                meta.chunk_id,
                meta.chunk_index,
                meta.source,
                meta.chunk_size as i64,
                encode_embedding(&record.embedding),
            ])?;
        }

        Ok(())
    }

    fn upsert(&self, records: &[StoredRecord]) -> rusqlite::Result<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        self.insert(&tx, records)?;
        tx.commit()
    }

    fn replace(&self, filename: &str, records: &[StoredRecord]) -> rusqlite::Result<usize> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let removed = tx.execute(
            &format!(r#"DELETE FROM "{}" WHERE filename = ?1"#, self.table),
            params![filename],
        )?;
        self.insert(&tx, records)?;
        tx.commit()?;
        Ok(removed)
    }

    fn delete(&self, filename: &str) -> rusqlite::Result<usize> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let removed = tx.execute(
            &format!(r#"DELETE FROM "{}" WHERE filename = ?1"#, self.table),
            params![filename],
        )?;
        tx.commit()?;
        Ok(removed)
    }

    fn nearest(&self, query: &[f32], top_k: usize) -> Result<Vec<SearchResult>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(&format!(
            r#"SELECT text, filename, chunk_id, chunk_index, source, chunk_size, embedding
               FROM "{}" ORDER BY filename, chunk_id"#,
            self.table
        ))?;

        let mut rows = stmt.query([])?;
        let mut results = Vec::new();
        while let Some(row) = rows.next()? {
            let record = record_from_row(row)?;
            let distance = cosine_distance(query, &record.embedding)?;
            results.push(SearchResult::from_chunk(record.chunk, distance));
        }

        // Stable sort keeps storage order among equal distances
        results.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        results.truncate(top_k);
        Ok(results)
    }

    fn filenames(&self) -> rusqlite::Result<BTreeSet<String>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(&format!(r#"SELECT DISTINCT filename FROM "{}""#, self.table))?;
        let names = stmt.query_map([], |row| row.get::<_, String>(0))?;
        names.collect()
    }

    fn chunks_of(&self, filename: &str) -> rusqlite::Result<Vec<Chunk>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(&format!(
            r#"SELECT text, filename, chunk_id, chunk_index, source, chunk_size
               FROM "{}" WHERE filename = ?1 ORDER BY chunk_id"#,
            self.table
        ))?;
        let chunks = stmt.query_map(params![filename], chunk_from_row)?;
        chunks.collect()
    }

    fn count(&self) -> rusqlite::Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row(&format!(r#"SELECT COUNT(*) FROM "{}""#, self.table), [], |row| {
            row.get(0)
        })?;
        Ok(count as usize)
    }

    fn ping(&self) -> bool {
        let conn = self.conn.lock();
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0)).is_ok()
    }
}

fn chunk_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Chunk> {
    Ok(Chunk {
        text: row.get(0)?,
        metadata: ChunkMetadata {
            filename: row.get(1)?,
            chunk_id: row.get(2)?,
            chunk_index: row.get(3)?,
            source: row.get(4)?,
            chunk_size: row.get::<_, i64>(5)? as usize,
        },
    })
}

fn record_from_row(row: &rusqlite::Row<'_>) -> Result<StoredRecord> {
    let chunk = chunk_from_row(row)?;
    let blob: Vec<u8> = row.get(6)?;
    Ok(StoredRecord::new(chunk, decode_embedding(&blob)?))
}

fn encode_embedding(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn decode_embedding(blob: &[u8]) -> Result<Vec<f32>> {
    if blob.len() % 4 != 0 {
        return Err(Error::index_read(format!("corrupt embedding blob of {} bytes", blob.len())));
    }
    Ok(blob
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

/// Vector index persisted in SQLite
pub struct SqliteVectorIndex {
    store: Arc<RecordStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    batch_size: usize,
}

impl SqliteVectorIndex {
    /// Open (or create) the configured collection on disk
    pub fn open(config: &RagConfig, embedder: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        let path = &config.vector_db.storage_path;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let index = Self::open_path(path, &config.vector_db.collection, embedder)?
            .with_batch_size(config.embeddings.batch_size);

        tracing::info!(
            "Opened collection '{}' at {}",
            config.vector_db.collection,
            path.display()
        );

        Ok(index)
    }

    /// Open a collection in the SQLite file at `path`
    pub fn open_path(
        path: impl AsRef<Path>,
        collection: &str,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .map_err(|e| Error::Internal(format!("Failed to open database: {}", e)))?;
        Self::from_connection(conn, collection, embedder)
    }

    /// Create an ephemeral in-memory collection
    pub fn open_in_memory(collection: &str, embedder: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::Internal(format!("Failed to open in-memory database: {}", e)))?;
        Self::from_connection(conn, collection, embedder)
    }

    fn from_connection(conn: Connection, collection: &str, embedder: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        Ok(Self {
            store: Arc::new(RecordStore::new(conn, collection)?),
            embedder,
            batch_size: DEFAULT_BATCH_SIZE,
        })
    }

    /// Texts per `embed_batch` request
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Embed chunk texts in order and pair each chunk with its vector
    async fn embed_chunks(&self, chunks: &[Chunk]) -> Result<Vec<StoredRecord>> {
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();

        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            let vectors = self
                .embedder
                .embed_batch(batch)
                .await
                .map_err(|e| Error::index_write(e.to_string()))?;

            if vectors.len() != batch.len() {
                return Err(Error::index_write(format!(
                    "embedder returned {} vectors for {} texts",
                    vectors.len(),
                    batch.len()
                )));
            }
            embeddings.extend(vectors);
        }

        Ok(chunks.iter().cloned().zip(embeddings).map(|(c, e)| StoredRecord::new(c, e)).collect())
    }

    async fn run_blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&RecordStore) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(|e| Error::Internal(format!("Task join error: {}", e)))?
    }
}

#[async_trait]
impl VectorIndex for SqliteVectorIndex {
    async fn add(&self, chunks: &[Chunk]) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        let records = self.embed_chunks(chunks).await?;
        let added = records.len();

        self.run_blocking(move |store| {
            store
                .upsert(&records)
                .map_err(|e| Error::index_write(e.to_string()))
        })
        .await?;

        tracing::debug!("Added {} records to '{}'", added, self.store.table);
        Ok(())
    }

    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        if top_k == 0 || self.count().await? == 0 {
            return Ok(Vec::new());
        }

        let query = self
            .embedder
            .embed(query)
            .await
            .map_err(|e| Error::index_read(e.to_string()))?;

        let results = self
            .run_blocking(move |store| {
                store.nearest(&query, top_k).map_err(|e| match e {
                    Error::IndexRead(_) => e,
                    other => Error::index_read(other.to_string()),
                })
            })
            .await?;

        tracing::debug!("Search returned {} results (top_k {})", results.len(), top_k);
        Ok(results)
    }

    async fn delete_by_filename(&self, filename: &str) -> Result<usize> {
        let filename = filename.to_string();
        let removed = self
            .run_blocking(move |store| {
                store
                    .delete(&filename)
                    .map_err(|e| Error::index_write(e.to_string()))
            })
            .await?;

        tracing::debug!("Removed {} records from '{}'", removed, self.store.table);
        Ok(removed)
    }

    async fn list_filenames(&self) -> Result<BTreeSet<String>> {
        self.run_blocking(|store| store.filenames().map_err(|e| Error::index_read(e.to_string())))
            .await
    }

    async fn get_by_filename(&self, filename: &str) -> Result<Vec<Chunk>> {
        let filename = filename.to_string();
        self.run_blocking(move |store| {
            store
                .chunks_of(&filename)
                .map_err(|e| Error::index_read(e.to_string()))
        })
        .await
    }

    async fn count(&self) -> Result<usize> {
        self.run_blocking(|store| store.count().map_err(|e| Error::index_read(e.to_string())))
            .await
    }

    async fn replace_document(&self, filename: &str, chunks: &[Chunk]) -> Result<usize> {
        if let Some(stray) = chunks.iter().find(|c| c.metadata.filename != filename) {
            return Err(Error::InvalidInput(format!(
                "chunk '{}' does not belong to '{}'",
                stray.record_key(),
                filename
            )));
        }

        // Embed before touching storage so a model failure leaves the old records intact
        let records = self.embed_chunks(chunks).await?;
        let filename = filename.to_string();
        let inserted = records.len();

        let removed = self
            .run_blocking(move |store| {
                store
                    .replace(&filename, &records)
                    .map_err(|e| Error::index_write(e.to_string()))
            })
            .await?;

        tracing::debug!("Replaced {} records with {}", removed, inserted);
        Ok(inserted)
    }

    async fn health_check(&self) -> Result<bool> {
        self.run_blocking(|store| Ok(store.ping())).await
    }

    fn name(&self) -> &str {
        "sqlite"
    }

    fn collection(&self) -> &str {
        &self.store.table
    }

    fn embedder(&self) -> &dyn EmbeddingProvider {
        self.embedder.as_ref()
    }
}
