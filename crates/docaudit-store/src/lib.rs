//! Docaudit Storage Layer
//!
//! Implements the `DocumentStore` trait on SQLite.
//!
//! # Architecture
//!
//! - `documents` holds uploaded text with creation timestamps
//! - `analysis_results` holds one row per analysis invocation; the record is
//!   stored as an opaque JSON blob that the analysis pipeline has already
//!   normalized
//!
//! # Examples
//!
//! ```no_run
//! use docaudit_store::SqliteStore;
//!
//! let store = SqliteStore::open("data/docaudit.sqlite3").unwrap();
//! // Store is ready for document operations
//! ```

#![warn(missing_docs)]

use docaudit_domain::traits::DocumentStore;
use docaudit_domain::{
    AnalysisResult, Document, DocumentId, DocumentSummary, ResultId, StoredAnalysis,
};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Could not create the database directory
    #[error("failed to create database directory: {0}")]
    CreateDir(#[from] std::io::Error),

    /// Invalid data format (e.g. an undecodable result blob)
    #[error("invalid data: {0}")]
    InvalidData(String),
}

/// SQLite-based implementation of `DocumentStore`
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Callers open one store per
/// request (or per thread); concurrent writers are serialized by SQLite's
/// own locking.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a store at the given database path
    ///
    /// The parent directory is created if absent.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use docaudit_store::SqliteStore;
    ///
    /// let store = SqliteStore::open("data/docaudit.sqlite3").unwrap();
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open an in-memory store (useful for testing)
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    fn row_to_summary(row: &rusqlite::Row<'_>) -> rusqlite::Result<DocumentSummary> {
        Ok(DocumentSummary {
            id: DocumentId::from_value(row.get(0)?),
            filename: row.get(1)?,
            created_at: row.get::<_, i64>(2)? as u64,
        })
    }
}

impl DocumentStore for SqliteStore {
    type Error = StoreError;

    fn insert_document(
        &mut self,
        filename: &str,
        text: &str,
        created_at: u64,
    ) -> Result<DocumentId, Self::Error> {
        self.conn.execute(
            "INSERT INTO documents (filename, text, created_at) VALUES (?1, ?2, ?3)",
            params![filename, text, created_at as i64],
        )?;

        Ok(DocumentId::from_value(self.conn.last_insert_rowid()))
    }

    fn get_document(&self, id: DocumentId) -> Result<Option<Document>, Self::Error> {
        let document = self
            .conn
            .query_row(
                "SELECT id, filename, text, created_at FROM documents WHERE id = ?1",
                params![id.value()],
                |row| {
                    Ok(Document {
                        id: DocumentId::from_value(row.get(0)?),
                        filename: row.get(1)?,
                        text: row.get(2)?,
                        created_at: row.get::<_, i64>(3)? as u64,
                    })
                },
            )
            .optional()?;

        Ok(document)
    }

    fn list_documents(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<DocumentSummary>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, filename, created_at FROM documents
             ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2",
        )?;

        let summaries = stmt
            .query_map(params![limit as i64, offset as i64], Self::row_to_summary)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(summaries)
    }

    fn count_documents(&self) -> Result<u64, Self::Error> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn save_result(
        &mut self,
        doc_id: DocumentId,
        result: &AnalysisResult,
        created_at: u64,
    ) -> Result<ResultId, Self::Error> {
        let result_json = serde_json::to_string(result)
            .map_err(|e| StoreError::InvalidData(format!("unserializable result: {}", e)))?;

        self.conn.execute(
            "INSERT INTO analysis_results (doc_id, result_json, created_at) VALUES (?1, ?2, ?3)",
            params![doc_id.value(), result_json, created_at as i64],
        )?;

        Ok(ResultId::from_value(self.conn.last_insert_rowid()))
    }

    fn latest_result(&self, doc_id: DocumentId) -> Result<Option<StoredAnalysis>, Self::Error> {
        let row = self
            .conn
            .query_row(
                "SELECT id, doc_id, result_json, created_at FROM analysis_results
                 WHERE doc_id = ?1 ORDER BY created_at DESC, id DESC LIMIT 1",
                params![doc_id.value()],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((id, doc_id, result_json, created_at)) = row else {
            return Ok(None);
        };

        let result: AnalysisResult = serde_json::from_str(&result_json)
            .map_err(|e| StoreError::InvalidData(format!("undecodable result blob: {}", e)))?;

        Ok(Some(StoredAnalysis {
            id: ResultId::from_value(id),
            doc_id: DocumentId::from_value(doc_id),
            result,
            created_at: created_at as u64,
        }))
    }

    fn count_results(&self) -> Result<u64, Self::Error> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM analysis_results", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_initialization() {
        let store = SqliteStore::in_memory();
        assert!(store.is_ok(), "store should initialize successfully");
    }

    #[test]
    fn test_schema_is_idempotent() {
        let store = SqliteStore::in_memory().unwrap();
        // Re-running the schema must not fail on existing tables
        assert!(store.initialize_schema().is_ok());
    }
}
