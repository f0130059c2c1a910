//! # JSON Document Repository
//!
//! File-backed `DocumentStorage`. Every write goes to a temp file first and
//! is renamed over the target, so a crash mid-write leaves the previous
//! document intact.

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use std::fs;
use std::io::ErrorKind;

use super::connection::JsonConnection;
use crate::backend::storage::{DocumentKey, DocumentStorage};

#[derive(Debug, Clone)]
pub struct DocumentRepository {
    connection: JsonConnection,
}

impl DocumentRepository {
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &JsonConnection {
        &self.connection
    }
}

#[async_trait]
impl DocumentStorage for DocumentRepository {
    async fn read_document(&self, key: DocumentKey) -> Result<Option<String>> {
        let path = self.connection.document_path(key);

        match fs::read_to_string(&path) {
            Ok(contents) => {
                debug!("Read document {} ({} bytes)", key, contents.len());
                Ok(Some(contents))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    async fn write_document(&self, key: DocumentKey, contents: &str) -> Result<()> {
        let path = self.connection.document_path(key);
        let temp_path = path.with_extension("tmp");

        fs::write(&temp_path, contents)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;

        debug!("Wrote document {} ({} bytes)", key, contents.len());
        Ok(())
    }

    async fn remove_document(&self, key: DocumentKey) -> Result<()> {
        let path = self.connection.document_path(key);

        match fs::remove_file(&path) {
            Ok(()) => {
                info!("Removed document {}", key);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::{load_collection, load_document, save_document};
    use tempfile::TempDir;

    fn setup_test_repo() -> (DocumentRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let connection = JsonConnection::new(temp_dir.path()).unwrap();
        (DocumentRepository::new(connection), temp_dir)
    }

    #[tokio::test]
    async fn test_missing_document_reads_as_none() {
        let (repo, _temp_dir) = setup_test_repo();

        let contents = repo.read_document(DocumentKey::Tasks).await.unwrap();
        assert!(contents.is_none());
    }

    #[tokio::test]
    async fn test_write_then_read_document() {
        let (repo, _temp_dir) = setup_test_repo();

        repo.write_document(DocumentKey::Rewards, "[1,2,3]").await.unwrap();

        let contents = repo.read_document(DocumentKey::Rewards).await.unwrap();
        assert_eq!(contents.as_deref(), Some("[1,2,3]"));
        assert!(!repo
            .connection()
            .document_path(DocumentKey::Rewards)
            .with_extension("tmp")
            .exists());
    }

    #[tokio::test]
    async fn test_remove_document_is_idempotent() {
        let (repo, _temp_dir) = setup_test_repo();

        repo.write_document(DocumentKey::Token, "\"abc\"").await.unwrap();
        repo.remove_document(DocumentKey::Token).await.unwrap();
        repo.remove_document(DocumentKey::Token).await.unwrap();

        assert!(repo.read_document(DocumentKey::Token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_collection_reads_as_empty() {
        let (repo, _temp_dir) = setup_test_repo();

        repo.write_document(DocumentKey::Tasks, "{not json").await.unwrap();

        let tasks: Vec<serde_json::Value> = load_collection(&repo, DocumentKey::Tasks).await.unwrap();
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn test_save_and_load_typed_document() {
        let (repo, _temp_dir) = setup_test_repo();

        save_document(&repo, DocumentKey::Token, "token-value").await.unwrap();

        let token: Option<String> = load_document(&repo, DocumentKey::Token).await.unwrap();
        assert_eq!(token.as_deref(), Some("token-value"));
    }
}
