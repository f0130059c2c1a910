//! Test utilities for the JSON document store
//!
//! The temporary directory lives as long as the environment, so documents
//! written by a test are removed even if the test panics.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use super::connection::JsonConnection;
use super::document_repository::DocumentRepository;
use crate::backend::storage::DocumentStorage;

/// Temporary data directory plus a connection rooted in it
pub struct TestEnvironment {
    pub connection: JsonConnection,
    /// Base directory path for manual inspection if needed
    pub base_path: PathBuf,
    _temp_dir: TempDir, // Keep alive to prevent cleanup
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let connection = JsonConnection::new(temp_dir.path())?;
        Ok(Self {
            connection,
            base_path: temp_dir.path().to_path_buf(),
            _temp_dir: temp_dir,
        })
    }

    /// A fresh repository over this environment's directory
    pub fn storage(&self) -> Arc<dyn DocumentStorage> {
        Arc::new(DocumentRepository::new(self.connection.clone()))
    }
}
