//! # Storage Traits
//!
//! Storage abstraction that lets the domain layer persist its documents
//! without knowing where they live.

use anyhow::Result;
use async_trait::async_trait;

use super::documents::DocumentKey;

/// Key-value store of opaque JSON documents.
///
/// Implementations must replace a document atomically on `write_document`:
/// readers see either the previous contents or the new contents.
#[async_trait]
pub trait DocumentStorage: Send + Sync {
    /// Read the raw contents of a document, `None` if it was never written
    async fn read_document(&self, key: DocumentKey) -> Result<Option<String>>;

    /// Replace a document with new contents
    async fn write_document(&self, key: DocumentKey, contents: &str) -> Result<()>;

    /// Remove a document. Removing an absent document is not an error.
    async fn remove_document(&self, key: DocumentKey) -> Result<()>;
}
