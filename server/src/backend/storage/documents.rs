//! Typed access to the persisted documents.

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

use super::traits::DocumentStorage;

/// Namespaced document keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKey {
    /// Session token of the signed-in account
    Token,
    /// Account roster, children included
    Users,
    /// Global task collection
    Tasks,
    Rewards,
    Grades,
}

impl DocumentKey {
    pub const ALL: [DocumentKey; 5] = [
        DocumentKey::Token,
        DocumentKey::Users,
        DocumentKey::Tasks,
        DocumentKey::Rewards,
        DocumentKey::Grades,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKey::Token => "growtree_token",
            DocumentKey::Users => "growtree_users",
            DocumentKey::Tasks => "growtree_tasks",
            DocumentKey::Rewards => "growtree_rewards",
            DocumentKey::Grades => "growtree_grades",
        }
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Load and decode a document.
///
/// A missing document yields `None`. A document that fails to decode is
/// treated the same way and logged; I/O failures are still errors.
pub async fn load_document<T: DeserializeOwned>(
    storage: &dyn DocumentStorage,
    key: DocumentKey,
) -> Result<Option<T>> {
    let raw = match storage.read_document(key).await? {
        Some(raw) => raw,
        None => {
            debug!("Document {} not found", key);
            return Ok(None);
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!("Document {} is malformed, ignoring it: {}", key, e);
            Ok(None)
        }
    }
}

/// Load a collection document, empty when missing or malformed
pub async fn load_collection<T: DeserializeOwned>(
    storage: &dyn DocumentStorage,
    key: DocumentKey,
) -> Result<Vec<T>> {
    Ok(load_document(storage, key).await?.unwrap_or_default())
}

/// Encode and write a whole document
pub async fn save_document<T: Serialize + ?Sized>(
    storage: &dyn DocumentStorage,
    key: DocumentKey,
    value: &T,
) -> Result<()> {
    let contents = serde_json::to_string(value)
        .with_context(|| format!("Failed to encode document {}", key))?;
    storage.write_document(key, &contents).await
}
