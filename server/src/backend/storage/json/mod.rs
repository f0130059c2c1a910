//! JSON file storage: one file per document under the data directory.
//!
//! ```text
//! data/
//! ├── growtree_token.json
//! ├── growtree_users.json
//! ├── growtree_tasks.json
//! ├── growtree_rewards.json
//! └── growtree_grades.json
//! ```

pub mod connection;
pub mod document_repository;

#[cfg(test)]
pub mod test_utils;

pub use connection::JsonConnection;
pub use document_repository::DocumentRepository;
