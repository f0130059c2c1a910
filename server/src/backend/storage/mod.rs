//! # Storage Module
//!
//! Handles all data persistence for the study tracker.
//!
//! State is kept as a small set of namespaced JSON documents (the session
//! token, the account roster, the task collection, the reward list and the
//! grade records). Each write replaces a whole document, so a document is
//! never observed half written.
//!
//! ## Layout
//!
//! - **traits**: the `DocumentStorage` abstraction the domain depends on
//! - **documents**: typed load/save helpers and the document key namespace
//! - **json**: file-backed implementation, one `<key>.json` file per document

pub mod documents;
pub mod json;
pub mod traits;

pub use documents::{load_collection, load_document, save_document, DocumentKey};
pub use json::{DocumentRepository, JsonConnection};
pub use traits::DocumentStorage;
