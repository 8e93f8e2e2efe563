#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Keyed document storage for arrest records and media items.
//!
//! [`DocumentStore`] is the small set of capabilities the dashboard needs
//! from a backend: read a collection, read one document, upsert, insert
//! under a generated id, delete, and an atomic multi-document upsert.
//! [`sqlite::SqliteDocumentStore`] implements it on `switchy_database`.
//!
//! Timestamp fields (`updatedAt`, `createdAt`) holding [`server_timestamp`]
//! are replaced with the current UTC time when written.

pub mod documents;
pub mod sqlite;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

pub use documents::{arrest_fields, load_counts, load_media, load_records, media_fields};
pub use sqlite::SqliteDocumentStore;

/// Default path for the document database.
pub const DEFAULT_DB_PATH: &str = "data/arrest_map.db";

/// Sentinel value replaced by the write time.
const SERVER_TIMESTAMP: &str = "__server_timestamp__";

/// Fields the store stamps. Any other field keeps its value verbatim.
const TIMESTAMP_FIELDS: &[&str] = &["updatedAt", "createdAt"];

/// Document fields as a JSON object.
pub type Fields = Map<String, Value>;

/// Errors from document store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A database query or command failed.
    #[error("Database error: {0}")]
    Database(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A stored document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Key within its collection.
    pub id: String,
    /// Stored fields.
    pub fields: Fields,
}

/// Minimal keyed document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns every document in `collection`.
    async fn fetch_all(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Returns one document, or `None` if it does not exist.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Creates or fully replaces a document.
    async fn set(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Inserts a document under a generated id and returns the id.
    async fn add(&self, collection: &str, fields: Fields) -> Result<String, StoreError>;

    /// Deletes a document. Returns `true` if it existed.
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError>;

    /// Creates or replaces several documents atomically.
    async fn batch_set(
        &self,
        collection: &str,
        documents: Vec<(String, Fields)>,
    ) -> Result<(), StoreError>;
}

/// A field value the store replaces with its write time.
#[must_use]
pub fn server_timestamp() -> Value {
    Value::String(SERVER_TIMESTAMP.to_string())
}

/// Replaces each timestamp field holding [`server_timestamp`] with `now`
/// (RFC 3339).
pub(crate) fn stamp(fields: &mut Fields, now: &str) {
    for name in TIMESTAMP_FIELDS {
        if fields.get(*name).and_then(Value::as_str) == Some(SERVER_TIMESTAMP) {
            fields.insert((*name).to_string(), Value::String(now.to_string()));
        }
    }
}

/// Reads the database path from `ARREST_MAP_DB`, falling back to
/// [`DEFAULT_DB_PATH`].
#[must_use]
pub fn db_path_from_env() -> std::path::PathBuf {
    std::env::var("ARREST_MAP_DB")
        .unwrap_or_else(|_| DEFAULT_DB_PATH.to_string())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamp_replaces_only_sentinels() {
        let mut fields = Fields::new();
        fields.insert("updatedAt".to_string(), server_timestamp());
        fields.insert("note".to_string(), Value::String("keep".to_string()));
        stamp(&mut fields, "2024-01-01T00:00:00+00:00");
        assert_eq!(fields["updatedAt"], "2024-01-01T00:00:00+00:00");
        assert_eq!(fields["note"], "keep");
    }

    #[test]
    fn stamp_leaves_user_text_matching_the_sentinel() {
        let mut fields = Fields::new();
        fields.insert("title".to_string(), server_timestamp());
        fields.insert("createdAt".to_string(), server_timestamp());
        stamp(&mut fields, "2024-01-01T00:00:00+00:00");
        assert_eq!(fields["title"], SERVER_TIMESTAMP);
        assert_eq!(fields["createdAt"], "2024-01-01T00:00:00+00:00");
    }
}
