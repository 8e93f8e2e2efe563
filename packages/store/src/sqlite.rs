//! `SQLite` backend for [`DocumentStore`].
//!
//! Every collection lives in a single `documents` table keyed by
//! `(collection, id)`, with the fields stored as a JSON object.

use std::fmt::Write as _;
use std::path::Path;

use async_trait::async_trait;
use moosicbox_json_utils::database::ToValue as _;
use switchy_database::{Database, DatabaseValue};
use switchy_database_connection::init_sqlite_rusqlite;

use crate::{Document, DocumentStore, Fields, StoreError, stamp};

/// Document store persisted in an `SQLite` file.
pub struct SqliteDocumentStore {
    db: Box<dyn Database>,
}

impl std::fmt::Debug for SqliteDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteDocumentStore").finish_non_exhaustive()
    }
}

impl SqliteDocumentStore {
    /// Opens (or creates) the database at `path` and ensures the schema
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the database cannot be opened or schema
    /// creation fails.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let db = init_sqlite_rusqlite(Some(path)).map_err(|e| StoreError::Database(e.to_string()))?;
        log::debug!("Opened document store at {}", path.display());

        Self::with_database(db).await
    }

    /// Wraps an existing connection and ensures the schema exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if schema creation fails.
    pub async fn with_database(db: Box<dyn Database>) -> Result<Self, StoreError> {
        db.exec_raw(
            "CREATE TABLE IF NOT EXISTS documents (
                collection  TEXT NOT NULL,
                id          TEXT NOT NULL,
                fields      TEXT NOT NULL,
                PRIMARY KEY (collection, id)
            )",
        )
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self { db })
    }
}

fn parse_fields(id: &str, raw: &str) -> Result<Fields, StoreError> {
    serde_json::from_str(raw).map_err(|e| {
        log::warn!("Document {id} has unreadable fields: {e}");
        StoreError::Json(e)
    })
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn fetch_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let rows = self
            .db
            .query_raw_params(
                "SELECT id, fields FROM documents WHERE collection = $1 ORDER BY id",
                &[DatabaseValue::String(collection.to_string())],
            )
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let mut documents = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: String = row.to_value("id").unwrap_or_default();
            let raw: String = row.to_value("fields").unwrap_or_default();
            // Unreadable rows are logged by parse_fields and left out.
            if let Ok(fields) = parse_fields(&id, &raw) {
                documents.push(Document { id, fields });
            }
        }

        Ok(documents)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let rows = self
            .db
            .query_raw_params(
                "SELECT fields FROM documents WHERE collection = $1 AND id = $2",
                &[
                    DatabaseValue::String(collection.to_string()),
                    DatabaseValue::String(id.to_string()),
                ],
            )
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        let Some(row) = rows.first() else {
            return Ok(None);
        };

        let raw: String = row.to_value("fields").unwrap_or_default();
        Ok(Some(Document {
            id: id.to_string(),
            fields: parse_fields(id, &raw)?,
        }))
    }

    async fn set(&self, collection: &str, id: &str, mut fields: Fields) -> Result<(), StoreError> {
        stamp(&mut fields, &now());

        self.db
            .exec_raw_params(
                "INSERT INTO documents (collection, id, fields)
                 VALUES ($1, $2, $3)
                 ON CONFLICT (collection, id) DO UPDATE SET fields = excluded.fields",
                &[
                    DatabaseValue::String(collection.to_string()),
                    DatabaseValue::String(id.to_string()),
                    DatabaseValue::String(serde_json::to_string(&fields)?),
                ],
            )
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    async fn add(&self, collection: &str, mut fields: Fields) -> Result<String, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        stamp(&mut fields, &now());

        self.db
            .exec_raw_params(
                "INSERT INTO documents (collection, id, fields) VALUES ($1, $2, $3)",
                &[
                    DatabaseValue::String(collection.to_string()),
                    DatabaseValue::String(id.clone()),
                    DatabaseValue::String(serde_json::to_string(&fields)?),
                ],
            )
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(id)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let deleted = self
            .db
            .exec_raw_params(
                "DELETE FROM documents WHERE collection = $1 AND id = $2",
                &[
                    DatabaseValue::String(collection.to_string()),
                    DatabaseValue::String(id.to_string()),
                ],
            )
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(deleted > 0)
    }

    /// Writes all documents with a single multi-row upsert, which `SQLite`
    /// applies atomically.
    async fn batch_set(
        &self,
        collection: &str,
        documents: Vec<(String, Fields)>,
    ) -> Result<(), StoreError> {
        if documents.is_empty() {
            return Ok(());
        }

        let now = now();
        let mut sql = String::from("INSERT INTO documents (collection, id, fields) VALUES ");
        let mut params = Vec::with_capacity(documents.len() * 3);

        for (i, (id, mut fields)) in documents.into_iter().enumerate() {
            stamp(&mut fields, &now);
            let base = i * 3;
            if i > 0 {
                sql.push_str(", ");
            }
            let _ = write!(sql, "(${}, ${}, ${})", base + 1, base + 2, base + 3);
            params.push(DatabaseValue::String(collection.to_string()));
            params.push(DatabaseValue::String(id));
            params.push(DatabaseValue::String(serde_json::to_string(&fields)?));
        }

        sql.push_str(" ON CONFLICT (collection, id) DO UPDATE SET fields = excluded.fields");

        self.db
            .exec_raw_params(&sql, &params)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }
}
