//! Repository for the `documents` table.

use sqlx::PgPool;
use stride_core::types::UserId;

use crate::models::document::{DocumentRow, UpsertDocument};

/// Column list for documents queries.
const COLUMNS: &str =
    "id, owner_id, doc_type, doc_key, body, schema_version, created_at, updated_at";

/// Provides data access for versioned user documents.
pub struct DocumentRepo;

impl DocumentRepo {
    /// Insert a document, or replace the body of the existing one with the
    /// same owner, type and key.
    pub async fn upsert(pool: &PgPool, input: &UpsertDocument) -> Result<DocumentRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO documents (owner_id, doc_type, doc_key, body, schema_version)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT ON CONSTRAINT uq_documents_owner_type_key DO UPDATE SET
                body = EXCLUDED.body,
                schema_version = EXCLUDED.schema_version,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DocumentRow>(&query)
            .bind(input.owner_id)
            .bind(&input.doc_type)
            .bind(&input.doc_key)
            .bind(&input.body)
            .bind(input.schema_version)
            .fetch_one(pool)
            .await
    }

    pub async fn find(
        pool: &PgPool,
        owner_id: UserId,
        doc_type: &str,
        doc_key: &str,
    ) -> Result<Option<DocumentRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM documents
             WHERE owner_id = $1 AND doc_type = $2 AND doc_key = $3"
        );
        sqlx::query_as::<_, DocumentRow>(&query)
            .bind(owner_id)
            .bind(doc_type)
            .bind(doc_key)
            .fetch_optional(pool)
            .await
    }

    /// Up to `limit` documents of one type for an owner, highest key first.
    pub async fn list_recent(
        pool: &PgPool,
        owner_id: UserId,
        doc_type: &str,
        limit: i64,
    ) -> Result<Vec<DocumentRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM documents
             WHERE owner_id = $1 AND doc_type = $2
             ORDER BY doc_key DESC
             LIMIT $3"
        );
        sqlx::query_as::<_, DocumentRow>(&query)
            .bind(owner_id)
            .bind(doc_type)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
