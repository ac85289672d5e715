//! PostgreSQL implementation of the core persistence traits.

use async_trait::async_trait;
use serde_json::Value;
use stride_core::awards::EarnedBadge;
use stride_core::error::CoreError;
use stride_core::migration::{read_schema_version, DocType, Document};
use stride_core::store::{AwardStore, DocumentKey, DocumentStore};
use stride_core::types::{Timestamp, UserId};

use crate::models::document::{DocumentRow, UpsertDocument};
use crate::repositories::{DocumentRepo, EarnedBadgeRepo};
use crate::DbPool;

/// [`DocumentStore`] and [`AwardStore`] backed by the `documents` and
/// `earned_badges` tables. Cheap to clone.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn storage_error(e: sqlx::Error) -> CoreError {
    CoreError::Storage(e.to_string())
}

fn into_document(row: DocumentRow) -> Result<Document, CoreError> {
    match row.body {
        Value::Object(map) => Ok(map),
        other => Err(CoreError::Internal(format!(
            "{} document {} for owner {} is not a JSON object: {other}",
            row.doc_type, row.doc_key, row.owner_id
        ))),
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn load_document(
        &self,
        doc_type: DocType,
        key: &DocumentKey,
    ) -> Result<Option<Document>, CoreError> {
        DocumentRepo::find(&self.pool, key.owner_id, doc_type.as_str(), &key.id)
            .await
            .map_err(storage_error)?
            .map(into_document)
            .transpose()
    }

    async fn save_document(
        &self,
        doc_type: DocType,
        key: &DocumentKey,
        document: Document,
    ) -> Result<(), CoreError> {
        let schema_version = i32::try_from(read_schema_version(&document)?).map_err(|_| {
            CoreError::Validation(format!("schemaVersion out of range for {}", doc_type.as_str()))
        })?;
        let input = UpsertDocument {
            owner_id: key.owner_id,
            doc_type: doc_type.as_str().to_string(),
            doc_key: key.id.clone(),
            body: Value::Object(document),
            schema_version,
        };
        DocumentRepo::upsert(&self.pool, &input)
            .await
            .map_err(storage_error)?;
        tracing::debug!(
            owner_id = key.owner_id,
            doc_type = doc_type.as_str(),
            doc_key = %key.id,
            schema_version,
            "Document saved"
        );
        Ok(())
    }

    async fn load_recent_documents(
        &self,
        owner_id: UserId,
        doc_type: DocType,
        count: usize,
    ) -> Result<Vec<Document>, CoreError> {
        let limit = i64::try_from(count).unwrap_or(i64::MAX);
        DocumentRepo::list_recent(&self.pool, owner_id, doc_type.as_str(), limit)
            .await
            .map_err(storage_error)?
            .into_iter()
            .map(into_document)
            .collect()
    }
}

#[async_trait]
impl AwardStore for PgStore {
    async fn load_award(
        &self,
        user_id: UserId,
        badge_id: &str,
    ) -> Result<Option<EarnedBadge>, CoreError> {
        Ok(EarnedBadgeRepo::find(&self.pool, user_id, badge_id)
            .await
            .map_err(storage_error)?
            .map(EarnedBadge::from))
    }

    async fn save_award(
        &self,
        user_id: UserId,
        badge_id: &str,
        earned_at: Timestamp,
    ) -> Result<bool, CoreError> {
        EarnedBadgeRepo::insert_if_absent(&self.pool, user_id, badge_id, earned_at)
            .await
            .map_err(storage_error)
    }

    async fn list_awards(&self, user_id: UserId) -> Result<Vec<EarnedBadge>, CoreError> {
        Ok(EarnedBadgeRepo::list_by_user(&self.pool, user_id)
            .await
            .map_err(storage_error)?
            .into_iter()
            .map(EarnedBadge::from)
            .collect())
    }
}
