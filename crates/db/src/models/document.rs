//! Versioned user document model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stride_core::types::{DbId, Timestamp, UserId};

/// A row from the `documents` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DocumentRow {
    pub id: DbId,
    pub owner_id: UserId,
    pub doc_type: String,
    pub doc_key: String,
    pub body: serde_json::Value,
    pub schema_version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting or replacing a document.
#[derive(Debug, Deserialize)]
pub struct UpsertDocument {
    pub owner_id: UserId,
    pub doc_type: String,
    pub doc_key: String,
    pub body: serde_json::Value,
    pub schema_version: i32,
}
