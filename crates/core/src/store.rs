//! Persistence seams and the migrating document facade.
//!
//! Backends implement [`DocumentStore`] and [`AwardStore`] over raw
//! documents. [`Documents`] sits on top and guarantees that everything read
//! has been upgraded by the [`MigrationRegistry`] and everything written is
//! stamped with the current schema version.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::awards::EarnedBadge;
use crate::entries::{Entry, EntryKind};
use crate::error::CoreError;
use crate::migration::{DocType, Document, MigrationRegistry};
use crate::streaks::DATE_FORMAT;
use crate::types::{Timestamp, UserId};

/// Document id of a user's profile.
pub const PROFILE_DOC_ID: &str = "main";
/// Document id of a user's selected daily (body) metrics.
pub const DAILY_METRICS_DOC_ID: &str = "dailyMetrics";
/// Document id of a user's selected outcome metrics.
pub const OUTCOME_METRICS_DOC_ID: &str = "outcomeMetrics";

/// Location of a document within its type: owning user plus an id that is
/// unique for that user and type. Entry documents use their `YYYY-MM-DD`
/// date as id, so ids sort chronologically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentKey {
    pub owner_id: UserId,
    pub id: String,
}

impl DocumentKey {
    pub fn new(owner_id: UserId, id: impl Into<String>) -> Self {
        Self {
            owner_id,
            id: id.into(),
        }
    }

    pub fn entry(owner_id: UserId, date: NaiveDate) -> Self {
        Self::new(owner_id, date.format(DATE_FORMAT).to_string())
    }
}

/// Raw document persistence. Implementations never migrate.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn load_document(
        &self,
        doc_type: DocType,
        key: &DocumentKey,
    ) -> Result<Option<Document>, CoreError>;

    /// Insert or replace the document at `key`.
    async fn save_document(
        &self,
        doc_type: DocType,
        key: &DocumentKey,
        document: Document,
    ) -> Result<(), CoreError>;

    /// Up to `count` documents of `doc_type` owned by `owner_id`, ordered by
    /// id descending.
    async fn load_recent_documents(
        &self,
        owner_id: UserId,
        doc_type: DocType,
        count: usize,
    ) -> Result<Vec<Document>, CoreError>;
}

/// Earned-badge persistence, unique per `(user_id, badge_id)`.
///
/// Awards are fixed-shape records, not versioned documents: they never pass
/// through the [`MigrationRegistry`](crate::migration::MigrationRegistry).
#[async_trait]
pub trait AwardStore: Send + Sync {
    async fn load_award(
        &self,
        user_id: UserId,
        badge_id: &str,
    ) -> Result<Option<EarnedBadge>, CoreError>;

    /// Record an award. Returns `false` without writing if the user already
    /// holds this badge, so concurrent attempts create at most one record.
    async fn save_award(
        &self,
        user_id: UserId,
        badge_id: &str,
        earned_at: Timestamp,
    ) -> Result<bool, CoreError>;

    /// All awards for a user, oldest first.
    async fn list_awards(&self, user_id: UserId) -> Result<Vec<EarnedBadge>, CoreError>;
}

/// Typed, migrating access to a [`DocumentStore`].
#[derive(Debug, Clone)]
pub struct Documents<S> {
    store: S,
    registry: Arc<MigrationRegistry>,
}

impl<S: DocumentStore> Documents<S> {
    pub fn new(store: S, registry: Arc<MigrationRegistry>) -> Self {
        Self { store, registry }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn registry(&self) -> &MigrationRegistry {
        &self.registry
    }

    /// Load, upgrade and decode a document.
    pub async fn load<T: DeserializeOwned>(
        &self,
        doc_type: DocType,
        key: &DocumentKey,
    ) -> Result<Option<T>, CoreError> {
        let Some(raw) = self.store.load_document(doc_type, key).await? else {
            return Ok(None);
        };
        let migrated = self.registry.migrate(doc_type, raw)?;
        decode(doc_type, migrated).map(Some)
    }

    /// Encode and write a document stamped with the current schema version.
    pub async fn save<T: Serialize + Sync>(
        &self,
        doc_type: DocType,
        key: &DocumentKey,
        value: &T,
    ) -> Result<(), CoreError> {
        let document = self.registry.stamp_current_version(doc_type, encode(doc_type, value)?);
        self.store.save_document(doc_type, key, document).await
    }

    /// Most recent `count` entries of `kind`, newest first.
    pub async fn recent_entries(
        &self,
        user_id: UserId,
        kind: EntryKind,
        count: usize,
    ) -> Result<Vec<Entry>, CoreError> {
        let doc_type = kind.doc_type();
        self.store
            .load_recent_documents(user_id, doc_type, count)
            .await?
            .into_iter()
            .map(|raw| decode(doc_type, self.registry.migrate(doc_type, raw)?))
            .collect()
    }

    pub async fn entry(
        &self,
        user_id: UserId,
        kind: EntryKind,
        date: NaiveDate,
    ) -> Result<Option<Entry>, CoreError> {
        self.load(kind.doc_type(), &DocumentKey::entry(user_id, date))
            .await
    }

    /// Log a metric value on `date`, creating the day's entry if needed.
    pub async fn upsert_metric(
        &self,
        user_id: UserId,
        kind: EntryKind,
        date: NaiveDate,
        metric_id: &str,
        value: f64,
        tags: Vec<String>,
    ) -> Result<Entry, CoreError> {
        if metric_id.trim().is_empty() {
            return Err(CoreError::Validation("metric_id must not be empty".to_string()));
        }
        if !value.is_finite() {
            return Err(CoreError::Validation(format!(
                "value for {metric_id} must be a finite number"
            )));
        }

        let mut entry = self
            .entry(user_id, kind, date)
            .await?
            .unwrap_or_else(|| Entry::new(date));
        entry.set_metric(metric_id, value, tags, Utc::now());

        self.save(kind.doc_type(), &DocumentKey::entry(user_id, date), &entry)
            .await?;
        Ok(entry)
    }

    /// Remove a metric value from `date`. Returns `None` if the day has no
    /// entry at all.
    pub async fn delete_metric(
        &self,
        user_id: UserId,
        kind: EntryKind,
        date: NaiveDate,
        metric_id: &str,
    ) -> Result<Option<Entry>, CoreError> {
        let Some(mut entry) = self.entry(user_id, kind, date).await? else {
            return Ok(None);
        };
        entry.remove_metric(metric_id);

        self.save(kind.doc_type(), &DocumentKey::entry(user_id, date), &entry)
            .await?;
        Ok(Some(entry))
    }
}

fn decode<T: DeserializeOwned>(doc_type: DocType, document: Document) -> Result<T, CoreError> {
    serde_json::from_value(Value::Object(document)).map_err(|e| {
        CoreError::Internal(format!("Malformed {} document: {e}", doc_type.as_str()))
    })
}

fn encode<T: Serialize>(doc_type: DocType, value: &T) -> Result<Document, CoreError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(CoreError::Internal(format!(
            "{} must encode to a JSON object, got {other}",
            doc_type.as_str()
        ))),
        Err(e) => Err(CoreError::Internal(format!(
            "Failed to encode {}: {e}",
            doc_type.as_str()
        ))),
    }
}
