//! In-memory [`DocumentStore`] and [`AwardStore`] for tests and embedding.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::awards::EarnedBadge;
use crate::error::CoreError;
use crate::migration::{DocType, Document};
use crate::store::{AwardStore, DocumentKey, DocumentStore};
use crate::types::{Timestamp, UserId};

type DocumentSlot = (DocType, UserId);

#[derive(Debug, Default)]
struct MemoryState {
    /// Per `(doc_type, owner)`, documents ordered by id.
    documents: HashMap<DocumentSlot, BTreeMap<String, Document>>,
    awards: HashMap<(UserId, String), EarnedBadge>,
}

/// Cloning shares the underlying state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> CoreError {
    CoreError::Internal(format!("Lock: {e}"))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn load_document(
        &self,
        doc_type: DocType,
        key: &DocumentKey,
    ) -> Result<Option<Document>, CoreError> {
        let state = self.inner.read().map_err(lock_error)?;
        Ok(state
            .documents
            .get(&(doc_type, key.owner_id))
            .and_then(|docs| docs.get(&key.id))
            .cloned())
    }

    async fn save_document(
        &self,
        doc_type: DocType,
        key: &DocumentKey,
        document: Document,
    ) -> Result<(), CoreError> {
        let mut state = self.inner.write().map_err(lock_error)?;
        state
            .documents
            .entry((doc_type, key.owner_id))
            .or_default()
            .insert(key.id.clone(), document);
        Ok(())
    }

    async fn load_recent_documents(
        &self,
        owner_id: UserId,
        doc_type: DocType,
        count: usize,
    ) -> Result<Vec<Document>, CoreError> {
        let state = self.inner.read().map_err(lock_error)?;
        Ok(state
            .documents
            .get(&(doc_type, owner_id))
            .map(|docs| docs.values().rev().take(count).cloned().collect())
            .unwrap_or_default())
    }
}

#[async_trait]
impl AwardStore for MemoryStore {
    async fn load_award(
        &self,
        user_id: UserId,
        badge_id: &str,
    ) -> Result<Option<EarnedBadge>, CoreError> {
        let state = self.inner.read().map_err(lock_error)?;
        Ok(state.awards.get(&(user_id, badge_id.to_string())).cloned())
    }

    async fn save_award(
        &self,
        user_id: UserId,
        badge_id: &str,
        earned_at: Timestamp,
    ) -> Result<bool, CoreError> {
        let mut state = self.inner.write().map_err(lock_error)?;
        let key = (user_id, badge_id.to_string());
        if state.awards.contains_key(&key) {
            return Ok(false);
        }
        state.awards.insert(
            key,
            EarnedBadge {
                badge_id: badge_id.to_string(),
                earned_at,
            },
        );
        Ok(true)
    }

    async fn list_awards(&self, user_id: UserId) -> Result<Vec<EarnedBadge>, CoreError> {
        let state = self.inner.read().map_err(lock_error)?;
        let mut awards: Vec<EarnedBadge> = state
            .awards
            .iter()
            .filter(|((owner, _), _)| *owner == user_id)
            .map(|(_, award)| award.clone())
            .collect();
        awards.sort_by(|a, b| {
            a.earned_at
                .cmp(&b.earned_at)
                .then_with(|| a.badge_id.cmp(&b.badge_id))
        });
        Ok(awards)
    }
}
