//! Badge award orchestration.
//!
//! [`BadgeAwarder`] runs the evaluator over the catalog, then persists an
//! award for every qualifying badge the user does not already hold. The
//! store's uniqueness on `(user_id, badge_id)` decides races between
//! concurrent checks.

use std::sync::Arc;

use chrono::Utc;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};

use crate::badges::{evaluate_badges, BadgeCatalog, BadgeDefinition};
use crate::entries::Entry;
use crate::error::CoreError;
use crate::store::AwardStore;
use crate::types::{Timestamp, UserId};

/// Record that a user earned a badge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarnedBadge {
    pub badge_id: String,
    pub earned_at: Timestamp,
}

pub struct BadgeAwarder<S> {
    catalog: Arc<BadgeCatalog>,
    store: S,
}

impl<S: AwardStore> BadgeAwarder<S> {
    pub fn new(catalog: Arc<BadgeCatalog>, store: S) -> Self {
        Self { catalog, store }
    }

    pub fn catalog(&self) -> &BadgeCatalog {
        &self.catalog
    }

    /// Award every badge `entries` qualify for that `user_id` has not yet
    /// earned. Returns the newly earned definitions in catalog order.
    ///
    /// Store failures are returned, never swallowed. Retrying is safe since
    /// awards already written are skipped.
    pub async fn check_and_award(
        &self,
        user_id: UserId,
        entries: &[Entry],
        tracked_metric_count: usize,
        scaling_factor: Option<f64>,
    ) -> Result<Vec<BadgeDefinition>, CoreError> {
        let qualified = evaluate_badges(
            entries,
            self.catalog.as_slice(),
            tracked_metric_count,
            scaling_factor,
        );
        if qualified.is_empty() {
            return Ok(Vec::new());
        }

        let earned_at = Utc::now();
        let outcomes = try_join_all(
            qualified
                .iter()
                .map(|badge_id| self.award_if_new(user_id, badge_id, earned_at)),
        )
        .await?;

        Ok(qualified
            .iter()
            .zip(outcomes)
            .filter(|(_, awarded)| *awarded)
            .filter_map(|(badge_id, _)| self.catalog.get(badge_id).cloned())
            .collect())
    }

    async fn award_if_new(
        &self,
        user_id: UserId,
        badge_id: &str,
        earned_at: Timestamp,
    ) -> Result<bool, CoreError> {
        if self.store.load_award(user_id, badge_id).await?.is_some() {
            return Ok(false);
        }
        let awarded = self.store.save_award(user_id, badge_id, earned_at).await?;
        if awarded {
            tracing::info!(user_id, badge_id, "Badge awarded");
        } else {
            tracing::debug!(user_id, badge_id, "Badge already awarded by a concurrent check");
        }
        Ok(awarded)
    }
}
