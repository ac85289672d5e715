use serde::Serialize;
use sqlx::FromRow;
use stride_core::awards::EarnedBadge;
use stride_core::types::{DbId, Timestamp, UserId};

/// A row from the `earned_badges` table.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct EarnedBadgeRow {
    pub id: DbId,
    pub user_id: UserId,
    pub badge_id: String,
    pub earned_at: Timestamp,
}

impl From<EarnedBadgeRow> for EarnedBadge {
    fn from(row: EarnedBadgeRow) -> Self {
        EarnedBadge {
            badge_id: row.badge_id,
            earned_at: row.earned_at,
        }
    }
}
