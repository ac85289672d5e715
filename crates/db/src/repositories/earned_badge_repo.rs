//! Repository for the `earned_badges` table.

use sqlx::PgPool;
use stride_core::types::{Timestamp, UserId};

use crate::models::earned_badge::EarnedBadgeRow;

/// Column list for earned_badges queries.
const COLUMNS: &str = "id, user_id, badge_id, earned_at";

pub struct EarnedBadgeRepo;

impl EarnedBadgeRepo {
    /// Record an award unless the user already holds the badge. Returns
    /// `true` if this call inserted the row.
    pub async fn insert_if_absent(
        pool: &PgPool,
        user_id: UserId,
        badge_id: &str,
        earned_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO earned_badges (user_id, badge_id, earned_at)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_earned_badges_user_badge DO NOTHING",
        )
        .bind(user_id)
        .bind(badge_id)
        .bind(earned_at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find(
        pool: &PgPool,
        user_id: UserId,
        badge_id: &str,
    ) -> Result<Option<EarnedBadgeRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM earned_badges
             WHERE user_id = $1 AND badge_id = $2"
        );
        sqlx::query_as::<_, EarnedBadgeRow>(&query)
            .bind(user_id)
            .bind(badge_id)
            .fetch_optional(pool)
            .await
    }

    /// All awards for a user, oldest first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: UserId,
    ) -> Result<Vec<EarnedBadgeRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM earned_badges
             WHERE user_id = $1
             ORDER BY earned_at ASC, badge_id ASC"
        );
        sqlx::query_as::<_, EarnedBadgeRow>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
