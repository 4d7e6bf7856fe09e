use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{ActivityCounts, UserProfile};

pub struct ReputationRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReputationRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Count the contributions a user currently has on record
    pub async fn activity_counts(&self, user_id: Uuid) -> Result<ActivityCounts> {
        let counts = sqlx::query_as::<_, ActivityCounts>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM votes WHERE user_id = $1) AS votes,
                (SELECT COUNT(*) FROM votes
                 WHERE user_id = $1 AND BTRIM(COALESCE(comment, '')) <> '') AS commented_votes,
                (SELECT COUNT(*) FROM promise_votes WHERE user_id = $1) AS promise_votes
            "#,
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(counts)
    }

    pub async fn save(&self, user_id: Uuid, reputation: i64) -> Result<UserProfile> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            INSERT INTO user_profiles (user_id, reputation, updated_at)
            VALUES ($1, GREATEST($2, 0), NOW())
            ON CONFLICT (user_id) DO UPDATE
            SET reputation = EXCLUDED.reputation, updated_at = EXCLUDED.updated_at
            RETURNING user_id, reputation, updated_at
            "#,
        )
        .bind(user_id)
        .bind(reputation)
        .fetch_one(self.pool)
        .await?;

        Ok(profile)
    }

    pub async fn find(&self, user_id: Uuid) -> Result<UserProfile> {
        let profile = sqlx::query_as::<_, UserProfile>(
            "SELECT user_id, reputation, updated_at FROM user_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(profile)
    }
}
