use sqlx::PgPool;
use uuid::Uuid;

use super::missing_reference;
use crate::error::{Result, StorageError};
use crate::models::{NewPromiseVote, PromiseVote};

const PROMISE_VOTE_COLUMNS: &str = r#"
    promise_vote_id, user_id, company_id, promise, kept, comment, created_at, updated_at
"#;

pub struct PromiseVoteRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PromiseVoteRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn upsert(&self, vote: NewPromiseVote) -> Result<PromiseVote> {
        let stored = sqlx::query_as::<_, PromiseVote>(&format!(
            r#"
            INSERT INTO promise_votes (user_id, company_id, promise, kept, comment)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, company_id, promise) DO UPDATE
            SET kept = EXCLUDED.kept,
                comment = EXCLUDED.comment,
                updated_at = NOW()
            RETURNING {PROMISE_VOTE_COLUMNS}
            "#
        ))
        .bind(vote.user_id)
        .bind(vote.company_id)
        .bind(&vote.promise)
        .bind(vote.kept)
        .bind(&vote.comment)
        .fetch_one(self.pool)
        .await
        .map_err(missing_reference)?;

        Ok(stored)
    }

    pub async fn delete(
        &self,
        user_id: Uuid,
        company_id: Uuid,
        promise: &str,
    ) -> Result<PromiseVote> {
        let removed = sqlx::query_as::<_, PromiseVote>(&format!(
            r#"
            DELETE FROM promise_votes
            WHERE user_id = $1 AND company_id = $2 AND promise = $3
            RETURNING {PROMISE_VOTE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(company_id)
        .bind(promise)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(removed)
    }
}
