use sqlx::PgPool;
use uuid::Uuid;

use super::missing_reference;
use crate::error::{Result, StorageError};
use crate::models::{Dimension, NewVote, Vote, VoteChange};

const VOTE_COLUMNS: &str = r#"
    vote_id, user_id, company_id, dimension, score, comment, evidence_url, created_at, updated_at
"#;

pub struct VoteRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> VoteRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert or overwrite the caller's vote on one dimension, returning the replaced row
    pub async fn upsert(&self, vote: NewVote) -> Result<VoteChange> {
        let mut tx = self.pool.begin().await?;

        let previous = sqlx::query_as::<_, Vote>(&format!(
            r#"
            SELECT {VOTE_COLUMNS}
            FROM votes
            WHERE user_id = $1 AND company_id = $2 AND dimension = $3
            FOR UPDATE
            "#
        ))
        .bind(vote.user_id)
        .bind(vote.company_id)
        .bind(vote.dimension)
        .fetch_optional(&mut *tx)
        .await?;

        let current = sqlx::query_as::<_, Vote>(&format!(
            r#"
            INSERT INTO votes (user_id, company_id, dimension, score, comment, evidence_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id, company_id, dimension) DO UPDATE
            SET score = EXCLUDED.score,
                comment = EXCLUDED.comment,
                evidence_url = EXCLUDED.evidence_url,
                updated_at = NOW()
            RETURNING {VOTE_COLUMNS}
            "#
        ))
        .bind(vote.user_id)
        .bind(vote.company_id)
        .bind(vote.dimension)
        .bind(vote.score)
        .bind(&vote.comment)
        .bind(&vote.evidence_url)
        .fetch_one(&mut *tx)
        .await
        .map_err(missing_reference)?;

        tx.commit().await?;

        Ok(VoteChange { previous, current })
    }

    pub async fn delete(
        &self,
        user_id: Uuid,
        company_id: Uuid,
        dimension: Dimension,
    ) -> Result<Vote> {
        let vote = sqlx::query_as::<_, Vote>(&format!(
            r#"
            DELETE FROM votes
            WHERE user_id = $1 AND company_id = $2 AND dimension = $3
            RETURNING {VOTE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(company_id)
        .bind(dimension)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(vote)
    }
}
