use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::ScoreHistoryEntry;

pub struct ScoreHistoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ScoreHistoryRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Ledger entries of one company in append order
    pub async fn list_for_company(&self, company_id: Uuid) -> Result<Vec<ScoreHistoryEntry>> {
        let entries = sqlx::query_as::<_, ScoreHistoryEntry>(
            r#"
            SELECT entry_id, company_id, sequence,
                   ethics_score, credibility_score, delivery_score,
                   security_score, innovation_score, overall_score,
                   reason, recorded_at
            FROM score_history
            WHERE company_id = $1
            ORDER BY sequence
            "#,
        )
        .bind(company_id)
        .fetch_all(self.pool)
        .await?;

        Ok(entries)
    }
}
