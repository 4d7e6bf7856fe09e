use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::scores::ScoreSnapshot;

/// One row of the append-only score ledger.
///
/// `sequence` increases with every append, so ordering by it reproduces commit order
/// even when two entries share a timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ScoreHistoryEntry {
    pub entry_id: Uuid,
    pub company_id: Uuid,
    pub sequence: i64,
    pub ethics_score: Decimal,
    pub credibility_score: Decimal,
    pub delivery_score: Decimal,
    pub security_score: Decimal,
    pub innovation_score: Decimal,
    pub overall_score: Decimal,
    pub reason: String,
    pub recorded_at: DateTime<Utc>,
}

impl ScoreHistoryEntry {
    pub fn scores(&self) -> ScoreSnapshot {
        ScoreSnapshot {
            ethics: self.ethics_score,
            credibility: self.credibility_score,
            delivery: self.delivery_score,
            security: self.security_score,
            innovation: self.innovation_score,
            overall: self.overall_score,
        }
    }
}
