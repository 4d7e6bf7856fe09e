use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::scores::ScoreSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "verification_tier", rename_all = "snake_case")]
pub enum VerificationTier {
    Unverified,
    Basic,
    Verified,
    Premium,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Company {
    pub company_id: Uuid,
    pub name: String,
    pub slug: String,
    pub ethics_score: Decimal,
    pub credibility_score: Decimal,
    pub delivery_score: Decimal,
    pub security_score: Decimal,
    pub innovation_score: Decimal,
    pub overall_score: Decimal,
    pub review_count: i64,
    pub view_count: i64,
    pub follower_count: i64,
    pub growth_rate: Option<Decimal>,
    pub trending_score: Decimal,
    pub verification_tier: Option<VerificationTier>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub scores_updated_at: Option<DateTime<Utc>>,
    pub trending_updated_at: Option<DateTime<Utc>>,
}

impl Company {
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

    pub(crate) fn apply_scores(&mut self, snapshot: &ScoreSnapshot) {
        self.ethics_score = snapshot.ethics;
        self.credibility_score = snapshot.credibility;
        self.delivery_score = snapshot.delivery;
        self.security_score = snapshot.security;
        self.innovation_score = snapshot.innovation;
        self.overall_score = snapshot.overall;
    }
}

/// Fields supplied when a company registers; every score starts neutral.
#[derive(Debug, Clone)]
pub struct NewCompany {
    pub name: String,
    pub slug: String,
    pub growth_rate: Option<Decimal>,
    pub verification_tier: Option<VerificationTier>,
}
