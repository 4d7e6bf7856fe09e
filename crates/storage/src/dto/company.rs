use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::common::SortOrder;
use crate::models::{Company, NewCompany, ScoreHistoryEntry, ScoreSnapshot, VerificationTier};

/// Request payload for registering a company
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCompanyRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[validate(length(min = 1, max = 255), custom(function = "validate_slug"))]
    pub slug: String,

    #[validate(custom(function = "validate_growth_rate"))]
    pub growth_rate: Option<Decimal>,

    pub verification_tier: Option<VerificationTier>,
}

impl CreateCompanyRequest {
    pub fn into_new_company(self) -> NewCompany {
        NewCompany {
            name: self.name.trim().to_string(),
            slug: self.slug,
            growth_rate: self.growth_rate,
            verification_tier: self.verification_tier,
        }
    }
}

fn validate_slug(slug: &str) -> Result<(), validator::ValidationError> {
    let well_formed = slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !slug.starts_with('-')
        && !slug.ends_with('-');

    if well_formed {
        Ok(())
    } else {
        let mut error = validator::ValidationError::new("invalid_slug");
        error.message =
            Some("Slug may only contain lowercase letters, digits and inner hyphens".into());
        Err(error)
    }
}

/// Growth rate is a percentage between -1000 and 1000.
fn validate_growth_rate(growth_rate: &Decimal) -> Result<(), validator::ValidationError> {
    let bound = Decimal::from(1000);

    if (-bound..=bound).contains(growth_rate) {
        Ok(())
    } else {
        let mut error = validator::ValidationError::new("growth_rate_out_of_range");
        error.message = Some("Growth rate must be between -1000 and 1000 percent".into());
        Err(error)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompanyResponse {
    pub company_id: Uuid,
    pub name: String,
    pub slug: String,
    pub scores: ScoreSnapshot,
    /// Set when the last recomputation failed permanently; `scores` is the last good value.
    pub scores_stale: bool,
    pub review_count: i64,
    pub view_count: i64,
    pub follower_count: i64,
    pub growth_rate: Option<Decimal>,
    pub trending_score: Decimal,
    pub verification_tier: Option<VerificationTier>,
    pub created_at: DateTime<Utc>,
    pub scores_updated_at: Option<DateTime<Utc>>,
    pub trending_updated_at: Option<DateTime<Utc>>,
}

impl CompanyResponse {
    pub fn new(company: Company, scores_stale: bool) -> Self {
        Self {
            scores: company.scores(),
            company_id: company.company_id,
            name: company.name,
            slug: company.slug,
            scores_stale,
            review_count: company.review_count,
            view_count: company.view_count,
            follower_count: company.follower_count,
            growth_rate: company.growth_rate,
            trending_score: company.trending_score,
            verification_tier: company.verification_tier,
            created_at: company.created_at,
            scores_updated_at: company.scores_updated_at,
            trending_updated_at: company.trending_updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScoreHistoryResponse {
    pub sequence: i64,
    pub scores: ScoreSnapshot,
    pub reason: String,
    pub recorded_at: DateTime<Utc>,
}

impl From<ScoreHistoryEntry> for ScoreHistoryResponse {
    fn from(entry: ScoreHistoryEntry) -> Self {
        Self {
            scores: entry.scores(),
            sequence: entry.sequence,
            reason: entry.reason,
            recorded_at: entry.recorded_at,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    #[serde(default)]
    pub order: SortOrder,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AdjustFollowersRequest {
    #[validate(range(min = -1000, max = 1000))]
    pub delta: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateGrowthRateRequest {
    /// Percentage; `null` clears it and trending treats it as zero.
    #[validate(custom(function = "validate_growth_rate"))]
    pub growth_rate: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TrendingSweepResponse {
    pub updated: usize,
    pub failed: Vec<Uuid>,
}
