use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::dimension::Dimension;

/// Moderation workflow state. Only approved reviews contribute to scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "review_status", rename_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
    Flagged,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Flagged => "flagged",
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct DimensionRating {
    pub dimension: Dimension,
    pub score: i16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Review {
    pub review_id: Uuid,
    pub company_id: Uuid,
    pub user_id: Uuid,
    pub rating: i16,
    pub title: String,
    pub body: String,
    pub status: ReviewStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub ratings: Vec<DimensionRating>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub company_id: Uuid,
    pub user_id: Uuid,
    pub rating: i16,
    pub title: String,
    pub body: String,
    pub ratings: Vec<DimensionRating>,
}

/// Result of a moderation decision.
#[derive(Debug, Clone)]
pub struct ReviewStatusChange {
    pub previous: ReviewStatus,
    pub review: Review,
}
