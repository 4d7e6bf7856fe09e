use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::dimension::Dimension;

/// A user's rating of one dimension of one company.
///
/// At most one vote exists per (user, company, dimension); resubmitting overwrites it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Vote {
    pub vote_id: Uuid,
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub dimension: Dimension,
    pub score: i16,
    pub comment: Option<String>,
    pub evidence_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vote {
    pub fn has_comment(&self) -> bool {
        self.comment.as_deref().is_some_and(|c| !c.trim().is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct NewVote {
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub dimension: Dimension,
    pub score: i16,
    pub comment: Option<String>,
    pub evidence_url: Option<String>,
}

/// Result of an upsert: the row it replaced, if any, and the stored row.
#[derive(Debug, Clone)]
pub struct VoteChange {
    pub previous: Option<Vote>,
    pub current: Vote,
}
