use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A user's verdict on whether a company kept a public promise or claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PromiseVote {
    pub promise_vote_id: Uuid,
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub promise: String,
    pub kept: bool,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPromiseVote {
    pub user_id: Uuid,
    pub company_id: Uuid,
    pub promise: String,
    pub kept: bool,
    pub comment: Option<String>,
}
