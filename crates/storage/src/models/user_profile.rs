use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserProfile {
    pub user_id: Uuid,
    pub reputation: i64,
    pub updated_at: DateTime<Utc>,
}

/// Current activity totals a reputation is derived from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow)]
pub struct ActivityCounts {
    pub votes: i64,
    pub commented_votes: i64,
    pub promise_votes: i64,
}
