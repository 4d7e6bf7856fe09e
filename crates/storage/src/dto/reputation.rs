use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::UserProfile;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReputationResponse {
    pub user_id: Uuid,
    pub reputation: i64,
    pub updated_at: DateTime<Utc>,
}

impl From<UserProfile> for ReputationResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            user_id: profile.user_id,
            reputation: profile.reputation,
            updated_at: profile.updated_at,
        }
    }
}
