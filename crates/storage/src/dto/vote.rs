use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::common::ScoreStatus;
use crate::models::{Dimension, NewVote, Vote};

/// Request payload for casting or overwriting a vote
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubmitVoteRequest {
    pub user_id: Uuid,

    pub dimension: Dimension,

    #[validate(range(min = 0, max = 10, message = "Score must be between 0 and 10"))]
    pub score: i16,

    #[validate(length(max = 2000))]
    pub comment: Option<String>,

    #[validate(url, length(max = 500))]
    pub evidence_url: Option<String>,
}

impl SubmitVoteRequest {
    pub fn into_new_vote(self, company_id: Uuid) -> NewVote {
        NewVote {
            user_id: self.user_id,
            company_id,
            dimension: self.dimension,
            score: self.score,
            comment: self.comment,
            evidence_url: self.evidence_url,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RetractVoteQuery {
    pub user_id: Uuid,
}

/// Outcome of a vote write: the stored (or removed) vote and its knock-on effects.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VoteReceipt {
    pub vote: Vote,
    pub score_status: ScoreStatus,
    /// Absent when the reputation recompute failed; the vote itself is stored.
    pub reputation: Option<i64>,
}
