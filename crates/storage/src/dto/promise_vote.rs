use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::{NewPromiseVote, PromiseVote};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SubmitPromiseVoteRequest {
    pub user_id: Uuid,

    #[validate(length(min = 1, max = 200))]
    pub promise: String,

    pub kept: bool,

    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

impl SubmitPromiseVoteRequest {
    pub fn into_new_promise_vote(self, company_id: Uuid) -> NewPromiseVote {
        NewPromiseVote {
            user_id: self.user_id,
            company_id,
            promise: self.promise.trim().to_string(),
            kept: self.kept,
            comment: self.comment,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RetractPromiseVoteQuery {
    pub user_id: Uuid,
    pub promise: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PromiseVoteReceipt {
    pub promise_vote: PromiseVote,
    pub reputation: Option<i64>,
}
