//! Write path for everything users contribute about a company.
//!
//! Each operation validates its request, commits the write, then fires the follow-up
//! recomputations explicitly: scores through the [`ScoreAggregator`], reputation through
//! [`recompute_reputation`]. Follow-up failures are reported in the receipt, never as an
//! error of the write itself.

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use super::aggregation::{ScoreAggregator, ScoreEvent};
use super::reputation::recompute_reputation;
use crate::dto::common::ScoreStatus;
use crate::dto::promise_vote::{PromiseVoteReceipt, SubmitPromiseVoteRequest};
use crate::dto::review::{ReviewModerationResponse, SubmitReviewRequest};
use crate::dto::vote::{SubmitVoteRequest, VoteReceipt};
use crate::error::Result;
use crate::models::{Dimension, Review, ReviewStatus};
use crate::store::ContributionStore;

#[derive(Clone)]
pub struct ContributionService {
    store: Arc<dyn ContributionStore>,
    aggregator: Arc<ScoreAggregator>,
}

impl ContributionService {
    pub fn new(store: Arc<dyn ContributionStore>, aggregator: Arc<ScoreAggregator>) -> Self {
        Self { store, aggregator }
    }

    /// Casts a vote, replacing the user's earlier vote on the same dimension if any.
    pub async fn submit_vote(
        &self,
        company_id: Uuid,
        request: SubmitVoteRequest,
    ) -> Result<VoteReceipt> {
        request.validate()?;

        let change = self
            .store
            .upsert_vote(request.into_new_vote(company_id))
            .await?;
        let vote = change.current;

        tracing::info!(
            %company_id,
            user_id = %vote.user_id,
            dimension = %vote.dimension,
            replaced = change.previous.is_some(),
            "Vote stored"
        );

        let dispatch = self
            .aggregator
            .dispatch(ScoreEvent::VoteChanged {
                company_id,
                dimension: vote.dimension,
                old_score: change.previous.as_ref().map(|previous| previous.score),
                new_score: Some(vote.score),
            })
            .await;
        let reputation = self.refresh_reputation(vote.user_id).await;

        Ok(VoteReceipt {
            score_status: ScoreStatus::from(&dispatch),
            vote,
            reputation,
        })
    }

    pub async fn retract_vote(
        &self,
        company_id: Uuid,
        user_id: Uuid,
        dimension: Dimension,
    ) -> Result<VoteReceipt> {
        let vote = self.store.delete_vote(user_id, company_id, dimension).await?;

        tracing::info!(%company_id, %user_id, %dimension, "Vote deleted");

        let dispatch = self
            .aggregator
            .dispatch(ScoreEvent::VoteChanged {
                company_id,
                dimension,
                old_score: Some(vote.score),
                new_score: None,
            })
            .await;
        let reputation = self.refresh_reputation(user_id).await;

        Ok(VoteReceipt {
            score_status: ScoreStatus::from(&dispatch),
            vote,
            reputation,
        })
    }

    /// Stores a review as pending; it affects scores only once approved.
    pub async fn submit_review(
        &self,
        company_id: Uuid,
        request: SubmitReviewRequest,
    ) -> Result<Review> {
        request.validate()?;

        let review = self
            .store
            .create_review(request.into_new_review(company_id))
            .await?;

        tracing::info!(%company_id, review_id = %review.review_id, "Review submitted for moderation");

        Ok(review)
    }

    pub async fn moderate_review(
        &self,
        review_id: Uuid,
        status: ReviewStatus,
    ) -> Result<ReviewModerationResponse> {
        let change = self.store.set_review_status(review_id, status).await?;

        tracing::info!(
            %review_id,
            from = %change.previous,
            to = %change.review.status,
            "Review moderated"
        );

        let dispatch = self
            .aggregator
            .dispatch(ScoreEvent::ReviewModerationChanged {
                company_id: change.review.company_id,
                review_id,
                old_status: change.previous,
                new_status: change.review.status,
            })
            .await;

        Ok(ReviewModerationResponse {
            score_status: ScoreStatus::from(&dispatch),
            previous_status: change.previous,
            review: change.review,
        })
    }

    pub async fn submit_promise_vote(
        &self,
        company_id: Uuid,
        request: SubmitPromiseVoteRequest,
    ) -> Result<PromiseVoteReceipt> {
        request.validate()?;

        let promise_vote = self
            .store
            .upsert_promise_vote(request.into_new_promise_vote(company_id))
            .await?;

        tracing::info!(%company_id, user_id = %promise_vote.user_id, promise = %promise_vote.promise, "Promise vote stored");

        let reputation = self.refresh_reputation(promise_vote.user_id).await;

        Ok(PromiseVoteReceipt {
            promise_vote,
            reputation,
        })
    }

    pub async fn retract_promise_vote(
        &self,
        company_id: Uuid,
        user_id: Uuid,
        promise: &str,
    ) -> Result<PromiseVoteReceipt> {
        let promise_vote = self
            .store
            .delete_promise_vote(user_id, company_id, promise.trim())
            .await?;

        tracing::info!(%company_id, %user_id, promise = %promise_vote.promise, "Promise vote deleted");

        let reputation = self.refresh_reputation(user_id).await;

        Ok(PromiseVoteReceipt {
            promise_vote,
            reputation,
        })
    }

    async fn refresh_reputation(&self, user_id: Uuid) -> Option<i64> {
        match recompute_reputation(self.store.as_ref(), user_id).await {
            Ok(profile) => Some(profile.reputation),
            Err(error) => {
                tracing::warn!(%user_id, %error, "Reputation recompute failed");
                None
            }
        }
    }
}
