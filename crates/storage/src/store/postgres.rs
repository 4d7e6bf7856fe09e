use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::{CompanyStore, ContributionStore};
use crate::error::Result;
use crate::models::{
    ActivityCounts, Company, Dimension, NewCompany, NewPromiseVote, NewReview, NewVote,
    PromiseVote, Review, ReviewStatus, ReviewStatusChange, ScoreHistoryEntry, UserProfile, Vote,
    VoteChange,
};
use crate::repository::{
    company::CompanyRepository, promise_vote::PromiseVoteRepository,
    reputation::ReputationRepository, review::ReviewRepository,
    score_history::ScoreHistoryRepository, vote::VoteRepository,
};

/// PostgreSQL-backed store; each call borrows the pool for one repository.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompanyStore for PgStore {
    async fn create_company(&self, company: NewCompany) -> Result<Company> {
        CompanyRepository::new(&self.pool).create(company).await
    }

    async fn company(&self, company_id: Uuid) -> Result<Company> {
        CompanyRepository::new(&self.pool).find_by_id(company_id).await
    }

    async fn company_by_slug(&self, slug: &str) -> Result<Company> {
        CompanyRepository::new(&self.pool).find_by_slug(slug).await
    }

    async fn list_companies(&self) -> Result<Vec<Company>> {
        CompanyRepository::new(&self.pool).list_active().await
    }

    async fn page_companies(&self, offset: i64, limit: i64) -> Result<(Vec<Company>, i64)> {
        CompanyRepository::new(&self.pool).page(offset, limit).await
    }

    async fn record_view(&self, company_id: Uuid) -> Result<Company> {
        CompanyRepository::new(&self.pool)
            .increment_views(company_id)
            .await
    }

    async fn adjust_followers(&self, company_id: Uuid, delta: i64) -> Result<Company> {
        CompanyRepository::new(&self.pool)
            .adjust_followers(company_id, delta)
            .await
    }

    async fn set_growth_rate(
        &self,
        company_id: Uuid,
        growth_rate: Option<Decimal>,
    ) -> Result<Company> {
        CompanyRepository::new(&self.pool)
            .set_growth_rate(company_id, growth_rate)
            .await
    }

    async fn recompute_scores(&self, company_id: Uuid, reason: &str) -> Result<Company> {
        CompanyRepository::new(&self.pool)
            .recompute_scores(company_id, reason)
            .await
    }

    async fn score_history(&self, company_id: Uuid) -> Result<Vec<ScoreHistoryEntry>> {
        ScoreHistoryRepository::new(&self.pool)
            .list_for_company(company_id)
            .await
    }

    async fn update_trending(
        &self,
        company_id: Uuid,
        trending_score: Decimal,
        computed_at: DateTime<Utc>,
    ) -> Result<()> {
        CompanyRepository::new(&self.pool)
            .update_trending(company_id, trending_score, computed_at)
            .await
    }
}

#[async_trait]
impl ContributionStore for PgStore {
    async fn upsert_vote(&self, vote: NewVote) -> Result<VoteChange> {
        VoteRepository::new(&self.pool).upsert(vote).await
    }

    async fn delete_vote(
        &self,
        user_id: Uuid,
        company_id: Uuid,
        dimension: Dimension,
    ) -> Result<Vote> {
        VoteRepository::new(&self.pool)
            .delete(user_id, company_id, dimension)
            .await
    }

    async fn create_review(&self, review: NewReview) -> Result<Review> {
        ReviewRepository::new(&self.pool).create(review).await
    }

    async fn review(&self, review_id: Uuid) -> Result<Review> {
        ReviewRepository::new(&self.pool).find_by_id(review_id).await
    }

    async fn set_review_status(
        &self,
        review_id: Uuid,
        status: ReviewStatus,
    ) -> Result<ReviewStatusChange> {
        ReviewRepository::new(&self.pool)
            .set_status(review_id, status)
            .await
    }

    async fn upsert_promise_vote(&self, vote: NewPromiseVote) -> Result<PromiseVote> {
        PromiseVoteRepository::new(&self.pool).upsert(vote).await
    }

    async fn delete_promise_vote(
        &self,
        user_id: Uuid,
        company_id: Uuid,
        promise: &str,
    ) -> Result<PromiseVote> {
        PromiseVoteRepository::new(&self.pool)
            .delete(user_id, company_id, promise)
            .await
    }

    async fn activity_counts(&self, user_id: Uuid) -> Result<ActivityCounts> {
        ReputationRepository::new(&self.pool)
            .activity_counts(user_id)
            .await
    }

    async fn save_reputation(&self, user_id: Uuid, reputation: i64) -> Result<UserProfile> {
        ReputationRepository::new(&self.pool)
            .save(user_id, reputation)
            .await
    }

    async fn user_profile(&self, user_id: Uuid) -> Result<UserProfile> {
        ReputationRepository::new(&self.pool).find(user_id).await
    }
}
