//! Storage seams the scoring services run against.
//!
//! [`PgStore`] backs the running service; [`MemoryStore`] keeps the same contracts in
//! process so the services can be exercised without a database.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    ActivityCounts, Company, Dimension, NewCompany, NewPromiseVote, NewReview, NewVote,
    PromiseVote, Review, ReviewStatus, ReviewStatusChange, ScoreHistoryEntry, UserProfile, Vote,
    VoteChange,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Company rows, their engagement counters and the score ledger.
#[async_trait]
pub trait CompanyStore: Send + Sync {
    async fn create_company(&self, company: NewCompany) -> Result<Company>;

    async fn company(&self, company_id: Uuid) -> Result<Company>;

    async fn company_by_slug(&self, slug: &str) -> Result<Company>;

    /// All active companies, oldest first.
    async fn list_companies(&self) -> Result<Vec<Company>>;

    /// One page of active companies ordered by overall score, with the total count.
    async fn page_companies(&self, offset: i64, limit: i64) -> Result<(Vec<Company>, i64)>;

    async fn record_view(&self, company_id: Uuid) -> Result<Company>;

    /// Adds `delta` to the follower count, never going below zero.
    async fn adjust_followers(&self, company_id: Uuid, delta: i64) -> Result<Company>;

    async fn set_growth_rate(&self, company_id: Uuid, growth_rate: Option<Decimal>)
    -> Result<Company>;

    /// Recomputes every score of the company from its current contributions and appends
    /// one history entry, atomically with respect to other recomputations of the same
    /// company. This is the only path that writes score fields.
    async fn recompute_scores(&self, company_id: Uuid, reason: &str) -> Result<Company>;

    /// History entries of a company in append order.
    async fn score_history(&self, company_id: Uuid) -> Result<Vec<ScoreHistoryEntry>>;

    async fn update_trending(
        &self,
        company_id: Uuid,
        trending_score: Decimal,
        computed_at: DateTime<Utc>,
    ) -> Result<()>;
}

/// Votes, reviews, promise votes and the reputation derived from them.
#[async_trait]
pub trait ContributionStore: Send + Sync {
    async fn upsert_vote(&self, vote: NewVote) -> Result<VoteChange>;

    async fn delete_vote(
        &self,
        user_id: Uuid,
        company_id: Uuid,
        dimension: Dimension,
    ) -> Result<Vote>;

    async fn create_review(&self, review: NewReview) -> Result<Review>;

    async fn review(&self, review_id: Uuid) -> Result<Review>;

    async fn set_review_status(
        &self,
        review_id: Uuid,
        status: ReviewStatus,
    ) -> Result<ReviewStatusChange>;

    async fn upsert_promise_vote(&self, vote: NewPromiseVote) -> Result<PromiseVote>;

    async fn delete_promise_vote(
        &self,
        user_id: Uuid,
        company_id: Uuid,
        promise: &str,
    ) -> Result<PromiseVote>;

    async fn activity_counts(&self, user_id: Uuid) -> Result<ActivityCounts>;

    async fn save_reputation(&self, user_id: Uuid, reputation: i64) -> Result<UserProfile>;

    async fn user_profile(&self, user_id: Uuid) -> Result<UserProfile>;
}
