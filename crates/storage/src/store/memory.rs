use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{CompanyStore, ContributionStore};
use crate::error::{Result, StorageError};
use crate::models::{
    ActivityCounts, Company, Dimension, NEUTRAL_SCORE, NewCompany, NewPromiseVote, NewReview,
    NewVote, PromiseVote, Review, ReviewStatus, ReviewStatusChange, ScoreHistoryEntry,
    ScoreTallies, UserProfile, Vote, VoteChange,
};
use crate::services::aggregation::compute_snapshot;

#[derive(Default)]
struct MemoryState {
    companies: HashMap<Uuid, Company>,
    /// Votes indexed by (company, dimension), then by voter.
    votes: HashMap<(Uuid, Dimension), HashMap<Uuid, Vote>>,
    reviews: HashMap<Uuid, Review>,
    /// Keyed by (user, company, promise).
    promise_votes: HashMap<(Uuid, Uuid, String), PromiseVote>,
    history: Vec<ScoreHistoryEntry>,
    profiles: HashMap<Uuid, UserProfile>,
    next_sequence: i64,
}

impl MemoryState {
    fn company_mut(&mut self, company_id: Uuid) -> Result<&mut Company> {
        self.companies
            .get_mut(&company_id)
            .ok_or(StorageError::NotFound)
    }

    fn ensure_company(&self, company_id: Uuid) -> Result<()> {
        if self.companies.contains_key(&company_id) {
            Ok(())
        } else {
            Err(StorageError::NotFound)
        }
    }
}

/// In-process store with the same contracts as [`super::PgStore`].
///
/// A single lock guards all state, which makes every operation, and in particular
/// [`CompanyStore::recompute_scores`], atomic.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backdates a company, for exercising time-dependent scoring.
    pub async fn set_created_at(&self, company_id: Uuid, created_at: DateTime<Utc>) -> Result<()> {
        let mut state = self.state.lock().await;
        state.company_mut(company_id)?.created_at = created_at;
        Ok(())
    }
}

#[async_trait]
impl CompanyStore for MemoryStore {
    async fn create_company(&self, company: NewCompany) -> Result<Company> {
        let mut state = self.state.lock().await;

        if state.companies.values().any(|c| c.slug == company.slug) {
            return Err(StorageError::ConstraintViolation(format!(
                "Company slug '{}' already exists",
                company.slug
            )));
        }

        let created = Company {
            company_id: Uuid::new_v4(),
            name: company.name,
            slug: company.slug,
            ethics_score: NEUTRAL_SCORE,
            credibility_score: NEUTRAL_SCORE,
            delivery_score: NEUTRAL_SCORE,
            security_score: NEUTRAL_SCORE,
            innovation_score: NEUTRAL_SCORE,
            overall_score: NEUTRAL_SCORE,
            review_count: 0,
            view_count: 0,
            follower_count: 0,
            growth_rate: company.growth_rate,
            trending_score: Decimal::ZERO,
            verification_tier: company.verification_tier,
            is_active: true,
            created_at: Utc::now(),
            scores_updated_at: None,
            trending_updated_at: None,
        };
        state.companies.insert(created.company_id, created.clone());

        Ok(created)
    }

    async fn company(&self, company_id: Uuid) -> Result<Company> {
        let state = self.state.lock().await;
        state
            .companies
            .get(&company_id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn company_by_slug(&self, slug: &str) -> Result<Company> {
        let state = self.state.lock().await;
        state
            .companies
            .values()
            .find(|c| c.slug == slug)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_companies(&self) -> Result<Vec<Company>> {
        let state = self.state.lock().await;
        let mut companies: Vec<Company> = state
            .companies
            .values()
            .filter(|c| c.is_active)
            .cloned()
            .collect();
        companies.sort_by_key(|c| (c.created_at, c.company_id));
        Ok(companies)
    }

    async fn page_companies(&self, offset: i64, limit: i64) -> Result<(Vec<Company>, i64)> {
        let mut companies = self.list_companies().await?;
        companies.sort_by(|a, b| {
            b.overall_score
                .cmp(&a.overall_score)
                .then_with(|| a.name.cmp(&b.name))
        });

        let total = companies.len() as i64;
        let page = companies
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();

        Ok((page, total))
    }

    async fn record_view(&self, company_id: Uuid) -> Result<Company> {
        let mut state = self.state.lock().await;
        let company = state.company_mut(company_id)?;
        company.view_count += 1;
        Ok(company.clone())
    }

    async fn adjust_followers(&self, company_id: Uuid, delta: i64) -> Result<Company> {
        let mut state = self.state.lock().await;
        let company = state.company_mut(company_id)?;
        company.follower_count = (company.follower_count + delta).max(0);
        Ok(company.clone())
    }

    async fn set_growth_rate(
        &self,
        company_id: Uuid,
        growth_rate: Option<Decimal>,
    ) -> Result<Company> {
        let mut state = self.state.lock().await;
        let company = state.company_mut(company_id)?;
        company.growth_rate = growth_rate;
        Ok(company.clone())
    }

    async fn recompute_scores(&self, company_id: Uuid, reason: &str) -> Result<Company> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        state.ensure_company(company_id)?;

        let mut tallies = ScoreTallies::default();
        let mut contributing = 0i64;

        for dimension in Dimension::ALL {
            if let Some(votes) = state.votes.get(&(company_id, dimension)) {
                for vote in votes.values() {
                    tallies.add(dimension, vote.score);
                    contributing += 1;
                }
            }
        }

        for review in state
            .reviews
            .values()
            .filter(|r| r.company_id == company_id && r.status == ReviewStatus::Approved)
        {
            contributing += 1;
            for rating in &review.ratings {
                tallies.add(rating.dimension, rating.score);
            }
        }

        let snapshot = compute_snapshot(&tallies);
        let now = Utc::now();

        let company = state
            .companies
            .get_mut(&company_id)
            .ok_or(StorageError::NotFound)?;
        company.apply_scores(&snapshot);
        company.review_count = contributing;
        company.scores_updated_at = Some(now);

        state.next_sequence += 1;
        state.history.push(ScoreHistoryEntry {
            entry_id: Uuid::new_v4(),
            company_id,
            sequence: state.next_sequence,
            ethics_score: snapshot.ethics,
            credibility_score: snapshot.credibility,
            delivery_score: snapshot.delivery,
            security_score: snapshot.security,
            innovation_score: snapshot.innovation,
            overall_score: snapshot.overall,
            reason: reason.to_string(),
            recorded_at: now,
        });

        Ok(company.clone())
    }

    async fn score_history(&self, company_id: Uuid) -> Result<Vec<ScoreHistoryEntry>> {
        let state = self.state.lock().await;
        Ok(state
            .history
            .iter()
            .filter(|entry| entry.company_id == company_id)
            .cloned()
            .collect())
    }

    async fn update_trending(
        &self,
        company_id: Uuid,
        trending_score: Decimal,
        computed_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut state = self.state.lock().await;
        let company = state.company_mut(company_id)?;
        company.trending_score = trending_score;
        company.trending_updated_at = Some(computed_at);
        Ok(())
    }
}

#[async_trait]
impl ContributionStore for MemoryStore {
    async fn upsert_vote(&self, vote: NewVote) -> Result<VoteChange> {
        let mut state = self.state.lock().await;
        state.ensure_company(vote.company_id)?;

        let now = Utc::now();
        let votes = state
            .votes
            .entry((vote.company_id, vote.dimension))
            .or_default();
        let previous = votes.get(&vote.user_id).cloned();

        let current = Vote {
            vote_id: previous
                .as_ref()
                .map_or_else(Uuid::new_v4, |existing| existing.vote_id),
            user_id: vote.user_id,
            company_id: vote.company_id,
            dimension: vote.dimension,
            score: vote.score,
            comment: vote.comment,
            evidence_url: vote.evidence_url,
            created_at: previous
                .as_ref()
                .map_or(now, |existing| existing.created_at),
            updated_at: now,
        };
        votes.insert(vote.user_id, current.clone());

        Ok(VoteChange { previous, current })
    }

    async fn delete_vote(
        &self,
        user_id: Uuid,
        company_id: Uuid,
        dimension: Dimension,
    ) -> Result<Vote> {
        let mut state = self.state.lock().await;
        state
            .votes
            .get_mut(&(company_id, dimension))
            .and_then(|votes| votes.remove(&user_id))
            .ok_or(StorageError::NotFound)
    }

    async fn create_review(&self, review: NewReview) -> Result<Review> {
        let mut state = self.state.lock().await;
        state.ensure_company(review.company_id)?;

        let now = Utc::now();
        let mut ratings = review.ratings;
        ratings.sort_by_key(|rating| rating.dimension);

        let created = Review {
            review_id: Uuid::new_v4(),
            company_id: review.company_id,
            user_id: review.user_id,
            rating: review.rating,
            title: review.title,
            body: review.body,
            status: ReviewStatus::Pending,
            created_at: now,
            updated_at: now,
            ratings,
        };
        state.reviews.insert(created.review_id, created.clone());

        Ok(created)
    }

    async fn review(&self, review_id: Uuid) -> Result<Review> {
        let state = self.state.lock().await;
        state
            .reviews
            .get(&review_id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn set_review_status(
        &self,
        review_id: Uuid,
        status: ReviewStatus,
    ) -> Result<ReviewStatusChange> {
        let mut state = self.state.lock().await;
        let review = state
            .reviews
            .get_mut(&review_id)
            .ok_or(StorageError::NotFound)?;

        let previous = review.status;
        review.status = status;
        review.updated_at = Utc::now();

        Ok(ReviewStatusChange {
            previous,
            review: review.clone(),
        })
    }

    async fn upsert_promise_vote(&self, vote: NewPromiseVote) -> Result<PromiseVote> {
        let mut state = self.state.lock().await;
        state.ensure_company(vote.company_id)?;

        let now = Utc::now();
        let key = (vote.user_id, vote.company_id, vote.promise.clone());
        let previous = state.promise_votes.get(&key);

        let stored = PromiseVote {
            promise_vote_id: previous.map_or_else(Uuid::new_v4, |p| p.promise_vote_id),
            created_at: previous.map_or(now, |p| p.created_at),
            user_id: vote.user_id,
            company_id: vote.company_id,
            promise: vote.promise,
            kept: vote.kept,
            comment: vote.comment,
            updated_at: now,
        };
        state.promise_votes.insert(key, stored.clone());

        Ok(stored)
    }

    async fn delete_promise_vote(
        &self,
        user_id: Uuid,
        company_id: Uuid,
        promise: &str,
    ) -> Result<PromiseVote> {
        let mut state = self.state.lock().await;
        state
            .promise_votes
            .remove(&(user_id, company_id, promise.to_string()))
            .ok_or(StorageError::NotFound)
    }

    async fn activity_counts(&self, user_id: Uuid) -> Result<ActivityCounts> {
        let state = self.state.lock().await;
        let mut counts = ActivityCounts::default();

        for vote in state
            .votes
            .values()
            .filter_map(|votes| votes.get(&user_id))
        {
            counts.votes += 1;
            if vote.has_comment() {
                counts.commented_votes += 1;
            }
        }

        counts.promise_votes = state
            .promise_votes
            .keys()
            .filter(|(voter, _, _)| *voter == user_id)
            .count() as i64;

        Ok(counts)
    }

    async fn save_reputation(&self, user_id: Uuid, reputation: i64) -> Result<UserProfile> {
        let mut state = self.state.lock().await;
        let profile = UserProfile {
            user_id,
            reputation: reputation.max(0),
            updated_at: Utc::now(),
        };
        state.profiles.insert(user_id, profile.clone());
        Ok(profile)
    }

    async fn user_profile(&self, user_id: Uuid) -> Result<UserProfile> {
        let state = self.state.lock().await;
        state
            .profiles
            .get(&user_id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }
}
