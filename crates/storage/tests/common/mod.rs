#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use storage::dto::vote::SubmitVoteRequest;
use storage::error::{Result, StorageError};
use storage::models::{Company, Dimension, NewCompany, ScoreHistoryEntry};
use storage::services::aggregation::{RetryPolicy, ScoreAggregator};
use storage::services::contributions::ContributionService;
use storage::store::{CompanyStore, MemoryStore};
use uuid::Uuid;

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub aggregator: Arc<ScoreAggregator>,
    pub contributions: ContributionService,
}

/// Memory store, aggregator with its retry worker running, and the write-path service.
pub fn harness() -> Harness {
    let store = Arc::new(MemoryStore::new());
    let (aggregator, worker) = ScoreAggregator::new(store.clone(), RetryPolicy::default());
    tokio::spawn(worker.run());
    let contributions = ContributionService::new(store.clone(), aggregator.clone());

    Harness {
        store,
        aggregator,
        contributions,
    }
}

pub async fn create_company(store: &dyn CompanyStore, slug: &str) -> Company {
    store
        .create_company(NewCompany {
            name: slug.to_uppercase(),
            slug: slug.to_string(),
            growth_rate: None,
            verification_tier: None,
        })
        .await
        .expect("company created")
}

pub fn vote(user_id: Uuid, dimension: Dimension, score: i16) -> SubmitVoteRequest {
    SubmitVoteRequest {
        user_id,
        dimension,
        score,
        comment: None,
        evidence_url: None,
    }
}

pub fn dec(value: &str) -> Decimal {
    value.parse().expect("decimal literal")
}

/// Polls (in virtual time when the clock is paused) until `check` holds.
pub async fn wait_for<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..200 {
        if check().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(250)).await;
    }
    panic!("condition not reached");
}

/// Wraps a [`MemoryStore`] and injects recompute and trending failures on demand.
pub struct FlakyStore {
    pub inner: Arc<MemoryStore>,
    pub recompute_calls: AtomicU32,
    failing_recomputes: AtomicU32,
    conflicting_recomputes: AtomicU32,
    slow_recomputes: AtomicU32,
    permanent_failure: AtomicBool,
    broken_trending: Mutex<HashSet<Uuid>>,
}

impl FlakyStore {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            recompute_calls: AtomicU32::new(0),
            failing_recomputes: AtomicU32::new(0),
            conflicting_recomputes: AtomicU32::new(0),
            slow_recomputes: AtomicU32::new(0),
            permanent_failure: AtomicBool::new(false),
            broken_trending: Mutex::new(HashSet::new()),
        }
    }

    /// The next `count` recomputes fail with a transient error.
    pub fn fail_recomputes(&self, count: u32) {
        self.failing_recomputes.store(count, Ordering::SeqCst);
    }

    /// The next `count` recomputes lose a race with a concurrent writer.
    pub fn conflict_recomputes(&self, count: u32) {
        self.conflicting_recomputes.store(count, Ordering::SeqCst);
    }

    /// The next `count` recomputes hang for longer than any attempt timeout.
    pub fn stall_recomputes(&self, count: u32) {
        self.slow_recomputes.store(count, Ordering::SeqCst);
    }

    pub fn fail_permanently(&self, failing: bool) {
        self.permanent_failure.store(failing, Ordering::SeqCst);
    }

    pub fn break_trending(&self, company_id: Uuid) {
        self.broken_trending
            .lock()
            .expect("lock")
            .insert(company_id);
    }

    pub fn calls(&self) -> u32 {
        self.recompute_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompanyStore for FlakyStore {
    async fn create_company(&self, company: NewCompany) -> Result<Company> {
        self.inner.create_company(company).await
    }

    async fn company(&self, company_id: Uuid) -> Result<Company> {
        self.inner.company(company_id).await
    }

    async fn company_by_slug(&self, slug: &str) -> Result<Company> {
        self.inner.company_by_slug(slug).await
    }

    async fn list_companies(&self) -> Result<Vec<Company>> {
        self.inner.list_companies().await
    }

    async fn page_companies(&self, offset: i64, limit: i64) -> Result<(Vec<Company>, i64)> {
        self.inner.page_companies(offset, limit).await
    }

    async fn record_view(&self, company_id: Uuid) -> Result<Company> {
        self.inner.record_view(company_id).await
    }

    async fn adjust_followers(&self, company_id: Uuid, delta: i64) -> Result<Company> {
        self.inner.adjust_followers(company_id, delta).await
    }

    async fn set_growth_rate(
        &self,
        company_id: Uuid,
        growth_rate: Option<Decimal>,
    ) -> Result<Company> {
        self.inner.set_growth_rate(company_id, growth_rate).await
    }

    async fn recompute_scores(&self, company_id: Uuid, reason: &str) -> Result<Company> {
        self.recompute_calls.fetch_add(1, Ordering::SeqCst);

        if self.permanent_failure.load(Ordering::SeqCst) {
            return Err(StorageError::ConstraintViolation(
                "score out of range".to_string(),
            ));
        }

        if take_one(&self.failing_recomputes) {
            return Err(StorageError::Unavailable("connection reset".to_string()));
        }
        if take_one(&self.conflicting_recomputes) {
            return Err(StorageError::Conflict("could not serialize access".to_string()));
        }
        if take_one(&self.slow_recomputes) {
            tokio::time::sleep(Duration::from_secs(60)).await;
        }

        self.inner.recompute_scores(company_id, reason).await
    }

    async fn score_history(&self, company_id: Uuid) -> Result<Vec<ScoreHistoryEntry>> {
        self.inner.score_history(company_id).await
    }

    async fn update_trending(
        &self,
        company_id: Uuid,
        trending_score: Decimal,
        computed_at: DateTime<Utc>,
    ) -> Result<()> {
        if self.broken_trending.lock().expect("lock").contains(&company_id) {
            return Err(StorageError::Unavailable("row locked".to_string()));
        }
        self.inner
            .update_trending(company_id, trending_score, computed_at)
            .await
    }
}

fn take_one(counter: &AtomicU32) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}
