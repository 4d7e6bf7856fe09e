//! Score aggregation: recomputing a company's dimension scores from its contributions.
//!
//! Recomputation is always a full "read everything, compute, swap" on one company, never
//! an incremental adjustment, so a missed or replayed event cannot make scores drift.
//! [`ScoreAggregator`] wraps the store's atomic recompute with the retry policy: one inline
//! attempt in the writing request, then a background retry schedule. The write that
//! triggered the recompute never fails because of it.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

use crate::error::StorageError;
use crate::models::{Company, Dimension, NEUTRAL_SCORE, ReviewStatus, ScoreSnapshot, ScoreTallies};
use crate::store::CompanyStore;

/// Dimension scores keep two decimals; the overall score keeps one.
const DIMENSION_SCALE: u32 = 2;
const OVERALL_SCALE: u32 = 1;

/// Mean of every dimension's contributions, falling back to the neutral score for a
/// dimension nobody has rated, and the round-half-up mean of the five as overall.
pub fn compute_snapshot(tallies: &ScoreTallies) -> ScoreSnapshot {
    let scores = Dimension::ALL.map(|dimension| {
        let tally = tallies.get(dimension);
        if tally.count == 0 {
            NEUTRAL_SCORE
        } else {
            (Decimal::from(tally.sum) / Decimal::from(tally.count))
                .round_dp_with_strategy(DIMENSION_SCALE, RoundingStrategy::MidpointAwayFromZero)
        }
    });

    let overall = (scores.iter().sum::<Decimal>() / Decimal::from(scores.len() as u64))
        .round_dp_with_strategy(OVERALL_SCALE, RoundingStrategy::MidpointAwayFromZero);

    ScoreSnapshot::from_dimensions(scores, overall)
}

/// A change to something that feeds a company's scores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreEvent {
    VoteChanged {
        company_id: Uuid,
        dimension: Dimension,
        old_score: Option<i16>,
        new_score: Option<i16>,
    },
    ReviewModerationChanged {
        company_id: Uuid,
        review_id: Uuid,
        old_status: ReviewStatus,
        new_status: ReviewStatus,
    },
    ManualRecompute {
        company_id: Uuid,
    },
}

impl ScoreEvent {
    pub fn company_id(&self) -> Uuid {
        match self {
            Self::VoteChanged { company_id, .. }
            | Self::ReviewModerationChanged { company_id, .. }
            | Self::ManualRecompute { company_id } => *company_id,
        }
    }

    /// Machine-readable reason stored with the history entry.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::VoteChanged {
                old_score,
                new_score,
                ..
            } => match (old_score, new_score) {
                (None, Some(_)) => "vote inserted",
                (Some(_), Some(_)) => "vote updated",
                (Some(_), None) => "vote deleted",
                (None, None) => "vote changed",
            },
            Self::ReviewModerationChanged { new_status, .. }
                if *new_status == ReviewStatus::Approved =>
            {
                "review approved"
            }
            Self::ReviewModerationChanged { old_status, .. }
                if *old_status == ReviewStatus::Approved =>
            {
                "review unapproved"
            }
            Self::ReviewModerationChanged { .. } => "review moderated",
            Self::ManualRecompute { .. } => "manual recompute",
        }
    }

    /// Reason recorded by a retry, which may commit after later events have already
    /// recomputed the company.
    pub fn retry_reason(&self) -> String {
        format!("retried: {}", self.reason())
    }

    /// Moderation only matters when a review enters or leaves the approved state.
    pub fn requires_recompute(&self) -> bool {
        match self {
            Self::ReviewModerationChanged {
                old_status,
                new_status,
                ..
            } => {
                old_status != new_status
                    && (*old_status == ReviewStatus::Approved
                        || *new_status == ReviewStatus::Approved)
            }
            Self::VoteChanged { .. } | Self::ManualRecompute { .. } => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Upper bound on a single recompute attempt; exceeding it counts as a transient failure.
    pub attempt_timeout: Duration,
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Retry `n` waits `base_delay * n²`.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_secs(5),
            max_retries: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn backoff(&self, retry: u32) -> Duration {
        self.base_delay * retry.saturating_mul(retry)
    }
}

#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("score recomputation for company {company_id} failed after {attempts} attempt(s): {source}")]
    Exhausted {
        company_id: Uuid,
        attempts: u32,
        #[source]
        source: StorageError,
    },
}

/// How a dispatched event was handled.
#[derive(Debug, Clone)]
pub enum Dispatch {
    Updated(Box<Company>),
    Queued,
    /// The recompute cannot succeed by retrying; scores keep their last value.
    Stale,
    Skipped,
}

pub struct ScoreAggregator {
    store: Arc<dyn CompanyStore>,
    policy: RetryPolicy,
    retries: mpsc::UnboundedSender<ScoreEvent>,
    stale: RwLock<HashSet<Uuid>>,
}

/// Drains events whose inline recompute failed and runs the backoff schedule for each.
pub struct RetryWorker {
    aggregator: Arc<ScoreAggregator>,
    receiver: mpsc::UnboundedReceiver<ScoreEvent>,
}

impl ScoreAggregator {
    pub fn new(store: Arc<dyn CompanyStore>, policy: RetryPolicy) -> (Arc<Self>, RetryWorker) {
        let (retries, receiver) = mpsc::unbounded_channel();
        let aggregator = Arc::new(Self {
            store,
            policy,
            retries,
            stale: RwLock::new(HashSet::new()),
        });
        let worker = RetryWorker {
            aggregator: Arc::clone(&aggregator),
            receiver,
        };
        (aggregator, worker)
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Called by the write path once the triggering write has committed.
    pub async fn dispatch(&self, event: ScoreEvent) -> Dispatch {
        if !event.requires_recompute() {
            return Dispatch::Skipped;
        }

        let company_id = event.company_id();
        match self.attempt(&event, event.reason()).await {
            Ok(company) => {
                self.clear_stale(company_id).await;
                Dispatch::Updated(Box::new(company))
            }
            Err(error) if error.is_transient() => {
                tracing::warn!(%company_id, reason = event.reason(), %error, "Score recompute failed, queueing retry");
                if self.retries.send(event).is_err() {
                    tracing::error!(%company_id, "Retry worker is gone, scores left stale");
                    self.mark_stale(company_id).await;
                    return Dispatch::Stale;
                }
                Dispatch::Queued
            }
            Err(error) => {
                tracing::error!(%company_id, reason = event.reason(), %error, "Score recompute failed permanently");
                self.mark_stale_unless_missing(company_id, &error).await;
                Dispatch::Stale
            }
        }
    }

    /// Runs the whole schedule inline: the first attempt plus every retry.
    pub async fn process(&self, event: &ScoreEvent) -> Result<Company, AggregationError> {
        self.run_schedule(event, 0).await
    }

    /// Administrative recompute of one company, independent of any vote or review.
    pub async fn recompute(&self, company_id: Uuid) -> Result<Company, AggregationError> {
        self.process(&ScoreEvent::ManualRecompute { company_id }).await
    }

    pub async fn is_stale(&self, company_id: Uuid) -> bool {
        self.stale.read().await.contains(&company_id)
    }

    pub async fn stale_companies(&self) -> Vec<Uuid> {
        self.stale.read().await.iter().copied().collect()
    }

    async fn run_schedule(
        &self,
        event: &ScoreEvent,
        first_retry: u32,
    ) -> Result<Company, AggregationError> {
        let company_id = event.company_id();
        let mut attempts = 0;
        let mut last_error = StorageError::Unavailable("no recompute attempted".to_string());

        for retry in first_retry..=self.policy.max_retries {
            let reason = if retry > 0 {
                tokio::time::sleep(self.policy.backoff(retry)).await;
                event.retry_reason()
            } else {
                event.reason().to_string()
            };
            attempts += 1;

            match self.attempt(event, &reason).await {
                Ok(company) => {
                    if retry > 0 {
                        tracing::info!(%company_id, retry, "Score recompute succeeded on retry");
                    }
                    self.clear_stale(company_id).await;
                    return Ok(company);
                }
                Err(error) => {
                    tracing::warn!(%company_id, retry, %error, "Score recompute attempt failed");
                    let transient = error.is_transient();
                    last_error = error;
                    if !transient {
                        break;
                    }
                }
            }
        }

        self.mark_stale_unless_missing(company_id, &last_error).await;
        tracing::warn!(
            %company_id,
            attempts,
            reason = event.reason(),
            "Score recompute exhausted retries, keeping last known scores"
        );

        Err(AggregationError::Exhausted {
            company_id,
            attempts,
            source: last_error,
        })
    }

    /// One attempt; a concurrent-modification conflict gets exactly one immediate rerun.
    async fn attempt(&self, event: &ScoreEvent, reason: &str) -> Result<Company, StorageError> {
        match self.attempt_once(event, reason).await {
            Err(error) if error.is_conflict() => {
                tracing::debug!(company_id = %event.company_id(), %error, "Recompute conflicted, rerunning");
                self.attempt_once(event, reason).await
            }
            outcome => outcome,
        }
    }

    async fn attempt_once(
        &self,
        event: &ScoreEvent,
        reason: &str,
    ) -> Result<Company, StorageError> {
        tokio::time::timeout(
            self.policy.attempt_timeout,
            self.store.recompute_scores(event.company_id(), reason),
        )
        .await
        .map_err(|_| StorageError::Timeout)?
    }

    async fn mark_stale(&self, company_id: Uuid) {
        self.stale.write().await.insert(company_id);
    }

    /// A company that does not exist has no scores to go stale.
    async fn mark_stale_unless_missing(&self, company_id: Uuid, error: &StorageError) {
        if !matches!(error, StorageError::NotFound) {
            self.mark_stale(company_id).await;
        }
    }

    async fn clear_stale(&self, company_id: Uuid) {
        self.stale.write().await.remove(&company_id);
    }
}

impl RetryWorker {
    /// Processes queued events until every sender is dropped.
    pub async fn run(mut self) {
        while let Some(event) = self.receiver.recv().await {
            let aggregator = Arc::clone(&self.aggregator);
            tokio::spawn(async move {
                if let Err(error) = aggregator.run_schedule(&event, 1).await {
                    tracing::warn!(%error, "Queued score recompute gave up");
                }
            });
        }
    }
}
